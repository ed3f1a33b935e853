//! Rigid chase camera. The pose is a pure function of the craft pose.

use engine_core::{Transform, WORLD_UP};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseCameraParams {
    /// Camera mount in the craft's local frame.
    pub offset: [f32; 3],
    /// Look target in the craft's local frame.
    pub look_ahead: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ChaseCameraParams {
    fn default() -> Self {
        Self {
            offset: [0.0, 1.5, 6.0],
            look_ahead: [0.0, 0.5, -10.0],
            fov_degrees: 70.0,
            near: 0.1,
            far: 5000.0,
        }
    }
}

/// Snap `camera` behind `craft`, looking at the look-ahead point. No smoothing.
pub fn follow(camera: &mut Transform, craft: &Transform, params: &ChaseCameraParams) {
    camera.position = craft.local_point(Vec3::from(params.offset));
    let target = craft.local_point(Vec3::from(params.look_ahead));
    camera.look_at(target, WORLD_UP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn identity_pose_sits_behind_and_above() {
        let mut camera = Transform::default();
        let craft = Transform::default();
        follow(&mut camera, &craft, &ChaseCameraParams::default());
        assert_eq!(camera.position, Vec3::new(0.0, 1.5, 6.0));
        // Looking towards (0, 0.5, -10): forward is mostly -Z, tilted down.
        let forward = camera.forward();
        assert!(forward.z < -0.9);
        assert!(forward.y < 0.0);
    }

    #[test]
    fn position_is_craft_plus_rotated_offset() {
        let params = ChaseCameraParams::default();
        let craft = Transform::from_position_rotation(
            Vec3::new(3.0, -2.0, 7.0),
            Quat::from_rotation_y(0.7) * Quat::from_rotation_z(0.2),
        );
        let mut camera = Transform::default();
        follow(&mut camera, &craft, &params);
        let expected = craft.position + craft.rotation * Vec3::from(params.offset);
        assert_eq!(camera.position, expected);

        let target = craft.position + craft.rotation * Vec3::from(params.look_ahead);
        let to_target = (target - camera.position).normalize();
        assert!((camera.forward() - to_target).length() < 1e-4);
    }

    #[test]
    fn same_pose_same_camera() {
        let params = ChaseCameraParams::default();
        let craft = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(1.2));
        let mut a = Transform::from_position(Vec3::splat(100.0));
        let mut b = Transform::default();
        follow(&mut a, &craft, &params);
        follow(&mut b, &craft, &params);
        assert_eq!(a.position, b.position);
        assert!(a.rotation.abs_diff_eq(b.rotation, 1e-6));
    }

    #[test]
    fn overhead_mount_keeps_a_finite_rotation() {
        let params = ChaseCameraParams {
            offset: [0.0, 8.0, 0.0],
            look_ahead: [0.0, 0.0, 0.0],
            ..Default::default()
        };
        let mut camera = Transform::default();
        follow(&mut camera, &Transform::default(), &params);
        assert_eq!(camera.position, Vec3::new(0.0, 8.0, 0.0));
        assert!(camera.rotation.is_finite());
        assert_eq!(camera.rotation, Quat::IDENTITY);
    }
}
