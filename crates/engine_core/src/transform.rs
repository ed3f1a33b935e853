//! Transform component and utilities for spatial positioning.

use glam::{Mat4, Quat, Vec3};

/// Local axis a model faces along when its rotation is identity (right-handed, -Z forward).
pub const LOCAL_FORWARD: Vec3 = Vec3::NEG_Z;

/// World up reference used by steering and look-at.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * LOCAL_FORWARD
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Position of a point given in this transform's local frame (rotation only, no scale).
    /// Used for rigid attachments like a chase camera mount.
    pub fn local_point(&self, offset: Vec3) -> Vec3 {
        self.position + self.rotation * offset
    }

    /// Look at a target position. Leaves rotation untouched when the target coincides
    /// with us or lies straight along `up`, where no view basis exists.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let to_target = target - self.position;
        if to_target.length_squared() <= 0.0001 {
            return;
        }
        if to_target.normalize().cross(up.normalize_or_zero()).length_squared() < 1e-8 {
            return;
        }
        self.rotation = Quat::from_mat4(&Mat4::look_at_rh(self.position, target, up)).inverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_forward_is_negative_z() {
        let t = Transform::default();
        assert!((t.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn local_point_rotates_offset() {
        let t = Transform::from_position_rotation(
            Vec3::new(1.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        // +Z rotated 90° about Y lands on +X
        let p = t.local_point(Vec3::Z);
        assert!((p - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut t = Transform::from_position(Vec3::new(0.0, 0.0, 5.0));
        t.look_at(Vec3::new(3.0, 0.0, 5.0), WORLD_UP);
        assert!((t.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn look_at_same_point_keeps_rotation() {
        let rotation = Quat::from_rotation_x(0.4);
        let mut t = Transform::from_position_rotation(Vec3::ONE, rotation);
        t.look_at(Vec3::ONE, WORLD_UP);
        assert_eq!(t.rotation, rotation);
    }

    #[test]
    fn look_at_along_up_keeps_rotation() {
        let rotation = Quat::from_rotation_y(0.7);
        let mut t = Transform::from_position_rotation(Vec3::ZERO, rotation);
        t.look_at(Vec3::new(0.0, 10.0, 0.0), WORLD_UP);
        assert_eq!(t.rotation, rotation);
        t.look_at(Vec3::new(0.0, -3.0, 0.0), WORLD_UP);
        assert_eq!(t.rotation, rotation);
        assert!(t.rotation.is_finite());
    }
}
