//! Motion trail: bounded position history and the tube mesh rebuilt from it.

use engine_core::{FragmentMesh, Material};
use glam::Vec3;
use procgen::{build_tube, TubeConfig};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Largest history a configured trail may keep.
pub const MAX_TRAIL_POINTS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailParams {
    /// Maximum number of remembered positions.
    pub bound: usize,
    pub radius: f32,
    pub segments_per_span: u32,
    pub radial_segments: u32,
    /// Fraction the radius shrinks towards the tail.
    pub taper: f32,
    pub color: [f32; 3],
    pub glow: f32,
}

impl Default for TrailParams {
    fn default() -> Self {
        Self {
            bound: 50,
            radius: 0.05,
            segments_per_span: 2,
            radial_segments: 6,
            taper: 0.5,
            color: [0.3, 0.7, 1.0],
            glow: 1.5,
        }
    }
}

impl TrailParams {
    pub fn tube(&self) -> TubeConfig {
        TubeConfig {
            radius: self.radius,
            segments_per_span: self.segments_per_span,
            radial_segments: self.radial_segments,
            taper: self.taper,
        }
    }

    pub fn material(&self) -> Material {
        Material {
            base_color: [self.color[0], self.color[1], self.color[2], 0.8],
            emissive: self.color,
            emissive_intensity: self.glow,
        }
    }
}

/// Past craft positions, newest first.
#[derive(Debug, Clone)]
pub struct TrailHistory {
    points: VecDeque<Vec3>,
    bound: usize,
}

impl TrailHistory {
    pub fn new(bound: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(bound + 1),
            bound,
        }
    }

    /// Prepend a sample and drop whatever falls past the bound.
    pub fn push(&mut self, position: Vec3) {
        self.points.push_front(position);
        self.points.truncate(self.bound);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> Vec<Vec3> {
        self.points.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

/// Owns the history and the mesh derived from it. The mesh is thrown away and
/// rebuilt from scratch on every update.
#[derive(Debug, Clone)]
pub struct TrailRenderer {
    history: TrailHistory,
    tube: TubeConfig,
    material: Material,
    mesh: Option<FragmentMesh>,
}

impl TrailRenderer {
    pub fn new(params: &TrailParams) -> Self {
        let bound = params.bound.min(MAX_TRAIL_POINTS);
        if bound < params.bound {
            log::warn!("Trail bound {} capped to {}", params.bound, bound);
        }
        Self {
            history: TrailHistory::new(bound),
            tube: params.tube(),
            material: params.material(),
            mesh: None,
        }
    }

    /// Record the craft position and regenerate the tube.
    pub fn update(&mut self, position: Vec3) {
        self.history.push(position);
        self.mesh = None;
        if self.history.len() < 2 {
            return;
        }
        self.mesh = build_tube(&self.history.points(), &self.tube).map(|mesh| mesh.with_material(self.material));
    }

    /// Forget the path, e.g. when the craft is replaced.
    pub fn clear(&mut self) {
        self.history.clear();
        self.mesh = None;
    }

    pub fn history(&self) -> &TrailHistory {
        &self.history
    }

    /// Current tube, if the history describes one.
    pub fn mesh(&self) -> Option<&FragmentMesh> {
        self.mesh.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_never_exceeds_bound() {
        let mut history = TrailHistory::new(50);
        for i in 0..51 {
            history.push(Vec3::new(i as f32, 0.0, 0.0));
            assert!(history.len() <= 50);
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.get(0), Some(Vec3::new(50.0, 0.0, 0.0)));
        // The very first sample has been evicted.
        assert!(!history.points().contains(&Vec3::ZERO));
        assert_eq!(history.get(49), Some(Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn single_sample_has_no_mesh() {
        let mut trail = TrailRenderer::new(&TrailParams::default());
        trail.update(Vec3::ZERO);
        assert!(trail.mesh().is_none());
    }

    #[test]
    fn two_samples_degrade_to_no_mesh() {
        let mut trail = TrailRenderer::new(&TrailParams::default());
        trail.update(Vec3::ZERO);
        trail.update(Vec3::X);
        assert_eq!(trail.history().len(), 2);
        assert!(trail.mesh().is_none());
    }

    #[test]
    fn moving_craft_grows_a_tube() {
        let params = TrailParams::default();
        let mut trail = TrailRenderer::new(&params);
        for i in 0..10 {
            trail.update(Vec3::new(0.0, 0.0, -0.2 * i as f32));
        }
        let mesh = trail.mesh().expect("tube after ten samples");
        assert_eq!(mesh.name, "trail");
        assert_eq!(mesh.material, params.material());
        assert!(mesh.positions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn oversized_trail_config_stays_bounded() {
        let params = TrailParams {
            bound: usize::MAX,
            ..Default::default()
        };
        let mut trail = TrailRenderer::new(&params);
        for i in 0..(MAX_TRAIL_POINTS + 5) {
            trail.update(Vec3::new(0.0, 0.0, -0.2 * i as f32));
        }
        assert_eq!(trail.history().len(), MAX_TRAIL_POINTS);

        let mut dense = TrailRenderer::new(&TrailParams {
            segments_per_span: u32::MAX,
            radial_segments: u32::MAX,
            ..Default::default()
        });
        for i in 0..5 {
            dense.update(Vec3::new(0.0, 0.0, -0.2 * i as f32));
        }
        let mesh = dense.mesh().expect("tube");
        assert!(mesh.indices.len() <= procgen::MAX_TUBE_SEGMENTS * procgen::MAX_RADIAL_SEGMENTS as usize * 6);
    }

    #[test]
    fn stationary_craft_has_no_tube() {
        let mut trail = TrailRenderer::new(&TrailParams::default());
        for _ in 0..10 {
            trail.update(Vec3::splat(4.0));
        }
        assert!(trail.mesh().is_none());
    }
}
