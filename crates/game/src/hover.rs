//! Idle hover jitter layered on top of flight.

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverParams {
    /// Phase advance per frame (radians).
    pub step: f32,
    /// Peak offset per axis.
    pub amplitude: [f32; 3],
}

impl Default for HoverParams {
    fn default() -> Self {
        Self {
            step: 0.05,
            amplitude: [0.002, 0.004, 0.002],
        }
    }
}

/// Ever-growing hover phase. Never wrapped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoverState {
    pub phase: f32,
}

impl HoverState {
    /// Advance one frame and return the offset to add to the craft position.
    pub fn advance(&mut self, params: &HoverParams) -> Vec3 {
        self.phase += params.step;
        hover_offset(self.phase, params.amplitude)
    }
}

/// Small sinusoidal offset for a given phase.
pub fn hover_offset(phase: f32, amplitude: [f32; 3]) -> Vec3 {
    Vec3::new(
        (phase * 0.5).sin() * amplitude[0],
        phase.sin() * amplitude[1],
        (phase * 0.7).cos() * amplitude[2],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_grows_without_wrapping() {
        let params = HoverParams::default();
        let mut hover = HoverState::default();
        for _ in 0..200 {
            hover.advance(&params);
        }
        assert!(hover.phase > std::f32::consts::TAU);
        assert!((hover.phase - 10.0).abs() < 1e-3);
    }

    #[test]
    fn offset_stays_within_amplitude() {
        let params = HoverParams::default();
        let mut hover = HoverState::default();
        for _ in 0..500 {
            let offset = hover.advance(&params);
            assert!(offset.x.abs() <= 0.002 + 1e-7);
            assert!(offset.y.abs() <= 0.004 + 1e-7);
            assert!(offset.z.abs() <= 0.002 + 1e-7);
        }
    }

    #[test]
    fn zero_phase_offset() {
        let offset = hover_offset(0.0, [0.002, 0.004, 0.002]);
        assert_eq!(offset, Vec3::new(0.0, 0.0, 0.002));
    }
}
