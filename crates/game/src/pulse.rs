//! Sun glow pulse: a triangle wave driving emissive intensity.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Tag for the sun entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct CelestialBody;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseParams {
    /// Phase advance per frame.
    pub step: f32,
    pub base_intensity: f32,
    pub amplitude: f32,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            step: 0.01,
            base_intensity: 1.0,
            amplitude: 0.8,
        }
    }
}

/// Phase in [0, 1] bouncing between the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialPulse {
    pub phase: f32,
    /// +1 rising, -1 falling.
    pub direction: f32,
}

impl Default for CelestialPulse {
    fn default() -> Self {
        Self {
            phase: 0.0,
            direction: 1.0,
        }
    }
}

impl CelestialPulse {
    /// Advance one frame, reflecting any overshoot back inside [0, 1].
    pub fn advance(&mut self, step: f32) {
        self.phase += step * self.direction;
        if self.phase >= 1.0 {
            self.phase = (2.0 - self.phase).clamp(0.0, 1.0);
            self.direction = -1.0;
        } else if self.phase <= 0.0 {
            self.phase = (-self.phase).clamp(0.0, 1.0);
            self.direction = 1.0;
        }
    }

    pub fn intensity(&self, params: &PulseParams) -> f32 {
        params.base_intensity + params.amplitude * (self.phase * PI).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_stays_in_unit_range() {
        let mut pulse = CelestialPulse::default();
        for _ in 0..1000 {
            pulse.advance(0.01);
            assert!((0.0..=1.0).contains(&pulse.phase));
        }
        let mut big = CelestialPulse::default();
        for _ in 0..100 {
            big.advance(0.37);
            assert!((0.0..=1.0).contains(&big.phase));
        }
    }

    #[test]
    fn reaching_top_turns_downward() {
        let mut pulse = CelestialPulse {
            phase: 0.995,
            direction: 1.0,
        };
        pulse.advance(0.01);
        assert_eq!(pulse.direction, -1.0);
        assert!((pulse.phase - 0.995).abs() < 1e-6);

        pulse.advance(0.01);
        assert!(pulse.phase < 1.0);
        assert_eq!(pulse.direction, -1.0);
    }

    #[test]
    fn reaching_bottom_turns_upward() {
        let mut pulse = CelestialPulse {
            phase: 0.005,
            direction: -1.0,
        };
        pulse.advance(0.01);
        assert_eq!(pulse.direction, 1.0);
        assert!((pulse.phase - 0.005).abs() < 1e-6);
    }

    #[test]
    fn exact_bounds_set_direction() {
        let mut pulse = CelestialPulse {
            phase: 0.5,
            direction: 1.0,
        };
        pulse.advance(0.5);
        assert_eq!(pulse.phase, 1.0);
        assert_eq!(pulse.direction, -1.0);

        pulse.advance(1.0);
        assert_eq!(pulse.phase, 0.0);
        assert_eq!(pulse.direction, 1.0);
    }

    #[test]
    fn triangle_wave_period() {
        let mut pulse = CelestialPulse::default();
        let mut flips = 0;
        let mut last = pulse.direction;
        for _ in 0..400 {
            pulse.advance(0.01);
            if pulse.direction != last {
                flips += 1;
                last = pulse.direction;
            }
        }
        // 0 -> 1 -> 0 -> 1 -> 0 over 400 steps of 0.01
        assert!((3..=4).contains(&flips));
    }

    #[test]
    fn intensity_peaks_mid_phase() {
        let params = PulseParams::default();
        let low = CelestialPulse::default().intensity(&params);
        let mid = CelestialPulse {
            phase: 0.5,
            direction: 1.0,
        }
        .intensity(&params);
        assert!((low - 1.0).abs() < 1e-6);
        assert!((mid - 1.8).abs() < 1e-6);
    }
}
