//! Craft flight: keyboard-driven translation, banking, pitch and heading.
//!
//! Everything here advances by a fixed amount per frame. There is no delta time
//! and no physics; the craft goes exactly where the controls push it.

use engine_core::{Transform, WORLD_UP};
use glam::Quat;
use input::{Control, InputState};
use serde::{Deserialize, Serialize};

/// Tag for the player-controlled craft entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Craft;

/// Attitude state the craft rotation is rebuilt from every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftAttitude {
    /// Yaw-only heading, turned by the bank controls.
    pub heading: Quat,
    /// Visual banking around the nose axis (radians).
    pub roll: f32,
    /// Nose tilt (radians). Negative is nose down. It is part of the rotation
    /// that forward is read from, so sustained thrust climbs or dives.
    pub pitch: f32,
}

impl Default for CraftAttitude {
    fn default() -> Self {
        Self {
            heading: Quat::IDENTITY,
            roll: 0.0,
            pitch: 0.0,
        }
    }
}

impl CraftAttitude {
    /// `heading * Rx(pitch) * Rz(roll)`
    pub fn rotation(&self) -> Quat {
        self.heading * Quat::from_rotation_x(self.pitch) * Quat::from_rotation_z(self.roll)
    }
}

/// Per-frame flight constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightParams {
    /// Units moved per frame.
    pub base_speed: f32,
    /// Speed multiplier while boost is held.
    pub boost_multiplier: f32,
    pub roll_limit: f32,
    pub roll_step: f32,
    /// Roll multiplier per frame with no strafe held.
    pub roll_decay: f32,
    pub pitch_limit: f32,
    pub pitch_step: f32,
    /// Pitch multiplier per frame with neither forward nor backward held.
    pub pitch_decay: f32,
    /// Heading change per frame while a bank control is held (radians).
    pub turn_rate: f32,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            base_speed: 0.2,
            boost_multiplier: 2.5,
            roll_limit: 0.3,
            roll_step: 0.05,
            roll_decay: 0.9,
            pitch_limit: 0.15,
            pitch_step: 0.02,
            pitch_decay: 0.95,
            turn_rate: 0.03,
        }
    }
}

/// +1 / -1 / 0 for a pair of opposing controls. Both held cancel.
fn axis(input: &InputState, positive: Control, negative: Control) -> f32 {
    let mut value = 0.0;
    if input.is_active(positive) {
        value += 1.0;
    }
    if input.is_active(negative) {
        value -= 1.0;
    }
    value
}

/// Advance the craft one frame.
///
/// Translation uses the orientation the craft had coming into this frame; the
/// attitude update is applied afterwards and only shows up in the next frame's
/// forward and right vectors.
pub fn step_flight(
    transform: &mut Transform,
    attitude: &mut CraftAttitude,
    input: &InputState,
    params: &FlightParams,
) {
    let speed = if input.is_active(Control::Boost) {
        params.base_speed * params.boost_multiplier
    } else {
        params.base_speed
    };

    let forward = transform.forward();
    // Zero when flying straight up or down: no strafe that frame.
    let right = forward.cross(WORLD_UP).normalize_or_zero();

    if input.is_active(Control::Forward) {
        transform.translate(forward * speed);
    }
    if input.is_active(Control::Backward) {
        transform.translate(-forward * speed);
    }
    if input.is_active(Control::StrafeLeft) {
        transform.translate(-right * speed);
    }
    if input.is_active(Control::StrafeRight) {
        transform.translate(right * speed);
    }

    let strafing = input.is_active(Control::StrafeLeft) || input.is_active(Control::StrafeRight);
    if strafing {
        // Left strafe rolls the right wing up (positive about the nose axis).
        let bank = axis(input, Control::StrafeLeft, Control::StrafeRight);
        attitude.roll = (attitude.roll + bank * params.roll_step).clamp(-params.roll_limit, params.roll_limit);
    } else {
        attitude.roll *= params.roll_decay;
    }

    let thrusting = input.is_active(Control::Forward) || input.is_active(Control::Backward);
    if thrusting {
        let tilt = axis(input, Control::Backward, Control::Forward);
        attitude.pitch =
            (attitude.pitch + tilt * params.pitch_step).clamp(-params.pitch_limit, params.pitch_limit);
    } else {
        attitude.pitch *= params.pitch_decay;
    }

    let turn = axis(input, Control::BankLeft, Control::BankRight);
    if turn != 0.0 {
        attitude.heading = (Quat::from_axis_angle(WORLD_UP, turn * params.turn_rate) * attitude.heading).normalize();
    }

    transform.rotation = attitude.rotation();
}
