//! Keyboard flight controls.
//!
//! Raw keys are normalized into a closed set of [`Control`]s at the boundary;
//! anything outside the vocabulary is dropped without complaint.

use std::fmt;

/// Logical flight controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Boost,
    BankLeft,
    BankRight,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Control::Forward,
        Control::Backward,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::Boost,
        Control::BankLeft,
        Control::BankRight,
    ];

    /// Kebab-case control name.
    pub fn name(self) -> &'static str {
        match self {
            Control::Forward => "forward",
            Control::Backward => "backward",
            Control::StrafeLeft => "strafe-left",
            Control::StrafeRight => "strafe-right",
            Control::Boost => "boost",
            Control::BankLeft => "bank-left",
            Control::BankRight => "bank-right",
        }
    }

    /// Parse a control name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Default keyboard binding.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Control::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Control::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Control::StrafeLeft),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Control::StrafeRight),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Control::Boost),
            KeyCode::KeyQ => Some(Control::BankLeft),
            KeyCode::KeyE => Some(Control::BankRight),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current pressed/released state of every control.
///
/// Only the latest state is kept: a press and release between two frames is never seen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    active: u8,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a control by name. Unknown names are ignored.
    pub fn set_control(&mut self, name: &str, pressed: bool) {
        if let Some(control) = Control::from_name(name) {
            self.set(control, pressed);
        }
    }

    pub fn set(&mut self, control: Control, pressed: bool) {
        if pressed {
            self.active |= control.bit();
        } else {
            self.active &= !control.bit();
        }
    }

    /// Process a keyboard event. Unmapped keys are ignored.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        if let Some(control) = Control::from_key(key) {
            log::trace!("{} {:?}", control, state);
            self.set(control, state.is_pressed());
        }
    }

    pub fn is_active(&self, control: Control) -> bool {
        self.active & control.bit() != 0
    }

    /// Release everything (e.g. when the window loses focus).
    pub fn clear(&mut self) {
        self.active = 0;
    }

    /// Controls currently held, in declaration order.
    pub fn active_controls(&self) -> impl Iterator<Item = Control> + '_ {
        Control::ALL.into_iter().filter(|c| self.is_active(*c))
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_vocabulary() {
        for control in Control::ALL {
            assert_eq!(Control::from_name(control.name()), Some(control));
        }
    }

    #[test]
    fn set_control_by_name() {
        let mut input = InputState::new();
        input.set_control("strafe-left", true);
        assert!(input.is_active(Control::StrafeLeft));
        input.set_control("strafe-left", false);
        assert!(!input.is_active(Control::StrafeLeft));
    }

    #[test]
    fn unknown_names_are_ignored() {
        let mut input = InputState::new();
        input.set_control("forward", true);
        let before = input;
        input.set_control("hyperdrive", true);
        input.set_control("Forward", false);
        input.set_control("", true);
        assert_eq!(input, before);
    }

    #[test]
    fn keyboard_maps_to_controls() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::ShiftRight, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        assert_eq!(
            input.active_controls().collect::<Vec<_>>(),
            vec![Control::Forward, Control::Boost, Control::BankLeft]
        );

        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert!(!input.is_active(Control::Forward));
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyZ, ElementState::Pressed);
        input.process_keyboard(KeyCode::F5, ElementState::Pressed);
        assert_eq!(input, InputState::new());
    }

    #[test]
    fn repeated_press_is_idempotent() {
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyD, ElementState::Released);
        assert!(!input.is_active(Control::StrafeRight));
    }
}
