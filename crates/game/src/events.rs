//! Window event handling for GameState.

use winit::event::WindowEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.ctx.resize(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return false;
                };
                if key == KeyCode::Escape && event.state.is_pressed() {
                    self.running = false;
                    return true;
                }
                self.ctx.input.process_keyboard(key, event.state);
                false
            }
            WindowEvent::Focused(false) => {
                // Key releases are lost while unfocused; don't keep flying.
                self.ctx.input.clear();
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Render error: {}", e);
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}
