//! Stardrift - fly a small craft through a starfield towards a pulsing sun.

mod assets;
mod chase;
mod config;
mod context;
mod events;
mod flight;
mod hover;
mod light;
mod loaders;
mod pulse;
mod render;
mod trail;

use anyhow::Result;
use engine_core::Time;
use renderer::Renderer;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::GameConfig;
use crate::context::AppContext;
use crate::render::GpuScene;

/// Window-bound state: the renderer plus the context it draws.
pub struct GameState {
    pub renderer: Renderer,
    pub gpu: GpuScene,
    pub ctx: AppContext,
    pub time: Time,
    pub running: bool,
}

impl GameState {
    async fn new(window: Arc<Window>, config: GameConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window, config.window.vsync).await?;
        let (width, height) = renderer.dimensions();

        let mut ctx = AppContext::new(config);
        ctx.resize(width, height);
        renderer.upload_stars(&render::star_instances(&ctx.stars));

        loaders::request_sun(&mut ctx);
        loaders::request_craft(&mut ctx);

        Ok(Self {
            renderer,
            gpu: GpuScene::new(),
            ctx,
            time: Time::new(),
            running: true,
        })
    }

    /// One scheduled frame: time, loads, continuations, tick.
    fn update(&mut self) {
        self.time.update();
        self.ctx.service_loads();
        self.ctx.tick();

        if let Some(fps) = self.time.take_fps_sample() {
            log::debug!("{:.0} fps (frame {})", fps, self.time.frame_count());
        }
    }

    fn render(&mut self) -> Result<()> {
        render::run(self)
    }
}

/// Application handler for winit.
struct App {
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title(config.window.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(config.window.width, config.window.height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(GameState::new(window.clone(), config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize renderer: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════╗");
    println!("║                  STARDRIFT                   ║");
    println!("╠══════════════════════════════════════════════╣");
    println!("║  W / Up        - Forward                     ║");
    println!("║  S / Down      - Backward                    ║");
    println!("║  A D / ← →     - Strafe                      ║");
    println!("║  Q / E         - Bank (turn)                 ║");
    println!("║  Shift         - Boost                       ║");
    println!("║  Escape        - Quit                        ║");
    println!("╚══════════════════════════════════════════════╝");

    log::info!("Starting Stardrift");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
