//! Application context and the per-frame tick.

use engine_core::{drain_into, SceneFragment, TaskQueue, Transform};
use hecs::{Entity, World};
use glam::Vec3;
use input::InputState;
use procgen::{generate_starfield, Star};
use renderer::Camera;

use crate::assets::AssetLoader;
use crate::chase;
use crate::config::GameConfig;
use crate::flight::{step_flight, CraftAttitude};
use crate::hover::HoverState;
use crate::light::{self, PointLight};
use crate::pulse::CelestialPulse;
use crate::trail::TrailRenderer;

/// Everything the frame loop mutates. Built once, passed by reference.
pub struct AppContext {
    pub config: GameConfig,
    pub world: World,
    pub camera: Camera,
    pub input: InputState,
    pub hover: HoverState,
    pub trail: TrailRenderer,
    pub light: PointLight,
    /// Direction towards the sun for the directional term.
    pub sun_direction: Vec3,
    pub stars: Vec<Star>,
    pub craft: Option<Entity>,
    pub sun: Option<Entity>,
    pub loader: AssetLoader<AppContext>,
    pub tasks: TaskQueue<AppContext>,
}

impl AppContext {
    pub fn new(config: GameConfig) -> Self {
        let mut camera = Camera::new(Vec3::from(config.camera.offset));
        camera.fov_degrees = config.camera.fov_degrees;
        camera.near = config.camera.near;
        camera.far = config.camera.far;
        camera
            .transform
            .look_at(Vec3::from(config.camera.look_ahead), engine_core::WORLD_UP);

        let stars = generate_starfield(&(&config.starfield).into());

        Self {
            world: World::new(),
            camera,
            input: InputState::new(),
            hover: HoverState::default(),
            trail: TrailRenderer::new(&config.trail),
            light: PointLight::new(&config.light),
            sun_direction: light::sun_direction(Vec3::ZERO, None, &config.light),
            stars,
            craft: None,
            sun: None,
            loader: AssetLoader::new(),
            tasks: TaskQueue::new(),
            config,
        }
    }

    /// Run one pending load, then every continuation queued so far.
    pub fn service_loads(&mut self) {
        self.loader.poll(&mut self.tasks);
        drain_into(self, |ctx| &mut ctx.tasks);
    }

    /// Current craft pose, if the craft has loaded.
    pub fn craft_transform(&self) -> Option<Transform> {
        let entity = self.craft?;
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    /// One frame: motion, camera, hover, light, pulse, trail. Each step is a
    /// no-op while the entity it depends on is absent.
    pub fn tick(&mut self) {
        if let Some(pose) = self.step_motion() {
            chase::follow(&mut self.camera.transform, &pose, &self.config.camera);
        }
        self.apply_hover();
        self.follow_light();
        self.pulse_sun();
        self.update_trail();
    }

    fn step_motion(&mut self) -> Option<Transform> {
        let entity = self.craft?;
        let (transform, attitude) = self
            .world
            .query_one_mut::<(&mut Transform, &mut CraftAttitude)>(entity)
            .ok()?;
        step_flight(transform, attitude, &self.input, &self.config.flight);
        Some(*transform)
    }

    fn apply_hover(&mut self) {
        let Some(entity) = self.craft else { return };
        let Ok(transform) = self.world.query_one_mut::<&mut Transform>(entity) else {
            return;
        };
        transform.translate(self.hover.advance(&self.config.hover));
    }

    fn follow_light(&mut self) {
        let Some(craft) = self.craft_transform() else { return };
        self.light.follow(craft.position, &self.config.light);
        let sun = self
            .sun
            .and_then(|e| self.world.get::<&Transform>(e).ok().map(|t| t.position));
        self.sun_direction = light::sun_direction(craft.position, sun, &self.config.light);
    }

    fn pulse_sun(&mut self) {
        let Some(entity) = self.sun else { return };
        let Ok((pulse, fragment)) = self
            .world
            .query_one_mut::<(&mut CelestialPulse, &mut SceneFragment)>(entity)
        else {
            return;
        };
        pulse.advance(self.config.pulse.step);
        fragment.set_emissive_intensity(pulse.intensity(&self.config.pulse));
    }

    fn update_trail(&mut self) {
        let Some(craft) = self.craft_transform() else { return };
        self.trail.update(craft.position);
    }

    /// Update projection after a resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }
}
