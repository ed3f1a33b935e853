//! Craft and sun loaders: request the asset, then place it in the world once it arrives.

use engine_core::{SceneFragment, Transform};
use hecs::Entity;
use glam::Vec3;

use crate::assets::{AssetError, AssetSource};
use crate::context::AppContext;
use crate::flight::{Craft, CraftAttitude};
use crate::pulse::{CelestialBody, CelestialPulse};

fn progress_logger(label: &'static str) -> impl FnMut(f32) {
    move |ratio| log::debug!("{} load progress: {:.0}%", label, ratio * 100.0)
}

/// Request the craft model. On arrival its materials are replaced and it is spawned.
pub fn request_craft(ctx: &mut AppContext) {
    let source = AssetSource::parse(&ctx.config.assets.craft);
    ctx.loader.load(
        source,
        progress_logger("Craft"),
        |ctx, fragment| {
            spawn_craft(ctx, fragment);
        },
        |_, err: AssetError| log::error!("Craft failed to load: {}", err),
    );
}

/// Request the sun model. On arrival it is scaled, placed and given a pulse.
pub fn request_sun(ctx: &mut AppContext) {
    let source = AssetSource::parse(&ctx.config.assets.sun);
    ctx.loader.load(
        source,
        progress_logger("Sun"),
        |ctx, fragment| {
            spawn_sun(ctx, fragment);
        },
        |_, err: AssetError| log::error!("Sun failed to load: {}", err),
    );
}

pub fn spawn_craft(ctx: &mut AppContext, mut fragment: SceneFragment) -> Entity {
    fragment.override_material(ctx.config.assets.craft_material());
    fragment.root = Transform::from_position(Vec3::from(ctx.config.assets.craft_start));
    let root = fragment.root;

    if let Some(old) = ctx.craft.take() {
        log::warn!("Replacing existing craft {:?}", old);
        let _ = ctx.world.despawn(old);
        ctx.trail.clear();
    }
    let entity = ctx.world.spawn((root, CraftAttitude::default(), Craft, fragment));
    ctx.craft = Some(entity);
    log::info!("Craft spawned at {}", root.position);
    entity
}

pub fn spawn_sun(ctx: &mut AppContext, mut fragment: SceneFragment) -> Entity {
    let assets = &ctx.config.assets;
    fragment.root = Transform {
        position: Vec3::from(assets.sun_position),
        scale: Vec3::splat(assets.sun_scale),
        ..Default::default()
    };
    let pulse = CelestialPulse::default();
    fragment.set_emissive_intensity(pulse.intensity(&ctx.config.pulse));
    let root = fragment.root;

    if let Some(old) = ctx.sun.take() {
        log::warn!("Replacing existing sun {:?}", old);
        let _ = ctx.world.despawn(old);
    }
    let entity = ctx.world.spawn((root, CelestialBody, pulse, fragment));
    ctx.sun = Some(entity);
    log::info!("Sun spawned at {}", root.position);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn context() -> AppContext {
        let mut config = GameConfig::default();
        config.starfield.count = 0;
        AppContext::new(config)
    }

    #[test]
    fn craft_gets_configured_material_and_start() {
        let mut ctx = context();
        ctx.config.assets.craft_start = [1.0, 2.0, 3.0];
        let entity = spawn_craft(&mut ctx, procgen::craft_fragment());
        let material = ctx.config.assets.craft_material();

        let transform = *ctx.world.get::<&Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
        let fragment = ctx.world.get::<&SceneFragment>(entity).unwrap();
        assert!(fragment.meshes().iter().all(|m| m.material == material));
        assert!(ctx.world.get::<&CraftAttitude>(entity).is_ok());
    }

    #[test]
    fn sun_is_scaled_and_placed() {
        let mut ctx = context();
        let entity = spawn_sun(&mut ctx, procgen::sun_fragment());
        let transform = *ctx.world.get::<&Transform>(entity).unwrap();
        assert_eq!(transform.position, Vec3::from(ctx.config.assets.sun_position));
        assert_eq!(transform.scale, Vec3::splat(ctx.config.assets.sun_scale));
        assert!(ctx.world.get::<&CelestialPulse>(entity).is_ok());
        assert_eq!(ctx.sun, Some(entity));
    }

    #[test]
    fn second_craft_replaces_first() {
        let mut ctx = context();
        let first = spawn_craft(&mut ctx, procgen::craft_fragment());
        let second = spawn_craft(&mut ctx, procgen::craft_fragment());
        assert!(!ctx.world.contains(first));
        assert_eq!(ctx.craft, Some(second));
    }

    #[test]
    fn unknown_builtin_reports_error_without_spawning() {
        let mut ctx = context();
        ctx.config.assets.sun = "builtin:nebula".to_string();
        request_sun(&mut ctx);
        ctx.service_loads();
        assert!(ctx.sun.is_none());
        assert_eq!(ctx.world.len(), 0);
    }
}
