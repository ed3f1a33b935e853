//! Point light riding along with the craft, plus the sun's directional term.

use glam::Vec3;
use renderer::LightUniform;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    /// Light position relative to the craft (world axes).
    pub offset: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub range: f32,
    /// Strength of the directional term coming from the sun.
    pub sun_intensity: f32,
    /// Used until the sun exists.
    pub default_sun_direction: [f32; 3],
    pub ambient: [f32; 3],
    pub exposure: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            offset: [0.0, 3.0, 2.0],
            color: [1.0, 0.97, 0.92],
            intensity: 1.2,
            range: 60.0,
            sun_intensity: 0.6,
            default_sun_direction: [0.3, 0.5, -0.8],
            ambient: [0.05, 0.05, 0.07],
            exposure: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

impl PointLight {
    pub fn new(params: &LightParams) -> Self {
        Self {
            position: Vec3::from(params.offset),
            color: Vec3::from(params.color),
            intensity: params.intensity,
            range: params.range,
        }
    }

    /// Re-anchor the light on the craft.
    pub fn follow(&mut self, craft_position: Vec3, params: &LightParams) {
        self.position = craft_position + Vec3::from(params.offset);
    }
}

/// Direction from `from` towards the sun, or the configured fallback.
pub fn sun_direction(from: Vec3, sun: Option<Vec3>, params: &LightParams) -> Vec3 {
    let fallback = Vec3::from(params.default_sun_direction).normalize_or_zero();
    match sun {
        Some(sun) => (sun - from).try_normalize().unwrap_or(fallback),
        None => fallback,
    }
}

/// Pack everything into the shader's light block.
pub fn light_uniform(light: &PointLight, sun_dir: Vec3, params: &LightParams) -> LightUniform {
    LightUniform {
        position: light.position.extend(light.intensity).to_array(),
        color: light.color.extend(light.range).to_array(),
        sun_direction: sun_dir.extend(params.sun_intensity).to_array(),
        ambient: Vec3::from(params.ambient).extend(params.exposure).to_array(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_craft_with_offset() {
        let params = LightParams::default();
        let mut light = PointLight::new(&params);
        light.follow(Vec3::new(10.0, 0.0, -5.0), &params);
        assert_eq!(light.position, Vec3::new(10.0, 3.0, -3.0));
    }

    #[test]
    fn sun_direction_points_at_sun() {
        let params = LightParams::default();
        let dir = sun_direction(Vec3::ZERO, Some(Vec3::new(0.0, 0.0, -100.0)), &params);
        assert!((dir - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn sun_direction_falls_back() {
        let params = LightParams::default();
        let fallback = Vec3::from(params.default_sun_direction).normalize();
        assert!((sun_direction(Vec3::ONE, None, &params) - fallback).length() < 1e-6);
        assert!((sun_direction(Vec3::ONE, Some(Vec3::ONE), &params) - fallback).length() < 1e-6);
    }

    #[test]
    fn uniform_packs_scalars_into_w() {
        let params = LightParams::default();
        let light = PointLight::new(&params);
        let uniform = light_uniform(&light, Vec3::Y, &params);
        assert_eq!(uniform.position[3], params.intensity);
        assert_eq!(uniform.color[3], params.range);
        assert_eq!(uniform.sun_direction, [0.0, 1.0, 0.0, params.sun_intensity]);
        assert_eq!(uniform.ambient[3], params.exposure);
    }
}
