//! Background starfield: a static point cloud on a thick spherical shell.

use glam::Vec3;
use rand::prelude::*;

/// One background star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Point size in pixels.
    pub size: f32,
}

/// Parameters for the star cloud.
#[derive(Debug, Clone)]
pub struct StarfieldConfig {
    pub seed: u64,
    pub count: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            count: 6000,
            inner_radius: 1500.0,
            outer_radius: 2500.0,
        }
    }
}

/// Generate the star cloud. Same config always yields the same stars.
pub fn generate_starfield(config: &StarfieldConfig) -> Vec<Star> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (inner, outer) = if config.inner_radius <= config.outer_radius {
        (config.inner_radius, config.outer_radius)
    } else {
        (config.outer_radius, config.inner_radius)
    };

    let stars: Vec<Star> = (0..config.count)
        .map(|_| {
            // Uniform direction on the sphere
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let z = rng.gen_range(-1.0f32..=1.0);
            let ring = (1.0 - z * z).max(0.0).sqrt();
            let direction = Vec3::new(ring * theta.cos(), z, ring * theta.sin());

            let radius = inner + (outer - inner) * rng.gen::<f32>();

            // Power law: many dim stars, a handful of bright ones
            let brightness = rng.gen::<f32>().powf(3.0);

            Star {
                position: direction * radius,
                color: star_tint(brightness),
                size: 1.0 + brightness * 2.5,
            }
        })
        .collect();

    log::debug!("Generated {} stars (seed {})", stars.len(), config.seed);
    stars
}

/// Dim stars lean red-orange, bright ones blue-white.
fn star_tint(brightness: f32) -> [f32; 3] {
    let b = brightness.clamp(0.0, 1.0);
    let level = 0.35 + 0.65 * b;
    [
        level * (1.0 - 0.15 * b),
        level * (0.85 + 0.1 * b),
        level * (0.7 + 0.3 * b),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starfield_count_matches_config() {
        let config = StarfieldConfig {
            count: 500,
            ..Default::default()
        };
        assert_eq!(generate_starfield(&config).len(), 500);
    }

    #[test]
    fn starfield_same_seed_same_stars() {
        let config = StarfieldConfig {
            count: 64,
            ..Default::default()
        };
        assert_eq!(generate_starfield(&config), generate_starfield(&config));
    }

    #[test]
    fn starfield_different_seed_differs() {
        let a = generate_starfield(&StarfieldConfig { seed: 1, count: 16, ..Default::default() });
        let b = generate_starfield(&StarfieldConfig { seed: 2, count: 16, ..Default::default() });
        assert_ne!(a, b);
    }

    #[test]
    fn stars_stay_inside_shell() {
        let config = StarfieldConfig {
            count: 1000,
            inner_radius: 100.0,
            outer_radius: 200.0,
            ..Default::default()
        };
        for star in generate_starfield(&config) {
            let r = star.position.length();
            assert!(r >= 100.0 - 1e-2 && r <= 200.0 + 1e-2, "radius {r}");
        }
    }

    #[test]
    fn swapped_radii_are_tolerated() {
        let config = StarfieldConfig {
            count: 50,
            inner_radius: 200.0,
            outer_radius: 100.0,
            ..Default::default()
        };
        for star in generate_starfield(&config) {
            let r = star.position.length();
            assert!(r >= 100.0 - 1e-2 && r <= 200.0 + 1e-2);
        }
    }
}
