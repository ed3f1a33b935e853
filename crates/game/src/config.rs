//! Demo configuration. Loaded from stardrift.ron at startup.

use serde::{Deserialize, Serialize};

use crate::chase::ChaseCameraParams;
use crate::flight::FlightParams;
use crate::hover::HoverParams;
use crate::light::LightParams;
use crate::pulse::PulseParams;
use crate::trail::TrailParams;

const CONFIG_FILE: &str = "stardrift.ron";

/// All tunables. Any field missing from the file keeps its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub flight: FlightParams,
    #[serde(default)]
    pub camera: ChaseCameraParams,
    #[serde(default)]
    pub hover: HoverParams,
    #[serde(default)]
    pub pulse: PulseParams,
    #[serde(default)]
    pub trail: TrailParams,
    #[serde(default)]
    pub starfield: StarfieldSettings,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub light: LightParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,
}

fn default_title() -> String {
    "Stardrift".to_string()
}
fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_window_width(),
            height: default_window_height(),
            vsync: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldSettings {
    pub seed: u64,
    pub count: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        let defaults = procgen::StarfieldConfig::default();
        Self {
            seed: defaults.seed,
            count: defaults.count,
            inner_radius: defaults.inner_radius,
            outer_radius: defaults.outer_radius,
        }
    }
}

impl From<&StarfieldSettings> for procgen::StarfieldConfig {
    fn from(settings: &StarfieldSettings) -> Self {
        procgen::StarfieldConfig {
            seed: settings.seed,
            count: settings.count,
            inner_radius: settings.inner_radius,
            outer_radius: settings.outer_radius,
        }
    }
}

/// Asset sources and placement. Sources are file paths or `builtin:<name>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub craft: String,
    pub craft_start: [f32; 3],
    pub craft_color: [f32; 4],
    pub craft_emissive: [f32; 3],
    pub craft_emissive_intensity: f32,
    pub sun: String,
    pub sun_position: [f32; 3],
    pub sun_scale: f32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            craft: "builtin:craft".to_string(),
            craft_start: [0.0, 0.0, 0.0],
            // Brushed-metal grey with a faint blue glow
            craft_color: [0.55, 0.57, 0.6, 1.0],
            craft_emissive: [0.2, 0.45, 1.0],
            craft_emissive_intensity: 0.15,
            sun: "builtin:sun".to_string(),
            sun_position: [0.0, 40.0, -400.0],
            sun_scale: 40.0,
        }
    }
}

impl AssetConfig {
    pub fn craft_material(&self) -> engine_core::Material {
        engine_core::Material {
            base_color: self.craft_color,
            emissive: self.craft_emissive,
            emissive_intensity: self.craft_emissive_intensity,
        }
    }
}

impl GameConfig {
    /// Load config from `stardrift.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => match Self::from_ron(&data) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = GameConfig::from_ron("()").unwrap();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.flight.base_speed, 0.2);
        assert_eq!(config.trail.bound, 50);
        assert_eq!(config.assets.craft, "builtin:craft");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = GameConfig::from_ron("(flight: (base_speed: 0.5), window: (vsync: false))").unwrap();
        assert_eq!(config.flight.base_speed, 0.5);
        assert_eq!(config.flight.boost_multiplier, 2.5);
        assert!(!config.window.vsync);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn pretty_output_reads_back() {
        let mut config = GameConfig::default();
        config.starfield.seed = 99;
        config.camera.offset = [0.0, 2.0, 8.0];
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back = GameConfig::from_ron(&text).unwrap();
        assert_eq!(back.starfield.seed, 99);
        assert_eq!(back.camera.offset, [0.0, 2.0, 8.0]);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(GameConfig::from_ron("(window: 3)").is_err());
    }
}
