//! Experience configuration
//!
//! Every tunable of the face-lighting experience, with defaults matching the
//! shipped sample behaviour.

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceConfig {
    /// Light estimation and virtual lighting
    pub lighting: LightingConfig,

    /// Plane visualisation
    pub plane: PlaneConfig,

    /// Tap-to-place object
    pub placement: PlacementConfig,

    /// Face content selection
    pub content: ContentConfig,
}

impl Config for ExperienceConfig {}

impl ExperienceConfig {
    /// Check values that would otherwise only fail deep inside an adapter
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lighting.calibration_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "lighting.calibration_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.placement.scale.is_finite() && self.placement.scale > 0.0) {
            return Err(ConfigError::Invalid {
                field: "placement.scale",
                reason: format!("{} is not a positive finite scale", self.placement.scale),
            });
        }
        if self.plane.color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid {
                field: "plane.color",
                reason: format!("{:?} has a channel outside 0..=1", self.plane.color),
            });
        }
        Ok(())
    }
}

/// Light estimation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Frames of face-tracking light estimation before switching to world tracking
    pub calibration_frames: u32,

    /// Category bit mask given to the virtual lights
    pub category_mask: u32,

    /// Keep a line node from the origin along the estimated light direction
    pub show_light_direction: bool,

    /// Image based lighting; replaces the ambient light when set
    pub cubemap: Option<CubemapConfig>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            calibration_frames: 250,
            category_mask: 42,
            show_light_direction: false,
            cubemap: None,
        }
    }
}

/// Six cubemap face images, in +X, -X, +Y, -Y, +Z, -Z order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubemapConfig {
    /// Face image paths
    pub faces: [PathBuf; 6],
}

/// Plane visual configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    /// Diffuse RGBA color of the translucent plane quad
    pub color: [f32; 4],
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            color: [0.53, 0.81, 0.98, 0.3],
        }
    }
}

/// Tap-to-place configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Directory the model library reads scene assets from
    pub models_dir: PathBuf,

    /// Scene asset to load on tap
    pub model_name: String,

    /// Node inside the asset that gets placed
    pub child_node: String,

    /// Uniform scale applied to the placed node
    pub scale: f32,

    /// Category bit mask of the placed node
    pub category_mask: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("Models.scnassets"),
            model_name: "zeus-2_1".to_string(),
            child_node: "zeus-2_zeus-2".to_string(),
            scale: 0.09,
            category_mask: 42,
        }
    }
}

/// Face content configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Tag of the content type selected at launch
    pub initial_tag: i32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self { initial_tag: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_sample_behaviour() {
        let config = ExperienceConfig::default();
        assert_eq!(config.lighting.calibration_frames, 250);
        assert_eq!(config.lighting.category_mask, 42);
        assert!(config.lighting.cubemap.is_none());
        assert_eq!(config.placement.model_name, "zeus-2_1");
        assert!((config.placement.scale - 0.09).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: ExperienceConfig = toml::from_str(
            "[lighting]\ncalibration_frames = 10\nshow_light_direction = true\n",
        )
        .unwrap();
        assert_eq!(config.lighting.calibration_frames, 10);
        assert!(config.lighting.show_light_direction);
        assert_eq!(config.lighting.category_mask, 42);
        assert_eq!(config.plane, PlaneConfig::default());
    }

    #[test]
    fn ron_file_round_trip() {
        let path = std::env::temp_dir().join(format!("ar_scene_config_{}.ron", std::process::id()));
        let mut config = ExperienceConfig::default();
        config.content.initial_tag = 2;
        config.save_to_file(&path).unwrap();
        let loaded = ExperienceConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = ExperienceConfig::load_from_file("settings.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn zero_calibration_frames_fail_validation() {
        let mut config = ExperienceConfig::default();
        config.lighting.calibration_frames = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "lighting.calibration_frames", .. })
        ));
    }
}
