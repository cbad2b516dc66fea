//! Viewer configuration loaded from TOML.
//!
//! Every section and field has a default, so a config file only needs to name
//! what it changes:
//!
//! ```
//! use flatpack::ViewerConfig;
//!
//! let config = ViewerConfig::from_toml_str(
//!     r#"
//! [window]
//! width = 1280
//!
//! [camera]
//! fov_degrees = 60.0
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.window.width, 1280);
//! assert_eq!(config.window.height, 768);
//! assert_eq!(config.camera.fov_degrees, 60.0);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors raised while loading a [`ViewerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Flatpack Bike".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Initial camera placement and key-driven movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit per held frame, degrees.
    pub orbit_step_degrees: f32,
    /// Position multiplier per frame while zooming out.
    pub zoom_out_factor: f32,
    /// Position multiplier per frame while zooming in.
    pub zoom_in_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [10.0, 13.0, 7.0],
            look_at: [0.0, 0.0, 3.0],
            up: [0.0, 0.0, 1.0],
            fov_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
            orbit_step_degrees: 1.2,
            zoom_out_factor: 1.02,
            zoom_in_factor: 0.98,
        }
    }
}

/// Point light used by the lit pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub diffuse: [f32; 3],
    pub ambient: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 5.0, 10.0],
            diffuse: [0.2, 0.2, 0.2],
            ambient: [0.0, 0.0, 0.0],
        }
    }
}

/// Atlas image paths, one per texture slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub wheel: PathBuf,
    pub metal: PathBuf,
    pub black: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            wheel: PathBuf::from("textures/wheel.png"),
            metal: PathBuf::from("textures/metal.png"),
            black: PathBuf::from("textures/black.png"),
        }
    }
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub clear_color: [f32; 4],
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub textures: TextureConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            textures: TextureConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Parses a TOML document, filling missing fields with defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&content)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_bike_scene() {
        let config = ViewerConfig::default();
        assert_eq!(config.window.title, "Flatpack Bike");
        assert_eq!((config.window.width, config.window.height), (1024, 768));
        assert_eq!(config.camera.position, [10.0, 13.0, 7.0]);
        assert_eq!(config.camera.up, [0.0, 0.0, 1.0]);
        assert_eq!(config.light.position, [5.0, 5.0, 10.0]);
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ViewerConfig::from_toml_str("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
clear_color = [0.1, 0.1, 0.1, 1.0]

[light]
diffuse = [0.8, 0.8, 0.8]

[textures]
wheel = "assets/wheel.png"
"#,
        )
        .unwrap();

        assert_eq!(config.light.diffuse, [0.8, 0.8, 0.8]);
        assert_eq!(config.light.position, [5.0, 5.0, 10.0]);
        assert_eq!(config.textures.wheel, PathBuf::from("assets/wheel.png"));
        assert_eq!(config.textures.metal, PathBuf::from("textures/metal.png"));
        assert_eq!(config.clear_color, [0.1, 0.1, 0.1, 1.0]);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = ViewerConfig::from_toml_str("[window\nwidth = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = ViewerConfig::from_toml_str("[window]\nwidth = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = Path::new("/definitely/not/here/flatpack.toml");
        assert!(matches!(ViewerConfig::load(path), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn builder_overrides_window() {
        let config = ViewerConfig::new().title("Bike").size(640, 480);
        assert_eq!(config.window.title, "Bike");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ViewerConfig::new().size(800, 600);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ViewerConfig::from_toml_str(&text).unwrap(), config);
    }
}
