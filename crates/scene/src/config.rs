use crate::camera::{DEFAULT_MOVE_STEP, Projection};
use crate::cube::DEFAULT_ANGULAR_VELOCITY;
use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON file into any deserializable config type.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Initial cube placement and spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeConfig {
    pub position: Vec3,
    pub scale: Vec3,
    /// Degrees per second around each axis.
    pub angular_velocity: Vec3,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(3.0, 0.0, 0.25),
            scale: Vec3::splat(0.25),
            angular_velocity: DEFAULT_ANGULAR_VELOCITY,
        }
    }
}

/// Initial camera placement and control tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub move_step: f32,
    /// Degrees of spin per pixel of cursor travel.
    pub look_sensitivity: f32,
    pub projection: Projection,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            move_step: DEFAULT_MOVE_STEP,
            look_sensitivity: 0.1,
            projection: Projection::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub cube: CubeConfig,
    pub camera: CameraConfig,
}
