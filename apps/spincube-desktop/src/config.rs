use serde::{Deserialize, Serialize};
use spincube_scene::{ConfigError, FrameTiming, SceneConfig, config};
use std::path::{Path, PathBuf};

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
            title: "spincube".into(),
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    /// Refuse to start when a shader file is unreadable or fails to build.
    pub strict: bool,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("assets/shaders/vertex.wgsl"),
            fragment: PathBuf::from("assets/shaders/fragment.wgsl"),
            strict: false,
        }
    }
}

/// Everything the desktop demo reads at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub clear_color: [f64; 4],
    pub shaders: ShaderPaths,
    pub timing: FrameTiming,
    pub scene: SceneConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [0.25, 0.5, 0.75, 1.0],
            shaders: ShaderPaths::default(),
            timing: FrameTiming::Measured,
            scene: SceneConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Defaults, or the JSON file at `path` layered over them.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => config::load_json(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn no_path_gives_defaults() {
        let cfg = DemoConfig::load(None).unwrap();
        assert_eq!(cfg, DemoConfig::default());
        assert_eq!(cfg.window.width, 640);
        assert_eq!(cfg.timing, FrameTiming::Measured);
    }

    #[test]
    fn file_overrides_selected_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "window": {{ "width": 1280 }},
                "timing": {{ "fixed": 0.016 }},
                "shaders": {{ "strict": true }}
            }}"#
        )
        .unwrap();

        let cfg = DemoConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.window.height, 480);
        assert_eq!(cfg.timing, FrameTiming::Fixed(0.016));
        assert!(cfg.shaders.strict);
        assert_eq!(cfg.shaders.vertex, PathBuf::from("assets/shaders/vertex.wgsl"));
    }
}
