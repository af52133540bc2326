use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TableauError, TableauResult};

/// Visible frame, in scene units.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FrameConfig {
    pub width: f64,
    pub height: f64,
    pub fps: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 8.0 * 16.0 / 9.0,
            height: 8.0,
            fps: 30.0,
        }
    }
}

/// Gaps used by relative placement when a placement does not give its own.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Gap between an element and the anchor it is placed next to.
    pub default_gap: f64,
    /// Margin kept from the frame when pinning to an edge or corner.
    pub edge_margin: f64,
    /// Distance an arrow keeps from both of its endpoints.
    pub arrow_buff: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_gap: 0.25,
            edge_margin: 0.5,
            arrow_buff: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimingConfig {
    /// Run time of an animated step that does not give one, in seconds.
    pub default_run_time: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_run_time: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: "output".to_string(),
        }
    }
}

/// Contents of `tableau.toml`. Every section is optional.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct TableauConfig {
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl TableauConfig {
    pub const FILE_NAME: &'static str = "tableau.toml";

    pub fn from_toml_str(contents: &str) -> TableauResult<Self> {
        let config: TableauConfig =
            toml::from_str(contents).map_err(|e| TableauError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> TableauResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
            .map_err(|e| TableauError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to_file(&self, path: &Path) -> TableauResult<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| TableauError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load `path` if given, else `tableau.toml` in the working directory if it exists,
    /// else the defaults.
    pub fn discover(path: Option<&Path>) -> TableauResult<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => {
                let default_path = Path::new(Self::FILE_NAME);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn check(&self) -> TableauResult<()> {
        if self.frame.width <= 0.0 || self.frame.height <= 0.0 {
            return Err(TableauError::Config("frame size must be positive".into()));
        }
        if !(self.frame.fps > 0.0 && self.frame.fps.is_finite()) {
            return Err(TableauError::Config("frame fps must be positive".into()));
        }
        if self.layout.default_gap < 0.0
            || self.layout.edge_margin < 0.0
            || self.layout.arrow_buff < 0.0
        {
            return Err(TableauError::Config("layout gaps must not be negative".into()));
        }
        Ok(())
    }
}
