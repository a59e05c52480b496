use crate::output::OutputFormat;
use crate::plan::PadWidth;
use crate::scan::ExtensionFilter;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Page number width: "dynamic" or a fixed number of digits
    #[serde(default = "default_pad_width")]
    pub pad_width: PadWidthSetting,

    /// Default output format: "summary" or "json"
    #[serde(default = "default_output")]
    pub output: String,

    /// Extensions accepted in addition to the built-in image list
    #[serde(default)]
    pub extra_extensions: Vec<String>,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,
}

/// `pad_width` accepts either a string or a bare integer in TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PadWidthSetting {
    Digits(usize),
    Named(String),
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pad_width: default_pad_width(),
            output: default_output(),
            extra_extensions: Vec::new(),
            use_color: None,
        }
    }
}

fn default_pad_width() -> PadWidthSetting {
    PadWidthSetting::Named("dynamic".to_string())
}

fn default_output() -> String {
    "summary".to_string()
}

impl Config {
    /// Load `<state_dir>/config.toml`, or defaults when it does not exist
    pub fn load(state_dir: &Path) -> Result<Self> {
        let config_path = state_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn pad_width(&self) -> Result<PadWidth> {
        match &self.defaults.pad_width {
            PadWidthSetting::Digits(width) => Ok(PadWidth::fixed(*width)?),
            PadWidthSetting::Named(name) => name.parse().map_err(|e: String| anyhow!(e)),
        }
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.defaults.output.parse().map_err(|e: String| anyhow!(e))
    }

    pub fn extension_filter(&self) -> ExtensionFilter {
        ExtensionFilter::with_extra(&self.defaults.extra_extensions)
    }
}
