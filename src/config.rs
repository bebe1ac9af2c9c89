//! Run configuration for the `cpwkit` binary.
//!
//! Loaded from `.json` or `.toml` and validated before use. Every section
//! falls back to its defaults when omitted.

use cpwkit_core::{LayoutError, LayoutUnits};
use cpwkit_layout::ScriptSettings;
use cpwkit_path::{DEFAULT_BEND_POINTS, MIN_BEND_POINTS};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading or checking configuration and recipe files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of range.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Layout units failed validation.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat(format!(
                "{} must be .json or .toml",
                path.display()
            ))),
        }
    }
}

/// Reads a JSON or TOML document, chosen by extension.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let format = Format::of(path)?;
    let content = std::fs::read_to_string(path)?;
    Ok(match format {
        Format::Json => serde_json::from_str(&content)?,
        Format::Toml => toml::from_str(&content)?,
    })
}

/// Writes a JSON or TOML document, chosen by extension.
pub fn write_document<T: Serialize>(value: &T, path: &Path) -> ConfigResult<()> {
    let content = match Format::of(path)? {
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Toml => toml::to_string_pretty(value)?,
    };
    std::fs::write(path, content)?;
    Ok(())
}

/// Which renderer turns paths into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Closed regions collected in a layout cell.
    #[default]
    Polygon,
    /// Drafting-application command script.
    Script,
}

impl Backend {
    /// Backend implied by an output file extension, if any.
    pub fn for_extension(extension: &str) -> Option<Self> {
        match extension {
            "scr" => Some(Self::Script),
            "dxf" | "json" => Some(Self::Polygon),
            _ => None,
        }
    }

    /// Extension given to outputs that have none.
    pub fn default_extension(self) -> &'static str {
        match self {
            Self::Polygon => "dxf",
            Self::Script => "scr",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polygon => write!(f, "polygon"),
            Self::Script => write!(f, "script"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polygon" | "layout" => Ok(Self::Polygon),
            "script" | "scr" => Ok(Self::Script),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

/// Rendering preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Tessellation density of bends that do not set their own.
    pub bend_points: usize,
    /// Points per full turn on filleted gap corners.
    pub fillet_points: usize,
    /// Backend used when the output path has no extension.
    pub backend: Backend,
    /// Append a DXF export to drafting scripts.
    pub export_dxf: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            bend_points: DEFAULT_BEND_POINTS,
            fillet_points: cpwkit_core::DEFAULT_POINTS_PER_TURN,
            backend: Backend::Polygon,
            export_dxf: true,
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Physical units of written layouts.
    pub units: LayoutUnits,
    pub render: RenderSettings,
    /// Drafting-script output.
    pub script: ScriptSettings,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let config: Self = read_document(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        write_document(self, path)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.units.validate()?;
        if self.render.bend_points < MIN_BEND_POINTS {
            return Err(ConfigError::invalid(
                "render.bend_points",
                format!("must be >= {}, got {}", MIN_BEND_POINTS, self.render.bend_points),
            ));
        }
        if self.render.fillet_points < 8 {
            return Err(ConfigError::invalid(
                "render.fillet_points",
                format!("must be >= 8, got {}", self.render.fillet_points),
            ));
        }
        if self.script.dxf_version.trim().is_empty() {
            return Err(ConfigError::invalid("script.dxf_version", "must not be empty"));
        }
        Ok(())
    }
}
