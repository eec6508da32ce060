//! Application Configuration
//!
//! Optional `drawing_surface.toml`. Every field has a default, so a missing
//! file or a partial one is fine:
//!
//! ```toml
//! [window]
//! width = 800
//! height = 600
//! title = "Drawing Surface"
//!
//! [canvas]
//! border_color = "#ffffff"
//! text_background = "#ffffff"
//!
//! [font]
//! family = "Arial"
//! point_size = 18
//! alternatives = ["Times New Roman", "Courier New"]
//!
//! [export]
//! directory = "prints"
//! document_name = "Drawing Surface"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::surface::SurfaceOptions;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "DRAWING_SURFACE_CONFIG";

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "drawing_surface.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub window: WindowConfig,
    pub canvas: CanvasSection,
    pub font: FontConfig,
    pub export: ExportConfig,
}

impl CanvasConfig {
    /// Loads config from a TOML file. Returns default config if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Config file path: `$DRAWING_SURFACE_CONFIG` or `./drawing_surface.toml`
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Load from [`CanvasConfig::default_path`], falling back to defaults
    /// (with an error logged) when the file is unreadable or malformed.
    pub fn load_or_default() -> Self {
        let path = Self::default_path();
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Options the drawing surface applies on every initialisation
    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            border_color: self.canvas.border_color,
            text_background: self.canvas.text_background,
            font_family: self.font.family.clone(),
            font_point_size: self.font.point_size,
            document_name: self.export.document_name.clone(),
        }
    }

    /// Font families the NextFont command cycles through, default first
    pub fn font_families(&self) -> Vec<String> {
        let mut families = vec![self.font.family.clone()];
        for family in &self.font.alternatives {
            if !families.contains(family) {
                families.push(family.clone());
            }
        }
        families
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Drawing Surface".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSection {
    pub border_color: Color,
    /// Opaque cell drawn behind text
    pub text_background: Color,
}

impl Default for CanvasSection {
    fn default() -> Self {
        Self {
            border_color: Color::WHITE,
            text_background: Color::WHITE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub point_size: u32,
    pub alternatives: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            point_size: 18,
            alternatives: vec!["Times New Roman".to_string(), "Courier New".to_string()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
    pub document_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("prints"),
            document_name: "Drawing Surface".to_string(),
        }
    }
}

/// Errors that can occur when loading config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
