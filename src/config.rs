// src/config.rs

//! Defines the configuration structures for the painter.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a config
//! file only needs to name the settings it overrides. The process-wide
//! [`CONFIG`] is loaded once from the JSON file named by `PAINTER_CONFIG`,
//! falling back to defaults when the variable is unset.
//!
//! The canvas size is not configurable: fractional script coordinates are
//! scaled against it, so changing it would change script semantics.

use crate::color::Color;
use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "PAINTER_CONFIG";

/// Global configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match std::env::var_os(CONFIG_ENV_VAR) {
    Some(path) => Config::load(Path::new(&path)).unwrap_or_else(|e| {
        warn!("Falling back to default config: {:#}", e);
        Config::default()
    }),
    None => Config::default(),
});

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Colors used by the script commands.
    pub colors: ColorScheme,
    /// Figure geometry.
    pub figure: FigureConfig,
    /// Display sink settings.
    pub display: DisplayConfig,
    /// Script driver settings.
    pub script: ScriptConfig,
}

impl Config {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

// --- Color Scheme ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    /// Background for the `white` command.
    pub white: Color,
    /// Background for the `green` command.
    pub green: Color,
    /// Background installed by `reset`.
    pub reset: Color,
    /// Fill color of the `bgrect` rectangle.
    pub bgrect: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            white: Color::WHITE,
            green: Color::GREEN,
            reset: Color::BLACK,
            bgrect: Color::BLACK,
        }
    }
}

// --- Figure Geometry ---

/// A figure is drawn as two crossing bars centred on its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Long side of each bar.
    pub bar_length: i32,
    /// Short side of each bar.
    pub bar_thickness: i32,
    pub color: Color,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            bar_length: 400,
            bar_thickness: 150,
            color: Color::YELLOW,
        }
    }
}

// --- Display ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisplayConfig {
    /// When set, every published frame is written here as a PPM image.
    pub dump_dir: Option<PathBuf>,
}

// --- Script Driver ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScriptConfig {
    /// Delay between posting consecutive flushed batches, to make animations
    /// visible. Zero posts as fast as the script is read.
    pub line_delay_ms: u64,
}
