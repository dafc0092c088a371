//! Figure configuration.
//!
//! Supports YAML configuration. Every field has a default, so partial files
//! are accepted.

use crate::error::{Error, Result};
use crate::grammar::{Style, Theme};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Figure-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_width")]
    pub width: f32,

    /// Canvas height in pixels.
    #[serde(default = "default_height")]
    pub height: f32,

    /// Significant digits of the tick spacing.
    #[serde(default = "default_sig_digits")]
    pub sig_digits: u32,

    /// Factor applied to plot limits, about their centre, before they are
    /// merged into the axis limits.
    #[serde(default = "default_buffer")]
    pub buffer: f32,

    /// Fixed number of x ticks; derived from the aspect ratio when absent.
    #[serde(default)]
    pub x_ticks: Option<usize>,

    /// Fixed number of y ticks; derived from the aspect ratio when absent.
    #[serde(default)]
    pub y_ticks: Option<usize>,

    /// Axis appearance.
    #[serde(default)]
    pub theme: Theme,

    /// Default style of new plots. Plot colors still follow the color cycle.
    #[serde(default)]
    pub style: Style,
}

fn default_width() -> f32 {
    800.0
}
fn default_height() -> f32 {
    600.0
}
fn default_sig_digits() -> u32 {
    2
}
fn default_buffer() -> f32 {
    1.05
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            sig_digits: default_sig_digits(),
            buffer: default_buffer(),
            x_ticks: None,
            y_ticks: None,
            theme: Theme::default(),
            style: Style::default(),
        }
    }
}

impl FigureConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas size.
    #[must_use]
    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "using default figure config"
                );
                Self::default()
            }
        }
    }
}
