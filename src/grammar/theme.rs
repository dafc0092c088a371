//! Themes and plot styles.
//!
//! [`Theme`] controls the non-data appearance of an axis. [`Style`] controls
//! how a single plot draws its data.

use crate::color::Rgba;
use crate::scale::Palette;
use serde::{Deserialize, Serialize};

/// Theme specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Figure background color.
    pub background: Rgba,
    /// Panel background color.
    pub panel_background: Rgba,
    /// Grid line color.
    pub grid_color: Rgba,
    /// Frame line color.
    pub axis_color: Rgba,
    /// Text color.
    pub text_color: Rgba,
    /// Show grid lines.
    pub show_grid: bool,
    /// Show the frame around the panel.
    pub show_axis: bool,
    /// Show the legend for labelled plots.
    pub show_legend: bool,
    /// Grid line width.
    pub grid_width: f32,
    /// Frame line width.
    pub axis_width: f32,
    /// Tick label font size.
    pub font_size: f32,
    /// Font face name passed to the canvas.
    pub font_face: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self::grey()
    }
}

impl Theme {
    /// Grey theme (ggplot2 default-like).
    #[must_use]
    pub fn grey() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(235, 235, 235),
            grid_color: Rgba::WHITE,
            axis_color: Rgba::rgb(50, 50, 50),
            text_color: Rgba::rgb(50, 50, 50),
            show_grid: true,
            show_axis: true,
            show_legend: true,
            grid_width: 1.0,
            axis_width: 1.0,
            font_size: 12.0,
            font_face: "sans".to_string(),
        }
    }

    /// Minimal theme with white background.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(220, 220, 220),
            axis_color: Rgba::rgb(100, 100, 100),
            text_color: Rgba::BLACK,
            show_axis: false,
            grid_width: 0.5,
            axis_width: 0.5,
            ..Self::grey()
        }
    }

    /// Classic theme with no grid.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            axis_color: Rgba::BLACK,
            text_color: Rgba::BLACK,
            show_grid: false,
            grid_width: 0.0,
            ..Self::grey()
        }
    }

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Rgba::rgb(30, 30, 30),
            panel_background: Rgba::rgb(40, 40, 40),
            grid_color: Rgba::rgb(60, 60, 60),
            axis_color: Rgba::rgb(180, 180, 180),
            text_color: Rgba::rgb(220, 220, 220),
            grid_width: 0.5,
            axis_width: 0.5,
            ..Self::grey()
        }
    }

    /// Set panel background color.
    #[must_use]
    pub fn panel_background(mut self, color: Rgba) -> Self {
        self.panel_background = color;
        self
    }

    /// Enable or disable grid lines.
    #[must_use]
    pub fn grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    /// Enable or disable the legend.
    #[must_use]
    pub fn legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }
}

/// Stroke pattern for lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Dots.
    Dotted,
}

impl LineStyle {
    /// Dash pattern in multiples of the line width, empty for solid.
    #[must_use]
    pub const fn dash_pattern(self) -> &'static [f32] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[4.0, 2.0],
            Self::Dotted => &[1.0, 2.0],
        }
    }
}

/// Per-plot drawing style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Stroke width in pixels.
    pub line_width: f32,
    /// Stroke or marker color used when no color aesthetic is mapped.
    pub color: Rgba,
    /// Marker radius in pixels used when no size aesthetic is mapped.
    pub point_size: f32,
    /// Font face for tooltips.
    pub font_face: String,
    /// Font size for tooltips.
    pub font_size: f32,
    /// Stroke pattern.
    pub line_style: LineStyle,
    /// Colormap for the color and fill aesthetics.
    pub palette: Palette,
    /// Legend entry, none for unlabelled plots.
    pub label: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            color: Rgba::cycle(0),
            point_size: 4.0,
            font_face: "sans".to_string(),
            font_size: 12.0,
            line_style: LineStyle::Solid,
            palette: Palette::Viridis,
            label: None,
        }
    }
}

impl Style {
    /// Set the base color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the stroke width.
    #[must_use]
    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Set the legend label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the colormap.
    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the stroke pattern.
    #[must_use]
    pub fn line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }
}
