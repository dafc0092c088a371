//! Colormaps for the color and fill aesthetics.
//!
//! Color and fill values are converted to `[0, 1]` by the aesthetic mapping
//! before they reach a [`ColorScale`], so every scale here works on the unit
//! interval.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};

/// Named colormap selectable from a [`Style`](crate::grammar::Style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Perceptually uniform blue-green-yellow.
    #[default]
    Viridis,
    /// Perceptually uniform black-purple-cream.
    Magma,
    /// Sequential blues.
    Blues,
    /// Diverging red-white-blue.
    RedBlue,
    /// Black to white.
    Greyscale,
    /// Black-red-yellow-white.
    Heat,
}

impl Palette {
    /// Build the piecewise-linear scale for this palette.
    #[must_use]
    pub fn scale(self) -> ColorScale {
        let stops = match self {
            Self::Viridis => vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
            Self::Magma => vec![
                Rgba::rgb(0, 0, 4),
                Rgba::rgb(81, 18, 124),
                Rgba::rgb(183, 55, 121),
                Rgba::rgb(252, 137, 97),
                Rgba::rgb(252, 253, 191),
            ],
            Self::Blues => vec![
                Rgba::rgb(247, 251, 255),
                Rgba::rgb(198, 219, 239),
                Rgba::rgb(107, 174, 214),
                Rgba::rgb(33, 113, 181),
                Rgba::rgb(8, 48, 107),
            ],
            Self::RedBlue => vec![
                Rgba::rgb(178, 24, 43),
                Rgba::rgb(239, 138, 98),
                Rgba::rgb(247, 247, 247),
                Rgba::rgb(103, 169, 207),
                Rgba::rgb(33, 102, 172),
            ],
            Self::Greyscale => vec![Rgba::BLACK, Rgba::WHITE],
            Self::Heat => vec![
                Rgba::rgb(0, 0, 0),
                Rgba::rgb(128, 0, 0),
                Rgba::rgb(255, 0, 0),
                Rgba::rgb(255, 128, 0),
                Rgba::rgb(255, 255, 0),
                Rgba::rgb(255, 255, 255),
            ],
        };
        ColorScale { colors: stops }
    }
}

/// Piecewise-linear color scale over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    colors: Vec<Rgba>,
}

impl ColorScale {
    /// Create a scale from evenly spaced color stops.
    ///
    /// Returns `None` when `colors` is empty.
    #[must_use]
    pub fn new(colors: Vec<Rgba>) -> Option<Self> {
        if colors.is_empty() {
            return None;
        }
        Some(Self { colors })
    }

    /// Map `t` (clamped to `[0, 1]`) to a color.
    #[must_use]
    pub fn color(&self, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f32).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    /// First and last stops.
    #[must_use]
    pub fn range(&self) -> (Rgba, Rgba) {
        (
            *self.colors.first().unwrap_or(&Rgba::BLACK),
            *self.colors.last().unwrap_or(&Rgba::WHITE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_scale_endpoints() {
        let scale = ColorScale::new(vec![Rgba::BLACK, Rgba::WHITE]).expect("non-empty");
        assert_eq!(scale.color(0.0), Rgba::BLACK);
        assert_eq!(scale.color(1.0), Rgba::WHITE);
    }

    #[test]
    fn test_color_scale_clamping() {
        let scale = Palette::Greyscale.scale();
        assert_eq!(scale.color(-5.0), Rgba::BLACK);
        assert_eq!(scale.color(5.0), Rgba::WHITE);
        assert_eq!(scale.color(f32::NAN), Rgba::BLACK);
    }

    #[test]
    fn test_color_scale_empty() {
        assert!(ColorScale::new(vec![]).is_none());
    }

    #[test]
    fn test_color_scale_single_color() {
        let scale = ColorScale::new(vec![Rgba::RED]).expect("non-empty");
        assert_eq!(scale.color(0.3), Rgba::RED);
        assert_eq!(scale.range(), (Rgba::RED, Rgba::RED));
    }

    #[test]
    fn test_color_scale_multi_segment() {
        let scale = Palette::Viridis.scale();
        assert_eq!(scale.color(0.5), Rgba::rgb(33, 145, 140));
        assert_eq!(scale.range().1, Rgba::rgb(253, 231, 37));
    }

    #[test]
    fn test_palette_serde() {
        let p: Palette = serde_yaml_ng::from_str("red_blue").expect("parse");
        assert_eq!(p, Palette::RedBlue);
        assert_eq!(Palette::Heat.scale().range().0, Rgba::BLACK);
    }
}
