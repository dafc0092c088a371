//! Aesthetic roles and their display conversions.
//!
//! An aesthetic is the visual property a data column drives. Every role has a
//! `to_display`/`from_display` pair converting between data values and display
//! values (pixels for positions, `[0, 1]` for colors, pixels for sizes).

use crate::geometry::{remap, BBox, BBox2};

/// Per-aesthetic data limits over x, y, color, size and fill.
pub type Limits = BBox<f32, 5>;

/// Number of aesthetic roles.
pub const AESTHETIC_COUNT: usize = 9;

/// Fraction of the pixel box height used as the largest marker size.
const MAX_SIZE_FRACTION: f32 = 0.05;

/// Smallest marker size in pixels.
const MIN_SIZE_PX: f32 = 1.0;

/// A visual role a data column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aesthetic {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Stroke / marker color.
    Color,
    /// Marker size.
    Size,
    /// Fill color.
    Fill,
    /// Left edge of a rectangle.
    Xmin,
    /// Bottom edge of a rectangle.
    Ymin,
    /// Right edge of a rectangle.
    Xmax,
    /// Top edge of a rectangle.
    Ymax,
}

impl Aesthetic {
    /// Every role, in index order.
    pub const ALL: [Self; AESTHETIC_COUNT] = [
        Self::X,
        Self::Y,
        Self::Color,
        Self::Size,
        Self::Fill,
        Self::Xmin,
        Self::Ymin,
        Self::Xmax,
        Self::Ymax,
    ];

    /// Stable index in `0..AESTHETIC_COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Slot in [`Limits`]. Corner roles share the x and y slots.
    #[must_use]
    pub const fn limits_index(self) -> usize {
        match self {
            Self::X | Self::Xmin | Self::Xmax => 0,
            Self::Y | Self::Ymin | Self::Ymax => 1,
            Self::Color => 2,
            Self::Size => 3,
            Self::Fill => 4,
        }
    }

    /// Lowercase name used in messages and tooltips.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Color => "color",
            Self::Size => "size",
            Self::Fill => "fill",
            Self::Xmin => "xmin",
            Self::Ymin => "ymin",
            Self::Xmax => "xmax",
            Self::Ymax => "ymax",
        }
    }

    fn display_range(self, pixels: &BBox2) -> (f32, f32) {
        match self.limits_index() {
            0 => (pixels.bmin[0], pixels.bmax[0]),
            1 => (pixels.bmax[1], pixels.bmin[1]),
            3 => (MIN_SIZE_PX, MAX_SIZE_FRACTION * pixels.height()),
            _ => (0.0, 1.0),
        }
    }

    fn data_range(self, limits: &Limits) -> (f32, f32) {
        let i = self.limits_index();
        (limits.bmin[i], limits.bmax[i])
    }

    /// Convert a data value to its display value.
    ///
    /// Zero-width limits map every value to the middle of the display range.
    #[must_use]
    pub fn to_display(self, value: f32, limits: &Limits, pixels: &BBox2) -> f32 {
        let from = self.data_range(limits);
        let to = self.display_range(pixels);
        if from.1 == from.0 {
            return 0.5 * (to.0 + to.1);
        }
        remap(value, from, to)
    }

    /// Convert a display value back to data space.
    #[must_use]
    pub fn from_display(self, value: f32, limits: &Limits, pixels: &BBox2) -> f32 {
        let from = self.data_range(limits);
        let to = self.display_range(pixels);
        if to.1 == to.0 {
            return 0.5 * (from.0 + from.1);
        }
        remap(value, to, from)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::Vector;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        /// Invariant: from_display inverts to_display for positions.
        #[test]
        fn prop_position_round_trip(
            v in -1000.0f32..1000.0,
            lo in -1000.0f32..0.0,
            width in 1.0f32..2000.0,
            px in 10.0f32..2000.0,
        ) {
            let limits = Limits::new(Vector([lo; 5]), Vector([lo + width; 5]));
            let pixels = BBox2::from_corners(5.0, 5.0, 5.0 + px, 5.0 + px);
            for aes in [Aesthetic::X, Aesthetic::Y, Aesthetic::Xmin, Aesthetic::Ymax] {
                let back = aes.from_display(aes.to_display(v, &limits, &pixels), &limits, &pixels);
                prop_assert!((back - v).abs() <= 1e-3 * (1.0 + v.abs()));
            }
        }
    }
}
