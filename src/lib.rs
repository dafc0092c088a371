//! # Motion-Viz
//!
//! Animated 2D plotting: map table columns onto visual roles, lay out a grid of
//! auto-ticking axes, and animate plots between timestamped keyframes.
//!
//! ## Features
//!
//! - **Aesthetic mapping**: columns drive x, y, color, size, fill and
//!   rectangle corners
//! - **Keyframe animation**: every plot interpolates between frames added at
//!   increasing times
//! - **Backends through traits**: draw snapshots to any [`render::Canvas`],
//!   serialise looping animations to an [`render::AnimatedCanvas`], or run an
//!   interactive loop on an [`render::InteractiveCanvas`]
//! - **Self-contained SVG**: [`output::SvgCanvas`] emits `<animate>` keyframes
//!   and hover tooltips with no external assets
//!
//! ## Quick Start
//!
//! ```rust
//! use motion_viz::prelude::*;
//!
//! let mut session = Session::new();
//! let mut fig = session.figure();
//! let first = create_data().x(&[0.0, 1.0, 2.0])?.y(&[0.0, 1.0, 4.0])?;
//! let last = create_data().x(&[0.0, 1.0, 2.0])?.y(&[4.0, 1.0, 0.0])?;
//!
//! fig.axis(0, 0).line(first)?.add_frame(last, 2.0)?.label("parabola");
//! let svg = fig.to_svg()?;
//! assert!(svg.contains("<animate"));
//! # Ok::<(), motion_viz::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Colors and the default color cycle.
pub mod color;

/// Fixed-size vectors and bounding boxes.
pub mod geometry;

/// Colormaps for the color and fill aesthetics.
pub mod scale;

/// Drawable layout tree and animation timeline.
pub mod layout;

// ============================================================================
// Plotting Modules
// ============================================================================

/// Tables, aesthetics, transforms and themes.
pub mod grammar;

/// Plot geometries (line, points, histogram, rectangle).
pub mod plots;

/// Axes with ticks, labels and legends.
pub mod axis;

/// Figures, subplot grids and sessions.
pub mod figure;

/// Figure configuration.
pub mod config;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Canvas traits.
pub mod render;

/// Canvas backends (SVG, recording).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for motion-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use motion_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::axis::{Axis, AxisMut, PlotMut};
    pub use crate::color::Rgba;
    pub use crate::config::FigureConfig;
    pub use crate::error::{Error, Result};
    pub use crate::figure::{Figure, Session};
    pub use crate::geometry::{BBox2, Vec2};
    pub use crate::grammar::{
        create_data, Aesthetic, DataWithAesthetic, LineStyle, Style, Theme, Transform,
    };
    pub use crate::output::{RecordingCanvas, SvgCanvas};
    pub use crate::plots::Geometry;
    pub use crate::render::{AnimatedCanvas, Canvas, InteractiveCanvas};
    pub use crate::scale::Palette;
}
