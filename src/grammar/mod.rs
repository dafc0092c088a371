//! Data model for plotting.
//!
//! # Components
//!
//! - **Tables**: row-major numeric storage with interned text columns
//! - **Aesthetics**: roles a column can drive (x, y, color, size, fill, corners)
//! - **Transforms**: per-frame preprocessing (identity, x binning)
//! - **Facets**: splitting a frame into small multiples
//! - **Themes**: non-data appearance and per-plot styles
//!
//! # Example
//!
//! ```rust
//! use motion_viz::grammar::{create_data, Aesthetic};
//!
//! let data = create_data().x(&[1.0, 2.0, 3.0])?.y(&[4.0, 5.0, 6.0])?;
//! assert_eq!(data.values(Aesthetic::Y)?, vec![4.0, 5.0, 6.0]);
//! # Ok::<(), motion_viz::Error>(())
//! ```

mod aes;
mod data;
mod facet;
mod raw;
mod stat;
mod theme;

pub use aes::{Aesthetic, Limits, AESTHETIC_COUNT};
pub use data::{create_data, DataWithAesthetic};
pub use facet::FacetGroup;
pub use raw::RawData;
pub use stat::{Transform, MAX_BINS};
pub use theme::{LineStyle, Style, Theme};
