//! Canvas backends.
//!
//! - [`SvgCanvas`]: standalone SVG documents with keyframe animations
//! - [`RecordingCanvas`]: records draw calls and replays scripted input

mod recorder;
mod svg;

pub use recorder::{DrawCall, InputEvent, RecordingCanvas};
pub use svg::SvgCanvas;
