//! Error types for motion-viz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in motion-viz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (writing SVG files, reading config).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A column's length does not match the table's row count.
    #[error("Column length mismatch: expected {expected} rows, got {actual}")]
    ColumnLengthMismatch {
        /// Row count of the existing table.
        expected: usize,
        /// Length of the offending column or row.
        actual: usize,
    },

    /// An aesthetic was requested that has no column mapped to it.
    #[error("Aesthetic '{0}' is not set")]
    MissingAesthetic(&'static str),

    /// A column index beyond the table width.
    #[error("Column {index} out of range for table with {cols} columns")]
    ColumnOutOfRange {
        /// Requested column.
        index: usize,
        /// Number of columns in the table.
        cols: usize,
    },

    /// No subplot exists at the requested grid cell.
    #[error("No axis at row {row}, column {col}")]
    NoSuchAxis {
        /// Grid row.
        row: usize,
        /// Grid column.
        col: usize,
    },

    /// No plot exists at the requested index on an axis.
    #[error("No plot at index {index}, axis holds {count} plots")]
    NoSuchPlot {
        /// Requested plot index.
        index: usize,
        /// Number of plots on the axis.
        count: usize,
    },

    /// A frame time not strictly after the previous one.
    #[error("Frame time {time} must be greater than previous frame time {previous}")]
    NonIncreasingFrameTime {
        /// Rejected time.
        time: f32,
        /// Latest existing frame time.
        previous: f32,
    },

    /// A negative or non-finite frame time.
    #[error("Invalid frame time: {0}")]
    InvalidFrameTime(f32),

    /// An optional aesthetic set on an earlier frame is missing from a later one.
    #[error("Aesthetic '{aesthetic}' is set on earlier frames but missing from frame {frame}")]
    InconsistentAesthetic {
        /// Name of the aesthetic.
        aesthetic: &'static str,
        /// Index of the offending frame.
        frame: usize,
    },

    /// A frame whose row count differs from the first frame.
    #[error("Frame {frame} has {actual} rows, first frame has {expected}")]
    FrameRowMismatch {
        /// Index of the offending frame.
        frame: usize,
        /// Row count of the first frame.
        expected: usize,
        /// Row count of the offending frame.
        actual: usize,
    },

    /// Configuration parse error.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// Line number (1-indexed, 0 when unknown).
        line: usize,
        /// Parser message.
        message: String,
    },

    /// Configuration file not found.
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),
}
