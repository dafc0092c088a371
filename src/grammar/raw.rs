//! Row-major numeric tables.
//!
//! [`RawData`] is the storage behind every plotted frame. Text columns are
//! stored as interned indices so every cell is an `f32`.

use crate::error::{Error, Result};
use indexmap::IndexSet;

/// Append-only row-major `f32` matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawData {
    values: Vec<f32>,
    rows: usize,
    cols: usize,
    /// Interned labels for text columns, `None` for numeric columns.
    labels: Vec<Option<IndexSet<String>>>,
}

impl RawData {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// True when the table holds no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Append a numeric column, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnLengthMismatch`] if the table already has
    /// columns and `column.len()` differs from the row count.
    pub fn add_column(&mut self, column: &[f32]) -> Result<usize> {
        self.insert_column(column, None)
    }

    /// Append a text column, interning each distinct string in first-seen
    /// order. The stored value of a cell is its label's index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnLengthMismatch`] on a length mismatch.
    pub fn add_text_column<S: AsRef<str>>(&mut self, column: &[S]) -> Result<usize> {
        let mut table = IndexSet::new();
        let indices: Vec<f32> = column
            .iter()
            .map(|s| {
                let (index, _) = table.insert_full(s.as_ref().to_string());
                index as f32
            })
            .collect();
        self.insert_column(&indices, Some(table))
    }

    fn insert_column(
        &mut self,
        column: &[f32],
        labels: Option<IndexSet<String>>,
    ) -> Result<usize> {
        if self.cols > 0 && column.len() != self.rows {
            return Err(Error::ColumnLengthMismatch {
                expected: self.rows,
                actual: column.len(),
            });
        }
        if self.cols == 0 {
            self.rows = column.len();
            self.values = column.to_vec();
        } else {
            let stride = self.cols + 1;
            let mut values = Vec::with_capacity(self.rows * stride);
            for (row, &extra) in self.values.chunks_exact(self.cols).zip(column) {
                values.extend_from_slice(row);
                values.push(extra);
            }
            self.values = values;
        }
        self.cols += 1;
        self.labels.push(labels);
        Ok(self.cols - 1)
    }

    /// Append one row of numeric values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnOutOfRange`] on a table with no columns, and
    /// [`Error::ColumnLengthMismatch`] unless `row` has exactly `cols()`
    /// values.
    pub fn push_row(&mut self, row: &[f32]) -> Result<()> {
        if self.cols == 0 {
            return Err(Error::ColumnOutOfRange { index: 0, cols: 0 });
        }
        if row.len() != self.cols {
            return Err(Error::ColumnLengthMismatch {
                expected: self.cols,
                actual: row.len(),
            });
        }
        self.values.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    /// Value at `(row, col)`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    /// Iterate over the values of one column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnOutOfRange`] for a column beyond the table.
    pub fn column(&self, col: usize) -> Result<impl Iterator<Item = f32> + '_> {
        if col >= self.cols {
            return Err(Error::ColumnOutOfRange {
                index: col,
                cols: self.cols,
            });
        }
        Ok(self.values.iter().skip(col).step_by(self.cols).copied())
    }

    /// Borrow one row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        self.values.get(row * self.cols..(row + 1) * self.cols)
    }

    /// True when `col` was added as a text column.
    #[must_use]
    pub fn is_text(&self, col: usize) -> bool {
        matches!(self.labels.get(col), Some(Some(_)))
    }

    /// The original string of an interned text value.
    #[must_use]
    pub fn label(&self, col: usize, value: f32) -> Option<&str> {
        if value < 0.0 || !value.is_finite() {
            return None;
        }
        let table = self.labels.get(col)?.as_ref()?;
        table.get_index(value as usize).map(String::as_str)
    }

    /// Copy the given rows, in order, into a new table with the same columns
    /// and label tables.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut values = Vec::with_capacity(rows.len() * self.cols);
        let mut kept = 0;
        for row in rows.iter().filter_map(|&r| self.row(r)) {
            values.extend_from_slice(row);
            kept += 1;
        }
        Self {
            values,
            rows: kept,
            cols: self.cols,
            labels: self.labels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_columns_row_major() {
        let mut raw = RawData::new();
        assert_eq!(raw.add_column(&[1.0, 2.0, 3.0]).expect("first"), 0);
        assert_eq!(raw.add_column(&[4.0, 5.0, 6.0]).expect("second"), 1);
        assert_eq!(raw.rows(), 3);
        assert_eq!(raw.cols(), 2);
        assert_eq!(raw.row(1), Some(&[2.0, 5.0][..]));
        assert_eq!(raw.get(2, 1), Some(6.0));
        assert_eq!(raw.get(3, 0), None);
    }

    #[test]
    fn test_column_length_mismatch() {
        let mut raw = RawData::new();
        raw.add_column(&[1.0, 2.0]).expect("first");
        let err = raw.add_column(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnLengthMismatch {
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(raw.cols(), 1);
    }

    #[test]
    fn test_column_iterator() {
        let mut raw = RawData::new();
        raw.add_column(&[1.0, 2.0]).expect("x");
        raw.add_column(&[3.0, 4.0]).expect("y");
        let col: Vec<f32> = raw.column(1).expect("col").collect();
        assert_eq!(col, vec![3.0, 4.0]);
        assert!(matches!(
            raw.column(2),
            Err(Error::ColumnOutOfRange { index: 2, cols: 2 })
        ));
    }

    #[test]
    fn test_push_row() {
        let mut raw = RawData::new();
        raw.add_column(&[1.0]).expect("x");
        raw.add_column(&[2.0]).expect("y");
        raw.push_row(&[3.0, 4.0]).expect("row");
        assert_eq!(raw.rows(), 2);
        assert_eq!(raw.get(1, 1), Some(4.0));
        assert!(raw.push_row(&[1.0]).is_err());
    }

    #[test]
    fn test_push_row_needs_columns() {
        let mut raw = RawData::new();
        assert!(matches!(
            raw.push_row(&[]),
            Err(Error::ColumnOutOfRange { index: 0, cols: 0 })
        ));
        assert_eq!(raw.rows(), 0);
        raw.add_column(&[1.0, 2.0]).expect("x");
        assert_eq!(raw.rows(), 2);
    }

    #[test]
    fn test_text_interning() {
        let mut raw = RawData::new();
        let col = raw.add_text_column(&["b", "a", "b", "c"]).expect("text");
        let values: Vec<f32> = raw.column(col).expect("col").collect();
        assert_eq!(values, vec![0.0, 1.0, 0.0, 2.0]);
        assert!(raw.is_text(col));
        assert_eq!(raw.label(col, 1.0), Some("a"));
        assert_eq!(raw.label(col, 7.0), None);
    }

    #[test]
    fn test_select_rows() {
        let mut raw = RawData::new();
        raw.add_column(&[1.0, 2.0, 3.0]).expect("x");
        raw.add_text_column(&["p", "q", "p"]).expect("g");
        let sub = raw.select_rows(&[2, 0, 9]);
        assert_eq!(sub.rows(), 2);
        assert_eq!(sub.row(0), Some(&[3.0, 0.0][..]));
        assert_eq!(sub.label(1, 0.0), Some("p"));
    }
}
