//! Faceting.
//!
//! Splits a frame into one group per unique value (or value pair) of the
//! chosen columns, for drawing small multiples.

use super::data::DataWithAesthetic;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::rc::Rc;

/// One partition produced by [`DataWithAesthetic::facet`].
#[derive(Debug, Clone)]
pub struct FacetGroup {
    /// Values of the faceting columns shared by every row in the group.
    pub keys: Vec<f32>,
    /// Original strings of the keys for text columns.
    pub labels: Vec<Option<String>>,
    /// The rows of the group, with the source mapping.
    pub data: DataWithAesthetic,
}

impl DataWithAesthetic {
    /// Partition rows by the unique values of `col`, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnOutOfRange`] if `col` is not in the table.
    pub fn facet(&self, col: usize) -> Result<Vec<FacetGroup>> {
        self.partition(&[col])
    }

    /// Partition rows by the unique pairs of `(col_a, col_b)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnOutOfRange`] if either column is not in the table.
    pub fn facet_grid(&self, col_a: usize, col_b: usize) -> Result<Vec<FacetGroup>> {
        self.partition(&[col_a, col_b])
    }

    fn partition(&self, cols: &[usize]) -> Result<Vec<FacetGroup>> {
        let raw = self.raw();
        if let Some(&bad) = cols.iter().find(|&&c| c >= raw.cols()) {
            return Err(Error::ColumnOutOfRange {
                index: bad,
                cols: raw.cols(),
            });
        }

        let mut groups: IndexMap<Vec<u32>, Vec<usize>> = IndexMap::new();
        for row in 0..raw.rows() {
            let key = cols
                .iter()
                .map(|&c| raw.get(row, c).unwrap_or(f32::NAN).to_bits())
                .collect();
            groups.entry(key).or_default().push(row);
        }

        tracing::debug!(columns = ?cols, groups = groups.len(), "partitioned frame");

        groups
            .into_iter()
            .map(|(key, rows)| {
                let keys: Vec<f32> = key.into_iter().map(f32::from_bits).collect();
                let labels = cols
                    .iter()
                    .zip(&keys)
                    .map(|(&c, &k)| raw.label(c, k).map(str::to_string))
                    .collect();
                let data = self.with_raw(Rc::new(raw.select_rows(&rows)))?;
                Ok(FacetGroup { keys, labels, data })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{create_data, Aesthetic};

    fn grouped() -> DataWithAesthetic {
        create_data()
            .x(&[1.0, 2.0, 3.0, 4.0])
            .and_then(|d| d.y(&[10.0, 20.0, 30.0, 40.0]))
            .and_then(|d| d.with_text_column(Aesthetic::Color, &["b", "a", "b", "a"]))
            .expect("build")
    }

    #[test]
    fn test_facet_first_seen_order() {
        let groups = grouped().facet(2).expect("facet");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].labels, vec![Some("b".to_string())]);
        let first_x = groups[0].data.values(Aesthetic::X).expect("x");
        let second_y = groups[1].data.values(Aesthetic::Y).expect("y");
        assert_eq!(first_x, vec![1.0, 3.0]);
        assert_eq!(second_y, vec![20.0, 40.0]);
    }

    #[test]
    fn test_facet_recomputes_limits() {
        let groups = grouped().facet(2).expect("facet");
        assert_eq!(groups[1].data.limits().bmin[0], 2.0);
        assert_eq!(groups[1].data.limits().bmax[0], 4.0);
    }

    #[test]
    fn test_facet_grid_pairs() {
        let data = create_data()
            .x(&[0.0, 0.0, 1.0, 1.0, 0.0])
            .and_then(|d| d.y(&[0.0, 1.0, 0.0, 1.0, 0.0]))
            .expect("build");
        let groups = data.facet_grid(0, 1).expect("grid");
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].keys, vec![0.0, 0.0]);
        assert_eq!(groups[0].data.rows(), 2);
        assert_eq!(groups[0].labels, vec![None, None]);
    }

    #[test]
    fn test_facet_bad_column() {
        let err = grouped().facet(9).unwrap_err();
        assert!(matches!(err, Error::ColumnOutOfRange { index: 9, .. }));
    }
}
