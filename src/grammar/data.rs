//! Tables wrapped with aesthetic roles.
//!
//! A [`DataWithAesthetic`] shares a [`RawData`] and records which column
//! drives each [`Aesthetic`], along with the running limits of every mapped
//! role.

use super::aes::{Aesthetic, Limits, AESTHETIC_COUNT};
use super::raw::RawData;
use crate::error::{Error, Result};
use std::rc::Rc;

/// A shared table plus an aesthetic → column mapping.
#[derive(Debug, Clone, Default)]
pub struct DataWithAesthetic {
    data: Rc<RawData>,
    map: [Option<usize>; AESTHETIC_COUNT],
    limits: Limits,
}

/// Start building a frame column by column.
///
/// ```rust
/// use motion_viz::grammar::create_data;
///
/// let data = create_data()
///     .x(&[1.0, 2.0, 3.0])?
///     .y(&[4.0, 5.0, 6.0])?;
/// assert_eq!(data.rows(), 3);
/// # Ok::<(), motion_viz::Error>(())
/// ```
#[must_use]
pub fn create_data() -> DataWithAesthetic {
    DataWithAesthetic::default()
}

macro_rules! role_setters {
    ($($name:ident => $aes:expr),* $(,)?) => {$(
        #[doc = concat!("Append `values` as a new column mapped to `", stringify!($name), "`.")]
        ///
        /// # Errors
        ///
        /// Returns [`Error::ColumnLengthMismatch`] if the length differs from
        /// the columns already present.
        pub fn $name(self, values: &[f32]) -> Result<Self> {
            self.with_column($aes, values)
        }
    )*};
}

impl DataWithAesthetic {
    /// Wrap an existing table with no roles mapped.
    #[must_use]
    pub fn new(data: Rc<RawData>) -> Self {
        Self {
            data,
            map: [None; AESTHETIC_COUNT],
            limits: Limits::empty(),
        }
    }

    role_setters! {
        x => Aesthetic::X,
        y => Aesthetic::Y,
        color => Aesthetic::Color,
        size => Aesthetic::Size,
        fill => Aesthetic::Fill,
        xmin => Aesthetic::Xmin,
        ymin => Aesthetic::Ymin,
        xmax => Aesthetic::Xmax,
        ymax => Aesthetic::Ymax,
    }

    /// Append a numeric column and map `aes` to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnLengthMismatch`] on a length mismatch.
    pub fn with_column(mut self, aes: Aesthetic, values: &[f32]) -> Result<Self> {
        let col = Rc::make_mut(&mut self.data).add_column(values)?;
        self.set(aes, col)?;
        Ok(self)
    }

    /// Append an interned text column and map `aes` to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnLengthMismatch`] on a length mismatch.
    pub fn with_text_column<S: AsRef<str>>(
        mut self,
        aes: Aesthetic,
        values: &[S],
    ) -> Result<Self> {
        let col = Rc::make_mut(&mut self.data).add_text_column(values)?;
        self.set(aes, col)?;
        Ok(self)
    }

    /// Map `aes` to an existing column and fold its values into the limits.
    ///
    /// Remapping an aesthetic rebuilds its limits slot from the columns now
    /// mapped to it, so the previous column no longer contributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnOutOfRange`] if `col` is not in the table.
    pub fn set(&mut self, aes: Aesthetic, col: usize) -> Result<()> {
        let slot = aes.limits_index();
        let remap = self.map[aes.index()].is_some();
        self.data.column(col)?;
        self.map[aes.index()] = Some(col);

        if remap {
            self.limits.bmin[slot] = f32::MAX;
            self.limits.bmax[slot] = -f32::MAX;
            let sharing: Vec<usize> = Aesthetic::ALL
                .iter()
                .filter(|a| a.limits_index() == slot)
                .filter_map(|a| self.map[a.index()])
                .collect();
            for shared in sharing {
                self.fold_limits(slot, shared)?;
            }
        } else {
            self.fold_limits(slot, col)?;
        }
        Ok(())
    }

    fn fold_limits(&mut self, slot: usize, col: usize) -> Result<()> {
        for v in self.data.column(col)? {
            if v.is_finite() {
                self.limits.bmin[slot] = self.limits.bmin[slot].min(v);
                self.limits.bmax[slot] = self.limits.bmax[slot].max(v);
            }
        }
        Ok(())
    }

    /// True when `aes` is mapped.
    #[must_use]
    pub fn has(&self, aes: Aesthetic) -> bool {
        self.map[aes.index()].is_some()
    }

    /// The column index mapped to `aes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] if `aes` is not mapped.
    pub fn column_index(&self, aes: Aesthetic) -> Result<usize> {
        self.map[aes.index()]
            .ok_or(Error::MissingAesthetic(aes.name()))
    }

    /// Iterate over the values mapped to `aes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] if `aes` is not mapped.
    pub fn column(&self, aes: Aesthetic) -> Result<impl Iterator<Item = f32> + '_> {
        self.data.column(self.column_index(aes)?)
    }

    /// Collect the values mapped to `aes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] if `aes` is not mapped.
    pub fn values(&self, aes: Aesthetic) -> Result<Vec<f32>> {
        Ok(self.column(aes)?.collect())
    }

    /// The value of `aes` in `row`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`] if `aes` is not mapped.
    pub fn value(&self, aes: Aesthetic, row: usize) -> Result<Option<f32>> {
        let col = self.column_index(aes)?;
        Ok(self.data.get(row, col))
    }

    /// Text label for a value of `aes` when the column is interned text.
    #[must_use]
    pub fn label(&self, aes: Aesthetic, value: f32) -> Option<&str> {
        self.map[aes.index()]
            .and_then(|col| self.data.label(col, value))
    }

    /// Number of rows in the shared table.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.rows()
    }

    /// Running limits of every mapped role.
    #[must_use]
    pub const fn limits(&self) -> &Limits {
        &self.limits
    }

    pub(crate) fn limits_mut(&mut self) -> &mut Limits {
        &mut self.limits
    }

    /// The shared table.
    #[must_use]
    pub fn raw(&self) -> &Rc<RawData> {
        &self.data
    }

    /// Rewrap another table with this mapping, recomputing limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnOutOfRange`] if `data` lacks a mapped column.
    pub fn with_raw(&self, data: Rc<RawData>) -> Result<Self> {
        let mut out = Self::new(data);
        for aes in Aesthetic::ALL {
            if let Some(col) = self.map[aes.index()] {
                out.set(aes, col)?;
            }
        }
        Ok(out)
    }
}
