//! Statistical transformations applied to each frame before plotting.

use super::aes::Aesthetic;
use super::data::{create_data, DataWithAesthetic};
use crate::error::Result;

/// Largest bin count the layout estimate will produce.
pub const MAX_BINS: usize = 200;

/// Padding added on both sides of the data range when the span is estimated.
const SPAN_PADDING: f32 = 1e4 * f32::EPSILON;

/// Scott's rule constant.
const SCOTT_FACTOR: f32 = 3.49;

/// Transformation from an input frame to the frame that is actually drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Transform {
    /// No transformation.
    #[default]
    Identity,
    /// Histogram of the x column.
    ///
    /// Unset fields are estimated from the first non-empty frame and then
    /// kept, so every frame shares the same bins.
    BinX {
        /// Half-open `[min, max)` range covered by the bins.
        span: Option<(f32, f32)>,
        /// Number of bins.
        bins: Option<usize>,
    },
}

impl Transform {
    /// Histogram with an estimated layout.
    #[must_use]
    pub const fn bin_x() -> Self {
        Self::BinX {
            span: None,
            bins: None,
        }
    }

    /// Histogram with a fixed bin count.
    #[must_use]
    pub const fn bin_x_with(bins: usize) -> Self {
        Self::BinX {
            span: None,
            bins: Some(bins),
        }
    }

    /// Apply the transform to one frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAesthetic`](crate::Error::MissingAesthetic) when
    /// binning a frame without x.
    pub fn apply(&mut self, data: DataWithAesthetic) -> Result<DataWithAesthetic> {
        match self {
            Self::Identity => Ok(data),
            Self::BinX { span, bins } => {
                let x = data.values(Aesthetic::X)?;
                if x.is_empty() && (span.is_none() || bins.is_none()) {
                    return create_data().x(&[])?.y(&[]);
                }
                let (lo, hi) = *span.get_or_insert_with(|| padded_range(&x));
                let count = *bins.get_or_insert_with(|| estimate_bins(&x, lo, hi));
                bin(&x, lo, hi, count.max(1))
            }
        }
    }
}

fn padded_range(x: &[f32]) -> (f32, f32) {
    let (min, max) = x
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min > max {
        return (-SPAN_PADDING, SPAN_PADDING);
    }
    (min - SPAN_PADDING, max + SPAN_PADDING)
}

/// Scott's rule bin count, capped at [`MAX_BINS`].
fn estimate_bins(x: &[f32], lo: f32, hi: f32) -> usize {
    let finite: Vec<f64> = x
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| f64::from(v))
        .collect();
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let width = f64::from(SCOTT_FACTOR) * variance.sqrt() * n.powf(-1.0 / 3.0);
    let needed = (f64::from(hi) - f64::from(lo)) / width;

    let bins = if !needed.is_finite() || needed > MAX_BINS as f64 {
        MAX_BINS
    } else {
        (needed.round() as usize).max(1)
    };
    tracing::debug!(
        bins,
        span_min = lo,
        span_max = hi,
        samples = finite.len(),
        "estimated histogram layout"
    );
    bins
}

fn bin(x: &[f32], lo: f32, hi: f32, bins: usize) -> Result<DataWithAesthetic> {
    let width = (hi - lo) / bins as f32;
    let mut counts = vec![0.0_f32; bins];
    for &v in x {
        if !(v >= lo && v < hi) {
            continue;
        }
        let index = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[index] += 1.0;
    }
    let centres: Vec<f32> = (0..bins).map(|i| lo + (i as f32 + 0.5) * width).collect();

    let mut out = create_data().x(&centres)?.y(&counts)?;
    let limits = out.limits_mut();
    limits.bmin[0] = lo;
    limits.bmax[0] = hi;
    limits.bmin[1] = 0.0;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn xs(values: &[f32]) -> DataWithAesthetic {
        create_data().x(values).expect("x")
    }

    fn layout(t: &Transform) -> (Option<(f32, f32)>, Option<usize>) {
        match t {
            Transform::BinX { span, bins } => (*span, *bins),
            Transform::Identity => (None, None),
        }
    }

    #[test]
    fn test_identity_passthrough() {
        let mut t = Transform::Identity;
        let out = t.apply(xs(&[1.0, 2.0])).expect("apply");
        assert_eq!(out.values(Aesthetic::X).expect("x"), vec![1.0, 2.0]);
        assert!(!out.has(Aesthetic::Y));
    }

    #[test]
    fn test_bin_two_bins() {
        let mut t = Transform::bin_x_with(2);
        let out = t.apply(xs(&[0.0, 0.25, 0.75, 1.0])).expect("apply");
        assert_eq!(out.values(Aesthetic::Y).expect("y"), vec![2.0, 2.0]);
        assert_eq!(out.limits().bmin[1], 0.0);
        let (lo, hi) = layout(&t).0.expect("span fixed");
        assert!(lo < 0.0 && hi > 1.0);
        assert_eq!(out.limits().bmin[0], lo);
        assert_eq!(out.limits().bmax[0], hi);
    }

    #[test]
    fn test_bin_layout_fixed_by_first_frame() {
        let mut t = Transform::bin_x_with(4);
        t.apply(xs(&[0.0, 1.0])).expect("first");
        let out = t.apply(xs(&[-5.0, 0.5, 0.5, 9.0])).expect("second");
        let counts = out.values(Aesthetic::Y).expect("y");
        assert_eq!(counts.len(), 4);
        assert_eq!(counts.iter().sum::<f32>(), 2.0);
    }

    #[test]
    fn test_bin_estimates_count() {
        let values: Vec<f32> = (0..1000).map(|i| i as f32 / 1000.0).collect();
        let mut t = Transform::bin_x();
        t.apply(xs(&values)).expect("apply");
        let bins = layout(&t).1.expect("bins fixed");
        assert!(bins > 1 && bins <= MAX_BINS);
    }

    #[test]
    fn test_bin_degenerate_uses_max() {
        let mut t = Transform::bin_x();
        t.apply(xs(&[3.0, 3.0, 3.0])).expect("apply");
        assert_eq!(layout(&t).1, Some(MAX_BINS));
    }

    #[test]
    fn test_bin_empty_input() {
        let mut t = Transform::bin_x();
        let out = t.apply(xs(&[])).expect("apply");
        assert_eq!(out.rows(), 0);
        assert_eq!(t, Transform::bin_x());
    }

    #[test]
    fn test_bin_requires_x() {
        let mut t = Transform::bin_x();
        let data = create_data().y(&[1.0]).expect("y");
        assert!(matches!(t.apply(data), Err(Error::MissingAesthetic("x"))));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Invariant: with a fixed layout, counts sum to the inputs inside the span.
        #[test]
        fn prop_bin_conserves_count(
            values in prop::collection::vec(-10.0f32..10.0, 0..200),
            bins in 1usize..50,
        ) {
            let mut t = Transform::BinX {
                span: Some((-5.0, 5.0)),
                bins: Some(bins),
            };
            let out = t.apply(create_data().x(&values).expect("x")).expect("apply");
            let inside = values.iter().filter(|&&v| (-5.0..5.0).contains(&v)).count();
            let total: f32 = out.values(Aesthetic::Y).expect("y").iter().sum();
            prop_assert_eq!(total as usize, inside);
        }
    }
}
