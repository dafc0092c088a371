//! Tick placement and number formatting.

/// A tick mark on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Data value.
    pub value: f32,
    /// Pixel coordinate along the axis.
    pub pixel: f32,
    /// Formatted label.
    pub label: String,
}

/// Relative slack when comparing ticks against the limits.
const TICK_TOLERANCE: f64 = 1e-4;

/// Default number of y ticks when neither count is fixed.
const DEFAULT_TICKS: usize = 5;

/// Round `x` to `digits` significant digits.
pub(crate) fn round_off(x: f64, digits: u32) -> f64 {
    if !x.is_finite() || x <= 0.0 {
        return x;
    }
    let power = i32::try_from(digits).unwrap_or(i32::MAX) - x.log10().ceil() as i32;
    if power >= 0 {
        let scale = 10f64.powi(power);
        (x * scale + 0.5).floor() / scale
    } else {
        let scale = 10f64.powi(-power);
        (x / scale + 0.5).floor() * scale
    }
}

/// Tick counts `[nx, ny]` from fixed counts and the pixel aspect ratio.
pub(crate) fn tick_counts(fixed: [Option<usize>; 2], aspect: f32) -> [usize; 2] {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    let scaled = |n: usize, factor: f32| ((n as f32 * factor).floor() as usize).max(1);
    match fixed {
        [Some(nx), Some(ny)] => [nx, ny],
        [Some(nx), None] => [nx, scaled(nx, 1.0 / aspect)],
        [None, Some(ny)] => [scaled(ny, aspect), ny],
        [None, None] => [scaled(DEFAULT_TICKS, aspect), DEFAULT_TICKS],
    }
}

/// Tick values covering `(lo, hi]` with roughly `n` steps.
///
/// A tick landing on `lo` sits on the frame line and is skipped.
pub(crate) fn tick_values(lo: f32, hi: f32, n: usize, digits: u32) -> Vec<f32> {
    let (lo, hi) = (f64::from(lo), f64::from(hi));
    let n = n.max(1);
    let dx = round_off((hi - lo) / n as f64, digits);
    if !dx.is_finite() || dx <= 0.0 {
        return Vec::new();
    }
    let tol = dx * TICK_TOLERANCE;

    let mut first = (lo / dx).ceil() * dx;
    if first <= lo + tol {
        first += dx;
    }
    let tick = |i: usize| first + i as f64 * dx;

    let mut count = n;
    while count > 0 && tick(count - 1) > hi + tol {
        count -= 1;
    }
    while tick(count) <= hi + tol {
        count += 1;
    }
    (0..count).map(|i| tick(i) as f32).collect()
}

/// Format `value` with at most `digits` significant digits, dropping
/// trailing zeros.
pub fn format_significant(value: f32, digits: u32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = i32::try_from(digits.max(1)).unwrap_or(i32::MAX);
    let exponent = f64::from(value).abs().log10().floor() as i32;
    if exponent < -4 || exponent >= digits {
        let formatted = format!("{:.*e}", (digits - 1) as usize, value);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", trim_zeros(mantissa)),
            None => formatted,
        };
    }
    let decimals = (digits - 1 - exponent).max(0) as usize;
    trim_zeros(&format!("{value:.decimals$}")).to_string()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_off() {
        assert_relative_eq!(round_off(20.0, 2), 20.0);
        assert_relative_eq!(round_off(0.123_456, 2), 0.12);
        assert_relative_eq!(round_off(1234.0, 1), 1000.0);
        assert_relative_eq!(round_off(0.0, 2), 0.0);
    }

    #[test]
    fn test_tick_counts() {
        assert_eq!(tick_counts([Some(3), Some(4)], 2.0), [3, 4]);
        assert_eq!(tick_counts([None, Some(4)], 2.0), [8, 4]);
        assert_eq!(tick_counts([Some(4), None], 2.0), [4, 2]);
        assert_eq!(tick_counts([None, None], 1.0), [5, 5]);
        assert_eq!(tick_counts([None, None], 0.1), [1, 5]);
        assert_eq!(tick_counts([None, None], f32::NAN), [5, 5]);
    }

    #[test]
    fn test_tick_values_skip_lower_limit() {
        assert_eq!(
            tick_values(0.0, 100.0, 5, 2),
            vec![20.0, 40.0, 60.0, 80.0, 100.0]
        );
    }

    #[test]
    fn test_tick_values_grow_and_shrink() {
        let ticks = tick_values(-1.0, 1.0, 4, 2);
        assert_eq!(ticks, vec![-0.5, 0.0, 0.5, 1.0]);
        let ticks = tick_values(0.05, 0.93, 5, 2);
        assert!(
            ticks.iter().all(|&t| t > 0.05 && t <= 0.93 + 1e-6),
            "{ticks:?}"
        );
        assert!(!ticks.is_empty());
    }

    #[test]
    fn test_tick_values_degenerate() {
        assert!(tick_values(1.0, 1.0, 5, 2).is_empty());
        assert!(tick_values(2.0, 1.0, 5, 2).is_empty());
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(0.0, 3), "0");
        assert_eq!(format_significant(20.0, 3), "20");
        assert_eq!(format_significant(0.5, 4), "0.5");
        assert_eq!(format_significant(-1.25, 3), "-1.25");
        assert_eq!(format_significant(2.0 / 3.0, 2), "0.67");
        assert_eq!(format_significant(1_234_567.0, 3), "1.23e6");
        assert_eq!(format_significant(0.000_012, 2), "1.2e-5");
    }
}
