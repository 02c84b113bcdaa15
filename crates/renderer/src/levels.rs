//! Fill level computation and level-to-color assignment.

use crate::colormap::{RAMP_END, RAMP_START};
use crate::error::{RenderError, RenderResult};

/// Number of intervals [`nice_levels`] aims for.
pub const DEFAULT_INTERVALS: usize = 10;

/// Round `step` up to 1, 2, 2.5 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|&n| normalized <= n + 1e-9)
        .unwrap_or(10.0);
    nice * magnitude
}

/// "Nice" level boundaries covering `[min, max]` with about `intervals` steps.
///
/// The first level is at or below `min`, the last at or above `max`. A
/// constant field gets a single interval around its value.
pub fn nice_levels(min: f64, max: f64, intervals: usize) -> Vec<f64> {
    let intervals = intervals.max(1);
    if !min.is_finite() || !max.is_finite() {
        return vec![0.0, 1.0];
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if max - min <= f64::EPSILON * min.abs().max(1.0) {
        let half = if min == 0.0 { 1.0 } else { nice_step(min.abs() * 0.1) };
        return vec![min - half, min + half];
    }

    let step = nice_step((max - min) / intervals as f64);
    let start = (min / step).floor();
    let end = (max / step).ceil();
    let count = (end - start).round() as i64;

    // Multiply rather than accumulate to keep levels exact multiples of step.
    (0..=count)
        .map(|k| {
            let level = (start + k as f64) * step;
            if level.abs() < step * 1e-9 {
                0.0
            } else {
                level
            }
        })
        .collect()
}

/// Check that explicit levels are finite and strictly increasing.
pub fn validate_levels(levels: &[f64]) -> RenderResult<()> {
    if levels.len() < 2 {
        return Err(RenderError::InvalidLevels(format!(
            "need at least 2 levels, got {}",
            levels.len()
        )));
    }
    if let Some(bad) = levels.iter().find(|v| !v.is_finite()) {
        return Err(RenderError::InvalidLevels(format!("level {} is not finite", bad)));
    }
    if let Some(pair) = levels.windows(2).find(|w| w[0] >= w[1]) {
        return Err(RenderError::InvalidLevels(format!(
            "levels must increase: {} is followed by {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

/// Spread `intervals` colormap indices evenly over the fill ramp.
pub fn spread_fill_colors(intervals: usize) -> Vec<u8> {
    match intervals {
        0 => Vec::new(),
        1 => vec![RAMP_START],
        n => {
            let span = (RAMP_END - RAMP_START) as f64;
            (0..n)
                .map(|k| RAMP_START + (k as f64 * span / (n - 1) as f64).round() as u8)
                .collect()
        }
    }
}

/// Interval of `levels` containing `value`.
///
/// Intervals are half-open `[l_k, l_k+1)` except the last, which also holds
/// its upper bound. Values outside the levels fall in the nearest end
/// interval.
pub fn interval_index(levels: &[f64], value: f64) -> Option<usize> {
    if levels.len() < 2 || !value.is_finite() {
        return None;
    }
    let last = levels.len() - 2;
    // Count boundaries at or below the value, excluding the first.
    let above = levels[1..levels.len() - 1].partition_point(|&l| l <= value);
    Some(above.min(last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(0.7), 1.0);
        assert_eq!(nice_step(3.2), 5.0);
        assert_eq!(nice_step(2.2), 2.5);
        assert_eq!(nice_step(43.0), 50.0);
        assert!((nice_step(0.0012) - 0.002).abs() < 1e-15);
    }

    #[test]
    fn test_nice_levels_cover_range() {
        let levels = nice_levels(-7.3, 29.6, DEFAULT_INTERVALS);
        assert_eq!(levels.first(), Some(&-10.0));
        assert_eq!(levels.last(), Some(&30.0));
        assert_eq!(levels.len(), 9);
        assert!(levels.windows(2).all(|w| (w[1] - w[0] - 5.0).abs() < 1e-9));
    }

    #[test]
    fn test_nice_levels_constant_field() {
        assert_eq!(nice_levels(0.0, 0.0, 10), vec![-1.0, 1.0]);
        let levels = nice_levels(42.0, 42.0, 10);
        assert_eq!(levels.len(), 2);
        assert!(levels[0] < 42.0 && levels[1] > 42.0);
    }

    #[test]
    fn test_validate_levels() {
        assert!(validate_levels(&[0.0, 1.0, 2.0]).is_ok());
        assert!(validate_levels(&[0.0]).is_err());
        assert!(validate_levels(&[0.0, 0.0]).is_err());
        assert!(validate_levels(&[0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_spread_fill_colors() {
        assert_eq!(spread_fill_colors(1), vec![16]);
        let colors = spread_fill_colors(8);
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[0], 16);
        assert_eq!(colors[7], 239);
        assert!(colors.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_interval_index() {
        let levels = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(interval_index(&levels, 0.0), Some(0));
        assert_eq!(interval_index(&levels, 9.9), Some(0));
        assert_eq!(interval_index(&levels, 10.0), Some(1));
        assert_eq!(interval_index(&levels, 30.0), Some(2));
        assert_eq!(interval_index(&levels, -5.0), Some(0));
        assert_eq!(interval_index(&levels, 99.0), Some(2));
        assert_eq!(interval_index(&levels, f64::NAN), None);
    }
}
