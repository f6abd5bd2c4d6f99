//! Outlier screening of batch results by the interquartile range.
use crate::summary::{ScalarSummary, SummaryVariable};
use optional::none;
use strum::IntoEnumIterator;
use tracing::info;

/// Quantile `q` in `[0, 1]` of sorted values, interpolating linearly between order statistics.
///
/// Returns `None` for empty input or `q` outside `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// The range `[Q1 - k IQR, Q3 + k IQR]` of values kept by screening.
///
/// Non-finite values are ignored. Returns `None` if there are no finite values.
///
/// # Examples
///
/// ```rust
/// use column_moisture::iqr_bounds;
///
/// let (lo, hi) = iqr_bounds(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.0).unwrap();
/// assert_eq!((lo, hi), (0.0, 6.0));
/// ```
pub fn iqr_bounds(values: &[f64], k: f64) -> Option<(f64, f64)> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&sorted, 0.25)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;

    Some((q1 - k * iqr, q3 + k * iqr))
}

/// Mark values outside the interquartile range bounds as missing, each variable on its own.
///
/// Returns the number of values removed.
pub fn screen_outliers(summaries: &mut [ScalarSummary], k: f64) -> usize {
    let mut removed = 0;

    for var in SummaryVariable::iter() {
        let values: Vec<f64> = summaries
            .iter()
            .filter_map(|s| s.value(var).into_option())
            .collect();

        let (lo, hi) = match iqr_bounds(&values, k) {
            Some(bounds) => bounds,
            None => continue,
        };

        for summary in summaries.iter_mut() {
            if let Some(val) = summary.value(var).into_option() {
                if val < lo || val > hi {
                    *summary = summary.with_value(var, none::<f64>());
                    removed += 1;
                }
            }
        }
    }

    if removed > 0 {
        info!(removed, k, "screened outliers from batch results");
    }

    removed
}
