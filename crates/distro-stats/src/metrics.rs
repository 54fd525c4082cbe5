//! Robust summary metrics for grouped samples
//!
//! Provides the per-group statistics block used by every overlay:
//! - Quartiles via linear interpolation between order statistics
//! - IQR-derived inner and outer fences
//! - McGill notch bounds for median confidence intervals

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from statistical computations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The input slice contained no values
    #[error("cannot compute metrics for an empty sample")]
    EmptyInput,

    /// A kernel bandwidth or resolution was not usable
    #[error("invalid density parameter: {0}")]
    InvalidDensityParameter(String),
}

/// Result type alias for statistical operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Robust summary statistics for one group of samples.
///
/// The inner fences are reported as the closest *actual* data values lying on
/// or inside the `q1 - 1.5*iqr` / `q3 + 1.5*iqr` candidate thresholds, falling
/// back to the observed min/max when no value qualifies. Outer fences are the
/// raw `3*iqr` thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Smallest observed value
    pub min: f64,
    /// First quartile (25th percentile)
    pub quartile1: f64,
    /// Median (50th percentile)
    pub median: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Third quartile (75th percentile)
    pub quartile3: f64,
    /// Largest observed value
    pub max: f64,
    /// Interquartile range, `quartile3 - quartile1`
    pub iqr: f64,
    /// Closest value on or above `quartile1 - 1.5*iqr`
    pub lower_inner_fence: f64,
    /// Closest value on or below `quartile3 + 1.5*iqr`
    pub upper_inner_fence: f64,
    /// `quartile1 - 3*iqr`
    pub lower_outer_fence: f64,
    /// `quartile3 + 3*iqr`
    pub upper_outer_fence: f64,
    /// `median - 1.57*iqr/sqrt(n)`
    pub lower_notch: f64,
    /// `median + 1.57*iqr/sqrt(n)`
    pub upper_notch: f64,
}

impl Metrics {
    /// Compute the metrics block from an ascending-sorted, non-empty slice.
    ///
    /// Duplicates are retained by the caller and participate in the order
    /// statistics. Values must be finite and sorted ascending.
    pub fn from_sorted(values: &[f64]) -> StatsResult<Self> {
        if values.is_empty() {
            return Err(StatsError::EmptyInput);
        }
        debug_assert!(values.windows(2).all(|w| w[0] <= w[1]));

        let n = values.len();
        let min = values[0];
        let max = values[n - 1];
        let quartile1 = quantile(values, 0.25);
        let median = quantile(values, 0.5);
        let quartile3 = quantile(values, 0.75);
        let mean = values.iter().sum::<f64>() / n as f64;
        let iqr = quartile3 - quartile1;

        let lower_candidate = quartile1 - 1.5 * iqr;
        let upper_candidate = quartile3 + 1.5 * iqr;
        let lower_inner_fence = values
            .iter()
            .copied()
            .find(|v| *v >= lower_candidate)
            .unwrap_or(min);
        let upper_inner_fence = values
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= upper_candidate)
            .unwrap_or(max);

        let notch = 1.57 * iqr / (n as f64).sqrt();

        Ok(Self {
            min,
            quartile1,
            median,
            mean,
            quartile3,
            max,
            iqr,
            lower_inner_fence,
            upper_inner_fence,
            lower_outer_fence: quartile1 - 3.0 * iqr,
            upper_outer_fence: quartile3 + 3.0 * iqr,
            lower_notch: median - notch,
            upper_notch: median + notch,
        })
    }

    /// Whether the group collapses to a single distinct value (`iqr == 0`).
    ///
    /// Degenerate groups still render: fences coincide with the quartiles and
    /// the outlier partition comes back empty.
    pub fn is_degenerate(&self) -> bool {
        self.iqr == 0.0
    }

    /// Look up a metric by its field name, for metric-selected trend lines.
    pub fn by_name(&self, name: &str) -> Option<f64> {
        match name {
            "min" => Some(self.min),
            "quartile1" => Some(self.quartile1),
            "median" => Some(self.median),
            "mean" => Some(self.mean),
            "quartile3" => Some(self.quartile3),
            "max" => Some(self.max),
            "iqr" => Some(self.iqr),
            "lower_inner_fence" => Some(self.lower_inner_fence),
            "upper_inner_fence" => Some(self.upper_inner_fence),
            "lower_outer_fence" => Some(self.lower_outer_fence),
            "upper_outer_fence" => Some(self.upper_outer_fence),
            "lower_notch" => Some(self.lower_notch),
            "upper_notch" => Some(self.upper_notch),
            _ => None,
        }
    }
}

/// Quantile of an ascending-sorted, non-empty slice using linear
/// interpolation between order statistics.
///
/// `index = p * (n - 1)`; the result interpolates between the two bracketing
/// values. `p` is clamped to `[0, 1]`.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let index = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = index.floor() as usize;
    let hi = index.ceil() as usize;
    let frac = index - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolation() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(quantile(&values, 0.25), 15.0);
        assert_eq!(quantile(&values, 0.5), 20.0);
        assert_eq!(quantile(&values, 0.75), 25.0);
        assert_eq!(quantile(&values, 0.0), 10.0);
        assert_eq!(quantile(&values, 1.0), 30.0);
    }

    #[test]
    fn test_metrics_three_values() {
        let m = Metrics::from_sorted(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(m.quartile1, 15.0);
        assert_eq!(m.median, 20.0);
        assert_eq!(m.quartile3, 25.0);
        assert_eq!(m.iqr, 10.0);
        // Candidates are [0, 40]; no value lies outside, so the reported
        // fences fall back to the actual extremes.
        assert_eq!(m.lower_inner_fence, 10.0);
        assert_eq!(m.upper_inner_fence, 30.0);
        assert_eq!(m.lower_outer_fence, -15.0);
        assert_eq!(m.upper_outer_fence, 55.0);
    }

    #[test]
    fn test_metrics_ordering_invariant() {
        let values: Vec<f64> = (1..=37).map(|x| (x as f64).powi(2)).collect();
        let m = Metrics::from_sorted(&values).unwrap();
        assert!(m.min <= m.lower_inner_fence);
        assert!(m.lower_inner_fence <= m.quartile1);
        assert!(m.quartile1 <= m.median);
        assert!(m.median <= m.quartile3);
        assert!(m.quartile3 <= m.upper_inner_fence);
        assert!(m.upper_inner_fence <= m.max);
        assert!(m.iqr >= 0.0);
    }

    #[test]
    fn test_inner_fence_closest_actual_value() {
        // q1 = 2.75, q3 = 6.25, iqr = 3.5 -> candidates [-2.5, 11.5].
        // 100.0 is outside; the reported upper fence is the closest value
        // inside the candidate, not the candidate itself.
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 100.0];
        let m = Metrics::from_sorted(&values).unwrap();
        assert!((m.quartile1 - 2.75).abs() < 1e-12);
        assert!((m.quartile3 - 6.25).abs() < 1e-12);
        assert_eq!(m.upper_inner_fence, 7.0);
        assert_eq!(m.lower_inner_fence, 1.0);
    }

    #[test]
    fn test_degenerate_group() {
        let m = Metrics::from_sorted(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(m.iqr, 0.0);
        assert!(m.is_degenerate());
        assert_eq!(m.min, 5.0);
        assert_eq!(m.median, 5.0);
        assert_eq!(m.max, 5.0);
        assert_eq!(m.lower_inner_fence, 5.0);
        assert_eq!(m.upper_inner_fence, 5.0);
        assert_eq!(m.lower_notch, 5.0);
        assert_eq!(m.upper_notch, 5.0);
    }

    #[test]
    fn test_single_value() {
        let m = Metrics::from_sorted(&[42.0]).unwrap();
        assert_eq!(m.min, 42.0);
        assert_eq!(m.max, 42.0);
        assert_eq!(m.median, 42.0);
        assert_eq!(m.iqr, 0.0);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert_eq!(Metrics::from_sorted(&[]), Err(StatsError::EmptyInput));
    }

    #[test]
    fn test_notch_arithmetic() {
        let values: Vec<f64> = (1..=16).map(|x| x as f64).collect();
        let m = Metrics::from_sorted(&values).unwrap();
        let expected = 1.57 * m.iqr / (16.0_f64).sqrt();
        assert!((m.upper_notch - m.median - expected).abs() < 1e-12);
        assert!((m.median - m.lower_notch - expected).abs() < 1e-12);
    }

    #[test]
    fn test_metric_by_name() {
        let m = Metrics::from_sorted(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(m.by_name("median"), Some(20.0));
        assert_eq!(m.by_name("quartile3"), Some(25.0));
        assert_eq!(m.by_name("nope"), None);
    }
}
