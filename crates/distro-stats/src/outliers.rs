//! Fence-based outlier partitioning
//!
//! Splits a group's values into outliers (beyond an inner fence) and extremes
//! (beyond an outer fence). Values exactly on a fence are interior.

use serde::{Deserialize, Serialize};

use crate::metrics::Metrics;

/// The outlying values of one group, relative to its fences.
///
/// Normal values are not retained; overlays only need the outlying points as
/// distinct lists for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierSplit {
    /// Values beyond an inner fence but within the outer fences
    pub outliers: Vec<f64>,
    /// Values beyond an outer fence
    pub extremes: Vec<f64>,
}

impl OutlierSplit {
    /// Partition `values` against the fences in `metrics`.
    ///
    /// The interior is inclusive: a value equal to a fence is normal. Groups
    /// with `iqr == 0` produce an empty split because the fences coincide
    /// with the quartiles.
    pub fn from_values(values: &[f64], metrics: &Metrics) -> Self {
        let mut split = Self::default();
        for &v in values {
            if v < metrics.lower_inner_fence {
                if v < metrics.lower_outer_fence {
                    split.extremes.push(v);
                } else {
                    split.outliers.push(v);
                }
            } else if v > metrics.upper_inner_fence {
                if v > metrics.upper_outer_fence {
                    split.extremes.push(v);
                } else {
                    split.outliers.push(v);
                }
            }
        }
        split
    }

    /// Total count of outlying values
    pub fn len(&self) -> usize {
        self.outliers.len() + self.extremes.len()
    }

    /// Whether the group has no outlying values
    pub fn is_empty(&self) -> bool {
        self.outliers.is_empty() && self.extremes.is_empty()
    }
}
