//! Kernel density estimation for violin plots
//!
//! Epanechnikov-kernel density sampled over the value-axis domain, plus the
//! truncation-bound searches the violin overlay needs:
//!
//! - clamp at the observed data extent
//! - clamp at the first zero-density point within the domain
//! - extend outward (bounded) until the density reaches zero

use serde::{Deserialize, Serialize};

use crate::metrics::{StatsError, StatsResult};

/// One sampled point of a density curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    /// Position along the value axis
    pub x: f64,
    /// Estimated density at `x`
    pub y: f64,
}

/// How a violin's density curve is truncated at the group boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClampMode {
    /// Truncate exactly at the group min/max; possibly no tails
    DataExtent,
    /// Truncate at the first zero-density point beyond min/max, searched
    /// within the axis domain; falls back to the domain edge
    ZeroWithinDomain,
    /// Like `ZeroWithinDomain`, but grow the domain outward (bounded) until
    /// the density reaches zero, so every violin comes to a point
    ExtendDomain,
}

impl Default for ClampMode {
    fn default() -> Self {
        ClampMode::DataExtent
    }
}

/// Lower/upper truncation bounds for one group's density curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveBounds {
    pub lo: f64,
    pub hi: f64,
}

/// Epanechnikov kernel density estimator.
///
/// `K(u) = 0.75 * (1 - (u/h)^2) / h` for `|u/h| <= 1`, else 0. The density
/// at a point is the mean kernel response over all sample values, so the
/// curve integrates to ~1 and has compact support of one bandwidth around
/// the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelDensity {
    bandwidth: f64,
}

impl KernelDensity {
    /// Maximum number of outward steps taken by the `ExtendDomain` search.
    const MAX_EXTEND_STEPS: u32 = 25;

    /// Create an estimator with the given bandwidth (must be positive and
    /// finite).
    pub fn new(bandwidth: f64) -> StatsResult<Self> {
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return Err(StatsError::InvalidDensityParameter(format!(
                "bandwidth must be positive, got {bandwidth}"
            )));
        }
        Ok(Self { bandwidth })
    }

    /// The estimator's bandwidth
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Kernel response at offset `u` from a sample value
    fn kernel(&self, u: f64) -> f64 {
        let t = u / self.bandwidth;
        if t.abs() <= 1.0 {
            0.75 * (1.0 - t * t) / self.bandwidth
        } else {
            0.0
        }
    }

    /// Estimated density at `x`: mean kernel response over `samples`
    pub fn density_at(&self, samples: &[f64], x: f64) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = samples.iter().map(|v| self.kernel(x - v)).sum();
        sum / samples.len() as f64
    }

    /// Sample the density at `resolution` evenly spaced points across
    /// `[domain.0, domain.1]`, endpoints included.
    pub fn sample(
        &self,
        samples: &[f64],
        domain: (f64, f64),
        resolution: usize,
    ) -> StatsResult<Vec<DensityPoint>> {
        if resolution < 2 {
            return Err(StatsError::InvalidDensityParameter(format!(
                "resolution must be at least 2, got {resolution}"
            )));
        }
        let (lo, hi) = domain;
        let step = (hi - lo) / (resolution - 1) as f64;
        Ok((0..resolution)
            .map(|i| {
                let x = lo + step * i as f64;
                DensityPoint {
                    x,
                    y: self.density_at(samples, x),
                }
            })
            .collect())
    }

    /// Compute the truncation bounds for a sampled curve.
    ///
    /// `curve` is the output of [`sample`](Self::sample) over `domain`;
    /// `data_min`/`data_max` are the group's observed extremes. For
    /// `ExtendDomain` the result may lie outside `domain`; the caller is
    /// expected to widen the chart domain to the union of all groups' bounds
    /// and re-sample.
    pub fn curve_bounds(
        &self,
        samples: &[f64],
        curve: &[DensityPoint],
        data_min: f64,
        data_max: f64,
        domain: (f64, f64),
        mode: ClampMode,
    ) -> CurveBounds {
        match mode {
            ClampMode::DataExtent => CurveBounds {
                lo: data_min,
                hi: data_max,
            },
            ClampMode::ZeroWithinDomain => CurveBounds {
                lo: zero_below(curve, data_min).unwrap_or(domain.0),
                hi: zero_above(curve, data_max).unwrap_or(domain.1),
            },
            ClampMode::ExtendDomain => {
                // Step proportional to the domain span; the original fixed
                // unit step diverges on very small or very large domains.
                let step = (domain.1 - domain.0).abs() / f64::from(Self::MAX_EXTEND_STEPS);
                let lo = zero_below(curve, data_min)
                    .unwrap_or_else(|| self.extend_to_zero(samples, data_min, -step));
                let hi = zero_above(curve, data_max)
                    .unwrap_or_else(|| self.extend_to_zero(samples, data_max, step));
                CurveBounds { lo, hi }
            }
        }
    }

    /// Walk outward from `start` in increments of `step` (signed) until the
    /// density is numerically zero, bounded at `MAX_EXTEND_STEPS`.
    fn extend_to_zero(&self, samples: &[f64], start: f64, step: f64) -> f64 {
        let mut x = start;
        for _ in 0..Self::MAX_EXTEND_STEPS {
            if self.density_at(samples, x) <= f64::EPSILON {
                break;
            }
            x += step;
        }
        x
    }
}

/// The largest sampled x below `limit` where the density is zero
fn zero_below(curve: &[DensityPoint], limit: f64) -> Option<f64> {
    curve
        .iter()
        .filter(|d| d.x < limit && d.y <= f64::EPSILON)
        .map(|d| d.x)
        .fold(None, |acc, x| Some(acc.map_or(x, |a: f64| a.max(x))))
}

/// The smallest sampled x above `limit` where the density is zero
fn zero_above(curve: &[DensityPoint], limit: f64) -> Option<f64> {
    curve
        .iter()
        .filter(|d| d.x > limit && d.y <= f64::EPSILON)
        .map(|d| d.x)
        .fold(None, |acc, x| Some(acc.map_or(x, |a: f64| a.min(x))))
}

/// Drop curve points outside `bounds`
pub fn truncate_curve(curve: &[DensityPoint], bounds: CurveBounds) -> Vec<DensityPoint> {
    curve
        .iter()
        .copied()
        .filter(|d| d.x >= bounds.lo && d.x <= bounds.hi)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bandwidth_must_be_positive() {
        assert!(KernelDensity::new(0.0).is_err());
        assert!(KernelDensity::new(-1.0).is_err());
        assert!(KernelDensity::new(f64::NAN).is_err());
        assert!(KernelDensity::new(10.0).is_ok());
    }

    #[test]
    fn test_single_point_peak_and_decay() {
        let kde = KernelDensity::new(2.0).unwrap();
        let samples = [5.0];
        // Peak at the sample is the kernel maximum, 0.75 / bandwidth.
        assert!((kde.density_at(&samples, 5.0) - 0.375).abs() < 1e-12);
        // Zero one bandwidth away and beyond.
        assert_eq!(kde.density_at(&samples, 7.0), 0.0);
        assert_eq!(kde.density_at(&samples, 2.9), 0.0);
        // Strictly decaying inside the support.
        let near = kde.density_at(&samples, 5.5);
        let far = kde.density_at(&samples, 6.5);
        assert!(near > far && far > 0.0);
    }

    #[test]
    fn test_density_is_mean_over_samples() {
        let kde = KernelDensity::new(1.0).unwrap();
        // Only the sample at 0.0 contributes at x = 0; the mean divides by n.
        let lone = kde.density_at(&[0.0], 0.0);
        let diluted = kde.density_at(&[0.0, 100.0, 200.0], 0.0);
        assert!((diluted - lone / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_resolution_and_domain() {
        let kde = KernelDensity::new(1.0).unwrap();
        let curve = kde.sample(&[5.0], (0.0, 10.0), 101).unwrap();
        assert_eq!(curve.len(), 101);
        assert_eq!(curve[0].x, 0.0);
        assert_eq!(curve[100].x, 10.0);
        assert!(kde.sample(&[5.0], (0.0, 10.0), 1).is_err());
    }

    #[test]
    fn test_data_extent_bounds() {
        let kde = KernelDensity::new(1.0).unwrap();
        let samples = [3.0, 4.0, 5.0];
        let curve = kde.sample(&samples, (0.0, 10.0), 101).unwrap();
        let b = kde.curve_bounds(&samples, &curve, 3.0, 5.0, (0.0, 10.0), ClampMode::DataExtent);
        assert_eq!(b.lo, 3.0);
        assert_eq!(b.hi, 5.0);
    }

    #[test]
    fn test_zero_within_domain_bounds() {
        let kde = KernelDensity::new(1.0).unwrap();
        let samples = [5.0];
        let curve = kde.sample(&samples, (0.0, 10.0), 201).unwrap();
        let b = kde.curve_bounds(&samples, &curve, 5.0, 5.0, (0.0, 10.0), ClampMode::ZeroWithinDomain);
        // Compact support: density is zero just beyond one bandwidth out.
        assert!(b.lo <= 4.0 && b.lo >= 3.9);
        assert!(b.hi >= 6.0 && b.hi <= 6.1);
    }

    #[test]
    fn test_zero_within_domain_falls_back_to_edge() {
        // Bandwidth larger than the domain: no zero crossing exists inside.
        let kde = KernelDensity::new(100.0).unwrap();
        let samples = [5.0];
        let curve = kde.sample(&samples, (0.0, 10.0), 101).unwrap();
        let b = kde.curve_bounds(&samples, &curve, 5.0, 5.0, (0.0, 10.0), ClampMode::ZeroWithinDomain);
        assert_eq!(b.lo, 0.0);
        assert_eq!(b.hi, 10.0);
    }

    #[test]
    fn test_extend_domain_reaches_zero() {
        let kde = KernelDensity::new(6.0).unwrap();
        let samples = [5.0];
        let curve = kde.sample(&samples, (0.0, 10.0), 101).unwrap();
        let b = kde.curve_bounds(&samples, &curve, 5.0, 5.0, (0.0, 10.0), ClampMode::ExtendDomain);
        // Bounds extend past the domain until the density dies out.
        assert!(b.hi > 10.0);
        assert!(b.lo < 0.0);
        assert!(kde.density_at(&samples, b.hi) <= f64::EPSILON);
        assert!(kde.density_at(&samples, b.lo) <= f64::EPSILON);
    }

    #[test]
    fn test_extend_domain_is_bounded() {
        // Bandwidth so large the search cannot reach zero in 25 steps of
        // span/25; the walk must still terminate at the step bound.
        let kde = KernelDensity::new(1e6).unwrap();
        let samples = [5.0];
        let curve = kde.sample(&samples, (0.0, 10.0), 101).unwrap();
        let b = kde.curve_bounds(&samples, &curve, 5.0, 5.0, (0.0, 10.0), ClampMode::ExtendDomain);
        // 25 steps of 0.4 on each side.
        assert!(b.hi <= 5.0 + 25.0 * 0.4 + 1e-9);
        assert!(b.lo >= 5.0 - 25.0 * 0.4 - 1e-9);
    }

    #[test]
    fn test_truncate_curve() {
        let kde = KernelDensity::new(1.0).unwrap();
        let curve = kde.sample(&[5.0], (0.0, 10.0), 11).unwrap();
        let cut = truncate_curve(&curve, CurveBounds { lo: 4.0, hi: 6.0 });
        assert_eq!(cut.len(), 3);
        assert!(cut.iter().all(|d| d.x >= 4.0 && d.x <= 6.0));
    }
}
