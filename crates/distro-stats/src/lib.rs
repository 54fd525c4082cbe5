//! distro-stats - Statistical primitives for distribution charts
//!
//! This crate provides the numeric core shared by every plot overlay:
//!
//! - **Metrics**: robust five-number summary with IQR fences and notch bounds
//! - **OutlierSplit**: fence-based partition into outliers and extremes
//! - **KernelDensity**: Epanechnikov kernel density estimation for violins
//!
//! # Design Philosophy
//!
//! All functions operate on ascending-sorted slices owned by the caller and
//! return plain serde-friendly values. Nothing here knows about pixels,
//! scales, or rendering; the chart layer composes these primitives.

pub mod kde;
pub mod metrics;
pub mod outliers;

pub use kde::*;
pub use metrics::*;
pub use outliers::*;
