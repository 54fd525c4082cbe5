//! Scale and layout management
//!
//! Maintains the two coordinate mappings every overlay shares:
//! - [`BandScale`]: ordinal group keys to equal-width horizontal bands
//! - [`ValueScale`]: the continuous value domain to the vertical pixel range,
//!   niced to readable bounds and clamped at the edges
//!
//! `update()` reacts to canvas-dimension changes and touches geometry only;
//! the value domain is fixed at build time unless a violin overlay in
//! domain-extension mode widens it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{ChartConfig, ScaleKind};
use crate::dataset::GroupedData;
use crate::error::{ChartError, ChartResult};

/// Tick count the nice/tick machinery aims for before the multiplier
const BASE_TICK_COUNT: f64 = 10.0;

/// A centered fraction of one group's band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubBand {
    pub left: f64,
    pub right: f64,
    pub middle: f64,
}

impl SubBand {
    /// Width of the sub-band
    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

/// Ordinal scale: one equal-width band per group key, first-encounter order
#[derive(Debug, Clone)]
pub struct BandScale {
    keys: Vec<String>,
    index: HashMap<String, usize>,
    width: f64,
}

impl BandScale {
    /// Create a band scale over `keys` for a drawing width
    pub fn new(keys: Vec<String>, width: f64) -> Self {
        let index = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        Self { keys, index, width }
    }

    /// Recompute band geometry for a new drawing width
    pub fn update(&mut self, width: f64) {
        self.width = width.max(0.0);
    }

    /// Width of one band
    pub fn band_width(&self) -> f64 {
        if self.keys.is_empty() {
            0.0
        } else {
            self.width / self.keys.len() as f64
        }
    }

    /// The `[left, right]` band of a group key
    pub fn band(&self, key: &str) -> Option<(f64, f64)> {
        let i = *self.index.get(key)?;
        let w = self.band_width();
        let left = i as f64 * w;
        Some((left, left + w))
    }

    /// Horizontal center of a group's band
    pub fn center(&self, key: &str) -> Option<f64> {
        self.band(key).map(|(l, _)| l + self.band_width() / 2.0)
    }

    /// A centered `percent`-of-band-width slice of a group's band
    pub fn sub_band(&self, key: &str, percent: f64) -> Option<SubBand> {
        let (band_left, _) = self.band(key)?;
        let band_width = self.band_width();
        let width = band_width * (percent / 100.0);
        let padding = (band_width - width) / 2.0;
        let left = band_left + padding;
        Some(SubBand {
            left,
            right: left + width,
            middle: band_left + band_width / 2.0,
        })
    }

    /// Group keys in band order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The key whose band contains pixel `x`
    pub fn key_at(&self, x: f64) -> Option<&str> {
        if self.keys.is_empty() || self.width <= 0.0 || x < 0.0 || x > self.width {
            return None;
        }
        let i = ((x / self.band_width()) as usize).min(self.keys.len() - 1);
        Some(&self.keys[i])
    }
}

/// One tick mark on the value axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Position in data coordinates
    pub value: f64,
    /// Position in pixels
    pub position: f64,
    /// Whether this is a major tick
    pub is_major: bool,
    /// Label text; empty on minor and suppressed log ticks
    pub label: String,
}

/// Continuous scale from a niced value domain to the vertical pixel range.
///
/// Out-of-domain input saturates to the range edges. The base (pre-nice)
/// domain is fixed at build time; a violin overlay in domain-extension mode
/// may lay a wider extension over it, which is dropped when that overlay
/// goes away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueScale {
    kind: ScaleKind,
    base: (f64, f64),
    extension: Option<(f64, f64)>,
    domain: (f64, f64),
    height: f64,
}

impl ValueScale {
    /// Create a scale over the raw data domain for a drawing height
    pub fn new(kind: ScaleKind, base: (f64, f64), height: f64) -> ChartResult<Self> {
        if kind == ScaleKind::Log && base.0 <= 0.0 {
            return Err(ChartError::LogScaleDomain {
                min: base.0,
                max: base.1,
            });
        }
        let mut scale = Self {
            kind,
            base,
            extension: None,
            domain: base,
            height: height.max(0.0),
        };
        scale.renice();
        Ok(scale)
    }

    /// Recompute the pixel range for a new drawing height (domain untouched)
    pub fn update(&mut self, height: f64) {
        self.height = height.max(0.0);
    }

    /// Widen the effective domain to include `[lo, hi]` and re-nice. Never
    /// shrinks; the base domain stays untouched underneath.
    pub fn extend_domain(&mut self, lo: f64, hi: f64) {
        let (cur_lo, cur_hi) = self.extension.unwrap_or(self.base);
        self.extension = Some((cur_lo.min(lo), cur_hi.max(hi)));
        self.renice();
    }

    /// Drop any extension, restoring the base domain
    pub fn clear_extension(&mut self) {
        self.extension = None;
        self.renice();
    }

    /// The niced domain
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The scale kind
    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    /// The drawing height
    pub fn height(&self) -> f64 {
        self.height
    }

    fn renice(&mut self) {
        let (mut lo, mut hi) = self.extension.unwrap_or(self.base);
        // A log domain must stay strictly positive; an extension below zero
        // saturates at the validated base minimum.
        if self.kind == ScaleKind::Log && lo <= 0.0 {
            lo = self.base.0;
        }
        // A zero-span domain cannot map; pad it by one unit before nicing.
        if lo == hi {
            match self.kind {
                ScaleKind::Linear => {
                    lo -= 1.0;
                    hi += 1.0;
                }
                ScaleKind::Log => {
                    lo /= 2.0;
                    hi *= 2.0;
                }
            }
        }
        self.domain = match self.kind {
            ScaleKind::Linear => {
                let step = nice_step((hi - lo) / BASE_TICK_COUNT);
                ((lo / step).floor() * step, (hi / step).ceil() * step)
            }
            ScaleKind::Log => (
                10f64.powf(lo.log10().floor()),
                10f64.powf(hi.log10().ceil()),
            ),
        };
    }

    /// Map a value to a pixel position; the domain top maps to 0 and the
    /// bottom to `height`, and out-of-domain values clamp to the edges.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let t = match self.kind {
            ScaleKind::Linear => (value - d0) / (d1 - d0),
            ScaleKind::Log => {
                let v = value.max(d0); // log of the clamped value
                (v.log10() - d0.log10()) / (d1.log10() - d0.log10())
            }
        };
        self.height * (1.0 - t.clamp(0.0, 1.0))
    }

    /// Tick marks for the current domain; `multiplier` scales the density
    pub fn ticks(&self, multiplier: f64) -> Vec<Tick> {
        let count = (BASE_TICK_COUNT * multiplier).round().max(2.0);
        match self.kind {
            ScaleKind::Linear => self.linear_ticks(count),
            ScaleKind::Log => self.log_ticks(),
        }
    }

    fn linear_ticks(&self, count: f64) -> Vec<Tick> {
        let (d0, d1) = self.domain;
        let range = d1 - d0;
        if range <= 0.0 {
            return vec![];
        }
        let step = nice_step(range / count);
        let start = (d0 / step).ceil() * step;
        let mut ticks = Vec::new();
        let mut value = start;
        while value <= d1 + step * 1e-3 {
            ticks.push(Tick {
                value,
                position: self.map(value),
                is_major: true,
                label: format_value(value),
            });
            value += step;
        }
        ticks
    }

    fn log_ticks(&self) -> Vec<Tick> {
        let (d0, d1) = self.domain;
        let start_decade = d0.log10().floor() as i32;
        let end_decade = d1.log10().ceil() as i32;
        let mut ticks = Vec::new();
        for decade in start_decade..=end_decade {
            let base = 10f64.powi(decade);
            for mantissa in 1..=9 {
                let value = base * mantissa as f64;
                if value < d0 || value > d1 {
                    continue;
                }
                ticks.push(Tick {
                    value,
                    position: self.map(value),
                    is_major: mantissa == 1,
                    label: log_format_value(value),
                });
            }
        }
        ticks
    }
}

/// Round a rough step to the nearest 1/2/5/10 multiple of its magnitude
fn nice_step(rough: f64) -> f64 {
    let magnitude = 10f64.powf(rough.abs().log10().floor());
    let residual = rough / magnitude;
    if residual <= 1.5 {
        magnitude
    } else if residual <= 3.0 {
        2.0 * magnitude
    } else if residual <= 7.0 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

/// Format a value with two decimals when fractional, none when integral
pub fn format_value(value: f64) -> String {
    if value % 1.0 != 0.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.0}", value)
    }
}

/// Log-axis label: values near the low mantissas of a decade get a label,
/// the rest stay blank to keep the axis readable
pub fn log_format_value(value: f64) -> String {
    let x = value.log10() + 1e-6;
    if (x - x.floor()).abs() < 0.6 {
        format_value(value)
    } else {
        String::new()
    }
}

/// The shared coordinate state all overlays draw against
#[derive(Debug, Clone)]
pub struct ScaleState {
    pub x: BandScale,
    pub y: ValueScale,
}

impl ScaleState {
    /// Build the scale state from grouped data and the chart configuration
    pub fn new(data: &GroupedData, config: &ChartConfig) -> ChartResult<Self> {
        let raw = if config.constrain_extremes {
            data.fence_extent()
        } else {
            data.value_extent()
        }
        .ok_or(ChartError::EmptyDataset)?;

        Ok(Self {
            x: BandScale::new(data.keys(), config.plot_width()),
            y: ValueScale::new(config.scale_kind, raw, config.plot_height())?,
        })
    }

    /// Recompute geometry for new plot-area dimensions. Idempotent: the same
    /// dimensions always produce the same bands and range.
    pub fn update(&mut self, plot_width: f64, plot_height: f64) {
        self.x.update(plot_width);
        self.y.update(plot_height);
    }

    /// Widen the value domain (violin domain-extension mode)
    pub fn extend_domain(&mut self, lo: f64, hi: f64) {
        self.y.extend_domain(lo, hi);
    }

    /// Drop any violin domain extension, restoring the build-time domain
    pub fn clear_extension(&mut self) {
        self.y.clear_extension();
    }
}
