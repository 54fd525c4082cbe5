//! Violin plot overlay
//!
//! Mirrors each group's kernel density curve into two symmetric halves
//! around the band center. Half width is proportional to density, capped at
//! a configured fraction of the band. The density curve lives in data space,
//! so resize only repositions it; the curve itself is re-derived when the
//! value domain changes (domain-extension mode).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use distro_stats::{truncate_curve, ClampMode, DensityPoint, KernelDensity};

use crate::color::{ColorResolver, ColorStrategy};
use crate::overlay::{GroupPrimitives, Overlay, OverlayKind, RenderCtx};
use crate::primitive::{Interpolation, Primitive, Shape, Style};

/// Violin plot options, merged over these defaults by `configure`/`change`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolinOptions {
    /// Toggle the whole overlay
    pub show: bool,
    /// Show the violin shape itself (the overlay can stay active for its
    /// domain effects with the shape hidden)
    pub show_violin: bool,
    /// Number of evenly spaced density samples across the value domain
    pub resolution: usize,
    /// Kernel bandwidth; larger data sets may need a higher bandwidth
    pub bandwidth: f64,
    /// Maximum violin width as a percent of the group band
    pub width: f64,
    /// Curve rendering hint handed to the host
    pub interpolation: Interpolation,
    /// How the curve is truncated at the group boundaries
    pub clamp: ClampMode,
    /// Overlay-specific color override; chart colors when unset
    #[serde(skip)]
    pub colors: Option<ColorStrategy>,
    /// Unrecognized option keys, preserved but ignored
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ViolinOptions {
    fn default() -> Self {
        Self {
            show: true,
            show_violin: true,
            resolution: 100,
            bandwidth: 20.0,
            width: 50.0,
            interpolation: Interpolation::Cardinal,
            clamp: ClampMode::DataExtent,
            colors: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One group's truncated density curve, in data space
#[derive(Debug, Clone)]
struct ViolinCurve {
    points: Vec<DensityPoint>,
    max_density: f64,
}

/// The violin plot overlay state
#[derive(Debug, Default)]
pub struct ViolinOverlay {
    options: ViolinOptions,
    colors: Option<ColorResolver>,
    curves: HashMap<String, ViolinCurve>,
    groups: Vec<GroupPrimitives>,
}

impl ViolinOverlay {
    /// Create the overlay with the given options (no build yet)
    pub fn new(options: ViolinOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The domain the chart must grow to so every violin comes to a point.
    ///
    /// Only meaningful in [`ClampMode::ExtendDomain`]; returns the union of
    /// all groups' extended bounds, which may equal the current domain. The
    /// orchestrator applies the extension before `build`.
    pub fn domain_extension(&self, ctx: &RenderCtx) -> Option<(f64, f64)> {
        if !self.options.show || self.options.clamp != ClampMode::ExtendDomain {
            return None;
        }
        let kde = match KernelDensity::new(self.options.bandwidth) {
            Ok(kde) => kde,
            Err(err) => {
                tracing::warn!(%err, "violin bandwidth rejected; skipping domain extension");
                return None;
            }
        };
        let domain = ctx.scale.y.domain();
        let mut union: Option<(f64, f64)> = None;
        for group in ctx.groups.iter() {
            let Ok(curve) = kde.sample(&group.values, domain, self.options.resolution) else {
                continue;
            };
            let bounds = kde.curve_bounds(
                &group.values,
                &curve,
                group.metrics.min,
                group.metrics.max,
                domain,
                ClampMode::ExtendDomain,
            );
            union = Some(match union {
                Some((lo, hi)) => (lo.min(bounds.lo), hi.max(bounds.hi)),
                None => (bounds.lo, bounds.hi),
            });
        }
        union
    }
}

impl Overlay for ViolinOverlay {
    type Options = ViolinOptions;
    const KIND: OverlayKind = OverlayKind::ViolinPlot;

    fn options(&self) -> &ViolinOptions {
        &self.options
    }

    fn set_options(&mut self, options: ViolinOptions) {
        self.options = options;
    }

    fn visible(&self) -> bool {
        self.options.show
    }

    fn set_visible(&mut self, on: bool) {
        self.options.show = on;
    }

    fn release(&mut self) {
        self.groups.clear();
        self.curves.clear();
    }

    fn build(&mut self, ctx: &RenderCtx) {
        self.colors = self
            .options
            .colors
            .as_ref()
            .map(|c| c.resolver(ctx.scale.x.keys()));

        if !self.options.show {
            return;
        }

        let kde = match KernelDensity::new(self.options.bandwidth) {
            Ok(kde) => kde,
            Err(err) => {
                tracing::warn!(%err, "violin bandwidth rejected; overlay renders empty");
                return;
            }
        };
        let domain = ctx.scale.y.domain();

        // After a domain extension the zero crossings (where reachable) lie
        // inside the domain, so the in-domain search covers both modes.
        let bounds_mode = match self.options.clamp {
            ClampMode::DataExtent => ClampMode::DataExtent,
            ClampMode::ZeroWithinDomain | ClampMode::ExtendDomain => ClampMode::ZeroWithinDomain,
        };

        for group in ctx.groups.iter() {
            let curve = match kde.sample(&group.values, domain, self.options.resolution) {
                Ok(curve) => curve,
                Err(err) => {
                    tracing::warn!(key = %group.key, %err, "density sampling failed; group renders empty");
                    continue;
                }
            };
            let bounds = kde.curve_bounds(
                &group.values,
                &curve,
                group.metrics.min,
                group.metrics.max,
                domain,
                bounds_mode,
            );
            let points = truncate_curve(&curve, bounds);
            let max_density = points.iter().map(|d| d.y).fold(0.0, f64::max);
            if points.is_empty() || max_density <= 0.0 {
                tracing::warn!(key = %group.key, "degenerate density curve; group renders empty");
                continue;
            }
            self.curves
                .insert(group.key.clone(), ViolinCurve { points, max_density });
            self.groups.push(GroupPrimitives {
                key: group.key.clone(),
                primitives: Vec::new(),
            });
        }
    }

    fn update(&mut self, ctx: &RenderCtx) {
        let opts = self.options.clone();
        for group in self.groups.iter_mut() {
            group.primitives.clear();
            if !opts.show_violin {
                continue;
            }
            let Some(curve) = self.curves.get(&group.key) else {
                continue;
            };
            let Some(sub) = ctx.scale.x.sub_band(&group.key, opts.width) else {
                continue;
            };
            let half_width = sub.width() / 2.0;
            let color = match &self.colors {
                Some(own) => own.resolve(&group.key),
                None => ctx.colors.resolve(&group.key),
            };

            for side in [-1.0, 1.0] {
                let outline: Vec<(f64, f64)> = curve
                    .points
                    .iter()
                    .map(|d| {
                        let offset = half_width * (d.y / curve.max_density).clamp(0.0, 1.0);
                        (sub.middle + side * offset, ctx.scale.y.map(d.x))
                    })
                    .collect();

                // Close the fill back along the center line.
                let mut area = outline.clone();
                if let (Some(&(_, y_last)), Some(&(_, y_first))) =
                    (outline.last(), outline.first())
                {
                    area.push((sub.middle, y_last));
                    area.push((sub.middle, y_first));
                }

                let role_side = if side < 0.0 { "left" } else { "right" };
                group.primitives.push(Primitive::new(
                    format!("violin-area-{role_side}"),
                    Shape::Polygon { points: area },
                    Style::fill(color),
                ));
                group.primitives.push(Primitive::new(
                    format!("violin-outline-{role_side}"),
                    Shape::Curve {
                        points: outline,
                        interpolation: opts.interpolation,
                        closed: false,
                    },
                    Style::stroke(color, 1.0),
                ));
            }
        }
    }

    fn groups(&self) -> &[GroupPrimitives] {
        &self.groups
    }
}
