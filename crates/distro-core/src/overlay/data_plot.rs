//! Raw-data overlay
//!
//! Renders the underlying sample points themselves: jittered scatter,
//! bin-packed beeswarm, short bean ticks per value, and smoothed trend
//! lines connecting a chosen metric across the groups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::{ColorResolver, ColorStrategy};
use crate::overlay::{GroupPrimitives, Jitter, Overlay, OverlayKind, RenderCtx};
use crate::primitive::{Interpolation, Primitive, Shape, Style};

/// Raw-point layout; the variants are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlotType {
    /// No points
    None,
    /// Points at the band center with bounded jitter across `width` percent
    /// of the band
    Scatter { width: f64 },
    /// Points packed side by side into point-diameter bins along the value
    /// axis
    Beeswarm,
}

impl PlotType {
    /// Scatter with the conventional 20% jitter width
    pub fn scatter() -> Self {
        PlotType::Scatter { width: 20.0 }
    }
}

impl Default for PlotType {
    fn default() -> Self {
        PlotType::None
    }
}

/// Data plot options, merged over these defaults by `configure`/`change`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPlotOptions {
    /// Toggle the whole overlay
    pub show: bool,
    /// Show the raw points at all
    pub show_plot: bool,
    /// Point layout
    pub plot_type: PlotType,
    /// Point diameter in pixels
    pub point_size: f64,
    /// Metric names to connect with trend lines (e.g. "median", "quartile3")
    pub show_lines: Vec<String>,
    /// One short horizontal tick per raw value at the band center
    pub show_bean_lines: bool,
    /// Bean tick width, percent of the band
    pub bean_width: f64,
    /// Overlay-specific color override; chart colors when unset
    #[serde(skip)]
    pub colors: Option<ColorStrategy>,
    /// Unrecognized option keys, preserved but ignored
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for DataPlotOptions {
    fn default() -> Self {
        Self {
            show: true,
            show_plot: false,
            plot_type: PlotType::default(),
            point_size: 6.0,
            show_lines: Vec::new(),
            show_bean_lines: false,
            bean_width: 20.0,
            colors: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One metric's value per group, in category order
#[derive(Debug, Clone)]
struct TrendLine {
    metric: String,
    values: Vec<(String, f64)>,
}

/// The raw-data overlay state
#[derive(Debug, Default)]
pub struct DataPlotOverlay {
    options: DataPlotOptions,
    colors: Option<ColorResolver>,
    trends: Vec<TrendLine>,
    groups: Vec<GroupPrimitives>,
    /// Trend lines span all groups, so they live beside the group sets
    trend_primitives: Vec<Primitive>,
}

impl DataPlotOverlay {
    /// Create the overlay with the given options (no build yet)
    pub fn new(options: DataPlotOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

impl Overlay for DataPlotOverlay {
    type Options = DataPlotOptions;
    const KIND: OverlayKind = OverlayKind::DataPlot;

    fn options(&self) -> &DataPlotOptions {
        &self.options
    }

    fn set_options(&mut self, options: DataPlotOptions) {
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
        self.trends.clear();
        self.trend_primitives.clear();
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

        for metric in &self.options.show_lines {
            let mut values = Vec::with_capacity(ctx.groups.len());
            for group in ctx.groups.iter() {
                match group.metrics.by_name(metric) {
                    Some(v) => values.push((group.key.clone(), v)),
                    None => {
                        tracing::warn!(metric = %metric, "unknown trend metric; line skipped");
                        values.clear();
                        break;
                    }
                }
            }
            if !values.is_empty() {
                self.trends.push(TrendLine {
                    metric: metric.clone(),
                    values,
                });
            }
        }

        self.groups = ctx
            .groups
            .iter()
            .map(|g| GroupPrimitives {
                key: g.key.clone(),
                primitives: Vec::new(),
            })
            .collect();
    }

    fn update(&mut self, ctx: &RenderCtx) {
        let opts = self.options.clone();

        self.trend_primitives.clear();
        for trend in &self.trends {
            let points: Vec<(f64, f64)> = trend
                .values
                .iter()
                .filter_map(|(key, v)| {
                    ctx.scale
                        .x
                        .center(key)
                        .map(|cx| (cx, ctx.scale.y.map(*v)))
                })
                .collect();
            if points.len() < 2 {
                continue;
            }
            // Trend lines are colored by metric name, not group.
            let color = match &self.colors {
                Some(own) => own.resolve(&trend.metric),
                None => ctx.colors.resolve(&trend.metric),
            };
            self.trend_primitives.push(Primitive::new(
                format!("trend-{}", trend.metric),
                Shape::Curve {
                    points,
                    interpolation: Interpolation::Cardinal,
                    closed: false,
                },
                Style::stroke(color, 1.0),
            ));
        }

        let mut jitter = Jitter::new(0xDA7A);
        for group in self.groups.iter_mut() {
            group.primitives.clear();
            let Some(record) = ctx.groups.get(&group.key) else {
                continue;
            };
            let color = match &self.colors {
                Some(own) => own.resolve(&group.key),
                None => ctx.colors.resolve(&group.key),
            };

            if opts.show_plot {
                match opts.plot_type {
                    PlotType::None => {}
                    PlotType::Scatter { width } => {
                        let Some(sub) = ctx.scale.x.sub_band(&group.key, width) else {
                            continue;
                        };
                        for &v in &record.values {
                            group.primitives.push(Primitive::new(
                                "point",
                                Shape::Circle {
                                    cx: sub.middle + jitter.offset(sub.width()),
                                    cy: ctx.scale.y.map(v),
                                    r: opts.point_size / 2.0,
                                },
                                Style::fill(color),
                            ));
                        }
                    }
                    PlotType::Beeswarm => {
                        let Some(swarm) = ctx.scale.x.sub_band(&group.key, 100.0) else {
                            continue;
                        };
                        let size = opts.point_size.max(1.0);
                        let max_per_row = (ctx.scale.x.band_width() / size).floor();
                        let right_max = swarm.right - size;

                        // Bucket values into point-diameter bins on the value
                        // axis, then pack each bin side by side, centered.
                        let mut bins: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
                        for &v in &record.values {
                            let bin = (ctx.scale.y.map(v) / size).round() as i64;
                            bins.entry(bin).or_default().push(v);
                        }
                        for (bin, members) in &bins {
                            let cy = *bin as f64 * size;
                            let spare = (max_per_row - members.len() as f64) / 2.0;
                            let left_min = swarm.left + spare.max(0.0) * size;
                            for (col, _) in members.iter().enumerate() {
                                let cx = (left_min + col as f64 * size).min(right_max) + size / 2.0;
                                group.primitives.push(Primitive::new(
                                    "point",
                                    Shape::Circle {
                                        cx,
                                        cy,
                                        r: opts.point_size / 2.0,
                                    },
                                    Style::fill(color),
                                ));
                            }
                        }
                    }
                }
            }

            if opts.show_bean_lines {
                if let Some(bean) = ctx.scale.x.sub_band(&group.key, opts.bean_width) {
                    for &v in &record.values {
                        let line_y = ctx.scale.y.map(v);
                        group.primitives.push(Primitive::new(
                            "bean-line",
                            Shape::Line {
                                x1: bean.left,
                                y1: line_y,
                                x2: bean.right,
                                y2: line_y,
                            },
                            Style::stroke(color, 1.0),
                        ));
                    }
                }
            }
        }
    }

    fn groups(&self) -> &[GroupPrimitives] {
        &self.groups
    }

    fn primitives(&self) -> Vec<&Primitive> {
        self.trend_primitives
            .iter()
            .chain(self.groups.iter().flat_map(|g| g.primitives.iter()))
            .collect()
    }
}
