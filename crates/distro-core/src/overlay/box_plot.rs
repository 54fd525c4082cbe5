//! Box plot overlay
//!
//! Box over `[quartile1, quartile3]`, whiskers to the inner fences, median
//! (and optional mean) as a cross-band line plus centered marker, and the
//! group's outliers/extremes as individual points.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use distro_stats::OutlierSplit;

use crate::color::{ColorResolver, ColorStrategy};
use crate::overlay::{GroupPrimitives, Jitter, Overlay, OverlayKind, RenderCtx};
use crate::primitive::{Primitive, Shape, Style};

/// Box plot options, merged over these defaults by `configure`/`change`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxPlotOptions {
    /// Toggle the whole overlay
    pub show: bool,
    /// Show the box body
    pub show_box: bool,
    /// Show the whiskers
    pub show_whiskers: bool,
    /// Show the median line and marker
    pub show_median: bool,
    /// Show the mean line and marker
    pub show_mean: bool,
    /// Radius of the median/mean marker circle
    pub median_marker_size: f64,
    /// Plot outlier and extreme points
    pub show_outliers: bool,
    /// Box width as a percent of the group band
    pub box_width: f64,
    /// Width of whisker/median lines as a percent of the band; box width
    /// when unset
    pub line_width: Option<f64>,
    /// Spread outlier points with bounded horizontal jitter
    pub scatter_outliers: bool,
    /// Radius of outlier/extreme points
    pub outlier_marker_size: f64,
    /// Overlay-specific color override; chart colors when unset
    #[serde(skip)]
    pub colors: Option<ColorStrategy>,
    /// Unrecognized option keys, preserved but ignored
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for BoxPlotOptions {
    fn default() -> Self {
        Self {
            show: true,
            show_box: true,
            show_whiskers: true,
            show_median: true,
            show_mean: false,
            median_marker_size: 3.5,
            show_outliers: true,
            box_width: 30.0,
            line_width: None,
            scatter_outliers: false,
            outlier_marker_size: 2.5,
            colors: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// The box plot overlay state
#[derive(Debug, Default)]
pub struct BoxPlotOverlay {
    options: BoxPlotOptions,
    colors: Option<ColorResolver>,
    splits: HashMap<String, OutlierSplit>,
    groups: Vec<GroupPrimitives>,
}

impl BoxPlotOverlay {
    /// Create the overlay with the given options (no build yet)
    pub fn new(options: BoxPlotOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The outlier partition computed for a group, if built
    pub fn split(&self, key: &str) -> Option<&OutlierSplit> {
        self.splits.get(key)
    }
}

impl Overlay for BoxPlotOverlay {
    type Options = BoxPlotOptions;
    const KIND: OverlayKind = OverlayKind::BoxPlot;

    fn options(&self) -> &BoxPlotOptions {
        &self.options
    }

    fn set_options(&mut self, options: BoxPlotOptions) {
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
    }

    fn build(&mut self, ctx: &RenderCtx) {
        self.colors = self
            .options
            .colors
            .as_ref()
            .map(|c| c.resolver(ctx.scale.x.keys()));

        self.splits = ctx
            .groups
            .iter()
            .map(|g| (g.key.clone(), OutlierSplit::from_values(&g.values, &g.metrics)))
            .collect();

        if !self.options.show {
            return;
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
        let mut jitter = Jitter::new(0xB0C5);

        for group in self.groups.iter_mut() {
            group.primitives.clear();
            let Some(record) = ctx.groups.get(&group.key) else {
                continue;
            };
            let Some(sub) = ctx.scale.x.sub_band(&group.key, opts.box_width) else {
                continue;
            };
            let lines = opts
                .line_width
                .and_then(|w| ctx.scale.x.sub_band(&group.key, w))
                .unwrap_or(sub);
            let m = &record.metrics;
            let y = &ctx.scale.y;
            let color = match &self.colors {
                Some(own) => own.resolve(&group.key),
                None => ctx.colors.resolve(&group.key),
            };

            if opts.show_box {
                let top = y.map(m.quartile3);
                group.primitives.push(Primitive::new(
                    "box",
                    Shape::Rect {
                        x: sub.left,
                        y: top,
                        width: sub.width(),
                        height: y.map(m.quartile1) - top,
                        corner_radius: 1.0,
                    },
                    Style::fill_stroke(color, 1.0),
                ));
            }

            if opts.show_whiskers {
                for (fence, edge) in [
                    (m.upper_inner_fence, m.quartile3),
                    (m.lower_inner_fence, m.quartile1),
                ] {
                    let fence_y = y.map(fence);
                    group.primitives.push(Primitive::new(
                        "whisker-fence",
                        Shape::Line {
                            x1: lines.left,
                            y1: fence_y,
                            x2: lines.right,
                            y2: fence_y,
                        },
                        Style::stroke(color, 1.0),
                    ));
                    group.primitives.push(Primitive::new(
                        "whisker-stem",
                        Shape::Line {
                            x1: lines.middle,
                            y1: y.map(edge),
                            x2: lines.middle,
                            y2: fence_y,
                        },
                        Style::stroke(color, 1.0),
                    ));
                }
            }

            if opts.show_median {
                let median_y = y.map(m.median);
                group.primitives.push(Primitive::new(
                    "median-line",
                    Shape::Line {
                        x1: lines.left,
                        y1: median_y,
                        x2: lines.right,
                        y2: median_y,
                    },
                    Style::stroke(color, 1.0),
                ));
                group.primitives.push(Primitive::new(
                    "median-marker",
                    Shape::Circle {
                        cx: lines.middle,
                        cy: median_y,
                        r: opts.median_marker_size,
                    },
                    Style::fill(color),
                ));
            }

            if opts.show_mean {
                let mean_y = y.map(m.mean);
                group.primitives.push(Primitive::new(
                    "mean-line",
                    Shape::Line {
                        x1: lines.left,
                        y1: mean_y,
                        x2: lines.right,
                        y2: mean_y,
                    },
                    Style::stroke(color, 1.0),
                ));
                group.primitives.push(Primitive::new(
                    "mean-marker",
                    Shape::Circle {
                        cx: lines.middle,
                        cy: mean_y,
                        r: opts.median_marker_size,
                    },
                    Style::fill(color),
                ));
            }

            if opts.show_outliers {
                if let Some(split) = self.splits.get(&group.key) {
                    let jitter_width = if opts.scatter_outliers { sub.width() } else { 0.0 };
                    for (role, values, style) in [
                        ("outlier", &split.outliers, Style::fill(color)),
                        ("extreme", &split.extremes, Style::stroke(color, 1.0)),
                    ] {
                        for &v in values {
                            group.primitives.push(Primitive::new(
                                role,
                                Shape::Circle {
                                    cx: sub.middle + jitter.offset(jitter_width),
                                    cy: y.map(v),
                                    r: opts.outlier_marker_size,
                                },
                                style,
                            ));
                        }
                    }
                }
            }
        }
    }

    fn groups(&self) -> &[GroupPrimitives] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::dataset::group_records;
    use crate::scale::ScaleState;
    use serde_json::json;

    fn fixture() -> (crate::dataset::GroupedData, ScaleState, ColorResolver) {
        let records = vec![
            json!({"group": "a", "value": 10.0}),
            json!({"group": "a", "value": 20.0}),
            json!({"group": "a", "value": 30.0}),
            json!({"group": "b", "value": 5.0}),
        ];
        let config = ChartConfig::new("group", "value");
        let (data, _) = group_records(&records, &config).unwrap();
        let scale = ScaleState::new(&data, &config).unwrap();
        let colors = config.colors.resolver(&data.keys());
        (data, scale, colors)
    }

    #[test]
    fn test_build_and_update_produces_groups() {
        let (data, scale, colors) = fixture();
        let ctx = RenderCtx {
            groups: &data,
            scale: &scale,
            colors: &colors,
        };
        let mut overlay = BoxPlotOverlay::new(BoxPlotOptions::default());
        overlay.build(&ctx);
        overlay.update(&ctx);

        assert_eq!(overlay.groups().len(), 2);
        let a = &overlay.groups()[0];
        assert_eq!(a.key, "a");
        let roles: Vec<&str> = a.primitives.iter().map(|p| p.role.as_str()).collect();
        assert!(roles.contains(&"box"));
        assert!(roles.contains(&"whisker-fence"));
        assert!(roles.contains(&"median-line"));
        // No outliers in this dataset.
        assert!(!roles.contains(&"outlier"));
    }

    #[test]
    fn test_degenerate_group_zero_height_box() {
        let (data, scale, colors) = fixture();
        let ctx = RenderCtx {
            groups: &data,
            scale: &scale,
            colors: &colors,
        };
        let mut overlay = BoxPlotOverlay::new(BoxPlotOptions::default());
        overlay.build(&ctx);
        overlay.update(&ctx);

        let b = &overlay.groups()[1];
        assert_eq!(b.key, "b");
        let bbox = b
            .primitives
            .iter()
            .find(|p| p.role == "box")
            .expect("box primitive");
        if let Shape::Rect { height, .. } = bbox.shape {
            assert_eq!(height, 0.0);
        } else {
            panic!("box is not a rect");
        }
        // Whiskers collapse onto the box edges: both fence lines at the same y.
        let fences: Vec<f64> = b
            .primitives
            .iter()
            .filter(|p| p.role == "whisker-fence")
            .map(|p| match p.shape {
                Shape::Line { y1, .. } => y1,
                _ => panic!("fence is not a line"),
            })
            .collect();
        assert_eq!(fences.len(), 2);
        assert_eq!(fences[0], fences[1]);
    }

    #[test]
    fn test_hidden_overlay_has_no_primitives() {
        let (data, scale, colors) = fixture();
        let ctx = RenderCtx {
            groups: &data,
            scale: &scale,
            colors: &colors,
        };
        let mut overlay = BoxPlotOverlay::new(BoxPlotOptions {
            show: false,
            ..BoxPlotOptions::default()
        });
        overlay.build(&ctx);
        overlay.update(&ctx);
        assert!(overlay.primitives().is_empty());
        // Show again through the lifecycle wrapper: primitives come back.
        overlay.show(None, &ctx);
        assert!(!overlay.primitives().is_empty());
    }

    #[test]
    fn test_outliers_rendered_as_points() {
        let records = vec![
            json!({"group": "a", "value": 1.0}),
            json!({"group": "a", "value": 2.0}),
            json!({"group": "a", "value": 3.0}),
            json!({"group": "a", "value": 4.0}),
            json!({"group": "a", "value": 5.0}),
            json!({"group": "a", "value": 6.0}),
            json!({"group": "a", "value": 7.0}),
            json!({"group": "a", "value": 15.0}),
            json!({"group": "a", "value": 50.0}),
        ];
        let config = ChartConfig::new("group", "value");
        let (data, _) = group_records(&records, &config).unwrap();
        let scale = ScaleState::new(&data, &config).unwrap();
        let colors = config.colors.resolver(&data.keys());
        let ctx = RenderCtx {
            groups: &data,
            scale: &scale,
            colors: &colors,
        };
        let mut overlay = BoxPlotOverlay::new(BoxPlotOptions::default());
        overlay.build(&ctx);
        overlay.update(&ctx);

        let group = &overlay.groups()[0];
        let outliers = group.primitives.iter().filter(|p| p.role == "outlier").count();
        let extremes = group.primitives.iter().filter(|p| p.role == "extreme").count();
        assert_eq!(outliers, 1);
        assert_eq!(extremes, 1);
    }

    #[test]
    fn test_update_is_stable_for_same_geometry() {
        let (data, scale, colors) = fixture();
        let ctx = RenderCtx {
            groups: &data,
            scale: &scale,
            colors: &colors,
        };
        let mut overlay = BoxPlotOverlay::new(BoxPlotOptions {
            scatter_outliers: true,
            ..BoxPlotOptions::default()
        });
        overlay.build(&ctx);
        overlay.update(&ctx);
        let first: Vec<Primitive> = overlay.primitives().into_iter().cloned().collect();
        overlay.update(&ctx);
        let second: Vec<Primitive> = overlay.primitives().into_iter().cloned().collect();
        assert_eq!(first, second);
    }
}
