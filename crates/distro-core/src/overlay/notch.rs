//! Notched box overlay
//!
//! A box whose sides pinch in around the median between the McGill notch
//! bounds, approximating a confidence interval for the median. Two vertex
//! paths: a pointed notch and a right-angle box-cut notch.

use serde::{Deserialize, Serialize};

use crate::color::{ColorResolver, ColorStrategy};
use crate::overlay::{GroupPrimitives, Overlay, OverlayKind, RenderCtx};
use crate::primitive::{Primitive, Shape, Style};
use crate::scale::SubBand;

/// Which vertex path the notch polygon follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotchStyle {
    /// Sides taper to a point at the median
    Pointed,
    /// The whole notch is cut out in right angles
    BoxCut,
}

impl Default for NotchStyle {
    fn default() -> Self {
        NotchStyle::Pointed
    }
}

/// Notched box options, merged over these defaults by `configure`/`change`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotchBoxOptions {
    /// Toggle the whole overlay
    pub show: bool,
    /// Show the notched box polygon
    pub show_notch_box: bool,
    /// Draw guide lines at the notch (confidence) bounds
    pub show_lines: bool,
    /// Width of the widest part of the box, percent of the band
    pub box_width: f64,
    /// Width of the pinched part at the median, percent of the band
    pub median_width: f64,
    /// Width of the confidence guide lines, percent of the band
    pub line_width: f64,
    /// Vertex path variant
    pub notch_style: NotchStyle,
    /// Overlay-specific color override; chart colors when unset
    #[serde(skip)]
    pub colors: Option<ColorStrategy>,
    /// Unrecognized option keys, preserved but ignored
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for NotchBoxOptions {
    fn default() -> Self {
        Self {
            show: true,
            show_notch_box: true,
            show_lines: false,
            box_width: 35.0,
            median_width: 20.0,
            line_width: 50.0,
            notch_style: NotchStyle::default(),
            colors: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// The notched box overlay state
#[derive(Debug, Default)]
pub struct NotchBoxOverlay {
    options: NotchBoxOptions,
    colors: Option<ColorResolver>,
    groups: Vec<GroupPrimitives>,
}

impl NotchBoxOverlay {
    /// Create the overlay with the given options (no build yet)
    pub fn new(options: NotchBoxOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }
}

/// Vertex list for the notch polygon, mirrored on both sides.
///
/// `ys` carries the scaled values `(q1, lower_notch, median, upper_notch,
/// q3)` top-down in data terms; the path walks up the left side and back
/// down the right.
fn notch_vertices(style: NotchStyle, bx: &SubBand, mx: &SubBand, ys: (f64, f64, f64, f64, f64)) -> Vec<(f64, f64)> {
    let (q1, lower, median, upper, q3) = ys;
    match style {
        NotchStyle::BoxCut => vec![
            (bx.left, q1),
            (bx.left, lower),
            (mx.left, lower),
            (mx.left, median),
            (mx.left, upper),
            (bx.left, upper),
            (bx.left, q3),
            (bx.right, q3),
            (bx.right, upper),
            (mx.right, upper),
            (mx.right, median),
            (mx.right, lower),
            (bx.right, lower),
            (bx.right, q1),
        ],
        NotchStyle::Pointed => vec![
            (bx.left, q1),
            (bx.left, lower),
            (mx.left, median),
            (bx.left, upper),
            (bx.left, q3),
            (bx.right, q3),
            (bx.right, upper),
            (mx.right, median),
            (bx.right, lower),
            (bx.right, q1),
        ],
    }
}

impl Overlay for NotchBoxOverlay {
    type Options = NotchBoxOptions;
    const KIND: OverlayKind = OverlayKind::NotchedBox;

    fn options(&self) -> &NotchBoxOptions {
        &self.options
    }

    fn set_options(&mut self, options: NotchBoxOptions) {
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
        for group in self.groups.iter_mut() {
            group.primitives.clear();
            let Some(record) = ctx.groups.get(&group.key) else {
                continue;
            };
            let Some(bx) = ctx.scale.x.sub_band(&group.key, opts.box_width) else {
                continue;
            };
            let Some(mx) = ctx.scale.x.sub_band(&group.key, opts.median_width) else {
                continue;
            };
            let m = &record.metrics;
            let y = &ctx.scale.y;
            let color = match &self.colors {
                Some(own) => own.resolve(&group.key),
                None => ctx.colors.resolve(&group.key),
            };

            if opts.show_notch_box {
                let ys = (
                    y.map(m.quartile1),
                    y.map(m.lower_notch),
                    y.map(m.median),
                    y.map(m.upper_notch),
                    y.map(m.quartile3),
                );
                group.primitives.push(Primitive::new(
                    "notch",
                    Shape::Polygon {
                        points: notch_vertices(opts.notch_style, &bx, &mx, ys),
                    },
                    Style::fill_stroke(color, 1.0),
                ));
            }

            if opts.show_lines {
                if let Some(lx) = ctx.scale.x.sub_band(&group.key, opts.line_width) {
                    for (role, value) in [
                        ("confidence-upper", m.upper_notch),
                        ("confidence-lower", m.lower_notch),
                    ] {
                        let line_y = y.map(value);
                        group.primitives.push(Primitive::new(
                            role,
                            Shape::Line {
                                x1: lx.left,
                                y1: line_y,
                                x2: lx.right,
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
}
