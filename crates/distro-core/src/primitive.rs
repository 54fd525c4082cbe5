//! Positioned visual primitives and the drawing capability
//!
//! Overlays emit plain positioned primitives; the host supplies a
//! [`DrawSurface`] that knows how to put them on screen. The engine never
//! touches a real rendering backend.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Curve rendering hint for the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Straight segments between points
    Linear,
    /// Smooth (cardinal-style) interpolation through the points
    Cardinal,
}

impl Default for Interpolation {
    fn default() -> Self {
        Interpolation::Cardinal
    }
}

/// Fill and stroke attributes of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

impl Style {
    /// Filled, no stroke
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        }
    }

    /// Stroked, no fill
    pub fn stroke(color: Color, width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        }
    }

    /// Filled and stroked with the same color
    pub fn fill_stroke(color: Color, width: f32) -> Self {
        Self {
            fill: Some(color),
            stroke: Some(color),
            stroke_width: width,
        }
    }
}

/// Geometry of one primitive, in plot-area pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Polygon {
        points: Vec<(f64, f64)>,
    },
    Curve {
        points: Vec<(f64, f64)>,
        interpolation: Interpolation,
        closed: bool,
    },
}

/// One positioned visual element owned by an overlay.
///
/// `role` names what the element is (box, median-line, outlier, ...) so
/// hosts can attach styling or interactivity per element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub role: String,
    pub shape: Shape,
    pub style: Style,
}

impl Primitive {
    pub fn new(role: impl Into<String>, shape: Shape, style: Style) -> Self {
        Self {
            role: role.into(),
            shape,
            style,
        }
    }
}

/// Drawing capability the host renderer implements.
///
/// Each method receives final pixel geometry plus the style; `replay`
/// dispatches a primitive set in order.
pub trait DrawSurface {
    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64, corner_radius: f64, style: &Style);
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &Style);
    fn draw_circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style);
    fn draw_polygon(&mut self, points: &[(f64, f64)], style: &Style);
    fn draw_curve(&mut self, points: &[(f64, f64)], interpolation: Interpolation, closed: bool, style: &Style);

    /// Draw a batch of primitives in order
    fn replay(&mut self, primitives: &[&Primitive]) {
        for p in primitives {
            match &p.shape {
                Shape::Rect {
                    x,
                    y,
                    width,
                    height,
                    corner_radius,
                } => self.draw_rect(*x, *y, *width, *height, *corner_radius, &p.style),
                Shape::Line { x1, y1, x2, y2 } => self.draw_line(*x1, *y1, *x2, *y2, &p.style),
                Shape::Circle { cx, cy, r } => self.draw_circle(*cx, *cy, *r, &p.style),
                Shape::Polygon { points } => self.draw_polygon(points, &p.style),
                Shape::Curve {
                    points,
                    interpolation,
                    closed,
                } => self.draw_curve(points, *interpolation, *closed, &p.style),
            }
        }
    }
}

/// Pointer interaction kinds delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Hover,
    Click,
}

/// A pointer event in plot-area pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
}
