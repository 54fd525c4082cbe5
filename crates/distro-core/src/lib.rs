//! distro-core - Distribution chart engine
//!
//! Given tabular samples tagged by a categorical group, distro computes
//! robust per-group statistics, derives smoothed density and confidence
//! estimates, and maintains one shared coordinate mapping that multiple
//! overlay renderers draw into and keep synchronized under container resize.
//!
//! # Key Components
//!
//! - **DistroChart**: the orchestrator owning the grouped data and scales,
//!   with one render entry point per overlay kind
//! - **ScaleState**: ordinal band axis plus niced, clamped value axis
//! - **Overlays**: box plot, violin plot, notched box, and raw-data plots
//!   sharing one configure/build/change/show/hide/update lifecycle
//! - **Primitives**: positioned rects/lines/circles/polygons/curves replayed
//!   onto a host [`primitive::DrawSurface`]
//!
//! The statistics themselves (quartiles, fences, outlier partitioning,
//! kernel density) live in the `distro-stats` crate.

pub mod chart;
pub mod color;
pub mod config;
pub mod dataset;
pub mod error;
pub mod overlay;
pub mod primitive;
pub mod scale;

pub use chart::{DistroChart, PointerHit};
pub use color::{categorical_palette, Color, ColorResolver, ColorStrategy};
pub use config::{AxisLabels, CanvasSize, ChartConfig, Margin, ScaleKind};
pub use dataset::{GroupRecord, GroupedData, IngestReport};
pub use error::{ChartError, ChartResult};
pub use overlay::{
    BoxPlotOptions, BoxPlotOverlay, DataPlotOptions, DataPlotOverlay, GroupPrimitives,
    NotchBoxOptions, NotchBoxOverlay, NotchStyle, Overlay, OverlayKind, PlotType, RenderCtx,
    ViolinOptions, ViolinOverlay,
};
pub use primitive::{
    DrawSurface, Interpolation, PointerEvent, PointerKind, Primitive, Shape, Style,
};
pub use scale::{BandScale, ScaleState, SubBand, Tick, ValueScale};
