//! Plot overlays
//!
//! Four overlay kinds share one lifecycle contract:
//!
//! - `configure` merges options over kind defaults
//! - `build` derives per-group render state from metrics/KDE output
//! - `change` releases old primitives, then rebuilds
//! - `show`/`hide` are `change` wrappers forcing visibility
//! - `update` repositions primitives from the current scale state only
//!
//! Overlays read the shared group records and scale state but own their
//! primitives exclusively; nothing here mutates another overlay's state.

pub mod box_plot;
pub mod data_plot;
pub mod notch;
pub mod violin;

pub use box_plot::{BoxPlotOptions, BoxPlotOverlay};
pub use data_plot::{DataPlotOptions, DataPlotOverlay, PlotType};
pub use notch::{NotchBoxOptions, NotchBoxOverlay, NotchStyle};
pub use violin::{ViolinOptions, ViolinOverlay};

use serde::{Deserialize, Serialize};

use crate::color::ColorResolver;
use crate::dataset::GroupedData;
use crate::primitive::Primitive;
use crate::scale::ScaleState;

/// The four overlay kinds a chart can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OverlayKind {
    BoxPlot,
    ViolinPlot,
    NotchedBox,
    DataPlot,
}

impl OverlayKind {
    /// All kinds, in a fixed iteration order
    pub const ALL: [OverlayKind; 4] = [
        OverlayKind::BoxPlot,
        OverlayKind::ViolinPlot,
        OverlayKind::NotchedBox,
        OverlayKind::DataPlot,
    ];

    /// Display name for the kind
    pub fn name(&self) -> &'static str {
        match self {
            OverlayKind::BoxPlot => "box plot",
            OverlayKind::ViolinPlot => "violin plot",
            OverlayKind::NotchedBox => "notched box",
            OverlayKind::DataPlot => "data plot",
        }
    }
}

/// Read-only view of the shared chart state handed to overlays
#[derive(Clone, Copy)]
pub struct RenderCtx<'a> {
    pub groups: &'a GroupedData,
    pub scale: &'a ScaleState,
    pub colors: &'a ColorResolver,
}

/// The positioned primitives one overlay owns for one group
#[derive(Debug, Clone, Default)]
pub struct GroupPrimitives {
    pub key: String,
    pub primitives: Vec<Primitive>,
}

/// The lifecycle contract every overlay kind implements.
///
/// `build` derives semantic state (outlier splits, density curves, trend
/// values); `update` turns that state into positioned primitives through the
/// current scales and must never recompute statistics, classification, or
/// density.
pub trait Overlay {
    /// Kind-specific options record
    type Options: Clone + Default;

    /// Which overlay kind this is
    const KIND: OverlayKind;

    /// Current options
    fn options(&self) -> &Self::Options;

    /// Replace the options wholesale (no rebuild)
    fn set_options(&mut self, options: Self::Options);

    /// Whether the overlay is currently shown
    fn visible(&self) -> bool;

    /// Force the visibility flag in the options
    fn set_visible(&mut self, on: bool);

    /// Drop all primitive groups (release-before-rebuild)
    fn release(&mut self);

    /// Derive per-group render state and create primitive groups
    fn build(&mut self, ctx: &RenderCtx);

    /// Reposition existing primitives from the current scale state
    fn update(&mut self, ctx: &RenderCtx);

    /// The primitive groups, one per category
    fn groups(&self) -> &[GroupPrimitives];

    /// Merge new options, release, rebuild, reposition
    fn change(&mut self, options: Self::Options, ctx: &RenderCtx) {
        self.set_options(options);
        self.release();
        self.build(ctx);
        self.update(ctx);
    }

    /// Convenience wrapper over `change` forcing `show = true`
    fn show(&mut self, options: Option<Self::Options>, ctx: &RenderCtx) {
        if let Some(options) = options {
            self.set_options(options);
        }
        self.set_visible(true);
        let options = self.options().clone();
        self.change(options, ctx);
    }

    /// Convenience wrapper over `change` forcing `show = false`
    fn hide(&mut self, options: Option<Self::Options>, ctx: &RenderCtx) {
        if let Some(options) = options {
            self.set_options(options);
        }
        self.set_visible(false);
        let options = self.options().clone();
        self.change(options, ctx);
    }

    /// Restore kind defaults, then rebuild
    fn reset(&mut self, ctx: &RenderCtx) {
        self.change(Self::Options::default(), ctx);
    }

    /// All primitives across groups, in group order
    fn primitives(&self) -> Vec<&Primitive> {
        self.groups()
            .iter()
            .flat_map(|g| g.primitives.iter())
            .collect()
    }
}

/// Deterministic jitter source for scattered point layouts.
///
/// Splitmix-style generator seeded per overlay, so repeated `update` calls
/// with identical geometry place points identically.
#[derive(Debug, Clone)]
pub(crate) struct Jitter {
    state: u64,
}

impl Jitter {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9E3779B97F4A7C15),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() as f64) / (u64::MAX as f64)
    }

    /// A horizontal offset in `[-width/2, width/2]`; zero for zero width
    pub fn offset(&mut self, width: f64) -> f64 {
        if width <= 0.0 {
            return 0.0;
        }
        self.next_f64() * width - width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_bounded() {
        let mut jitter = Jitter::new(7);
        for _ in 0..1000 {
            let off = jitter.offset(30.0);
            assert!(off >= -15.0 && off <= 15.0);
        }
    }

    #[test]
    fn test_jitter_deterministic() {
        let mut a = Jitter::new(42);
        let mut b = Jitter::new(42);
        for _ in 0..100 {
            assert_eq!(a.offset(10.0), b.offset(10.0));
        }
    }

    #[test]
    fn test_jitter_zero_width() {
        let mut jitter = Jitter::new(1);
        assert_eq!(jitter.offset(0.0), 0.0);
    }

    #[test]
    fn test_overlay_kind_names() {
        assert_eq!(OverlayKind::ALL.len(), 4);
        assert_eq!(OverlayKind::BoxPlot.name(), "box plot");
    }
}
