//! Chart orchestrator
//!
//! [`DistroChart`] owns the grouped dataset, the scale state, and the four
//! overlay slots. It exposes one render entry point per overlay kind, fans
//! out resize notifications to every active overlay, and answers pointer
//! hit-tests with per-group summary text.
//!
//! Ownership rules: the chart is the sole writer of the group records and
//! the scale state; overlays read those through [`RenderCtx`] and write only
//! their own primitives.

use serde_json::Value;

use distro_stats::Metrics;

use crate::color::ColorResolver;
use crate::config::ChartConfig;
use crate::dataset::{group_records, GroupedData, IngestReport};
use crate::error::ChartResult;
use crate::overlay::{
    BoxPlotOptions, BoxPlotOverlay, DataPlotOptions, DataPlotOverlay, GroupPrimitives,
    NotchBoxOptions, NotchBoxOverlay, Overlay, OverlayKind, RenderCtx, ViolinOptions,
    ViolinOverlay,
};
use crate::primitive::{DrawSurface, PointerEvent, Primitive};
use crate::scale::{format_value, ScaleState, Tick};

/// What a pointer event landed on
#[derive(Debug, Clone, PartialEq)]
pub struct PointerHit {
    /// Group key under the pointer
    pub key: String,
    /// Summary text for a tooltip
    pub tooltip: String,
}

/// A distribution chart over one grouped dataset.
///
/// Render entry points return `&mut Self` so overlay setup chains:
///
/// ```
/// use distro_core::chart::DistroChart;
/// use distro_core::config::ChartConfig;
/// use distro_core::overlay::{BoxPlotOptions, ViolinOptions};
/// use serde_json::json;
///
/// let records = vec![
///     json!({"group": "mon", "value": 12.0}),
///     json!({"group": "mon", "value": 15.0}),
///     json!({"group": "tue", "value": 9.0}),
///     json!({"group": "tue", "value": 11.0}),
/// ];
/// let mut chart = DistroChart::new(&records, ChartConfig::new("group", "value")).unwrap();
/// chart
///     .render_violin_plot(ViolinOptions::default())
///     .render_box_plot(BoxPlotOptions::default());
/// assert!(!chart.primitives().is_empty());
/// ```
#[derive(Debug)]
pub struct DistroChart {
    config: ChartConfig,
    groups: GroupedData,
    scale: ScaleState,
    colors: ColorResolver,
    report: IngestReport,
    box_plots: Option<BoxPlotOverlay>,
    violin_plots: Option<ViolinOverlay>,
    notch_boxes: Option<NotchBoxOverlay>,
    data_plots: Option<DataPlotOverlay>,
}

impl DistroChart {
    /// Build a chart from records and configuration.
    ///
    /// Fails fast on dataset-level configuration problems; malformed records
    /// are dropped and counted in the [`IngestReport`].
    pub fn new(records: &[Value], config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        let (groups, report) = group_records(records, &config)?;
        let scale = ScaleState::new(&groups, &config)?;
        let colors = config.colors.resolver(&groups.keys());
        tracing::debug!(
            groups = groups.len(),
            accepted = report.accepted,
            dropped = report.dropped,
            "chart constructed"
        );
        Ok(Self {
            config,
            groups,
            scale,
            colors,
            report,
            box_plots: None,
            violin_plots: None,
            notch_boxes: None,
            data_plots: None,
        })
    }

    // MARK: - Render entry points

    /// Render (or re-render, replacing the previous instance) a box plot
    pub fn render_box_plot(&mut self, options: BoxPlotOptions) -> &mut Self {
        let mut overlay = BoxPlotOverlay::new(options);
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        overlay.build(&ctx);
        overlay.update(&ctx);
        self.box_plots = Some(overlay);
        tracing::debug!(kind = OverlayKind::BoxPlot.name(), "overlay rendered");
        self
    }

    /// Render (or re-render) a violin plot.
    ///
    /// In domain-extension clamp mode the chart's value domain grows to the
    /// union of all groups' extended bounds before the violins are sampled,
    /// and every other active overlay is repositioned on the new scale.
    pub fn render_violin_plot(&mut self, options: ViolinOptions) -> &mut Self {
        let overlay = ViolinOverlay::new(options);
        self.install_violin(overlay);
        tracing::debug!(kind = OverlayKind::ViolinPlot.name(), "overlay rendered");
        self
    }

    /// Render (or re-render) notched boxes
    pub fn render_notch_boxes(&mut self, options: NotchBoxOptions) -> &mut Self {
        let mut overlay = NotchBoxOverlay::new(options);
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        overlay.build(&ctx);
        overlay.update(&ctx);
        self.notch_boxes = Some(overlay);
        tracing::debug!(kind = OverlayKind::NotchedBox.name(), "overlay rendered");
        self
    }

    /// Render (or re-render) raw-data plots
    pub fn render_data_plots(&mut self, options: DataPlotOptions) -> &mut Self {
        let mut overlay = DataPlotOverlay::new(options);
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        overlay.build(&ctx);
        overlay.update(&ctx);
        self.data_plots = Some(overlay);
        tracing::debug!(kind = OverlayKind::DataPlot.name(), "overlay rendered");
        self
    }

    /// Install a violin overlay, managing the chart-domain extension
    fn install_violin(&mut self, mut overlay: ViolinOverlay) {
        let before = self.scale.y.domain();
        self.scale.clear_extension();
        let extension = {
            let ctx = RenderCtx {
                groups: &self.groups,
                scale: &self.scale,
                colors: &self.colors,
            };
            overlay.domain_extension(&ctx)
        };
        if let Some((lo, hi)) = extension {
            self.scale.extend_domain(lo, hi);
        }
        {
            let ctx = RenderCtx {
                groups: &self.groups,
                scale: &self.scale,
                colors: &self.colors,
            };
            overlay.release();
            overlay.build(&ctx);
            overlay.update(&ctx);
        }
        self.violin_plots = Some(overlay);
        if self.scale.y.domain() != before {
            self.update_overlays();
        }
    }

    // MARK: - Overlay lifecycle

    /// Change the box plot's options, rebuilding its primitives
    pub fn change_box_plot(&mut self, options: BoxPlotOptions) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.box_plots.as_mut() {
            overlay.change(options, &ctx);
        }
    }

    /// Show the box plot (no-op until rendered once)
    pub fn show_box_plot(&mut self) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.box_plots.as_mut() {
            overlay.show(None, &ctx);
        }
    }

    /// Hide the box plot, releasing its primitives
    pub fn hide_box_plot(&mut self) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.box_plots.as_mut() {
            overlay.hide(None, &ctx);
        }
    }

    /// Restore the box plot's default options
    pub fn reset_box_plot(&mut self) {
        self.change_box_plot(BoxPlotOptions::default());
    }

    /// Change the violin plot's options, re-deriving any domain extension
    pub fn change_violin_plot(&mut self, options: ViolinOptions) {
        if let Some(mut overlay) = self.violin_plots.take() {
            overlay.set_options(options);
            self.install_violin(overlay);
        }
    }

    /// Show the violin plot (no-op until rendered once)
    pub fn show_violin_plot(&mut self) {
        if let Some(overlay) = &self.violin_plots {
            let mut options = overlay.options().clone();
            options.show = true;
            self.change_violin_plot(options);
        }
    }

    /// Hide the violin plot; a domain extension it held is dropped and the
    /// other overlays reposition on the restored domain
    pub fn hide_violin_plot(&mut self) {
        if let Some(mut overlay) = self.violin_plots.take() {
            let before = self.scale.y.domain();
            overlay.set_visible(false);
            self.scale.clear_extension();
            let ctx = RenderCtx {
                groups: &self.groups,
                scale: &self.scale,
                colors: &self.colors,
            };
            overlay.release();
            overlay.build(&ctx);
            overlay.update(&ctx);
            self.violin_plots = Some(overlay);
            if self.scale.y.domain() != before {
                self.update_overlays();
            }
        }
    }

    /// Restore the violin plot's default options
    pub fn reset_violin_plot(&mut self) {
        self.change_violin_plot(ViolinOptions::default());
    }

    /// Change the notched boxes' options, rebuilding their primitives
    pub fn change_notch_boxes(&mut self, options: NotchBoxOptions) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.notch_boxes.as_mut() {
            overlay.change(options, &ctx);
        }
    }

    /// Show the notched boxes (no-op until rendered once)
    pub fn show_notch_boxes(&mut self) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.notch_boxes.as_mut() {
            overlay.show(None, &ctx);
        }
    }

    /// Hide the notched boxes, releasing their primitives
    pub fn hide_notch_boxes(&mut self) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.notch_boxes.as_mut() {
            overlay.hide(None, &ctx);
        }
    }

    /// Restore the notched boxes' default options
    pub fn reset_notch_boxes(&mut self) {
        self.change_notch_boxes(NotchBoxOptions::default());
    }

    /// Change the data plots' options, rebuilding their primitives
    pub fn change_data_plots(&mut self, options: DataPlotOptions) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.data_plots.as_mut() {
            overlay.change(options, &ctx);
        }
    }

    /// Show the data plots (no-op until rendered once)
    pub fn show_data_plots(&mut self) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.data_plots.as_mut() {
            overlay.show(None, &ctx);
        }
    }

    /// Hide the data plots, releasing their primitives
    pub fn hide_data_plots(&mut self) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.data_plots.as_mut() {
            overlay.hide(None, &ctx);
        }
    }

    /// Restore the data plots' default options
    pub fn reset_data_plots(&mut self) {
        self.change_data_plots(DataPlotOptions::default());
    }

    // MARK: - Resize fan-out

    /// Handle a container-resize notification.
    ///
    /// Atomic and re-entrant-safe: reads the new dimensions, recomputes the
    /// scale geometry, then repositions every instantiated overlay exactly
    /// once. Overlay instances live in one slot per kind, so hide/re-show
    /// cycles can never accumulate duplicate registrations.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.config.size.width = width;
        self.config.size.height = height;
        tracing::debug!(width, height, "chart resized");
        self.update();
    }

    /// Recompute geometry from the current canvas size and reposition every
    /// active overlay. Idempotent.
    pub fn update(&mut self) {
        self.scale
            .update(self.config.plot_width(), self.config.plot_height());
        self.update_overlays();
    }

    fn update_overlays(&mut self) {
        let ctx = RenderCtx {
            groups: &self.groups,
            scale: &self.scale,
            colors: &self.colors,
        };
        if let Some(overlay) = self.box_plots.as_mut() {
            overlay.update(&ctx);
        }
        if let Some(overlay) = self.violin_plots.as_mut() {
            overlay.update(&ctx);
        }
        if let Some(overlay) = self.notch_boxes.as_mut() {
            overlay.update(&ctx);
        }
        if let Some(overlay) = self.data_plots.as_mut() {
            overlay.update(&ctx);
        }
    }

    // MARK: - Produced interface

    /// The chart configuration
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// What happened during ingestion (dropped records, degenerate groups)
    pub fn ingest_report(&self) -> &IngestReport {
        &self.report
    }

    /// Group keys in band order
    pub fn group_keys(&self) -> Vec<String> {
        self.groups.keys()
    }

    /// A group's summary metrics
    pub fn metrics(&self, key: &str) -> Option<&Metrics> {
        self.groups.get(key).map(|g| &g.metrics)
    }

    /// A group's current on-screen band, `[left, right]` in plot pixels
    pub fn band(&self, key: &str) -> Option<(f64, f64)> {
        self.scale.x.band(key)
    }

    /// The shared scale state (read-only)
    pub fn scale(&self) -> &ScaleState {
        &self.scale
    }

    /// Value-axis tick marks at the configured density
    pub fn ticks(&self) -> Vec<Tick> {
        self.scale.y.ticks(self.config.tick_multiplier)
    }

    /// Overlay kinds that are instantiated and shown
    pub fn active_overlays(&self) -> Vec<OverlayKind> {
        let mut kinds = Vec::new();
        if self.box_plots.as_ref().is_some_and(|o| o.visible()) {
            kinds.push(OverlayKind::BoxPlot);
        }
        if self.violin_plots.as_ref().is_some_and(|o| o.visible()) {
            kinds.push(OverlayKind::ViolinPlot);
        }
        if self.notch_boxes.as_ref().is_some_and(|o| o.visible()) {
            kinds.push(OverlayKind::NotchedBox);
        }
        if self.data_plots.as_ref().is_some_and(|o| o.visible()) {
            kinds.push(OverlayKind::DataPlot);
        }
        kinds
    }

    /// The primitive groups of one overlay kind, if instantiated
    pub fn overlay_groups(&self, kind: OverlayKind) -> Option<&[GroupPrimitives]> {
        match kind {
            OverlayKind::BoxPlot => self.box_plots.as_ref().map(|o| o.groups()),
            OverlayKind::ViolinPlot => self.violin_plots.as_ref().map(|o| o.groups()),
            OverlayKind::NotchedBox => self.notch_boxes.as_ref().map(|o| o.groups()),
            OverlayKind::DataPlot => self.data_plots.as_ref().map(|o| o.groups()),
        }
    }

    /// Every visible overlay's primitives, violins first so the shapes
    /// layered on top stay readable
    pub fn primitives(&self) -> Vec<&Primitive> {
        let mut out = Vec::new();
        if let Some(o) = self.violin_plots.as_ref().filter(|o| o.visible()) {
            out.extend(o.primitives());
        }
        if let Some(o) = self.notch_boxes.as_ref().filter(|o| o.visible()) {
            out.extend(o.primitives());
        }
        if let Some(o) = self.box_plots.as_ref().filter(|o| o.visible()) {
            out.extend(o.primitives());
        }
        if let Some(o) = self.data_plots.as_ref().filter(|o| o.visible()) {
            out.extend(o.primitives());
        }
        out
    }

    /// Replay every visible primitive onto a host drawing surface
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.replay(&self.primitives());
    }

    /// The group whose band contains the pixel position, if any
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&str> {
        if y < 0.0 || y > self.scale.y.height() {
            return None;
        }
        self.scale.x.key_at(x)
    }

    /// Tooltip summary block for a group, formatted like the axis labels
    pub fn tooltip_text(&self, key: &str) -> Option<String> {
        let m = self.metrics(key)?;
        Some(format!(
            "Group: {key}\nMax: {}\nQ3: {}\nMedian: {}\nQ1: {}\nMin: {}",
            format_value(m.max),
            format_value(m.quartile3),
            format_value(m.median),
            format_value(m.quartile1),
            format_value(m.min),
        ))
    }

    /// Resolve a pointer event to the group it landed on
    pub fn handle_pointer(&self, event: PointerEvent) -> Option<PointerHit> {
        let key = self.hit_test(event.x, event.y)?.to_string();
        let tooltip = self.tooltip_text(&key)?;
        Some(PointerHit { key, tooltip })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, ColorStrategy};
    use crate::overlay::PlotType;
    use crate::primitive::{PointerKind, Shape, Style};
    use distro_stats::ClampMode;
    use serde_json::json;

    fn records() -> Vec<Value> {
        vec![
            json!({"group": "A", "value": 10.0}),
            json!({"group": "A", "value": 20.0}),
            json!({"group": "A", "value": 30.0}),
            json!({"group": "B", "value": 5.0}),
        ]
    }

    #[test]
    fn test_end_to_end_box_plot() {
        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        chart.render_box_plot(BoxPlotOptions::default());

        let a = chart.metrics("A").unwrap();
        assert_eq!(a.quartile1, 15.0);
        assert_eq!(a.median, 20.0);
        assert_eq!(a.quartile3, 25.0);
        assert_eq!(a.iqr, 10.0);
        assert_eq!(a.lower_inner_fence, 10.0);
        assert_eq!(a.upper_inner_fence, 30.0);

        let b = chart.metrics("B").unwrap();
        assert_eq!(b.min, 5.0);
        assert_eq!(b.median, 5.0);
        assert_eq!(b.max, 5.0);

        // No outliers anywhere; B renders a zero-height box with whiskers
        // collapsed onto it.
        assert!(chart
            .primitives()
            .iter()
            .all(|p| p.role != "outlier" && p.role != "extreme"));
        assert!(!chart.primitives().is_empty());
    }

    #[test]
    fn test_chained_render_entry_points() {
        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        chart
            .render_box_plot(BoxPlotOptions::default())
            .render_notch_boxes(NotchBoxOptions::default())
            .render_data_plots(DataPlotOptions {
                show_plot: true,
                plot_type: PlotType::scatter(),
                ..DataPlotOptions::default()
            });
        assert_eq!(
            chart.active_overlays(),
            vec![
                OverlayKind::BoxPlot,
                OverlayKind::NotchedBox,
                OverlayKind::DataPlot
            ]
        );
    }

    #[test]
    fn test_color_stable_across_overlays() {
        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        chart
            .render_box_plot(BoxPlotOptions::default())
            .render_data_plots(DataPlotOptions {
                show_bean_lines: true,
                ..DataPlotOptions::default()
            });

        let box_color = chart.overlay_groups(OverlayKind::BoxPlot).unwrap()[0]
            .primitives
            .iter()
            .find(|p| p.role == "box")
            .and_then(|p| p.style.fill)
            .unwrap();
        let bean_color = chart.overlay_groups(OverlayKind::DataPlot).unwrap()[0]
            .primitives
            .iter()
            .find(|p| p.role == "bean-line")
            .and_then(|p| p.style.stroke)
            .unwrap();
        assert_eq!(box_color, bean_color);
    }

    #[test]
    fn test_resize_idempotent_and_repositions() {
        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        chart.render_box_plot(BoxPlotOptions::default());

        chart.resize(1000.0, 500.0);
        let first: Vec<Primitive> = chart.primitives().into_iter().cloned().collect();
        let band_first = chart.band("A").unwrap();
        chart.resize(1000.0, 500.0);
        let second: Vec<Primitive> = chart.primitives().into_iter().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(chart.band("A").unwrap(), band_first);

        chart.resize(400.0, 300.0);
        let third: Vec<Primitive> = chart.primitives().into_iter().cloned().collect();
        assert_ne!(first, third);
    }

    #[test]
    fn test_hide_show_cycle_keeps_single_registration() {
        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        chart.render_box_plot(BoxPlotOptions::default());
        let baseline = chart.primitives().len();

        chart.hide_box_plot();
        assert!(chart.primitives().is_empty());
        assert!(chart.active_overlays().is_empty());

        chart.show_box_plot();
        chart.show_box_plot();
        assert_eq!(chart.primitives().len(), baseline);
        assert_eq!(chart.active_overlays(), vec![OverlayKind::BoxPlot]);

        // Re-rendering replaces the instance instead of stacking another.
        chart.render_box_plot(BoxPlotOptions::default());
        assert_eq!(chart.primitives().len(), baseline);
    }

    #[test]
    fn test_violin_domain_extension_and_restore() {
        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        let base_domain = chart.scale().y.domain();

        chart.render_violin_plot(ViolinOptions {
            bandwidth: 40.0,
            clamp: ClampMode::ExtendDomain,
            ..ViolinOptions::default()
        });
        let (lo, hi) = chart.scale().y.domain();
        assert!(lo < base_domain.0);
        assert!(hi > base_domain.1);

        chart.hide_violin_plot();
        assert_eq!(chart.scale().y.domain(), base_domain);
    }

    #[test]
    fn test_tooltip_and_hit_test() {
        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        chart.render_box_plot(BoxPlotOptions::default());

        let tooltip = chart.tooltip_text("A").unwrap();
        assert!(tooltip.contains("Group: A"));
        assert!(tooltip.contains("Median: 20"));
        assert!(tooltip.contains("Max: 30"));

        let (left, right) = chart.band("A").unwrap();
        let mid_x = (left + right) / 2.0;
        assert_eq!(chart.hit_test(mid_x, 10.0), Some("A"));
        assert_eq!(chart.hit_test(mid_x, -5.0), None);

        let hit = chart
            .handle_pointer(PointerEvent {
                kind: PointerKind::Hover,
                x: mid_x,
                y: 10.0,
            })
            .unwrap();
        assert_eq!(hit.key, "A");
        assert!(hit.tooltip.contains("Min: 10"));
    }

    #[test]
    fn test_draw_replays_primitives() {
        struct Counter(usize);
        impl DrawSurface for Counter {
            fn draw_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: f64, _: &Style) {
                self.0 += 1;
            }
            fn draw_line(&mut self, _: f64, _: f64, _: f64, _: f64, _: &Style) {
                self.0 += 1;
            }
            fn draw_circle(&mut self, _: f64, _: f64, _: f64, _: &Style) {
                self.0 += 1;
            }
            fn draw_polygon(&mut self, _: &[(f64, f64)], _: &Style) {
                self.0 += 1;
            }
            fn draw_curve(
                &mut self,
                _: &[(f64, f64)],
                _: crate::primitive::Interpolation,
                _: bool,
                _: &Style,
            ) {
                self.0 += 1;
            }
        }

        let mut chart = DistroChart::new(&records(), ChartConfig::new("group", "value")).unwrap();
        chart.render_box_plot(BoxPlotOptions::default());
        let mut surface = Counter(0);
        chart.draw(&mut surface);
        assert_eq!(surface.0, chart.primitives().len());
    }

    #[test]
    fn test_custom_colors_flow_through() {
        let config = ChartConfig::new("group", "value").with_colors(ColorStrategy::List(vec![
            Color::rgb(1.0, 0.0, 0.0),
            Color::rgb(0.0, 0.0, 1.0),
        ]));
        let mut chart = DistroChart::new(&records(), config).unwrap();
        chart.render_box_plot(BoxPlotOptions::default());
        let a_box = chart.overlay_groups(OverlayKind::BoxPlot).unwrap()[0]
            .primitives
            .iter()
            .find(|p| p.role == "box")
            .unwrap();
        assert_eq!(a_box.style.fill, Some(Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        assert!(DistroChart::new(&[], ChartConfig::new("group", "value")).is_err());
        let bad = vec![json!({"group": "A", "value": "junk"})];
        assert!(DistroChart::new(&bad, ChartConfig::new("group", "value")).is_err());
        assert!(DistroChart::new(&records(), ChartConfig::new("", "value")).is_err());
    }

    #[test]
    fn test_dropped_records_reported() {
        let mut rows = records();
        rows.push(json!({"group": "A", "value": "oops"}));
        rows.push(json!({"value": 1.0}));
        let chart = DistroChart::new(&rows, ChartConfig::new("group", "value")).unwrap();
        assert_eq!(chart.ingest_report().dropped, 2);
        assert_eq!(chart.ingest_report().accepted, 4);
        assert_eq!(chart.ingest_report().degenerate_groups, vec!["B"]);
    }

    #[test]
    fn test_notch_arithmetic_through_chart() {
        let rows: Vec<Value> = (1..=16)
            .map(|i| json!({"group": "A", "value": i as f64}))
            .collect();
        let chart = DistroChart::new(&rows, ChartConfig::new("group", "value")).unwrap();
        let m = chart.metrics("A").unwrap();
        let expected = 1.57 * m.iqr / 4.0;
        assert!((m.upper_notch - m.median - expected).abs() < 1e-12);
    }
}
