//! Chart configuration
//!
//! [`ChartConfig`] collects everything the orchestrator needs before it sees
//! data: field names, axis labels, canvas geometry, scale kind, and the color
//! strategy. Unknown keys supplied by the host are preserved in `extra` and
//! ignored by rendering, so configs from newer hosts keep working.

use serde::{Deserialize, Serialize};

use crate::color::ColorStrategy;
use crate::error::{ChartError, ChartResult};

/// Continuous value-axis scale kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Linear,
    Log,
}

impl Default for ScaleKind {
    fn default() -> Self {
        ScaleKind::Linear
    }
}

/// Canvas size in pixels (the chart itself, excluding the container)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Margins around the plot area, inside the canvas
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 15.0,
            right: 60.0,
            bottom: 40.0,
            left: 50.0,
        }
    }
}

/// Axis labels; `None` falls back to the configured field name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisLabels {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Full chart configuration.
///
/// Construct with [`ChartConfig::new`] and refine with the `with_*` builders;
/// unspecified settings keep their documented defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Record field holding the group key
    pub group_field: String,

    /// Record field holding the numeric value
    pub value_field: String,

    /// Axis labels (field names when unset)
    #[serde(default)]
    pub axis_labels: AxisLabels,

    /// Tick density multiplier: 1.0 = default, 2.0 = double, 0.5 = half
    #[serde(default = "default_tick_multiplier")]
    pub tick_multiplier: f64,

    /// Value-axis scale kind
    #[serde(default)]
    pub scale_kind: ScaleKind,

    /// Canvas size in pixels
    #[serde(default)]
    pub size: CanvasSize,

    /// Margins around the plot area
    #[serde(default)]
    pub margin: Margin,

    /// When true, the value domain spans the union of per-group inner fences
    /// instead of the full data extent, keeping extremes off the scale
    #[serde(default)]
    pub constrain_extremes: bool,

    /// Group color assignment (not serialized; callbacks have no stable form)
    #[serde(skip)]
    pub colors: ColorStrategy,

    /// Unrecognized configuration keys, preserved but ignored
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_tick_multiplier() -> f64 {
    1.0
}

impl ChartConfig {
    /// Create a configuration for the given group and value field names
    pub fn new(group_field: impl Into<String>, value_field: impl Into<String>) -> Self {
        Self {
            group_field: group_field.into(),
            value_field: value_field.into(),
            axis_labels: AxisLabels::default(),
            tick_multiplier: 1.0,
            scale_kind: ScaleKind::default(),
            size: CanvasSize::default(),
            margin: Margin::default(),
            constrain_extremes: false,
            colors: ColorStrategy::default(),
            extra: serde_json::Map::new(),
        }
    }

    /// Set both axis labels
    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.axis_labels.x = Some(x.into());
        self.axis_labels.y = Some(y.into());
        self
    }

    /// Set the tick density multiplier
    pub fn with_tick_multiplier(mut self, multiplier: f64) -> Self {
        self.tick_multiplier = multiplier;
        self
    }

    /// Use a logarithmic value axis
    pub fn with_log_scale(mut self) -> Self {
        self.scale_kind = ScaleKind::Log;
        self
    }

    /// Set the canvas size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = CanvasSize { width, height };
        self
    }

    /// Set the margins
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Constrain the value domain to the union of per-group inner fences
    pub fn with_constrained_extremes(mut self) -> Self {
        self.constrain_extremes = true;
        self
    }

    /// Set the group color strategy
    pub fn with_colors(mut self, colors: ColorStrategy) -> Self {
        self.colors = colors;
        self
    }

    /// The effective x-axis label
    pub fn x_label(&self) -> &str {
        self.axis_labels.x.as_deref().unwrap_or(&self.group_field)
    }

    /// The effective y-axis label
    pub fn y_label(&self) -> &str {
        self.axis_labels.y.as_deref().unwrap_or(&self.value_field)
    }

    /// Width of the plot area inside the margins
    pub fn plot_width(&self) -> f64 {
        self.size.width - self.margin.left - self.margin.right
    }

    /// Height of the plot area inside the margins
    pub fn plot_height(&self) -> f64 {
        self.size.height - self.margin.top - self.margin.bottom
    }

    /// Validate the configuration before any data is touched
    pub fn validate(&self) -> ChartResult<()> {
        if self.group_field.is_empty() {
            return Err(ChartError::MissingField {
                field: "group_field".to_string(),
            });
        }
        if self.value_field.is_empty() {
            return Err(ChartError::MissingField {
                field: "value_field".to_string(),
            });
        }
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(ChartError::InvalidCanvas {
                width: self.size.width,
                height: self.size.height,
            });
        }
        if !self.tick_multiplier.is_finite() || self.tick_multiplier <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "tick_multiplier must be positive, got {}",
                self.tick_multiplier
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::new("date", "duration");
        assert_eq!(config.size.width, 800.0);
        assert_eq!(config.size.height, 400.0);
        assert_eq!(config.margin.top, 15.0);
        assert_eq!(config.tick_multiplier, 1.0);
        assert_eq!(config.scale_kind, ScaleKind::Linear);
        assert!(!config.constrain_extremes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_labels_fall_back_to_field_names() {
        let config = ChartConfig::new("date", "duration");
        assert_eq!(config.x_label(), "date");
        assert_eq!(config.y_label(), "duration");

        let config = config.with_axis_labels("Day", "Time (ms)");
        assert_eq!(config.x_label(), "Day");
        assert_eq!(config.y_label(), "Time (ms)");
    }

    #[test]
    fn test_validation_failures() {
        assert!(matches!(
            ChartConfig::new("", "y").validate(),
            Err(ChartError::MissingField { .. })
        ));
        assert!(matches!(
            ChartConfig::new("x", "y").with_size(50.0, 30.0).validate(),
            Err(ChartError::InvalidCanvas { .. })
        ));
        assert!(matches!(
            ChartConfig::new("x", "y").with_tick_multiplier(0.0).validate(),
            Err(ChartError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let json = r#"{
            "group_field": "date",
            "value_field": "duration",
            "theme": "dark",
            "experimental_flag": true
        }"#;
        let config: ChartConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extra.get("theme").and_then(|v| v.as_str()), Some("dark"));
        assert_eq!(
            config.extra.get("experimental_flag").and_then(|v| v.as_bool()),
            Some(true)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plot_area() {
        let config = ChartConfig::new("x", "y");
        assert_eq!(config.plot_width(), 800.0 - 50.0 - 60.0);
        assert_eq!(config.plot_height(), 400.0 - 15.0 - 40.0);
    }
}
