//! Group color assignment
//!
//! A chart maps every group key to a stable color. The host can supply the
//! mapping as an ordered list, an explicit key-to-color table, or a callback;
//! with no input the chart falls back to a categorical palette. Whatever the
//! shape, it is resolved once into a [`ColorResolver`] at build time, so
//! overlays never branch on the configuration shape at draw time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An RGBA color (components 0.0 to 1.0)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB (alpha = 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from a hex string (e.g., "#1F77B4" or "1F77B4")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;

        Some(Self::rgb(r, g, b))
    }

    /// Convert to a hex string
    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}",
            (self.r * 255.0) as u8,
            (self.g * 255.0) as u8,
            (self.b * 255.0) as u8
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// The ten-color categorical palette used when no colors are configured
pub fn categorical_palette() -> Vec<Color> {
    [
        "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F",
        "#BCBD22", "#17BECF",
    ]
    .iter()
    .filter_map(|h| Color::from_hex(h))
    .collect()
}

/// Callback signature for host-computed group colors
pub type ColorFn = Arc<dyn Fn(&str) -> Color + Send + Sync>;

/// How group colors are assigned, as supplied by the host.
///
/// Lists (and the default palette) are assigned to group keys in
/// first-encounter order, wrapping when there are more groups than colors.
/// Maps look keys up directly. Callbacks are invoked per key.
#[derive(Clone)]
pub enum ColorStrategy {
    /// Default categorical palette, assigned in group order
    Palette,
    /// Host-supplied ordered list, assigned in group order
    List(Vec<Color>),
    /// Explicit key-to-color table
    Map(HashMap<String, Color>),
    /// Host callback
    Callback(ColorFn),
}

impl Default for ColorStrategy {
    fn default() -> Self {
        ColorStrategy::Palette
    }
}

impl fmt::Debug for ColorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorStrategy::Palette => write!(f, "ColorStrategy::Palette"),
            ColorStrategy::List(colors) => write!(f, "ColorStrategy::List({} colors)", colors.len()),
            ColorStrategy::Map(map) => write!(f, "ColorStrategy::Map({} keys)", map.len()),
            ColorStrategy::Callback(_) => write!(f, "ColorStrategy::Callback"),
        }
    }
}

impl ColorStrategy {
    /// Resolve the strategy against the chart's group keys (first-encounter
    /// order). List-shaped strategies are frozen into a table here; the
    /// resolver answers every later color lookup.
    pub fn resolver(&self, keys: &[String]) -> ColorResolver {
        match self {
            ColorStrategy::Palette => ColorResolver::from_cycle(keys, &categorical_palette()),
            ColorStrategy::List(colors) => ColorResolver::from_cycle(keys, colors),
            ColorStrategy::Map(map) => ColorResolver {
                inner: ResolverInner::Table(map.clone()),
            },
            ColorStrategy::Callback(f) => ColorResolver {
                inner: ResolverInner::Callback(Arc::clone(f)),
            },
        }
    }
}

/// A frozen group-to-color mapping
#[derive(Clone)]
pub struct ColorResolver {
    inner: ResolverInner,
}

#[derive(Clone)]
enum ResolverInner {
    Table(HashMap<String, Color>),
    Callback(ColorFn),
}

impl fmt::Debug for ColorResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            ResolverInner::Table(map) => write!(f, "ColorResolver::Table({} keys)", map.len()),
            ResolverInner::Callback(_) => write!(f, "ColorResolver::Callback"),
        }
    }
}

impl ColorResolver {
    fn from_cycle(keys: &[String], colors: &[Color]) -> Self {
        let mut table = HashMap::with_capacity(keys.len());
        if !colors.is_empty() {
            for (i, key) in keys.iter().enumerate() {
                table.insert(key.clone(), colors[i % colors.len()]);
            }
        }
        Self {
            inner: ResolverInner::Table(table),
        }
    }

    /// The color for a group key; unknown keys get the default gray
    pub fn resolve(&self, key: &str) -> Color {
        match &self.inner {
            ResolverInner::Table(map) => map.get(key).copied().unwrap_or_default(),
            ResolverInner::Callback(f) => f(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_color_hex_round_trip() {
        let c = Color::from_hex("#1F77B4").unwrap();
        assert_eq!(c.to_hex(), "#1F77B4");
        assert!(Color::from_hex("xyz").is_none());
    }

    #[test]
    fn test_palette_is_stable_per_key() {
        let keys = keys(&["a", "b", "c"]);
        let resolver = ColorStrategy::Palette.resolver(&keys);
        let first = resolver.resolve("a");
        assert_eq!(resolver.resolve("a"), first);
        assert_ne!(resolver.resolve("b"), first);
    }

    #[test]
    fn test_list_wraps_around() {
        let keys = keys(&["a", "b", "c"]);
        let colors = vec![Color::rgb(1.0, 0.0, 0.0), Color::rgb(0.0, 1.0, 0.0)];
        let resolver = ColorStrategy::List(colors.clone()).resolver(&keys);
        assert_eq!(resolver.resolve("a"), colors[0]);
        assert_eq!(resolver.resolve("b"), colors[1]);
        assert_eq!(resolver.resolve("c"), colors[0]);
    }

    #[test]
    fn test_map_lookup_and_fallback() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), Color::rgb(1.0, 0.0, 0.0));
        let resolver = ColorStrategy::Map(map).resolver(&keys(&["a", "b"]));
        assert_eq!(resolver.resolve("a"), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(resolver.resolve("b"), Color::default());
    }

    #[test]
    fn test_callback_strategy() {
        let strategy = ColorStrategy::Callback(Arc::new(|key: &str| {
            if key == "hot" {
                Color::rgb(1.0, 0.0, 0.0)
            } else {
                Color::rgb(0.0, 0.0, 1.0)
            }
        }));
        let resolver = strategy.resolver(&keys(&["hot", "cold"]));
        assert_eq!(resolver.resolve("hot"), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(resolver.resolve("cold"), Color::rgb(0.0, 0.0, 1.0));
    }
}
