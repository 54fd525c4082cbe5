//! Record ingestion and grouping
//!
//! Turns a host-supplied record list into sorted, summarized groups:
//! - group keys in first-encounter order
//! - values coerced to finite f64 (JSON numbers and numeric strings)
//! - malformed records dropped and counted, never kept as NaN

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use distro_stats::Metrics;

use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};

/// One group of samples with its computed metrics.
///
/// Created once at chart construction and never mutated afterward. Overlays
/// read this; their own render state lives in the overlay, keyed by `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Group key, as formatted from the record field
    pub key: String,
    /// Ascending-sorted sample values, duplicates retained
    pub values: Vec<f64>,
    /// Summary statistics over `values`
    pub metrics: Metrics,
}

/// All groups of a chart, in first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedData {
    groups: Vec<GroupRecord>,
    index: HashMap<String, usize>,
}

impl GroupedData {
    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in first-encounter order
    pub fn iter(&self) -> impl Iterator<Item = &GroupRecord> {
        self.groups.iter()
    }

    /// Group keys in first-encounter order
    pub fn keys(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.key.clone()).collect()
    }

    /// Look up a group by key
    pub fn get(&self, key: &str) -> Option<&GroupRecord> {
        self.index.get(key).map(|&i| &self.groups[i])
    }

    /// Extent of all sample values across every group
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        let mut extent: Option<(f64, f64)> = None;
        for group in &self.groups {
            let (lo, hi) = (group.metrics.min, group.metrics.max);
            extent = Some(match extent {
                Some((a, b)) => (a.min(lo), b.max(hi)),
                None => (lo, hi),
            });
        }
        extent
    }

    /// Union of every group's inner fences
    pub fn fence_extent(&self) -> Option<(f64, f64)> {
        let mut extent: Option<(f64, f64)> = None;
        for group in &self.groups {
            let (lo, hi) = (
                group.metrics.lower_inner_fence,
                group.metrics.upper_inner_fence,
            );
            extent = Some(match extent {
                Some((a, b)) => (a.min(lo), b.max(hi)),
                None => (lo, hi),
            });
        }
        extent
    }
}

/// What happened during ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Records accepted into a group
    pub accepted: usize,
    /// Records dropped (missing field, non-coercible value)
    pub dropped: usize,
    /// Keys of groups that collapsed to a single distinct value (iqr = 0)
    pub degenerate_groups: Vec<String>,
}

/// Group and summarize the input records.
///
/// Fails with a [`ChartError`] only for dataset-level problems (empty input,
/// nothing coercible); individual malformed records are dropped and counted.
pub fn group_records(
    records: &[Value],
    config: &ChartConfig,
) -> ChartResult<(GroupedData, IngestReport)> {
    if records.is_empty() {
        return Err(ChartError::EmptyDataset);
    }

    let mut keys: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<f64>> = HashMap::new();
    let mut report = IngestReport::default();

    for record in records {
        let key = record.get(&config.group_field).and_then(coerce_key);
        let value = record.get(&config.value_field).and_then(coerce_number);
        match (key, value) {
            (Some(key), Some(value)) => {
                report.accepted += 1;
                buckets
                    .entry(key.clone())
                    .or_insert_with(|| {
                        keys.push(key);
                        Vec::new()
                    })
                    .push(value);
            }
            _ => report.dropped += 1,
        }
    }

    if keys.is_empty() {
        return Err(ChartError::AllRecordsDropped {
            dropped: report.dropped,
        });
    }
    if report.dropped > 0 {
        tracing::warn!(dropped = report.dropped, "dropped non-coercible records");
    }

    let mut data = GroupedData::default();
    for key in keys {
        let mut values = buckets.remove(&key).unwrap_or_default();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let metrics = Metrics::from_sorted(&values)
            .map_err(|_| ChartError::EmptyGroup { key: key.clone() })?;
        if metrics.is_degenerate() {
            tracing::warn!(key = %key, "group has a single distinct value");
            report.degenerate_groups.push(key.clone());
        }
        data.index.insert(key.clone(), data.groups.len());
        data.groups.push(GroupRecord {
            key,
            values,
            metrics,
        });
    }

    Ok((data, report))
}

/// Group keys accept strings and numbers (formatted)
fn coerce_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Values accept JSON numbers and numeric strings; only finite results pass
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
