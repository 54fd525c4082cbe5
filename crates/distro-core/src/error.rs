//! Error types for distro-core
//!
//! Configuration errors fail fast at chart construction; per-record and
//! per-group problems degrade gracefully and are reported, not raised.

use thiserror::Error;

/// Errors raised while constructing or reconfiguring a chart
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The input record list was empty
    #[error("dataset is empty")]
    EmptyDataset,

    /// Every record was dropped during numeric coercion
    #[error("all {dropped} records were dropped during coercion; nothing to chart")]
    AllRecordsDropped { dropped: usize },

    /// A required field name was not configured
    #[error("missing required field name: {field}")]
    MissingField { field: String },

    /// A group ended up with no usable samples
    #[error("group '{key}' has no samples")]
    EmptyGroup { key: String },

    /// Canvas dimensions do not leave a drawable plot area
    #[error("canvas {width}x{height} leaves no plot area inside the margins")]
    InvalidCanvas { width: f64, height: f64 },

    /// Logarithmic scale over a domain that touches or crosses zero
    #[error("log scale requires a strictly positive domain, got [{min}, {max}]")]
    LogScaleDomain { min: f64, max: f64 },

    /// Any other invalid configuration value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for chart operations
pub type ChartResult<T> = Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChartError::MissingField {
            field: "duration".to_string(),
        };
        assert!(err.to_string().contains("duration"));

        let err = ChartError::LogScaleDomain {
            min: -1.0,
            max: 10.0,
        };
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_all_dropped_display() {
        let err = ChartError::AllRecordsDropped { dropped: 7 };
        assert!(err.to_string().contains('7'));
    }
}
