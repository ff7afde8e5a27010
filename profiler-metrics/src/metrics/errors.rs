//! Error types for metric computation.

use thiserror::Error;

/// Result type for metric operations.
pub type MetricResult<T> = Result<T, MetricError>;

/// Errors that can occur while building or evaluating a metric.
#[derive(Error, Debug)]
pub enum MetricError {
    /// A classification metric was bound to a column whose values cannot be
    /// treated as strings. This is a caller bug and is never recovered.
    #[error("Don't know how to process type {found} when computing {metric}")]
    TypeMismatch {
        /// Metric that rejected the column.
        metric: String,
        /// Offending column type.
        found: String,
    },

    /// A column-scoped metric was invoked without a column.
    #[error("Metric {0} requires a column")]
    MissingColumn(String),

    /// The bound column is absent from an in-memory partition.
    #[error("Column '{column}' not found in partition")]
    ColumnNotFound {
        /// Missing column name.
        column: String,
    },

    /// A composed metric was asked for where a data-touching one is required,
    /// or the other way round.
    #[error("Metric {metric} cannot be evaluated as {expected}")]
    WrongKind {
        /// Metric name.
        metric: String,
        /// Kind the caller expected.
        expected: String,
    },

    /// Arrow computation error.
    #[error("Arrow computation failed: {0}")]
    ArrowComputation(#[from] arrow::error::ArrowError),

    /// Invalid metric definition (bad pattern, bad parameters).
    #[error("Invalid metric definition: {0}")]
    InvalidDefinition(String),
}

impl MetricError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(metric: impl Into<String>, found: impl ToString) -> Self {
        Self::TypeMismatch {
            metric: metric.into(),
            found: found.to_string(),
        }
    }

    /// Creates an invalid definition error.
    pub fn invalid_definition(msg: impl Into<String>) -> Self {
        Self::InvalidDefinition(msg.into())
    }
}
