//! Error types for the profiler metrics library.
//!
//! All errors surfaced by the crate are represented by [`ProfilerError`].
//! Metric-level failures are carried by [`MetricError`](crate::metrics::MetricError)
//! and converted at the boundary.

use thiserror::Error;

use crate::dialect::Dialect;
use crate::metrics::MetricError;

/// The main error type for the profiler.
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// A metric failed to compute. Type mismatches travel through here.
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A query issued through the execution channel failed.
    #[error("Query failed on {dialect}: {message}")]
    QueryExecution {
        /// Dialect the query was rendered for
        dialect: Dialect,
        /// Detailed error message
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The entity lacks the schema or table attributes a catalog strategy needs.
    #[error("Schema/Table name not found in table metadata: {0}")]
    MissingTableMetadata(String),

    /// A metric name that is not in the registry.
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Security-related error.
    #[error("Security error: {0}")]
    SecurityError(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, ProfilerError>`.
pub type Result<T> = std::result::Result<T, ProfilerError>;

impl ProfilerError {
    /// Creates a query execution error.
    pub fn query(dialect: Dialect, message: impl Into<String>) -> Self {
        Self::QueryExecution {
            dialect,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a query execution error with a source error.
    pub fn query_with_source(
        dialect: Dialect,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::QueryExecution {
            dialect,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns true when this error is a classification type mismatch.
    ///
    /// These are caller bugs and must never be absorbed by a fallback.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::Metric(MetricError::TypeMismatch { .. }))
    }
}

impl From<serde_json::Error> for ProfilerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<ProfilerError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            // Type mismatches keep their identity so callers can still match on them.
            err @ ProfilerError::Metric(MetricError::TypeMismatch { .. }) => err,
            ProfilerError::Internal(inner) => ProfilerError::Internal(format!("{}: {inner}", f())),
            other => ProfilerError::Internal(format!("{}: {other}", f())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_query_error_display() {
        let err = ProfilerError::query(Dialect::MySql, "table doesn't exist");
        assert_eq!(err.to_string(), "Query failed on mysql: table doesn't exist");
    }

    #[test]
    fn test_query_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timeout");
        let err = ProfilerError::query_with_source(Dialect::BigQuery, "read failed", Box::new(source));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_type_mismatch_detection() {
        let err: ProfilerError = MetricError::TypeMismatch {
            metric: "accuracyEmailCount".to_string(),
            found: "INT".to_string(),
        }
        .into();
        assert!(err.is_type_mismatch());
        assert!(!ProfilerError::Internal("x".into()).is_type_mismatch());
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(ProfilerError::Internal("Something went wrong".to_string()))
        }

        let err = failing_operation().context("During table profiling").unwrap_err();
        assert!(err.to_string().contains("During table profiling"));
    }

    #[test]
    fn test_error_context_keeps_type_mismatch() {
        let result: std::result::Result<(), MetricError> = Err(MetricError::TypeMismatch {
            metric: "accuracyUrlCount".to_string(),
            found: "FLOAT".to_string(),
        });
        let err = result.context("classifying column").unwrap_err();
        assert!(err.is_type_mismatch());
    }
}
