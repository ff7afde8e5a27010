//! Configuration for the table metric computer.
//!
//! Loading configuration from files or services is the caller's concern; the
//! structures here are plain values, and [`ConnectionConfig`] deserializes
//! from the camelCase form connection services emit.

use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};
use crate::logging::LogConfig;
use crate::metrics::ACCURACY_RATIO_THRESHOLD;
use crate::security::InputValidator;

/// Default BigQuery location for region-qualified catalog views.
pub const DEFAULT_USAGE_LOCATION: &str = "us";

fn default_usage_location() -> String {
    DEFAULT_USAGE_LOCATION.to_string()
}

/// Dialect-specific addressing of the profiled connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Database or catalog name (Snowflake).
    #[serde(default)]
    pub database: Option<String>,
    /// Project holding the dataset (BigQuery).
    #[serde(default)]
    pub project_id: Option<String>,
    /// Location used for `region-<location>` views (BigQuery).
    #[serde(default = "default_usage_location")]
    pub usage_location: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            database: None,
            project_id: None,
            usage_location: default_usage_location(),
        }
    }
}

impl ConnectionConfig {
    /// Sets the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the BigQuery project.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the BigQuery usage location.
    pub fn with_usage_location(mut self, location: impl Into<String>) -> Self {
        self.usage_location = location.into();
        self
    }
}

/// Behaviour of the table metric computer.
#[derive(Debug, Clone)]
pub struct ComputerConfig {
    /// Dominance threshold of the column accuracy ratio
    pub accuracy_threshold: f64,
    /// Columns classified at once when computing table accuracy
    pub table_accuracy_concurrency: usize,
    /// Logging behaviour
    pub logging: LogConfig,
}

impl Default for ComputerConfig {
    fn default() -> Self {
        Self {
            accuracy_threshold: ACCURACY_RATIO_THRESHOLD,
            table_accuracy_concurrency: 1,
            logging: LogConfig::default(),
        }
    }
}

impl ComputerConfig {
    /// Sets the accuracy threshold.
    pub fn with_accuracy_threshold(mut self, threshold: f64) -> Self {
        self.accuracy_threshold = threshold;
        self
    }

    /// Sets how many columns are classified concurrently.
    pub fn with_table_accuracy_concurrency(mut self, concurrency: usize) -> Self {
        self.table_accuracy_concurrency = concurrency;
        self
    }

    /// Sets the logging configuration.
    pub fn with_logging(mut self, logging: LogConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        InputValidator::validate_ratio(self.accuracy_threshold, "accuracy_threshold")?;
        if self.table_accuracy_concurrency == 0 {
            return Err(ProfilerError::Configuration(
                "table_accuracy_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
