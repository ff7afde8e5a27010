//! Storage for resolved metric values.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::name::MetricName;
use super::types::MetricValue;

/// Resolved metric values for one scope (a table or a column).
///
/// A metric that ran but produced SQL `NULL` is stored as `None`, which keeps
/// it distinguishable from a metric that never ran.
///
/// # Example
///
/// ```rust
/// use profiler_metrics::metrics::{MetricName, MetricResults, MetricValue};
///
/// let mut results = MetricResults::new();
/// results.store(MetricName::ValuesCount, Some(MetricValue::Long(100)));
/// results.store(MetricName::Median, None);
///
/// assert_eq!(results.get_i64(MetricName::ValuesCount), Some(100));
/// assert!(results.contains(MetricName::Median));
/// assert!(results.get(MetricName::Median).is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricResults {
    values: BTreeMap<MetricName, Option<MetricValue>>,
    metadata: RunMetadata,
    errors: Vec<MetricFailure>,
}

impl MetricResults {
    /// Creates an empty result map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result map from resolved values.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = (MetricName, Option<MetricValue>)>,
    {
        Self {
            values: values.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Stores the outcome of a metric.
    pub fn store(&mut self, name: MetricName, value: Option<MetricValue>) {
        self.values.insert(name, value);
    }

    /// Whether the metric ran, whatever its value.
    pub fn contains(&self, name: MetricName) -> bool {
        self.values.contains_key(&name)
    }

    /// Non-null value of a metric.
    pub fn get(&self, name: MetricName) -> Option<&MetricValue> {
        self.values.get(&name).and_then(Option::as_ref)
    }

    /// Integral value of a metric.
    pub fn get_i64(&self, name: MetricName) -> Option<i64> {
        self.get(name).and_then(MetricValue::as_i64)
    }

    /// Numeric value of a metric.
    pub fn get_f64(&self, name: MetricName) -> Option<f64> {
        self.get(name).and_then(MetricValue::as_f64)
    }

    /// Every stored outcome, ordered by metric.
    pub fn values(&self) -> &BTreeMap<MetricName, Option<MetricValue>> {
        &self.values
    }

    /// Records a failed metric.
    pub fn record_error(&mut self, name: MetricName, error: impl ToString) {
        self.errors.push(MetricFailure {
            metric: name,
            error: error.to_string(),
        });
    }

    /// Recorded failures.
    pub fn errors(&self) -> &[MetricFailure] {
        &self.errors
    }

    /// Whether any metric failed.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Run metadata.
    pub fn metadata(&self) -> &RunMetadata {
        &self.metadata
    }

    /// Mutable run metadata.
    pub fn metadata_mut(&mut self) -> &mut RunMetadata {
        &mut self.metadata
    }
}

/// Timing of a metric run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Column the run was scoped to, if any.
    pub column: Option<String>,
    /// When the run started.
    pub start_time: Option<DateTime<Utc>>,
    /// When the run finished.
    pub end_time: Option<DateTime<Utc>>,
}

impl RunMetadata {
    /// Records the start time.
    pub fn record_start(&mut self) {
        self.start_time = Some(Utc::now());
    }

    /// Records the end time.
    pub fn record_end(&mut self) {
        self.end_time = Some(Utc::now());
    }

    /// Elapsed time, when both ends are recorded.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// A metric that failed to compute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricFailure {
    /// Failed metric.
    pub metric: MetricName,
    /// Error message.
    pub error: String,
}
