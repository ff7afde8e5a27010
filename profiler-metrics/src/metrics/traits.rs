//! Core metric traits.

use arrow::array::{ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use super::context::MetricResults;
use super::errors::{MetricError, MetricResult};
use super::name::MetricName;
use super::types::{MetricType, MetricValue};
use crate::entity::{ColumnDescriptor, TableEntity};
use crate::query::{Projection, SqlExpr};
use crate::runner::Row;

/// How a metric obtains its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    /// Aggregate over the raw data, one value per scope.
    Static,
    /// Computed purely from other metrics' resolved values.
    Composed,
    /// Ordered aggregate (median, percentiles).
    Window,
    /// Read from the engine's own system tables.
    System,
    /// Needs both raw data and other metrics' values.
    Hybrid,
}

/// What a metric is evaluated over: a table, optionally narrowed to a column.
#[derive(Debug, Clone, Copy)]
pub struct MetricScope<'a> {
    /// The profiled table.
    pub table: &'a TableEntity,
    /// The profiled column, for column metrics.
    pub column: Option<&'a ColumnDescriptor>,
}

impl<'a> MetricScope<'a> {
    /// Table-level scope.
    pub fn table(table: &'a TableEntity) -> Self {
        Self {
            table,
            column: None,
        }
    }

    /// Column-level scope.
    pub fn column(table: &'a TableEntity, column: &'a ColumnDescriptor) -> Self {
        Self {
            table,
            column: Some(column),
        }
    }

    /// The bound column, failing for table scopes.
    pub fn require_column(&self, metric: MetricName) -> MetricResult<&'a ColumnDescriptor> {
        self.column
            .ok_or_else(|| MetricError::MissingColumn(metric.to_string()))
    }
}

/// Capabilities shared by every metric.
pub trait Metric: Send + Sync + Debug {
    /// Stable name.
    fn name(&self) -> MetricName;

    /// Metric variant.
    fn kind(&self) -> MetricKind;

    /// Semantic return type.
    fn metric_type(&self) -> MetricType;
}

/// A metric evaluated against data.
///
/// Every implementation has two equivalent execution paths: a pushdown
/// expression evaluated by the database, and an evaluation over in-memory
/// Arrow partitions. Both must agree on the same data.
pub trait StaticMetric: Metric {
    /// Aggregate expression evaluated by the database.
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr>;

    /// Evaluates the metric over in-memory partitions.
    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>>;

    /// Labelled projection for [`StaticMetric::expression`].
    fn projection(&self, scope: &MetricScope<'_>) -> MetricResult<Projection> {
        Ok(self.expression(scope)?.label(self.name().as_str()))
    }

    /// Reads this metric's value from a pushdown result row.
    fn value_from_row(&self, row: &Row) -> Option<MetricValue> {
        let label = self.name().as_str();
        match self.metric_type() {
            MetricType::Integer => row.get_i64(label).map(MetricValue::Long),
            MetricType::Float => row.get_f64(label).map(MetricValue::Double),
            MetricType::String => row.get_string(label).map(MetricValue::String),
            MetricType::Timestamp => row.get_timestamp(label).map(MetricValue::Timestamp),
        }
    }
}

/// A metric computed from other metrics' results, never touching data.
pub trait ComposedMetric: Metric {
    /// Metrics that must be resolved before this one.
    fn required_metrics(&self) -> &'static [MetricName];

    /// Computes the value, `None` when it is undefined for the inputs.
    fn compute(&self, results: &MetricResults) -> Option<MetricValue>;
}

/// Fetches the bound column from every partition.
pub(crate) fn partition_columns<'b>(
    column: &ColumnDescriptor,
    partitions: &'b [RecordBatch],
) -> MetricResult<Vec<&'b ArrayRef>> {
    partitions
        .iter()
        .map(|batch| {
            batch
                .column_by_name(&column.name)
                .ok_or_else(|| MetricError::ColumnNotFound {
                    column: column.name.clone(),
                })
        })
        .collect()
}

/// Counts non-null values of `column` whose string form satisfies `predicate`.
pub(crate) fn count_matching<F>(
    column: &ColumnDescriptor,
    partitions: &[RecordBatch],
    predicate: F,
) -> MetricResult<i64>
where
    F: Fn(&str) -> bool,
{
    let mut total = 0i64;
    for array in partition_columns(column, partitions)? {
        let strings = cast(array.as_ref(), &DataType::Utf8)?;
        let matched = strings
            .as_string::<i32>()
            .iter()
            .flatten()
            .filter(|value| predicate(*value))
            .count();
        total += matched as i64;
    }
    Ok(total)
}
