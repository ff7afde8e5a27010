//! Column-scope counts.

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use std::collections::HashSet;

use crate::metrics::errors::MetricResult;
use crate::metrics::name::MetricName;
use crate::metrics::traits::{partition_columns, Metric, MetricKind, MetricScope, StaticMetric};
use crate::metrics::types::{MetricType, MetricValue};
use crate::query::SqlExpr;

/// Number of non-null values, `COUNT(col)`.
///
/// This is the "total count" the accuracy ratio divides by.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValuesCount;

impl Metric for ValuesCount {
    fn name(&self) -> MetricName {
        MetricName::ValuesCount
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Integer
    }
}

impl StaticMetric for ValuesCount {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        let column = scope.require_column(self.name())?;
        Ok(SqlExpr::col(&column.name).count())
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        let column = scope.require_column(self.name())?;
        let count: usize = partition_columns(column, partitions)?
            .into_iter()
            .map(|a| a.len() - a.null_count())
            .sum();
        Ok(Some(MetricValue::Long(count as i64)))
    }
}

/// Number of null values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCount;

impl Metric for NullCount {
    fn name(&self) -> MetricName {
        MetricName::NullCount
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Integer
    }
}

impl StaticMetric for NullCount {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        let column = scope.require_column(self.name())?;
        let sum = SqlExpr::case_when(
            SqlExpr::col(&column.name).is_null(),
            SqlExpr::int(1),
            SqlExpr::int(0),
        )
        .sum();
        Ok(SqlExpr::function("COALESCE", vec![sum, SqlExpr::int(0)]))
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        let column = scope.require_column(self.name())?;
        let count: usize = partition_columns(column, partitions)?
            .into_iter()
            .map(|a| a.null_count())
            .sum();
        Ok(Some(MetricValue::Long(count as i64)))
    }
}

/// Number of distinct non-null values, `COUNT(DISTINCT col)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistinctCount;

impl Metric for DistinctCount {
    fn name(&self) -> MetricName {
        MetricName::DistinctCount
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Integer
    }
}

impl StaticMetric for DistinctCount {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        let column = scope.require_column(self.name())?;
        Ok(SqlExpr::col(&column.name).count_distinct())
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        let column = scope.require_column(self.name())?;
        let mut seen = HashSet::new();
        for array in partition_columns(column, partitions)? {
            let strings = cast(array.as_ref(), &DataType::Utf8)?;
            seen.extend(strings.as_string::<i32>().iter().flatten().map(str::to_owned));
        }
        Ok(Some(MetricValue::Long(seen.len() as i64)))
    }
}
