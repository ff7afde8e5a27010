//! Table-scope metrics.

use arrow::record_batch::RecordBatch;

use crate::metrics::errors::MetricResult;
use crate::metrics::name::MetricName;
use crate::metrics::traits::{Metric, MetricKind, MetricScope, StaticMetric};
use crate::metrics::types::{MetricType, MetricValue};
use crate::query::SqlExpr;

/// Number of rows, `COUNT(*)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowCount;

impl Metric for RowCount {
    fn name(&self) -> MetricName {
        MetricName::RowCount
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Integer
    }
}

impl StaticMetric for RowCount {
    fn expression(&self, _scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        Ok(SqlExpr::CountStar)
    }

    fn df_fn(
        &self,
        _scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        let rows: usize = partitions.iter().map(RecordBatch::num_rows).sum();
        Ok(Some(MetricValue::Long(rows as i64)))
    }
}

/// Number of columns, taken from the entity and projected as a literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnCount;

impl Metric for ColumnCount {
    fn name(&self) -> MetricName {
        MetricName::ColumnCount
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Integer
    }
}

impl StaticMetric for ColumnCount {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        Ok(SqlExpr::int(scope.table.columns.len() as i64))
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        _partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        Ok(Some(MetricValue::Long(scope.table.columns.len() as i64)))
    }
}

/// Comma-joined column names, taken from the entity and projected as a literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnNames;

impl ColumnNames {
    fn joined(scope: &MetricScope<'_>) -> String {
        scope.table.column_names().join(",")
    }
}

impl Metric for ColumnNames {
    fn name(&self) -> MetricName {
        MetricName::ColumnNames
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::String
    }
}

impl StaticMetric for ColumnNames {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        Ok(SqlExpr::string(Self::joined(scope)))
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        _partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        Ok(Some(MetricValue::String(Self::joined(scope))))
    }
}
