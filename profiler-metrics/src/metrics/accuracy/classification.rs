//! Per-category classification counts.

use arrow::record_batch::RecordBatch;

use super::AccuracyCategory;
use crate::entity::ColumnDescriptor;
use crate::metrics::errors::{MetricError, MetricResult};
use crate::metrics::name::MetricName;
use crate::metrics::traits::{count_matching, Metric, MetricKind, MetricScope, StaticMetric};
use crate::metrics::types::{MetricType, MetricValue};
use crate::query::SqlExpr;

/// Counts the values of a column that match one [`AccuracyCategory`].
///
/// Pushed down as `COALESCE(SUM(CASE WHEN col ~ expr THEN 1 ELSE 0 END), 0)`;
/// in memory, every non-null value is cast to text and searched with the same
/// expression. Nulls never match on either path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccuracyClassificationCount {
    category: AccuracyCategory,
}

impl AccuracyClassificationCount {
    /// Creates the count for `category`.
    pub fn new(category: AccuracyCategory) -> Self {
        Self { category }
    }

    /// The counted category.
    pub fn category(&self) -> AccuracyCategory {
        self.category
    }
}

/// Rejects columns whose values cannot be matched as text.
pub(crate) fn concatenable_column<'a>(
    metric: MetricName,
    scope: &MetricScope<'a>,
) -> MetricResult<&'a ColumnDescriptor> {
    let column = scope.require_column(metric)?;
    if !column.data_type.is_concatenable() {
        return Err(MetricError::type_mismatch(metric.as_str(), column.data_type));
    }
    Ok(column)
}

/// `COALESCE(SUM(CASE WHEN operand ~ pattern THEN 1 ELSE 0 END), 0)`.
pub(crate) fn match_count_expr(operand: SqlExpr, pattern: &str) -> SqlExpr {
    let sum = SqlExpr::case_when(
        operand.regexp_match(pattern),
        SqlExpr::int(1),
        SqlExpr::int(0),
    )
    .sum();
    SqlExpr::function("COALESCE", vec![sum, SqlExpr::int(0)])
}

impl Metric for AccuracyClassificationCount {
    fn name(&self) -> MetricName {
        self.category.metric_name()
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Integer
    }
}

impl StaticMetric for AccuracyClassificationCount {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        let column = concatenable_column(self.name(), scope)?;
        Ok(match_count_expr(
            SqlExpr::col(&column.name),
            self.category.expression(),
        ))
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        let column = concatenable_column(self.name(), scope)?;
        let regex = self.category.regex();
        let count = count_matching(column, partitions, |value| regex.is_match(value))?;
        Ok(Some(MetricValue::Long(count)))
    }
}
