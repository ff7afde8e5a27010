//! Largest classification count across all known patterns.

use arrow::record_batch::RecordBatch;
use once_cell::sync::Lazy;
use regex::Regex;

use super::classification::{concatenable_column, match_count_expr};
use super::AccuracyCategory;
use crate::metrics::errors::MetricResult;
use crate::metrics::name::MetricName;
use crate::metrics::traits::{count_matching, Metric, MetricKind, MetricScope, StaticMetric};
use crate::metrics::types::{MetricType, MetricValue};
use crate::query::SqlExpr;

/// Amounts with an optional currency symbol or code.
pub const CURRENCY_EXPRESSION: &str =
    "^(¥|CNY|US[$]|USD|HK[$]|HKD|€|EUR|£|GBP|JP¥|JPY)?([0-9]+|[0-9]{1,3}(,[0-9]{3})*)([.][0-9]{1,2})?$";

static CURRENCY: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(CURRENCY_EXPRESSION).expect("Hard-coded regex pattern should be valid")
});

/// The highest match count over every category plus currency amounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyCount;

impl AccuracyCount {
    /// Creates the metric.
    pub fn new() -> Self {
        Self
    }

    fn patterns() -> impl Iterator<Item = (&'static str, &'static Regex)> {
        AccuracyCategory::PRIORITY
            .into_iter()
            .map(|c| (c.expression(), c.regex()))
            .chain(std::iter::once((CURRENCY_EXPRESSION, &*CURRENCY)))
    }
}

impl Metric for AccuracyCount {
    fn name(&self) -> MetricName {
        MetricName::AccuracyCount
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Static
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Integer
    }
}

impl StaticMetric for AccuracyCount {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        let column = concatenable_column(self.name(), scope)?;
        let counts = Self::patterns()
            .map(|(pattern, _)| match_count_expr(SqlExpr::col(&column.name), pattern))
            .collect();
        Ok(SqlExpr::function("GREATEST", counts))
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        let column = concatenable_column(self.name(), scope)?;
        let mut best = 0i64;
        for (_, regex) in Self::patterns() {
            best = best.max(count_matching(column, partitions, |v| regex.is_match(v))?);
        }
        Ok(Some(MetricValue::Long(best)))
    }
}
