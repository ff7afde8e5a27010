//! Table accuracy: the average column accuracy ratio, as a percentage.
//!
//! Each column is classified with one pushdown query carrying its value count
//! and the ten category counts; the ratio is folded inline rather than through
//! the metric runner. Every column the catalog lists is classified, whatever
//! its type: values that are not text are cast to text first. Columns are
//! classified `table_accuracy_concurrency` at a time and reduced in column
//! order.

use futures::future::FutureExt;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, instrument};

use crate::entity::TableEntity;
use crate::error::Result;
use crate::metrics::accuracy::match_count_expr;
use crate::metrics::{accuracy_ratio, AccuracyCategory, MetricName};
use crate::query::SqlExpr;
use crate::runner::QueryRunner;

/// Formats a ratio as a percentage with two decimals, `0.8` as `"80.00%"`.
pub fn format_proportion(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Mean of the present ratios; 0 when none are present.
pub fn average_ratio<I>(ratios: I) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, n) = ratios
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), ratio| (sum + ratio, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Accuracy ratio of one column, computed against live data.
///
/// `None` for columns without values. Columns the entity does not describe as
/// text are matched on their text cast.
#[instrument(skip(runner, entity), fields(table = %entity.name))]
pub async fn column_accuracy_ratio(
    runner: &dyn QueryRunner,
    entity: &TableEntity,
    column: &str,
    threshold: f64,
) -> Result<Option<f64>> {
    let operand = match entity.column(column) {
        Some(descriptor) if descriptor.data_type.is_concatenable() => SqlExpr::col(column),
        _ => {
            debug!("Matching column on its text cast");
            SqlExpr::col(column).cast_text()
        }
    };

    let mut projections = vec![SqlExpr::col(column)
        .count()
        .label(MetricName::ValuesCount.as_str())];
    for category in AccuracyCategory::PRIORITY {
        projections.push(
            match_count_expr(operand.clone(), category.expression())
                .label(category.metric_name().as_str()),
        );
    }

    let Some(row) = runner.select_first_from_table(projections).await? else {
        return Ok(None);
    };
    let total = row.get_i64(MetricName::ValuesCount.as_str());
    let counts = AccuracyCategory::PRIORITY
        .into_iter()
        .map(|category| (category, Some(row.count(category.metric_name().as_str()))));

    Ok(accuracy_ratio(total, counts, threshold).map(|outcome| outcome.ratio))
}

/// Average accuracy of `columns`, formatted as a percentage.
pub async fn table_accuracy_proportion(
    runner: &dyn QueryRunner,
    entity: &TableEntity,
    columns: &[String],
    threshold: f64,
    concurrency: usize,
) -> Result<String> {
    let classifications: Vec<_> = columns
        .iter()
        .map(|column| column_accuracy_ratio(runner, entity, column.as_str(), threshold).boxed())
        .collect();
    let ratios: Vec<Option<f64>> = stream::iter(classifications)
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let average = average_ratio(ratios);
    debug!(columns = columns.len(), average, "Table accuracy computed");
    Ok(format_proportion(average))
}
