//! Pushdown and in-memory evaluation must agree on the same data.

mod common;

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use common::runner_for;
use profiler_metrics::entity::TableEntity;
use profiler_metrics::metrics::{MetricName, MetricResults, MetricRunner, MetricScope, MetricValue};

const TEXT_METRICS: [MetricName; 9] = [
    MetricName::ValuesCount,
    MetricName::NullCount,
    MetricName::DistinctCount,
    MetricName::AccuracyCount,
    MetricName::AccuracyProportion,
    MetricName::ConsistencyProportion,
    MetricName::NullProportion,
    MetricName::DistinctProportion,
    MetricName::AccuracyPhoneCount,
];

const NUMERIC_METRICS: [MetricName; 5] = [
    MetricName::ValuesCount,
    MetricName::NullCount,
    MetricName::DistinctCount,
    MetricName::Median,
    MetricName::NullProportion,
];

fn contacts(rows: Vec<(Option<&str>, Option<f64>)>) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("contact", DataType::Utf8, true),
        Field::new("score", DataType::Float64, true),
    ]));
    let (contact, score): (Vec<_>, Vec<_>) = rows.into_iter().unzip();
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(contact)) as ArrayRef,
            Arc::new(Float64Array::from(score)) as ArrayRef,
        ],
    )
    .unwrap()
}

fn sample() -> RecordBatch {
    contacts(vec![
        (Some("alice@example.com"), Some(3.5)),
        (Some("bob@example.org"), Some(1.0)),
        (Some("13800138000"), None),
        (Some("2023-01-15"), Some(7.25)),
        (Some("192.168.1.1"), Some(1.0)),
        (Some("https://example.com/a"), Some(2.0)),
        (Some("100080"), Some(9.0)),
        (Some("US$1,234.50"), Some(4.0)),
        (None, Some(0.5)),
        (Some("alice@example.com"), None),
        (Some("张三"), Some(6.0)),
    ])
}

async fn both_ways(
    batch: RecordBatch,
    column: &str,
    metrics: &[MetricName],
) -> (MetricResults, MetricResults) {
    let entity = TableEntity::from_arrow_schema("contacts", &batch.schema());
    let descriptor = entity.column(column).unwrap();
    let scope = MetricScope::column(&entity, descriptor);
    let runner = MetricRunner::new().with_metrics(metrics.iter().copied());

    let pushed = runner
        .run(&runner_for("contacts", batch.clone()), &scope)
        .await
        .unwrap();
    let in_memory = runner.run_in_memory(&scope, &[batch]).unwrap();
    (pushed, in_memory)
}

#[tokio::test]
async fn test_text_column_parity() {
    let (pushed, in_memory) = both_ways(sample(), "contact", &TEXT_METRICS).await;

    assert!(!pushed.has_errors(), "{:?}", pushed.errors());
    assert!(!in_memory.has_errors(), "{:?}", in_memory.errors());
    assert_eq!(pushed.values(), in_memory.values());

    assert_eq!(pushed.get_i64(MetricName::ValuesCount), Some(10));
    assert_eq!(pushed.get_i64(MetricName::NullCount), Some(1));
    assert_eq!(pushed.get_i64(MetricName::DistinctCount), Some(9));
    assert_eq!(pushed.get_i64(MetricName::AccuracyPhoneCount), Some(0));
}

#[tokio::test]
async fn test_numeric_column_parity() {
    let (pushed, in_memory) = both_ways(sample(), "score", &NUMERIC_METRICS).await;

    assert!(!pushed.has_errors(), "{:?}", pushed.errors());
    assert_eq!(pushed.values(), in_memory.values());
    // Nine values: 0.5 1 1 2 3.5 4 6 7.25 9
    assert_eq!(pushed.get(MetricName::Median), Some(&MetricValue::Double(3.5)));
    assert_eq!(pushed.get_i64(MetricName::DistinctCount), Some(8));
}

#[tokio::test]
async fn test_empty_table_parity() {
    let (pushed, in_memory) = both_ways(contacts(Vec::new()), "contact", &TEXT_METRICS).await;

    assert_eq!(pushed.values(), in_memory.values());
    assert_eq!(pushed.get_i64(MetricName::AccuracyCount), Some(0));
    assert!(pushed.get(MetricName::AccuracyProportion).is_none());
    assert!(pushed.get(MetricName::NullProportion).is_none());
    assert_eq!(
        pushed.get(MetricName::ConsistencyProportion),
        Some(&MetricValue::Double(1.0))
    );
}

#[tokio::test]
async fn test_all_null_column_parity() {
    let batch = contacts(vec![(None, None), (None, None), (None, None)]);
    let (pushed, in_memory) = both_ways(batch, "contact", &TEXT_METRICS).await;

    assert_eq!(pushed.values(), in_memory.values());
    assert_eq!(pushed.get_i64(MetricName::NullCount), Some(3));
    assert_eq!(pushed.get_f64(MetricName::NullProportion), Some(1.0));
    assert!(pushed.get(MetricName::AccuracyProportion).is_none());
}

#[tokio::test]
async fn test_type_mismatch_on_both_paths() {
    let batch = sample();
    let entity = TableEntity::from_arrow_schema("contacts", &batch.schema());
    let scope = MetricScope::column(&entity, entity.column("score").unwrap());
    let runner = MetricRunner::new().add(MetricName::AccuracyProportion);

    let pushed = runner.run(&runner_for("contacts", batch.clone()), &scope).await;
    assert!(pushed.unwrap_err().is_type_mismatch());

    let in_memory = runner.run_in_memory(&scope, &[batch]);
    assert!(in_memory.unwrap_err().is_type_mismatch());
}
