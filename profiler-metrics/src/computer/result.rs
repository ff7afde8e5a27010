//! The table metric record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::{MetricName, MetricResults};
use crate::runner::Row;

/// Result label of the row count.
pub const ROW_COUNT: &str = "rowCount";
/// Result label of the storage size.
pub const SIZE_IN_BYTES: &str = "sizeInBytes";
/// Result label of the creation timestamp.
pub const CREATE_DATE_TIME: &str = "createDateTime";
/// Result label of the column count.
pub const COLUMN_COUNT: &str = "columnCount";
/// Result label of the comma-joined column names.
pub const COLUMN_NAMES: &str = "columnNames";
/// Result label of the table accuracy percentage.
pub const TABLE_ACCURACY_PROPORTION: &str = "tableAccuracyProportion";

/// Table-level metrics, whichever strategy produced them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetricResult {
    /// Number of rows.
    pub row_count: Option<i64>,
    /// Storage size in bytes, when the catalog reports it.
    pub size_in_bytes: Option<i64>,
    /// Creation time, when the catalog reports it.
    pub create_date_time: Option<DateTime<Utc>>,
    /// Number of columns.
    pub column_count: Option<i64>,
    /// Comma-joined column names.
    pub column_names: Option<String>,
    /// Average column accuracy as a percentage string such as `"80.00%"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_accuracy_proportion: Option<String>,
}

impl TableMetricResult {
    /// Reads a catalog row.
    pub fn from_row(row: &Row) -> Self {
        Self {
            row_count: row.get_i64(ROW_COUNT),
            size_in_bytes: row.get_i64(SIZE_IN_BYTES),
            create_date_time: row.get_timestamp(CREATE_DATE_TIME),
            column_count: row.get_i64(COLUMN_COUNT),
            column_names: row.get_string(COLUMN_NAMES),
            table_accuracy_proportion: None,
        }
    }

    /// Reads the results of a pushdown metric run.
    pub fn from_metrics(results: &MetricResults) -> Self {
        Self {
            row_count: results.get_i64(MetricName::RowCount),
            column_count: results.get_i64(MetricName::ColumnCount),
            column_names: results
                .get(MetricName::ColumnNames)
                .map(|v| v.to_string_pretty()),
            ..Self::default()
        }
    }

    /// Column names as a list; empty when unknown.
    pub fn column_name_list(&self) -> Vec<&str> {
        match self.column_names.as_deref() {
            Some(names) if !names.is_empty() => names.split(',').collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricValue;
    use datafusion::scalar::ScalarValue;

    #[test]
    fn test_from_row() {
        let row: Row = [
            ("ROWCOUNT", ScalarValue::UInt64(Some(10))),
            ("sizeInBytes", ScalarValue::Int64(Some(4096))),
            ("createDateTime", ScalarValue::TimestampMillisecond(Some(0), None)),
            ("columnCount", ScalarValue::Int64(Some(2))),
            ("columnNames", ScalarValue::Utf8(Some("id,email".to_string()))),
        ]
        .into_iter()
        .collect();

        let result = TableMetricResult::from_row(&row);
        assert_eq!(result.row_count, Some(10));
        assert_eq!(result.size_in_bytes, Some(4096));
        assert_eq!(result.create_date_time.map(|t| t.timestamp()), Some(0));
        assert_eq!(result.column_name_list(), vec!["id", "email"]);
    }

    #[test]
    fn test_from_metrics() {
        let results = MetricResults::from_values([
            (MetricName::RowCount, Some(MetricValue::Long(3))),
            (MetricName::ColumnNames, Some(MetricValue::String("a".to_string()))),
        ]);
        let result = TableMetricResult::from_metrics(&results);
        assert_eq!(result.row_count, Some(3));
        assert_eq!(result.column_names.as_deref(), Some("a"));
        assert_eq!(result.size_in_bytes, None);
    }

    #[test]
    fn test_serialized_labels() {
        let result = TableMetricResult {
            row_count: Some(1),
            table_accuracy_proportion: Some("80.00%".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json[ROW_COUNT], 1);
        assert_eq!(json[TABLE_ACCURACY_PROPORTION], "80.00%");
        assert!(json.get(SIZE_IN_BYTES).unwrap().is_null());

        let json = serde_json::to_value(TableMetricResult::default()).unwrap();
        assert!(json.get(TABLE_ACCURACY_PROPORTION).is_none());
    }
}
