//! Median of a numeric column.

use arrow::array::AsArray;
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;

use crate::metrics::errors::{MetricError, MetricResult};
use crate::metrics::name::MetricName;
use crate::metrics::traits::{partition_columns, Metric, MetricKind, MetricScope, StaticMetric};
use crate::metrics::types::{MetricType, MetricValue};
use crate::query::SqlExpr;

/// Median of the non-null values; even-sized inputs average the middle pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct Median;

impl Metric for Median {
    fn name(&self) -> MetricName {
        MetricName::Median
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Window
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Float
    }
}

impl StaticMetric for Median {
    fn expression(&self, scope: &MetricScope<'_>) -> MetricResult<SqlExpr> {
        let column = scope.require_column(self.name())?;
        if !column.data_type.is_quantifiable() {
            return Err(MetricError::type_mismatch(self.name().as_str(), column.data_type));
        }
        Ok(SqlExpr::col(&column.name).median())
    }

    fn df_fn(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> MetricResult<Option<MetricValue>> {
        let column = scope.require_column(self.name())?;
        if !column.data_type.is_quantifiable() {
            return Err(MetricError::type_mismatch(self.name().as_str(), column.data_type));
        }

        let mut values = Vec::new();
        for array in partition_columns(column, partitions)? {
            let floats = cast(array.as_ref(), &DataType::Float64)?;
            values.extend(floats.as_primitive::<Float64Type>().iter().flatten());
        }
        if values.is_empty() {
            return Ok(None);
        }

        values.sort_by(f64::total_cmp);
        let mid = values.len() / 2;
        let median = if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };
        Ok(Some(MetricValue::Double(median)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ColumnType, TableEntity};
    use arrow::array::Float64Array;
    use arrow::datatypes::{Field, Schema};
    use std::sync::Arc;

    fn batch(values: Vec<Option<f64>>) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new("price", DataType::Float64, true)]));
        RecordBatch::try_new(schema, vec![Arc::new(Float64Array::from(values))]).unwrap()
    }

    #[test]
    fn test_median_odd_and_even() {
        let table = TableEntity::new("t").with_column("price", ColumnType::Double);
        let scope = MetricScope::column(&table, &table.columns[0]);

        let odd = [batch(vec![Some(3.0), None]), batch(vec![Some(1.0), Some(2.0)])];
        assert_eq!(Median.df_fn(&scope, &odd).unwrap(), Some(MetricValue::Double(2.0)));

        let even = [batch(vec![Some(4.0), Some(1.0), Some(2.0), Some(3.0)])];
        assert_eq!(Median.df_fn(&scope, &even).unwrap(), Some(MetricValue::Double(2.5)));

        let empty = [batch(vec![None])];
        assert_eq!(Median.df_fn(&scope, &empty).unwrap(), None);
    }

    #[test]
    fn test_text_column_is_rejected() {
        let table = TableEntity::new("t").with_column("name", ColumnType::Varchar);
        let scope = MetricScope::column(&table, &table.columns[0]);
        assert!(matches!(
            Median.expression(&scope),
            Err(MetricError::TypeMismatch { .. })
        ));
    }
}
