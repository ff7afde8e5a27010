//! [`QueryRunner`] over a DataFusion [`SessionContext`].

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::prelude::SessionContext;
use datafusion::scalar::ScalarValue;
use std::fmt;
use tracing::instrument;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::log_query;
use crate::logging::LogConfig;
use crate::query::{SelectQuery, TableName};
use crate::runner::{QueryRunner, Row};

/// Runs queries against a table registered in a DataFusion session.
///
/// Queries are rendered with [`Dialect::Base`], whose `~` regex operator and
/// double-quoted identifiers DataFusion understands natively.
///
/// # Example
///
/// ```rust,ignore
/// use profiler_metrics::sources::DataFusionRunner;
/// use datafusion::prelude::SessionContext;
///
/// let ctx = SessionContext::new();
/// ctx.register_batch("users", batch)?;
/// let runner = DataFusionRunner::new(ctx, "users");
/// ```
#[derive(Clone)]
pub struct DataFusionRunner {
    ctx: SessionContext,
    table: TableName,
    database: Option<String>,
    log_config: LogConfig,
}

impl DataFusionRunner {
    /// Binds a runner to a table registered in `ctx`.
    pub fn new(ctx: SessionContext, table: impl Into<String>) -> Self {
        Self {
            ctx,
            table: TableName::bare(table),
            database: None,
            log_config: LogConfig::default(),
        }
    }

    /// Reports `database` as the connection's catalog.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the logging configuration.
    pub fn with_log_config(mut self, log_config: LogConfig) -> Self {
        self.log_config = log_config;
        self
    }

    /// The underlying session.
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Collects the bound table as in-memory partitions.
    pub async fn partitions(&self) -> Result<Vec<RecordBatch>> {
        let df = self.ctx.table(self.table.name.as_str()).await?;
        Ok(df.collect().await?)
    }
}

impl fmt::Debug for DataFusionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFusionRunner")
            .field("table", &self.table)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl QueryRunner for DataFusionRunner {
    fn dialect(&self) -> Dialect {
        Dialect::Base
    }

    fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn table(&self) -> &TableName {
        &self.table
    }

    #[instrument(skip(self, query), fields(table = %self.table.name))]
    async fn all(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let sql = query.to_sql(Dialect::Base)?;
        log_query!(self.log_config, &sql);

        let batches = self.ctx.sql(&sql).await?.collect().await?;
        let mut rows = Vec::new();
        for batch in &batches {
            let schema = batch.schema();
            for row_idx in 0..batch.num_rows() {
                let mut values = Vec::with_capacity(batch.num_columns());
                for (field, column) in schema.fields().iter().zip(batch.columns()) {
                    let value = ScalarValue::try_from_array(column.as_ref(), row_idx)?;
                    values.push((field.name().clone(), value));
                }
                rows.push(Row::new(values));
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SqlExpr;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn runner() -> DataFusionRunner {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec![Some("a"), None, Some("c")])),
            ],
        )
        .unwrap();
        let ctx = SessionContext::new();
        ctx.register_batch("people", batch).unwrap();
        DataFusionRunner::new(ctx, "people")
    }

    #[tokio::test]
    async fn test_select_first_from_table() {
        let runner = runner();
        let row = runner
            .select_first_from_table(vec![
                SqlExpr::CountStar.label("rowCount"),
                SqlExpr::col("name").count().label("valuesCount"),
            ])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.get_i64("rowCount"), Some(3));
        assert_eq!(row.get_i64("valuesCount"), Some(2));
    }

    #[tokio::test]
    async fn test_all_returns_every_row() {
        let runner = runner();
        let query = SelectQuery::new(vec![SqlExpr::col("id").label("id")], runner.table().clone());
        let rows = runner.all(&query).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_table_is_an_error() {
        let runner = DataFusionRunner::new(SessionContext::new(), "nope");
        let result = runner
            .select_first_from_table(vec![SqlExpr::CountStar.label("rowCount")])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_partitions() {
        let partitions = runner().partitions().await.unwrap();
        let rows: usize = partitions.iter().map(RecordBatch::num_rows).sum();
        assert_eq!(rows, 3);
    }
}
