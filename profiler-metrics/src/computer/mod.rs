//! Dialect-aware table metrics.
//!
//! [`TableMetricComputer`] reads row count, size and creation time from the
//! database's own catalog when a [`CatalogStrategy`] exists for the dialect,
//! and otherwise computes the requested metrics directly against the table.
//!
//! ## Fallback chain
//!
//! Each strategy offers one or more catalog queries. They are tried in order:
//! a query that fails moves on to the next one, and once none is left the
//! computer falls back to the generic path. A query that succeeds but returns
//! no row, a null row count, or a zero row count for a view is degenerate and
//! goes straight to the generic path. None of this is surfaced as an error.
//!
//! ```rust,no_run
//! use profiler_metrics::computer::TableMetricComputer;
//! use profiler_metrics::config::ConnectionConfig;
//! use profiler_metrics::dialect::Dialect;
//! use profiler_metrics::entity::TableEntity;
//! use profiler_metrics::sources::DataFusionRunner;
//! use datafusion::prelude::SessionContext;
//!
//! # async fn example() {
//! let runner = DataFusionRunner::new(SessionContext::new(), "orders");
//! let entity = TableEntity::new("orders").with_schema("shop");
//! let connection = ConnectionConfig::default();
//!
//! let computer = TableMetricComputer::new(
//!     Dialect::MySql,
//!     &runner,
//!     TableMetricComputer::DEFAULT_METRICS.to_vec(),
//!     &connection,
//!     &entity,
//! );
//! if let Some(result) = computer.compute().await {
//!     println!("{:?} rows", result.row_count);
//! }
//! # }
//! ```

pub mod accuracy;
mod bigquery;
mod clickhouse;
mod mysql;
mod oracle;
mod redshift;
pub mod result;
mod snowflake;
pub mod strategy;

pub use bigquery::BigQueryCatalog;
pub use clickhouse::ClickHouseCatalog;
pub use mysql::MySqlCatalog;
pub use oracle::OracleCatalog;
pub use redshift::RedshiftCatalog;
pub use result::TableMetricResult;
pub use snowflake::SnowflakeCatalog;
pub use strategy::{strategy_for, CatalogRequest, CatalogStrategy, RefineContext};

use tracing::{debug, error, instrument};

use crate::config::{ComputerConfig, ConnectionConfig};
use crate::dialect::Dialect;
use crate::entity::TableEntity;
use crate::error::Result;
use crate::log_fallback;
use crate::metrics::{MetricName, MetricRunner, MetricScope};
use crate::runner::QueryRunner;

#[derive(Debug)]
struct ResolvedStrategy<'a> {
    catalog: Box<dyn CatalogStrategy>,
    schema: &'a str,
    table: &'a str,
}

/// Computes table-level metrics for one table.
#[derive(Debug)]
pub struct TableMetricComputer<'a> {
    dialect: Dialect,
    runner: &'a dyn QueryRunner,
    metrics: Vec<MetricName>,
    connection: &'a ConnectionConfig,
    entity: &'a TableEntity,
    config: ComputerConfig,
    strategy: Option<ResolvedStrategy<'a>>,
}

impl<'a> TableMetricComputer<'a> {
    /// Metrics computed by the generic path when the caller has no preference.
    pub const DEFAULT_METRICS: [MetricName; 3] = [
        MetricName::RowCount,
        MetricName::ColumnCount,
        MetricName::ColumnNames,
    ];

    /// Creates a computer and resolves its strategy.
    ///
    /// A dialect-specific strategy needs the entity's schema and table names;
    /// when either is missing the generic path is used.
    pub fn new(
        dialect: Dialect,
        runner: &'a dyn QueryRunner,
        metrics: Vec<MetricName>,
        connection: &'a ConnectionConfig,
        entity: &'a TableEntity,
    ) -> Self {
        let strategy = strategy_for(dialect).and_then(|catalog| match entity.schema_and_table() {
            Ok((schema, table)) => Some(ResolvedStrategy {
                catalog,
                schema,
                table,
            }),
            Err(e) => {
                debug!(%dialect, error = %e, "Using base table metrics");
                None
            }
        });

        Self {
            dialect,
            runner,
            metrics,
            connection,
            entity,
            config: ComputerConfig::default(),
            strategy,
        }
    }

    /// Creates a computer from a dialect name; unknown names use the generic path.
    pub fn from_dialect_name(
        dialect: &str,
        runner: &'a dyn QueryRunner,
        metrics: Vec<MetricName>,
        connection: &'a ConnectionConfig,
        entity: &'a TableEntity,
    ) -> Self {
        Self::new(Dialect::parse_or_base(dialect), runner, metrics, connection, entity)
    }

    /// Replaces the computer configuration.
    pub fn with_config(mut self, config: ComputerConfig) -> Self {
        self.config = config;
        self
    }

    /// The requested dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Dialect of the strategy actually in use; `Base` for the generic path.
    pub fn strategy_dialect(&self) -> Dialect {
        self.strategy
            .as_ref()
            .map_or(Dialect::Base, |s| s.catalog.dialect())
    }

    /// Computes the table metrics.
    ///
    /// Returns `None` only when the generic path itself fails.
    #[instrument(skip(self), fields(dialect = %self.dialect, table = %self.entity.name))]
    pub async fn compute(&self) -> Option<TableMetricResult> {
        if let Some(strategy) = &self.strategy {
            if let Some(result) = self.compute_catalog(strategy).await {
                return Some(result);
            }
            log_fallback!(self.config.logging, "Falling back to base table metrics");
        }

        match self.compute_base().await {
            Ok(result) => Some(result),
            Err(e) => {
                error!("Base table metrics failed for {}: {}", self.entity.name, e);
                None
            }
        }
    }

    /// Runs the catalog chain; `None` means fall back.
    async fn compute_catalog(&self, strategy: &ResolvedStrategy<'a>) -> Option<TableMetricResult> {
        let request = CatalogRequest {
            schema: strategy.schema,
            table: strategy.table,
            entity: self.entity,
            connection: self.connection,
            database: self.runner.database(),
        };
        let queries = match strategy.catalog.queries(&request) {
            Ok(queries) => queries,
            Err(e) => {
                log_fallback!(self.config.logging, error = %e, "Catalog query unavailable");
                return None;
            }
        };

        for (attempt, query) in queries.iter().enumerate() {
            let row = match self.runner.first(query).await {
                Ok(row) => row,
                Err(e) => {
                    log_fallback!(self.config.logging, attempt, error = %e, "Catalog read failed");
                    continue;
                }
            };

            let Some(row) = row else {
                log_fallback!(self.config.logging, attempt, "Catalog returned no row");
                return None;
            };
            let mut result = TableMetricResult::from_row(&row);
            if self.is_degenerate(&result) {
                log_fallback!(
                    self.config.logging,
                    attempt,
                    row_count = ?result.row_count,
                    "Catalog row count unusable"
                );
                return None;
            }

            let ctx = RefineContext {
                runner: self.runner,
                entity: self.entity,
                config: &self.config,
            };
            if let Err(e) = strategy.catalog.refine(&ctx, &mut result).await {
                log_fallback!(self.config.logging, error = %e, "Catalog refinement failed");
                return None;
            }
            return Some(result);
        }
        None
    }

    /// Views often report 0 or null in catalog estimates.
    fn is_degenerate(&self, result: &TableMetricResult) -> bool {
        match result.row_count {
            None => true,
            Some(0) => self.entity.is_view(),
            Some(_) => false,
        }
    }

    async fn compute_base(&self) -> Result<TableMetricResult> {
        let results = MetricRunner::new()
            .with_metrics(self.metrics.iter().copied())
            .continue_on_error(false)
            .run(self.runner, &MetricScope::table(self.entity))
            .await?;
        Ok(TableMetricResult::from_metrics(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ColumnType;
    use crate::sources::DataFusionRunner;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use datafusion::prelude::SessionContext;
    use std::sync::Arc;

    fn runner() -> DataFusionRunner {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("email", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
                Arc::new(StringArray::from(vec![
                    Some("a@example.com"),
                    Some("b@example.com"),
                    None,
                    Some("d@example.com"),
                ])),
            ],
        )
        .unwrap();
        let ctx = SessionContext::new();
        ctx.register_batch("users", batch).unwrap();
        DataFusionRunner::new(ctx, "users")
    }

    fn entity() -> TableEntity {
        TableEntity::new("users")
            .with_schema("app")
            .with_column("id", ColumnType::BigInt)
            .with_column("email", ColumnType::Varchar)
    }

    #[test]
    fn test_strategy_resolution() {
        let runner = runner();
        let connection = ConnectionConfig::default();
        let entity = entity();

        let computer = TableMetricComputer::new(
            Dialect::MySql,
            &runner,
            TableMetricComputer::DEFAULT_METRICS.to_vec(),
            &connection,
            &entity,
        );
        assert_eq!(computer.strategy_dialect(), Dialect::MySql);

        let computer = TableMetricComputer::from_dialect_name(
            "sqlite",
            &runner,
            Vec::new(),
            &connection,
            &entity,
        );
        assert_eq!(computer.dialect(), Dialect::Base);
        assert_eq!(computer.strategy_dialect(), Dialect::Base);
    }

    #[test]
    fn test_missing_schema_resolves_to_base() {
        let runner = runner();
        let connection = ConnectionConfig::default();
        let entity = TableEntity::new("users");

        let computer =
            TableMetricComputer::new(Dialect::Oracle, &runner, Vec::new(), &connection, &entity);
        assert_eq!(computer.dialect(), Dialect::Oracle);
        assert_eq!(computer.strategy_dialect(), Dialect::Base);
    }

    #[tokio::test]
    async fn test_base_computation() {
        let runner = runner();
        let connection = ConnectionConfig::default();
        let entity = entity();

        let result = TableMetricComputer::new(
            Dialect::Base,
            &runner,
            TableMetricComputer::DEFAULT_METRICS.to_vec(),
            &connection,
            &entity,
        )
        .compute()
        .await
        .unwrap();

        assert_eq!(result.row_count, Some(4));
        assert_eq!(result.column_count, Some(2));
        assert_eq!(result.column_names.as_deref(), Some("id,email"));
        assert_eq!(result.size_in_bytes, None);
        assert_eq!(result.table_accuracy_proportion, None);
    }

    #[tokio::test]
    async fn test_catalog_failure_falls_back_to_base() {
        // DataFusion has no information_schema.tables with these columns.
        let runner = runner();
        let connection = ConnectionConfig::default();
        let entity = entity();

        let computer = TableMetricComputer::new(
            Dialect::MySql,
            &runner,
            TableMetricComputer::DEFAULT_METRICS.to_vec(),
            &connection,
            &entity,
        );
        let result = computer.compute().await.unwrap();
        assert_eq!(result.row_count, Some(4));
        assert_eq!(result.table_accuracy_proportion, None);
    }

    #[tokio::test]
    async fn test_base_failure_returns_none() {
        let runner = DataFusionRunner::new(SessionContext::new(), "missing");
        let connection = ConnectionConfig::default();
        let entity = entity();

        let result = TableMetricComputer::new(
            Dialect::Base,
            &runner,
            TableMetricComputer::DEFAULT_METRICS.to_vec(),
            &connection,
            &entity,
        )
        .compute()
        .await;
        assert!(result.is_none());
    }
}
