//! The seam between the computer and the per-dialect catalog readers.

use async_trait::async_trait;

use super::result::TableMetricResult;
use super::{bigquery, clickhouse, mysql, oracle, redshift, snowflake};
use crate::config::{ComputerConfig, ConnectionConfig};
use crate::dialect::Dialect;
use crate::entity::TableEntity;
use crate::error::Result;
use crate::metrics::statics::{ColumnCount, ColumnNames};
use crate::metrics::{MetricScope, StaticMetric};
use crate::query::{Projection, SelectQuery, SqlExpr};
use crate::runner::QueryRunner;

/// Everything a strategy needs to build its catalog queries.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRequest<'a> {
    /// Schema (dataset, owner) of the profiled table.
    pub schema: &'a str,
    /// Bare table name.
    pub table: &'a str,
    /// The profiled table.
    pub entity: &'a TableEntity,
    /// Dialect-specific addressing.
    pub connection: &'a ConnectionConfig,
    /// Database reported by the runner.
    pub database: Option<&'a str>,
}

impl<'a> CatalogRequest<'a> {
    /// Database from the connection configuration, else from the runner.
    pub fn database(&self) -> Option<&'a str> {
        self.connection.database.as_deref().or(self.database)
    }

    /// The `columnNames` and `columnCount` projections every catalog query carries.
    pub fn shape_projections(&self) -> Result<[Projection; 2]> {
        let scope = MetricScope::table(self.entity);
        Ok([ColumnNames.projection(&scope)?, ColumnCount.projection(&scope)?])
    }
}

/// `column = 'value'`.
pub(crate) fn column_equals(column: &str, value: &str) -> SqlExpr {
    SqlExpr::col(column).equals(SqlExpr::string(value))
}

/// `LOWER(column) = 'value'` with `value` lowercased, for case-normalized catalogs.
pub(crate) fn column_equals_ignore_case(column: &str, value: &str) -> SqlExpr {
    SqlExpr::col(column)
        .lower()
        .equals(SqlExpr::string(value.to_lowercase()))
}

/// Inputs of the post-catalog refinement step.
#[derive(Debug, Clone, Copy)]
pub struct RefineContext<'a> {
    /// Runner bound to the profiled table.
    pub runner: &'a dyn QueryRunner,
    /// The profiled table.
    pub entity: &'a TableEntity,
    /// Computer behaviour.
    pub config: &'a ComputerConfig,
}

/// Reads table metrics from a database's own catalog.
#[async_trait]
pub trait CatalogStrategy: Send + Sync + std::fmt::Debug {
    /// Dialect this strategy serves.
    fn dialect(&self) -> Dialect;

    /// Candidate catalog queries, tried in order until one executes.
    fn queries(&self, request: &CatalogRequest<'_>) -> Result<Vec<SelectQuery>>;

    /// Adjusts a catalog result before it is returned.
    async fn refine(&self, _ctx: &RefineContext<'_>, _result: &mut TableMetricResult) -> Result<()> {
        Ok(())
    }
}

/// Returns the catalog strategy for `dialect`, `None` for the generic one.
pub fn strategy_for(dialect: Dialect) -> Option<Box<dyn CatalogStrategy>> {
    match dialect {
        Dialect::Base => None,
        Dialect::Snowflake => Some(Box::new(snowflake::SnowflakeCatalog)),
        Dialect::Oracle => Some(Box::new(oracle::OracleCatalog)),
        Dialect::ClickHouse => Some(Box::new(clickhouse::ClickHouseCatalog)),
        Dialect::BigQuery => Some(Box::new(bigquery::BigQueryCatalog)),
        Dialect::MySql => Some(Box::new(mysql::MySqlCatalog)),
        Dialect::Redshift => Some(Box::new(redshift::RedshiftCatalog)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computer::result::{COLUMN_COUNT, COLUMN_NAMES};
    use crate::entity::ColumnType;

    #[test]
    fn test_every_specific_dialect_has_a_strategy() {
        for dialect in Dialect::ALL {
            match strategy_for(dialect) {
                None => assert_eq!(dialect, Dialect::Base),
                Some(strategy) => assert_eq!(strategy.dialect(), dialect),
            }
        }
    }

    #[test]
    fn test_database_prefers_connection() {
        let entity = TableEntity::new("t").with_schema("s");
        let connection = ConnectionConfig::default().with_database("configured");
        let request = CatalogRequest {
            schema: "s",
            table: "t",
            entity: &entity,
            connection: &connection,
            database: Some("session"),
        };
        assert_eq!(request.database(), Some("configured"));

        let connection = ConnectionConfig::default();
        let request = CatalogRequest {
            connection: &connection,
            ..request
        };
        assert_eq!(request.database(), Some("session"));
    }

    #[test]
    fn test_shape_projections() {
        let entity = TableEntity::new("t")
            .with_column("id", ColumnType::Int)
            .with_column("email", ColumnType::Varchar);
        let connection = ConnectionConfig::default();
        let request = CatalogRequest {
            schema: "s",
            table: "t",
            entity: &entity,
            connection: &connection,
            database: None,
        };
        let [names, count] = request.shape_projections().unwrap();
        assert_eq!(names.label, COLUMN_NAMES);
        assert_eq!(count.label, COLUMN_COUNT);
        assert_eq!(names.expr.to_sql(Dialect::Base).unwrap(), "'id,email'");
        assert_eq!(count.expr.to_sql(Dialect::Base).unwrap(), "2");
    }
}
