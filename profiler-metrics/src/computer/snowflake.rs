//! Snowflake: `<database>.INFORMATION_SCHEMA.TABLES`.

use super::result::{CREATE_DATE_TIME, ROW_COUNT, SIZE_IN_BYTES};
use super::strategy::{column_equals_ignore_case, CatalogRequest, CatalogStrategy};
use crate::dialect::Dialect;
use crate::error::{ProfilerError, Result};
use crate::query::{SelectQuery, SqlExpr, TableName};

/// Reads the database-scoped information schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowflakeCatalog;

impl CatalogStrategy for SnowflakeCatalog {
    fn dialect(&self) -> Dialect {
        Dialect::Snowflake
    }

    fn queries(&self, request: &CatalogRequest<'_>) -> Result<Vec<SelectQuery>> {
        let database = request.database().ok_or_else(|| {
            ProfilerError::MissingTableMetadata(format!(
                "no database known for {}.{}",
                request.schema, request.table
            ))
        })?;

        let [names, count] = request.shape_projections()?;
        let query = SelectQuery::new(
            vec![
                SqlExpr::col("ROW_COUNT").label(ROW_COUNT),
                SqlExpr::col("BYTES").label(SIZE_IN_BYTES),
                SqlExpr::col("CREATED").label(CREATE_DATE_TIME),
                names,
                count,
            ],
            TableName::catalog("INFORMATION_SCHEMA.TABLES").with_prefix([database]),
        )
        .filter([
            column_equals_ignore_case("TABLE_CATALOG", database),
            column_equals_ignore_case("TABLE_SCHEMA", request.schema),
            column_equals_ignore_case("TABLE_NAME", request.table),
        ]);
        Ok(vec![query])
    }
}
