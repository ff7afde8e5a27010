//! ClickHouse: `system.tables`.

use super::result::{ROW_COUNT, SIZE_IN_BYTES};
use super::strategy::{column_equals, CatalogRequest, CatalogStrategy};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::query::{SelectQuery, SqlExpr, TableName};

/// Reads the system table registry. It records no creation time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickHouseCatalog;

impl CatalogStrategy for ClickHouseCatalog {
    fn dialect(&self) -> Dialect {
        Dialect::ClickHouse
    }

    fn queries(&self, request: &CatalogRequest<'_>) -> Result<Vec<SelectQuery>> {
        let [names, count] = request.shape_projections()?;
        let query = SelectQuery::new(
            vec![
                SqlExpr::col("total_rows").label(ROW_COUNT),
                SqlExpr::col("total_bytes").label(SIZE_IN_BYTES),
                names,
                count,
            ],
            TableName::catalog("system.tables"),
        )
        .filter([
            column_equals("database", request.schema),
            column_equals("name", request.table),
        ]);
        Ok(vec![query])
    }
}
