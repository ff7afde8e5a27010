//! Redshift: `pg_catalog.svv_table_info`.

use super::result::{CREATE_DATE_TIME, ROW_COUNT, SIZE_IN_BYTES};
use super::strategy::{column_equals, CatalogRequest, CatalogStrategy};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::query::{SelectQuery, SqlExpr, TableName};

/// Reads the table info system view. Row counts are estimates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedshiftCatalog;

impl CatalogStrategy for RedshiftCatalog {
    fn dialect(&self) -> Dialect {
        Dialect::Redshift
    }

    fn queries(&self, request: &CatalogRequest<'_>) -> Result<Vec<SelectQuery>> {
        let [names, count] = request.shape_projections()?;
        let query = SelectQuery::new(
            vec![
                SqlExpr::col("estimated_visible_rows").label(ROW_COUNT),
                SqlExpr::col("size").label(SIZE_IN_BYTES),
                SqlExpr::col("create_time").label(CREATE_DATE_TIME),
                names,
                count,
            ],
            TableName::catalog("pg_catalog.svv_table_info"),
        )
        .filter([
            column_equals("schema", request.schema),
            column_equals("table", request.table),
        ]);
        Ok(vec![query])
    }
}
