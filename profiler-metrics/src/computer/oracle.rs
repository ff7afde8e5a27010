//! Oracle: `DBA_TABLES` joined with `DBA_OBJECTS` on owner and name.

use super::result::{CREATE_DATE_TIME, ROW_COUNT};
use super::strategy::{column_equals_ignore_case, CatalogRequest, CatalogStrategy};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::query::{SelectQuery, SqlExpr, TableName};

const ROWS_ALIAS: &str = "r";
const CREATED_ALIAS: &str = "c";

/// Reads optimizer statistics and object creation time.
///
/// `DBA_TABLES` has no creation time, so the owner's object record is joined
/// in. `NUM_ROWS` is only as fresh as the last statistics gathering.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleCatalog;

impl CatalogStrategy for OracleCatalog {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn queries(&self, request: &CatalogRequest<'_>) -> Result<Vec<SelectQuery>> {
        let row_counts = SelectQuery::new(
            vec![
                SqlExpr::col("OWNER").label("OWNER"),
                SqlExpr::col("TABLE_NAME").label("TABLE_NAME"),
                SqlExpr::col("NUM_ROWS").label("NUM_ROWS"),
            ],
            TableName::catalog("DBA_TABLES"),
        )
        .filter([
            column_equals_ignore_case("OWNER", request.schema),
            column_equals_ignore_case("TABLE_NAME", request.table),
        ]);

        let created = SelectQuery::new(
            vec![
                SqlExpr::col("OWNER").label("OWNER"),
                SqlExpr::col("OBJECT_NAME").label("TABLE_NAME"),
                SqlExpr::col("CREATED").label("CREATED"),
            ],
            TableName::catalog("DBA_OBJECTS"),
        )
        .filter([
            column_equals_ignore_case("OWNER", request.schema),
            column_equals_ignore_case("OBJECT_NAME", request.table),
        ]);

        let [names, count] = request.shape_projections()?;
        let query = SelectQuery::new(
            vec![
                SqlExpr::qualified(ROWS_ALIAS, "NUM_ROWS").label(ROW_COUNT),
                SqlExpr::qualified(CREATED_ALIAS, "CREATED").label(CREATE_DATE_TIME),
                names,
                count,
            ],
            row_counts.into_subquery(ROWS_ALIAS),
        )
        .join(
            created.into_subquery(CREATED_ALIAS),
            vec![
                SqlExpr::qualified(ROWS_ALIAS, "TABLE_NAME")
                    .equals(SqlExpr::qualified(CREATED_ALIAS, "TABLE_NAME")),
                SqlExpr::qualified(ROWS_ALIAS, "OWNER")
                    .equals(SqlExpr::qualified(CREATED_ALIAS, "OWNER")),
            ],
        );
        Ok(vec![query])
    }
}
