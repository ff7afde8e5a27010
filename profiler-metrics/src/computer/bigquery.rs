//! BigQuery: dataset `__TABLES__`, then the regional `TABLE_STORAGE` view.

use super::result::{CREATE_DATE_TIME, ROW_COUNT, SIZE_IN_BYTES};
use super::strategy::{column_equals, CatalogRequest, CatalogStrategy};
use crate::dialect::Dialect;
use crate::error::{ProfilerError, Result};
use crate::query::{SelectQuery, SqlExpr, TableName};

/// Reads the legacy dataset metadata table, with the regional storage view
/// as the alternate when the first read fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigQueryCatalog;

impl BigQueryCatalog {
    fn tables(request: &CatalogRequest<'_>, project: &str) -> Result<SelectQuery> {
        let [names, count] = request.shape_projections()?;
        Ok(SelectQuery::new(
            vec![
                SqlExpr::col("row_count").label(ROW_COUNT),
                SqlExpr::col("size_bytes").label(SIZE_IN_BYTES),
                SqlExpr::function("TIMESTAMP_MILLIS", vec![SqlExpr::col("creation_time")])
                    .label(CREATE_DATE_TIME),
                names,
                count,
            ],
            TableName::catalog("__TABLES__").with_prefix([project, request.schema]),
        )
        .filter([
            column_equals("project_id", project),
            column_equals("dataset_id", request.schema),
            column_equals("table_id", request.table),
        ]))
    }

    fn table_storage(request: &CatalogRequest<'_>, project: &str) -> Result<SelectQuery> {
        let [names, count] = request.shape_projections()?;
        let region = format!("region-{}", request.connection.usage_location);
        Ok(SelectQuery::new(
            vec![
                SqlExpr::col("total_rows").label(ROW_COUNT),
                SqlExpr::col("total_logical_bytes").label(SIZE_IN_BYTES),
                SqlExpr::col("creation_time").label(CREATE_DATE_TIME),
                names,
                count,
            ],
            TableName::catalog("INFORMATION_SCHEMA.TABLE_STORAGE").with_prefix([region]),
        )
        .filter([
            column_equals("project_id", project),
            column_equals("table_schema", request.schema),
            column_equals("table_name", request.table),
        ]))
    }
}

impl CatalogStrategy for BigQueryCatalog {
    fn dialect(&self) -> Dialect {
        Dialect::BigQuery
    }

    fn queries(&self, request: &CatalogRequest<'_>) -> Result<Vec<SelectQuery>> {
        let project = request
            .connection
            .project_id
            .as_deref()
            .or_else(|| request.database())
            .ok_or_else(|| {
                ProfilerError::MissingTableMetadata(format!(
                    "no project known for {}.{}",
                    request.schema, request.table
                ))
            })?;

        Ok(vec![
            Self::tables(request, project)?,
            Self::table_storage(request, project)?,
        ])
    }
}
