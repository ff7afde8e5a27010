//! MySQL: `information_schema.tables`, then an exact count and table accuracy.

use async_trait::async_trait;
use tracing::error;

use super::accuracy::table_accuracy_proportion;
use super::result::{TableMetricResult, CREATE_DATE_TIME, ROW_COUNT, SIZE_IN_BYTES};
use super::strategy::{column_equals, CatalogRequest, CatalogStrategy, RefineContext};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::metrics::statics::RowCount;
use crate::metrics::{MetricScope, StaticMetric};
use crate::query::{SelectQuery, SqlExpr, TableName};

/// Reads the information schema and corrects its row estimate.
///
/// InnoDB reports `TABLE_ROWS` from index statistics, so the count is always
/// replaced with `COUNT(*)`. The result also carries the table accuracy
/// proportion; failing to compute it leaves the field unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlCatalog;

#[async_trait]
impl CatalogStrategy for MySqlCatalog {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn queries(&self, request: &CatalogRequest<'_>) -> Result<Vec<SelectQuery>> {
        let [names, count] = request.shape_projections()?;
        let query = SelectQuery::new(
            vec![
                SqlExpr::col("TABLE_ROWS").label(ROW_COUNT),
                SqlExpr::col("data_length")
                    .plus(SqlExpr::col("index_length"))
                    .label(SIZE_IN_BYTES),
                SqlExpr::col("CREATE_TIME").label(CREATE_DATE_TIME),
                names,
                count,
            ],
            TableName::catalog("information_schema.tables"),
        )
        .filter([
            column_equals("TABLE_SCHEMA", request.schema),
            column_equals("TABLE_NAME", request.table),
        ]);
        Ok(vec![query])
    }

    async fn refine(&self, ctx: &RefineContext<'_>, result: &mut TableMetricResult) -> Result<()> {
        let scope = MetricScope::table(ctx.entity);
        let row = ctx
            .runner
            .select_first_from_table(vec![RowCount.projection(&scope)?])
            .await?;
        result.row_count = row.and_then(|r| r.get_i64(ROW_COUNT));

        let columns: Vec<String> = result
            .column_name_list()
            .into_iter()
            .map(str::to_owned)
            .collect();
        match table_accuracy_proportion(
            ctx.runner,
            ctx.entity,
            &columns,
            ctx.config.accuracy_threshold,
            ctx.config.table_accuracy_concurrency,
        )
        .await
        {
            Ok(proportion) => result.table_accuracy_proportion = Some(proportion),
            Err(e) => error!("Error computing table accuracy proportion: {}", e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use crate::entity::{ColumnType, TableEntity};

    #[test]
    fn test_query_rendering() {
        let entity = TableEntity::new("orders")
            .with_schema("shop")
            .with_column("id", ColumnType::Int)
            .with_column("email", ColumnType::Varchar);
        let connection = ConnectionConfig::default();
        let request = CatalogRequest {
            schema: "shop",
            table: "orders",
            entity: &entity,
            connection: &connection,
            database: None,
        };
        let sql = MySqlCatalog.queries(&request).unwrap()[0]
            .to_sql(Dialect::MySql)
            .unwrap();
        assert_eq!(
            sql,
            "SELECT `TABLE_ROWS` AS `rowCount`, (`data_length` + `index_length`) AS `sizeInBytes`, \
             `CREATE_TIME` AS `createDateTime`, 'id,email' AS `columnNames`, 2 AS `columnCount` \
             FROM information_schema.tables WHERE `TABLE_SCHEMA` = 'shop' AND `TABLE_NAME` = 'orders'"
        );
    }
}
