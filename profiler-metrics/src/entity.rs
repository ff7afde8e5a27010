//! Read-only descriptors for the table being profiled.
//!
//! The catalog layer owns these structures; the profiler only reads the table
//! type, the schema/table names and the column list.

use arrow::datatypes::{DataType, Schema};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProfilerError, Result};

/// Kind of relation as recorded by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableType {
    /// A regular base table.
    #[default]
    Regular,
    /// A view. Catalog row-count estimates for views are unreliable.
    View,
    /// A materialized view.
    MaterializedView,
    /// A secure view (Snowflake).
    SecureView,
    /// An external table.
    External,
}

/// Column data types as recorded by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Char,
    Varchar,
    String,
    Text,
    MediumText,
    LongText,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Float,
    Double,
    Decimal,
    Boolean,
    Date,
    Datetime,
    Timestamp,
    Time,
    Binary,
    Json,
    Array,
    Struct,
    Unknown,
}

impl ColumnType {
    /// Whether values of this type can be treated as strings for regex matching.
    pub fn is_concatenable(&self) -> bool {
        matches!(
            self,
            ColumnType::Char
                | ColumnType::Varchar
                | ColumnType::String
                | ColumnType::Text
                | ColumnType::MediumText
                | ColumnType::LongText
        )
    }

    /// Whether the type supports ordering aggregates such as median.
    pub fn is_quantifiable(&self) -> bool {
        matches!(
            self,
            ColumnType::TinyInt
                | ColumnType::SmallInt
                | ColumnType::Int
                | ColumnType::BigInt
                | ColumnType::Float
                | ColumnType::Double
                | ColumnType::Decimal
        )
    }

    /// Maps an Arrow data type onto the closest catalog type.
    pub fn from_arrow(data_type: &DataType) -> Self {
        match data_type {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ColumnType::String,
            DataType::Int8 | DataType::UInt8 => ColumnType::TinyInt,
            DataType::Int16 | DataType::UInt16 => ColumnType::SmallInt,
            DataType::Int32 | DataType::UInt32 => ColumnType::Int,
            DataType::Int64 | DataType::UInt64 => ColumnType::BigInt,
            DataType::Float16 | DataType::Float32 => ColumnType::Float,
            DataType::Float64 => ColumnType::Double,
            DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => ColumnType::Decimal,
            DataType::Boolean => ColumnType::Boolean,
            DataType::Date32 | DataType::Date64 => ColumnType::Date,
            DataType::Timestamp(_, _) => ColumnType::Timestamp,
            DataType::Time32(_) | DataType::Time64(_) => ColumnType::Time,
            DataType::Binary | DataType::LargeBinary | DataType::BinaryView => {
                ColumnType::Binary
            }
            DataType::List(_) | DataType::LargeList(_) => ColumnType::Array,
            DataType::Struct(_) => ColumnType::Struct,
            _ => ColumnType::Unknown,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_else(|| format!("{self:?}"));
        f.write_str(&name)
    }
}

/// A column of the profiled table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name exactly as stored in the source.
    pub name: String,
    /// Catalog data type.
    pub data_type: ColumnType,
}

impl ColumnDescriptor {
    /// Creates a column descriptor.
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Catalog entity describing one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntity {
    /// Bare table name.
    pub name: String,
    /// Schema (dataset, owner, database for ClickHouse) holding the table.
    pub schema: Option<String>,
    /// Relation kind.
    #[serde(default)]
    pub table_type: TableType,
    /// Ordered column list.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableEntity {
    /// Creates an entity without schema or columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            table_type: TableType::Regular,
            columns: Vec::new(),
        }
    }

    /// Builds an entity from an Arrow schema, mapping column types.
    pub fn from_arrow_schema(name: impl Into<String>, schema: &Schema) -> Self {
        let columns = schema
            .fields()
            .iter()
            .map(|f| ColumnDescriptor::new(f.name(), ColumnType::from_arrow(f.data_type())))
            .collect();
        Self {
            columns,
            ..Self::new(name)
        }
    }

    /// Sets the schema name.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the relation kind.
    pub fn with_table_type(mut self, table_type: TableType) -> Self {
        self.table_type = table_type;
        self
    }

    /// Appends a column.
    pub fn with_column(mut self, name: impl Into<String>, data_type: ColumnType) -> Self {
        self.columns.push(ColumnDescriptor::new(name, data_type));
        self
    }

    /// Whether the catalog classifies this relation as a view.
    pub fn is_view(&self) -> bool {
        self.table_type == TableType::View
    }

    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns `(schema, table)`, failing when either attribute is missing.
    pub fn schema_and_table(&self) -> Result<(&str, &str)> {
        let schema = self
            .schema
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ProfilerError::MissingTableMetadata(format!("{} has no schema", self.name)))?;
        if self.name.trim().is_empty() {
            return Err(ProfilerError::MissingTableMetadata(
                "entity has an empty table name".to_string(),
            ));
        }
        Ok((schema, self.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::Field;

    #[test]
    fn test_concatenable_types() {
        assert!(ColumnType::Varchar.is_concatenable());
        assert!(ColumnType::LongText.is_concatenable());
        assert!(!ColumnType::Int.is_concatenable());
        assert!(!ColumnType::Json.is_concatenable());
        assert!(!ColumnType::Unknown.is_concatenable());
    }

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::MediumText.to_string(), "MEDIUMTEXT");
        assert_eq!(ColumnType::BigInt.to_string(), "BIGINT");
    }

    #[test]
    fn test_from_arrow_schema() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("email", DataType::Utf8, true),
        ]);
        let entity = TableEntity::from_arrow_schema("users", &schema);
        assert_eq!(entity.column_names(), vec!["id", "email"]);
        assert_eq!(entity.column("email").map(|c| c.data_type), Some(ColumnType::String));
        assert_eq!(entity.column("id").map(|c| c.data_type), Some(ColumnType::BigInt));
    }

    #[test]
    fn test_schema_and_table_requires_schema() {
        let entity = TableEntity::new("orders");
        assert!(matches!(
            entity.schema_and_table(),
            Err(ProfilerError::MissingTableMetadata(_))
        ));

        let entity = entity.with_schema("shop");
        assert_eq!(entity.schema_and_table().unwrap(), ("shop", "orders"));
    }

    #[test]
    fn test_view_classification() {
        let view = TableEntity::new("v").with_table_type(TableType::View);
        assert!(view.is_view());
        let mv = TableEntity::new("mv").with_table_type(TableType::MaterializedView);
        assert!(!mv.is_view());
    }
}
