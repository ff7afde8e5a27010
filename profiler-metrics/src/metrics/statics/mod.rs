//! Plain aggregates over a table or a column.

mod column;
mod table;

pub use column::{DistinctCount, NullCount, ValuesCount};
pub use table::{ColumnCount, ColumnNames, RowCount};
