//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::prelude::SessionContext;
use datafusion::scalar::ScalarValue;

use profiler_metrics::dialect::Dialect;
use profiler_metrics::error::{ProfilerError, Result};
use profiler_metrics::query::{SelectQuery, TableName};
use profiler_metrics::runner::{QueryRunner, Row};
use profiler_metrics::sources::DataFusionRunner;

/// Canned response for queries whose SQL contains a marker.
#[derive(Debug, Clone)]
pub enum Script {
    Rows(Vec<Row>),
    Fail(String),
}

/// A runner that answers catalog queries from scripts and everything else
/// from a DataFusion table.
///
/// Queries are rendered for the scripted dialect before matching, so markers
/// are written the way the target database would see them.
#[derive(Debug)]
pub struct ScriptedRunner {
    inner: DataFusionRunner,
    dialect: Dialect,
    database: Option<String>,
    scripts: Vec<(String, Script)>,
    issued: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new(inner: DataFusionRunner, dialect: Dialect) -> Self {
        Self {
            inner,
            dialect,
            database: None,
            scripts: Vec::new(),
            issued: Mutex::new(Vec::new()),
        }
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = Some(database.to_string());
        self
    }

    pub fn respond(mut self, marker: &str, row: Row) -> Self {
        self.scripts
            .push((marker.to_string(), Script::Rows(vec![row])));
        self
    }

    pub fn respond_empty(mut self, marker: &str) -> Self {
        self.scripts.push((marker.to_string(), Script::Rows(Vec::new())));
        self
    }

    pub fn fail(mut self, marker: &str, message: &str) -> Self {
        self.scripts
            .push((marker.to_string(), Script::Fail(message.to_string())));
        self
    }

    /// Every query seen so far, rendered for the scripted dialect.
    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryRunner for ScriptedRunner {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn table(&self) -> &TableName {
        self.inner.table()
    }

    async fn all(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let sql = query.to_sql(self.dialect)?;
        self.issued.lock().unwrap().push(sql.clone());

        let script = self
            .scripts
            .iter()
            .find(|(marker, _)| sql.contains(marker.as_str()))
            .map(|(_, script)| script.clone());
        match script {
            Some(Script::Rows(rows)) => Ok(rows),
            Some(Script::Fail(message)) => Err(ProfilerError::query(self.dialect, message)),
            None => self.inner.all(query).await,
        }
    }
}

/// A catalog row with the standard labels.
pub fn catalog_row(row_count: Option<i64>, size: Option<i64>, created: Option<&str>) -> Row {
    [
        ("rowCount", ScalarValue::Int64(row_count)),
        ("sizeInBytes", ScalarValue::Int64(size)),
        ("createDateTime", ScalarValue::Utf8(created.map(str::to_string))),
        ("columnNames", ScalarValue::Utf8(Some("id,email".to_string()))),
        ("columnCount", ScalarValue::Int64(Some(2))),
    ]
    .into_iter()
    .collect()
}

/// Registers `batch` as `name` in a fresh session.
pub fn runner_for(name: &str, batch: RecordBatch) -> DataFusionRunner {
    let ctx = SessionContext::new();
    ctx.register_batch(name, batch).unwrap();
    DataFusionRunner::new(ctx, name)
}

/// `users(id BIGINT, email VARCHAR)` with `rows` rows, every email valid.
pub fn users_batch(rows: i64) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("email", DataType::Utf8, true),
    ]));
    let ids: Vec<i64> = (1..=rows).collect();
    let emails: Vec<String> = ids.iter().map(|i| format!("user{i}@example.com")).collect();
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(ids)) as ArrayRef,
            Arc::new(StringArray::from(emails)) as ArrayRef,
        ],
    )
    .unwrap()
}
