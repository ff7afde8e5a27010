//! # Profiler Metrics
//!
//! Statistical and data-quality metrics over the columns and tables of a
//! relational source, computed for a metadata catalog.
//!
//! ## Overview
//!
//! The crate has three parts:
//!
//! - A **metric framework** ([`metrics`]): static aggregates, window
//!   aggregates and composed metrics derived from other metrics' results,
//!   resolved through a registry and evaluated by a [`metrics::MetricRunner`]
//!   either as pushdown SQL or over in-memory Arrow partitions.
//! - **Accuracy classification**: ten regex categories (email, phone, date...)
//!   whose match counts fold into the share of a column that is one
//!   recognisable kind of value.
//! - A **dialect-aware table computer** ([`computer`]): row count, size and
//!   creation time from Snowflake, Oracle, ClickHouse, BigQuery, MySQL and
//!   Redshift catalogs, falling back to direct aggregates when the catalog is
//!   empty, stale or failing.
//!
//! ## Quick Start
//!
//! ```rust
//! use profiler_metrics::prelude::*;
//! use arrow::array::StringArray;
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use datafusion::prelude::SessionContext;
//! use std::sync::Arc;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let schema = Arc::new(Schema::new(vec![Field::new("email", DataType::Utf8, true)]));
//! let batch = RecordBatch::try_new(
//!     schema.clone(),
//!     vec![Arc::new(StringArray::from(vec!["a@example.com", "b@example.com"]))],
//! )?;
//! let ctx = SessionContext::new();
//! ctx.register_batch("contacts", batch)?;
//!
//! let runner = DataFusionRunner::new(ctx, "contacts");
//! let entity = TableEntity::from_arrow_schema("contacts", &schema);
//! let column = entity.column("email").ok_or("missing column")?;
//!
//! let results = MetricRunner::new()
//!     .add(MetricName::AccuracyProportion)
//!     .run(&runner, &MetricScope::column(&entity, column))
//!     .await?;
//! assert_eq!(results.get_f64(MetricName::AccuracyProportion), Some(1.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`query`] builds dialect-neutral SQL trees; a [`runner::QueryRunner`]
//!   renders them for its own [`dialect::Dialect`] and executes them.
//! - [`sources`] provides the DataFusion-backed runner.
//! - [`security`] quotes identifiers and escapes literals per dialect.
//! - [`logging`] carries `tracing` configuration and subscriber setup.
//!
//! Only classification type mismatches propagate as errors from metric
//! runs; catalog failures are absorbed by the table computer's fallback chain.

pub mod computer;
pub mod config;
pub mod dialect;
pub mod entity;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod prelude;
pub mod query;
pub mod runner;
pub mod security;
pub mod sources;
