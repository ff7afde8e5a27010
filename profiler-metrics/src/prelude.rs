//! Prelude for commonly used types and traits in profiler-metrics.

pub use crate::computer::{TableMetricComputer, TableMetricResult};
pub use crate::config::{ComputerConfig, ConnectionConfig};
pub use crate::dialect::Dialect;
pub use crate::entity::{ColumnDescriptor, ColumnType, TableEntity, TableType};
pub use crate::error::{ErrorContext, ProfilerError, Result};
pub use crate::logging::LogConfig;
pub use crate::metrics::{
    AccuracyCategory, ComposedMetric, Metric, MetricName, MetricResults, MetricRunner,
    MetricScope, MetricValue, StaticMetric,
};
pub use crate::runner::{QueryRunner, Row};
pub use crate::sources::DataFusionRunner;
