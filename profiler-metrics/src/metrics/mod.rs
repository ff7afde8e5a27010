//! Metric framework.
//!
//! Metrics are identified by [`MetricName`] and resolved through the
//! [`MetricRegistry`]. Three kinds are registered:
//!
//! - **Static** metrics aggregate raw data, either pushed down as SQL or
//!   evaluated over in-memory Arrow partitions.
//! - **Window** metrics are ordered aggregates with the same two paths.
//! - **Composed** metrics derive a value from other metrics' results.
//!
//! ## Accuracy
//!
//! Classification counts match column values against one
//! [`AccuracyCategory`] each. [`AccuracyRatio`] folds them into the share of
//! values belonging to the dominant category, thresholded at
//! [`ACCURACY_RATIO_THRESHOLD`].
//!
//! ```rust
//! use profiler_metrics::metrics::{
//!     AccuracyCategory, AccuracyRatio, ComposedMetric, MetricName, MetricResults, MetricValue,
//! };
//!
//! let mut results = MetricResults::new();
//! results.store(MetricName::ValuesCount, Some(MetricValue::Long(100)));
//! results.store(
//!     AccuracyCategory::Email.metric_name(),
//!     Some(MetricValue::Long(92)),
//! );
//!
//! let ratio = AccuracyRatio::new().compute(&results);
//! assert_eq!(ratio, Some(MetricValue::Double(0.92)));
//! ```

pub mod accuracy;
pub mod composed;
pub mod context;
pub mod errors;
pub mod name;
pub mod registry;
pub mod runner;
pub mod statics;
pub mod traits;
pub mod types;
pub mod window;

pub use accuracy::{AccuracyCategory, AccuracyClassificationCount, AccuracyCount};
pub use composed::{
    accuracy_ratio, dominant_category, AccuracyOutcome, AccuracyRatio, ConsistencyRatio,
    DistinctRatio, DominantCategory, NullRatio, ACCURACY_RATIO_THRESHOLD,
};
pub use context::{MetricFailure, MetricResults, RunMetadata};
pub use errors::{MetricError, MetricResult};
pub use name::MetricName;
pub use registry::{lookup, MetricImpl, MetricRegistry};
pub use runner::{MetricRunner, ProgressCallback};
pub use traits::{ComposedMetric, Metric, MetricKind, MetricScope, StaticMetric};
pub use types::{MetricType, MetricValue};
