//! Metrics derived from other metrics' results.

mod accuracy_ratio;
mod consistency_ratio;
mod proportions;

pub use accuracy_ratio::{
    accuracy_ratio, dominant_category, AccuracyOutcome, AccuracyRatio, DominantCategory,
    ACCURACY_RATIO_THRESHOLD,
};
pub use consistency_ratio::ConsistencyRatio;
pub use proportions::{DistinctRatio, NullRatio};
