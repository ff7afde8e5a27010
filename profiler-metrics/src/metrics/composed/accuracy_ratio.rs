//! Column accuracy: how much of a column is one recognisable kind of value.

use tracing::{debug, info};

use crate::metrics::accuracy::AccuracyCategory;
use crate::metrics::context::MetricResults;
use crate::metrics::name::MetricName;
use crate::metrics::traits::{ComposedMetric, Metric, MetricKind};
use crate::metrics::types::{MetricType, MetricValue};

/// Minimum share of the dominant category for a column to count as accurate.
///
/// Below it the column has no identifiable type and scores 0, not a partial
/// score.
pub const ACCURACY_RATIO_THRESHOLD: f64 = 0.5;

const REQUIRED: [MetricName; 11] = [
    MetricName::ValuesCount,
    MetricName::AccuracyAddressCount,
    MetricName::AccuracyBankCardNumberCount,
    MetricName::AccuracyChineseNameCount,
    MetricName::AccuracyDateCount,
    MetricName::AccuracyEmailCount,
    MetricName::AccuracyIdNumberCount,
    MetricName::AccuracyIpAddressCount,
    MetricName::AccuracyPhoneCount,
    MetricName::AccuracyPostCodeCount,
    MetricName::AccuracyUrlCount,
];

/// The category with the most matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominantCategory {
    /// Winning category.
    pub category: AccuracyCategory,
    /// Its match count.
    pub count: i64,
}

/// Result of the accuracy fold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyOutcome {
    /// `max / total` when at or above the threshold, otherwise 0.
    pub ratio: f64,
    /// Winning category, reported only when the ratio clears the threshold.
    pub dominant: Option<DominantCategory>,
}

/// Picks the category with the largest count.
///
/// Counts are scanned in iteration order and a later category replaces the
/// current one only when strictly greater, so ties go to the earlier entry.
/// Missing counts and counts of zero never win.
pub fn dominant_category<I>(counts: I) -> Option<DominantCategory>
where
    I: IntoIterator<Item = (AccuracyCategory, Option<i64>)>,
{
    counts
        .into_iter()
        .fold(None, |best: Option<DominantCategory>, (category, count)| {
            let Some(count) = count else { return best };
            let current = best.map_or(0, |b| b.count);
            if count > current {
                Some(DominantCategory { category, count })
            } else {
                best
            }
        })
}

/// Folds a total and per-category counts into the accuracy ratio.
///
/// Returns `None` when `total` is missing or not positive.
pub fn accuracy_ratio<I>(total: Option<i64>, counts: I, threshold: f64) -> Option<AccuracyOutcome>
where
    I: IntoIterator<Item = (AccuracyCategory, Option<i64>)>,
{
    let total = total.filter(|t| *t > 0)?;
    let dominant = dominant_category(counts);
    let max = dominant.map_or(0, |d| d.count);
    let ratio = max as f64 / total as f64;

    if ratio >= threshold {
        Some(AccuracyOutcome { ratio, dominant })
    } else {
        Some(AccuracyOutcome {
            ratio: 0.0,
            dominant: None,
        })
    }
}

/// Share of a column's non-null values that belong to its dominant category.
///
/// Depends on `valuesCount` and the ten classification counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyRatio {
    threshold: f64,
}

impl AccuracyRatio {
    /// Creates the metric with [`ACCURACY_RATIO_THRESHOLD`].
    pub fn new() -> Self {
        Self::with_threshold(ACCURACY_RATIO_THRESHOLD)
    }

    /// Creates the metric with a custom threshold.
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Threshold in use.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for AccuracyRatio {
    fn default() -> Self {
        Self::new()
    }
}

impl Metric for AccuracyRatio {
    fn name(&self) -> MetricName {
        MetricName::AccuracyProportion
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Composed
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Float
    }
}

impl ComposedMetric for AccuracyRatio {
    fn required_metrics(&self) -> &'static [MetricName] {
        &REQUIRED
    }

    fn compute(&self, results: &MetricResults) -> Option<MetricValue> {
        let total = results.get_i64(MetricName::ValuesCount);
        let counts = AccuracyCategory::PRIORITY
            .into_iter()
            .map(|c| (c, results.get_i64(c.metric_name())));

        let Some(outcome) = accuracy_ratio(total, counts, self.threshold) else {
            debug!(?total, "Total count is not valid, accuracy ratio undefined");
            return None;
        };

        if let Some(dominant) = outcome.dominant {
            info!(
                ratio = outcome.ratio,
                total_count = ?total,
                max_count = dominant.count,
                max_type = %dominant.category,
                "Dominant value category"
            );
        }
        Some(MetricValue::Double(outcome.ratio))
    }
}
