//! Null and distinct proportions.

use crate::metrics::context::MetricResults;
use crate::metrics::name::MetricName;
use crate::metrics::traits::{ComposedMetric, Metric, MetricKind};
use crate::metrics::types::{MetricType, MetricValue};

const NULL_REQUIRED: [MetricName; 2] = [MetricName::NullCount, MetricName::ValuesCount];
const DISTINCT_REQUIRED: [MetricName; 2] = [MetricName::DistinctCount, MetricName::ValuesCount];

/// `nullCount / (nullCount + valuesCount)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRatio;

impl Metric for NullRatio {
    fn name(&self) -> MetricName {
        MetricName::NullProportion
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Composed
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Float
    }
}

impl ComposedMetric for NullRatio {
    fn required_metrics(&self) -> &'static [MetricName] {
        &NULL_REQUIRED
    }

    fn compute(&self, results: &MetricResults) -> Option<MetricValue> {
        let nulls = results.get_i64(MetricName::NullCount)?;
        let values = results.get_i64(MetricName::ValuesCount)?;
        let total = nulls.checked_add(values)?;
        (total > 0).then(|| MetricValue::Double(nulls as f64 / total as f64))
    }
}

/// `distinctCount / valuesCount`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistinctRatio;

impl Metric for DistinctRatio {
    fn name(&self) -> MetricName {
        MetricName::DistinctProportion
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Composed
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Float
    }
}

impl ComposedMetric for DistinctRatio {
    fn required_metrics(&self) -> &'static [MetricName] {
        &DISTINCT_REQUIRED
    }

    fn compute(&self, results: &MetricResults) -> Option<MetricValue> {
        let distinct = results.get_i64(MetricName::DistinctCount)?;
        let values = results.get_i64(MetricName::ValuesCount)?;
        (values > 0).then(|| MetricValue::Double(distinct as f64 / values as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(pairs: &[(MetricName, i64)]) -> MetricResults {
        MetricResults::from_values(
            pairs
                .iter()
                .map(|(name, v)| (*name, Some(MetricValue::Long(*v)))),
        )
    }

    #[test]
    fn test_null_ratio() {
        let res = results(&[(MetricName::NullCount, 1), (MetricName::ValuesCount, 3)]);
        assert_eq!(NullRatio.compute(&res), Some(MetricValue::Double(0.25)));
        let res = results(&[(MetricName::NullCount, 0), (MetricName::ValuesCount, 0)]);
        assert_eq!(NullRatio.compute(&res), None);
    }

    #[test]
    fn test_null_ratio_overflowing_total_is_undefined() {
        let res = results(&[
            (MetricName::NullCount, i64::MAX),
            (MetricName::ValuesCount, 1),
        ]);
        assert_eq!(NullRatio.compute(&res), None);
    }

    #[test]
    fn test_distinct_ratio() {
        let res = results(&[(MetricName::DistinctCount, 2), (MetricName::ValuesCount, 4)]);
        assert_eq!(DistinctRatio.compute(&res), Some(MetricValue::Double(0.5)));
        let res = results(&[(MetricName::DistinctCount, 2)]);
        assert_eq!(DistinctRatio.compute(&res), None);
    }
}
