//! Column consistency.

use crate::metrics::context::MetricResults;
use crate::metrics::name::MetricName;
use crate::metrics::traits::{ComposedMetric, Metric, MetricKind};
use crate::metrics::types::{MetricType, MetricValue};

const REQUIRED: [MetricName; 1] = [MetricName::ValuesCount];

/// Consistency of a column's values.
///
/// Currently a fixed `1.0` whenever `valuesCount` resolved. The dependency is
/// still declared so the runner orders it after the count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsistencyRatio;

impl Metric for ConsistencyRatio {
    fn name(&self) -> MetricName {
        MetricName::ConsistencyProportion
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Composed
    }

    fn metric_type(&self) -> MetricType {
        MetricType::Float
    }
}

impl ComposedMetric for ConsistencyRatio {
    fn required_metrics(&self) -> &'static [MetricName] {
        &REQUIRED
    }

    fn compute(&self, results: &MetricResults) -> Option<MetricValue> {
        results.get(MetricName::ValuesCount)?;
        Some(MetricValue::Double(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_one_when_count_resolves() {
        for total in [0, 1, 1_000_000] {
            let results =
                MetricResults::from_values([(MetricName::ValuesCount, Some(MetricValue::Long(total)))]);
            assert_eq!(ConsistencyRatio.compute(&results), Some(MetricValue::Double(1.0)));
        }
    }

    #[test]
    fn test_none_without_count() {
        assert_eq!(ConsistencyRatio.compute(&MetricResults::new()), None);
    }
}
