//! Stable metric identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProfilerError;

/// Identifier of every registered metric.
///
/// The serialized form (camelCase) is the stable name used in result maps and
/// emitted payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricName {
    RowCount,
    ColumnCount,
    ColumnNames,
    ValuesCount,
    NullCount,
    DistinctCount,
    AccuracyAddressCount,
    AccuracyBankCardNumberCount,
    AccuracyChineseNameCount,
    AccuracyDateCount,
    AccuracyEmailCount,
    AccuracyIdNumberCount,
    AccuracyIpAddressCount,
    AccuracyPhoneCount,
    AccuracyPostCodeCount,
    AccuracyUrlCount,
    AccuracyCount,
    Median,
    AccuracyProportion,
    ConsistencyProportion,
    NullProportion,
    DistinctProportion,
}

impl MetricName {
    /// Every metric, in declaration order.
    pub const ALL: [MetricName; 22] = [
        MetricName::RowCount,
        MetricName::ColumnCount,
        MetricName::ColumnNames,
        MetricName::ValuesCount,
        MetricName::NullCount,
        MetricName::DistinctCount,
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
        MetricName::AccuracyCount,
        MetricName::Median,
        MetricName::AccuracyProportion,
        MetricName::ConsistencyProportion,
        MetricName::NullProportion,
        MetricName::DistinctProportion,
    ];

    /// Stable camelCase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowCount => "rowCount",
            MetricName::ColumnCount => "columnCount",
            MetricName::ColumnNames => "columnNames",
            MetricName::ValuesCount => "valuesCount",
            MetricName::NullCount => "nullCount",
            MetricName::DistinctCount => "distinctCount",
            MetricName::AccuracyAddressCount => "accuracyAddressCount",
            MetricName::AccuracyBankCardNumberCount => "accuracyBankCardNumberCount",
            MetricName::AccuracyChineseNameCount => "accuracyChineseNameCount",
            MetricName::AccuracyDateCount => "accuracyDateCount",
            MetricName::AccuracyEmailCount => "accuracyEmailCount",
            MetricName::AccuracyIdNumberCount => "accuracyIdNumberCount",
            MetricName::AccuracyIpAddressCount => "accuracyIpAddressCount",
            MetricName::AccuracyPhoneCount => "accuracyPhoneCount",
            MetricName::AccuracyPostCodeCount => "accuracyPostCodeCount",
            MetricName::AccuracyUrlCount => "accuracyUrlCount",
            MetricName::AccuracyCount => "accuracyCount",
            MetricName::Median => "median",
            MetricName::AccuracyProportion => "accuracyProportion",
            MetricName::ConsistencyProportion => "consistencyProportion",
            MetricName::NullProportion => "nullProportion",
            MetricName::DistinctProportion => "distinctProportion",
        }
    }

    /// Position in [`MetricName::ALL`].
    pub(crate) fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricName {
    type Err = ProfilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ProfilerError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = MetricName::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(names.len(), MetricName::ALL.len());
    }

    #[test]
    fn test_ordinal_matches_position() {
        for (idx, name) in MetricName::ALL.iter().enumerate() {
            assert_eq!(name.ordinal(), idx);
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for name in MetricName::ALL {
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, format!("\"{}\"", name.as_str()));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!("accuracyUrlCount".parse::<MetricName>().unwrap(), MetricName::AccuracyUrlCount);
        assert!(matches!(
            "histogram".parse::<MetricName>(),
            Err(ProfilerError::UnknownMetric(_))
        ));
    }
}
