//! Metric values and semantic types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic return type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    /// Whole number (counts).
    Integer,
    /// Floating point (ratios, averages).
    Float,
    /// Text (column name lists).
    String,
    /// Point in time.
    Timestamp,
}

/// A computed metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum MetricValue {
    /// A floating-point metric value (e.g., ratio, median).
    Double(f64),

    /// An integer metric value (e.g., count).
    Long(i64),

    /// A string metric value (e.g., comma-joined column names).
    String(String),

    /// A boolean metric value.
    Boolean(bool),

    /// A timestamp metric value.
    Timestamp(DateTime<Utc>),
}

impl MetricValue {
    /// Checks if the metric value is numeric (Double or Long).
    pub fn is_numeric(&self) -> bool {
        matches!(self, MetricValue::Double(_) | MetricValue::Long(_))
    }

    /// Attempts to get the numeric value as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Double(v) => Some(*v),
            MetricValue::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Attempts to get the value as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Long(v) => Some(*v),
            MetricValue::Double(v) => {
                if v.fract() == 0.0 {
                    Some(*v as i64)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Returns a human-readable string representation of the metric value.
    pub fn to_string_pretty(&self) -> String {
        match self {
            MetricValue::Double(v) => {
                if v.fract() == 0.0 {
                    format!("{v:.0}")
                } else {
                    format!("{v:.4}")
                }
            }
            MetricValue::Long(v) => v.to_string(),
            MetricValue::String(s) => s.clone(),
            MetricValue::Boolean(b) => b.to_string(),
            MetricValue::Timestamp(t) => t.to_rfc3339(),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_pretty())
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Double(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Long(value)
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Boolean(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::String(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(MetricValue::Long(7).as_f64(), Some(7.0));
        assert_eq!(MetricValue::Double(2.0).as_i64(), Some(2));
        assert_eq!(MetricValue::Double(2.5).as_i64(), None);
        assert_eq!(MetricValue::from("a,b").as_f64(), None);
    }

    #[test]
    fn test_pretty_printing() {
        assert_eq!(MetricValue::Double(0.5).to_string(), "0.5000");
        assert_eq!(MetricValue::Double(1.0).to_string(), "1");
        assert_eq!(MetricValue::Long(42).to_string(), "42");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&MetricValue::Long(3)).unwrap();
        assert_eq!(json, r#"{"type":"Long","value":3}"#);
    }
}
