//! The query-execution channel.
//!
//! A [`QueryRunner`] is bound to one table on one connection. It renders
//! [`SelectQuery`] values for its dialect, executes them, and hands rows back
//! as ordered `(label, ScalarValue)` records.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use datafusion::scalar::ScalarValue;
use std::fmt::Debug;
use tracing::warn;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::query::{Projection, SelectQuery, TableName};

/// One result row.
///
/// Label lookup is case-insensitive because catalogs fold unquoted labels
/// differently (Snowflake and Oracle upper-case them).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<(String, ScalarValue)>,
}

impl Row {
    /// Creates a row from ordered label/value pairs.
    pub fn new(values: Vec<(String, ScalarValue)>) -> Self {
        Self { values }
    }

    /// Labels in projection order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(label, _)| label.as_str())
    }

    /// Number of columns in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value for `label`, including SQL nulls.
    pub fn get(&self, label: &str) -> Option<&ScalarValue> {
        self.values
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, v)| v)
    }

    /// Whether `label` is missing or null.
    pub fn is_null(&self, label: &str) -> bool {
        self.get(label).is_none_or(ScalarValue::is_null)
    }

    /// Integer value for `label`, `None` when missing, null or not integral.
    pub fn get_i64(&self, label: &str) -> Option<i64> {
        self.get(label).and_then(scalar_to_i64)
    }

    /// Floating-point value for `label`.
    pub fn get_f64(&self, label: &str) -> Option<f64> {
        self.get(label).and_then(scalar_to_f64)
    }

    /// Text value for `label`; non-text scalars are rendered with `Display`.
    pub fn get_string(&self, label: &str) -> Option<String> {
        match self.get(label)? {
            ScalarValue::Utf8(v) | ScalarValue::LargeUtf8(v) | ScalarValue::Utf8View(v) => {
                v.clone()
            }
            other if other.is_null() => None,
            other => Some(other.to_string()),
        }
    }

    /// Timestamp value for `label`.
    ///
    /// Accepts timestamp and date scalars, epoch milliseconds, and the usual
    /// textual timestamp layouts.
    pub fn get_timestamp(&self, label: &str) -> Option<DateTime<Utc>> {
        self.get(label).and_then(scalar_to_timestamp)
    }

    /// Count value for `label`, with null or unconvertible values read as 0.
    pub fn count(&self, label: &str) -> i64 {
        to_count(self.get(label))
    }
}

impl<K: Into<String>> FromIterator<(K, ScalarValue)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, ScalarValue)>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Reads a count, mapping null to 0 and logging unconvertible values as 0.
pub fn to_count(value: Option<&ScalarValue>) -> i64 {
    match value {
        None => 0,
        Some(v) if v.is_null() => 0,
        Some(v) => scalar_to_i64(v).unwrap_or_else(|| {
            warn!(value = %v, "Cannot convert value to int, using 0");
            0
        }),
    }
}

/// Converts an integral scalar to `i64`.
pub fn scalar_to_i64(value: &ScalarValue) -> Option<i64> {
    match value {
        ScalarValue::Int8(v) => v.map(i64::from),
        ScalarValue::Int16(v) => v.map(i64::from),
        ScalarValue::Int32(v) => v.map(i64::from),
        ScalarValue::Int64(v) => *v,
        ScalarValue::UInt8(v) => v.map(i64::from),
        ScalarValue::UInt16(v) => v.map(i64::from),
        ScalarValue::UInt32(v) => v.map(i64::from),
        ScalarValue::UInt64(v) => v.and_then(|v| i64::try_from(v).ok()),
        ScalarValue::Float32(v) => v.filter(|f| f.is_finite()).map(|f| f as i64),
        ScalarValue::Float64(v) => v.filter(|f| f.is_finite()).map(|f| f as i64),
        ScalarValue::Decimal128(v, _, scale) => v.and_then(|v| {
            let factor = 10i128.checked_pow(u32::from(scale.unsigned_abs()))?;
            let v = if *scale >= 0 {
                v / factor
            } else {
                v.checked_mul(factor)?
            };
            i64::try_from(v).ok()
        }),
        ScalarValue::Utf8(v) | ScalarValue::LargeUtf8(v) | ScalarValue::Utf8View(v) => {
            v.as_deref().and_then(parse_integer)
        }
        _ => None,
    }
}

/// Converts a numeric scalar to `f64`.
pub fn scalar_to_f64(value: &ScalarValue) -> Option<f64> {
    match value {
        ScalarValue::Float32(v) => v.map(f64::from),
        ScalarValue::Float64(v) => *v,
        ScalarValue::Decimal128(v, _, scale) => {
            v.map(|v| v as f64 / 10f64.powi(i32::from(*scale)))
        }
        ScalarValue::Utf8(v) | ScalarValue::LargeUtf8(v) | ScalarValue::Utf8View(v) => {
            v.as_deref().and_then(|s| s.trim().parse::<f64>().ok())
        }
        other => scalar_to_i64(other).map(|v| v as f64),
    }
}

fn scalar_to_timestamp(value: &ScalarValue) -> Option<DateTime<Utc>> {
    match value {
        ScalarValue::TimestampSecond(Some(v), _) => DateTime::from_timestamp(*v, 0),
        ScalarValue::TimestampMillisecond(Some(v), _) => DateTime::from_timestamp_millis(*v),
        ScalarValue::TimestampMicrosecond(Some(v), _) => DateTime::from_timestamp_micros(*v),
        ScalarValue::TimestampNanosecond(Some(v), _) => Some(DateTime::from_timestamp_nanos(*v)),
        ScalarValue::Date32(Some(days)) => DateTime::from_timestamp(i64::from(*days) * 86_400, 0),
        ScalarValue::Date64(Some(ms)) | ScalarValue::Int64(Some(ms)) => {
            DateTime::from_timestamp_millis(*ms)
        }
        ScalarValue::Utf8(Some(s)) | ScalarValue::LargeUtf8(Some(s)) | ScalarValue::Utf8View(Some(s)) => {
            parse_timestamp(s)
        }
        _ => None,
    }
}

fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i64)
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// Executes queries against one bound table.
///
/// Implementations own connection handling; the profiler only issues
/// read-only `SELECT`s. A runner may be used from several tasks at once when
/// table accuracy is computed with concurrency above one.
#[async_trait]
pub trait QueryRunner: Send + Sync + Debug {
    /// Dialect used to render queries.
    fn dialect(&self) -> Dialect;

    /// Database (catalog) the connection points at, if known.
    fn database(&self) -> Option<&str>;

    /// The live table the runner is bound to.
    fn table(&self) -> &TableName;

    /// Executes `query` and returns every row.
    async fn all(&self, query: &SelectQuery) -> Result<Vec<Row>>;

    /// Executes `query` and returns the first row, if any.
    async fn first(&self, query: &SelectQuery) -> Result<Option<Row>> {
        Ok(self.all(query).await?.into_iter().next())
    }

    /// Evaluates `projections` over the bound table and returns the first row.
    async fn select_first_from_table(&self, projections: Vec<Projection>) -> Result<Option<Row>> {
        let query = SelectQuery::new(projections, self.table().clone());
        self.first(&query).await
    }
}
