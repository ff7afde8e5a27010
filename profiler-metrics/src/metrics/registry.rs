//! The metric registry.
//!
//! Built once on first use and never mutated. Everything outside this module
//! refers to metrics by [`MetricName`] and resolves implementations here.

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::accuracy::{AccuracyCategory, AccuracyClassificationCount, AccuracyCount};
use super::composed::{AccuracyRatio, ConsistencyRatio, DistinctRatio, NullRatio};
use super::name::MetricName;
use super::statics::{ColumnCount, ColumnNames, DistinctCount, NullCount, RowCount, ValuesCount};
use super::traits::{ComposedMetric, Metric, MetricKind, StaticMetric};
use super::types::MetricType;
use super::window::Median;

/// A registered implementation, tagged by how it is evaluated.
#[derive(Debug, Clone)]
pub enum MetricImpl {
    /// Plain aggregate over data.
    Static(Arc<dyn StaticMetric>),
    /// Ordered aggregate over data.
    Window(Arc<dyn StaticMetric>),
    /// Derived from other metrics.
    Composed(Arc<dyn ComposedMetric>),
}

impl MetricImpl {
    /// Name reported by the implementation.
    pub fn name(&self) -> MetricName {
        match self {
            MetricImpl::Static(m) | MetricImpl::Window(m) => m.name(),
            MetricImpl::Composed(m) => m.name(),
        }
    }

    /// Semantic return type.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricImpl::Static(m) | MetricImpl::Window(m) => m.metric_type(),
            MetricImpl::Composed(m) => m.metric_type(),
        }
    }

    /// Variant tag.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricImpl::Static(_) => MetricKind::Static,
            MetricImpl::Window(_) => MetricKind::Window,
            MetricImpl::Composed(_) => MetricKind::Composed,
        }
    }

    /// The data-touching implementation, if this is one.
    pub fn as_static(&self) -> Option<&Arc<dyn StaticMetric>> {
        match self {
            MetricImpl::Static(m) | MetricImpl::Window(m) => Some(m),
            MetricImpl::Composed(_) => None,
        }
    }

    /// The composed implementation, if this is one.
    pub fn as_composed(&self) -> Option<&Arc<dyn ComposedMetric>> {
        match self {
            MetricImpl::Composed(m) => Some(m),
            _ => None,
        }
    }
}

fn build(name: MetricName) -> MetricImpl {
    let classification =
        |c: AccuracyCategory| MetricImpl::Static(Arc::new(AccuracyClassificationCount::new(c)));
    match name {
        MetricName::RowCount => MetricImpl::Static(Arc::new(RowCount)),
        MetricName::ColumnCount => MetricImpl::Static(Arc::new(ColumnCount)),
        MetricName::ColumnNames => MetricImpl::Static(Arc::new(ColumnNames)),
        MetricName::ValuesCount => MetricImpl::Static(Arc::new(ValuesCount)),
        MetricName::NullCount => MetricImpl::Static(Arc::new(NullCount)),
        MetricName::DistinctCount => MetricImpl::Static(Arc::new(DistinctCount)),
        MetricName::AccuracyAddressCount => classification(AccuracyCategory::Address),
        MetricName::AccuracyBankCardNumberCount => classification(AccuracyCategory::BankCardNumber),
        MetricName::AccuracyChineseNameCount => classification(AccuracyCategory::ChineseName),
        MetricName::AccuracyDateCount => classification(AccuracyCategory::Date),
        MetricName::AccuracyEmailCount => classification(AccuracyCategory::Email),
        MetricName::AccuracyIdNumberCount => classification(AccuracyCategory::IdNumber),
        MetricName::AccuracyIpAddressCount => classification(AccuracyCategory::IpAddress),
        MetricName::AccuracyPhoneCount => classification(AccuracyCategory::Phone),
        MetricName::AccuracyPostCodeCount => classification(AccuracyCategory::PostCode),
        MetricName::AccuracyUrlCount => classification(AccuracyCategory::Url),
        MetricName::AccuracyCount => MetricImpl::Static(Arc::new(AccuracyCount::new())),
        MetricName::Median => MetricImpl::Window(Arc::new(Median)),
        MetricName::AccuracyProportion => MetricImpl::Composed(Arc::new(AccuracyRatio::new())),
        MetricName::ConsistencyProportion => MetricImpl::Composed(Arc::new(ConsistencyRatio)),
        MetricName::NullProportion => MetricImpl::Composed(Arc::new(NullRatio)),
        MetricName::DistinctProportion => MetricImpl::Composed(Arc::new(DistinctRatio)),
    }
}

static REGISTRY: Lazy<MetricRegistry> = Lazy::new(MetricRegistry::build);

/// Immutable name-to-implementation mapping.
#[derive(Debug)]
pub struct MetricRegistry {
    // Indexed by `MetricName::ordinal`.
    entries: Vec<MetricImpl>,
}

impl MetricRegistry {
    fn build() -> Self {
        Self {
            entries: MetricName::ALL.into_iter().map(build).collect(),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static MetricRegistry {
        &REGISTRY
    }

    /// Implementation registered under `name`.
    pub fn lookup(&self, name: MetricName) -> &MetricImpl {
        &self.entries[name.ordinal()]
    }

    /// Implementation registered under a textual name.
    pub fn lookup_str(&self, name: &str) -> crate::error::Result<&MetricImpl> {
        Ok(self.lookup(name.parse()?))
    }

    /// Every registered metric.
    pub fn iter(&self) -> impl Iterator<Item = (MetricName, &MetricImpl)> {
        MetricName::ALL.into_iter().zip(self.entries.iter())
    }
}

/// Shorthand for [`MetricRegistry::global`]`.lookup(name)`.
pub fn lookup(name: MetricName) -> &'static MetricImpl {
    MetricRegistry::global().lookup(name)
}
