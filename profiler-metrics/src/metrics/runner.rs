//! Evaluation of a metric set for one scope.

use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use super::context::MetricResults;
use super::name::MetricName;
use super::registry::{MetricImpl, MetricRegistry};
use super::traits::{ComposedMetric, MetricScope, StaticMetric};
use crate::error::{ProfilerError, Result};
use crate::runner::QueryRunner;

/// Type alias for progress callback function.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Evaluates metrics for a table or a column.
///
/// Data metrics run first, all in a single projection when pushed down.
/// Composed metrics then run in dependency order over the collected results.
/// Dependencies of requested composed metrics are added automatically.
///
/// # Example
///
/// ```rust,ignore
/// use profiler_metrics::metrics::{MetricName, MetricRunner, MetricScope};
///
/// let results = MetricRunner::new()
///     .add(MetricName::AccuracyProportion)
///     .run(&runner, &MetricScope::column(&table, column))
///     .await?;
/// println!("{:?}", results.get(MetricName::AccuracyProportion));
/// ```
pub struct MetricRunner {
    metrics: Vec<MetricName>,
    on_progress: Option<ProgressCallback>,
    continue_on_error: bool,
}

impl Default for MetricRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricRunner {
    /// Creates an empty runner.
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
            on_progress: None,
            continue_on_error: true,
        }
    }

    /// Adds a metric to the run.
    #[allow(clippy::should_implement_trait)]
    pub fn add(mut self, name: MetricName) -> Self {
        if !self.metrics.contains(&name) {
            self.metrics.push(name);
        }
        self
    }

    /// Adds several metrics to the run.
    pub fn with_metrics(self, names: impl IntoIterator<Item = MetricName>) -> Self {
        names.into_iter().fold(self, Self::add)
    }

    /// Sets a progress callback receiving values between 0.0 and 1.0.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Sets whether failing metrics are recorded and skipped (the default) or
    /// abort the run. Type mismatches always abort.
    pub fn continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Requested metrics plus their dependencies, dependencies first.
    pub fn execution_order(&self) -> Vec<MetricName> {
        fn visit(name: MetricName, registry: &MetricRegistry, order: &mut Vec<MetricName>) {
            if order.contains(&name) {
                return;
            }
            if let Some(composed) = registry.lookup(name).as_composed() {
                for dep in composed.required_metrics() {
                    visit(*dep, registry, order);
                }
            }
            order.push(name);
        }

        let registry = MetricRegistry::global();
        let mut order = Vec::new();
        for name in &self.metrics {
            visit(*name, registry, &mut order);
        }
        order
    }

    /// Evaluates the metrics by pushing aggregates down through `runner`.
    #[instrument(skip_all, fields(metric_count = self.metrics.len(), column = scope.column.map(|c| c.name.as_str())))]
    pub async fn run(&self, runner: &dyn QueryRunner, scope: &MetricScope<'_>) -> Result<MetricResults> {
        let mut progress = Progress::new(self);
        let mut results = self.start(scope);
        let (data, composed) = self.split();

        let mut projected = Vec::new();
        let mut projections = Vec::new();
        for metric in data {
            match metric.projection(scope) {
                Ok(projection) => {
                    projections.push(projection);
                    projected.push(metric);
                }
                Err(e) => {
                    self.absorb(&mut results, metric.name(), e.into())?;
                    progress.tick();
                }
            }
        }

        if !projections.is_empty() {
            match runner.select_first_from_table(projections).await {
                Ok(row) => {
                    for metric in &projected {
                        let value = row.as_ref().and_then(|r| metric.value_from_row(r));
                        results.store(metric.name(), value);
                        progress.tick();
                    }
                }
                Err(e) => {
                    error!("Metric query failed: {}", e);
                    if !self.continue_on_error {
                        return Err(e);
                    }
                    for metric in &projected {
                        results.record_error(metric.name(), &e);
                        progress.tick();
                    }
                }
            }
        }

        self.compute_composed(&mut results, &composed, &mut progress);
        Ok(self.finish(results))
    }

    /// Evaluates the metrics over in-memory partitions.
    #[instrument(skip_all, fields(metric_count = self.metrics.len(), partitions = partitions.len()))]
    pub fn run_in_memory(
        &self,
        scope: &MetricScope<'_>,
        partitions: &[RecordBatch],
    ) -> Result<MetricResults> {
        let mut progress = Progress::new(self);
        let mut results = self.start(scope);
        let (data, composed) = self.split();

        for metric in data {
            match metric.df_fn(scope, partitions) {
                Ok(value) => results.store(metric.name(), value),
                Err(e) => self.absorb(&mut results, metric.name(), e.into())?,
            }
            progress.tick();
        }

        self.compute_composed(&mut results, &composed, &mut progress);
        Ok(self.finish(results))
    }

    fn split(&self) -> (Vec<&'static Arc<dyn StaticMetric>>, Vec<&'static Arc<dyn ComposedMetric>>) {
        let registry = MetricRegistry::global();
        let mut data = Vec::new();
        let mut composed = Vec::new();
        for name in self.execution_order() {
            match registry.lookup(name) {
                MetricImpl::Static(m) | MetricImpl::Window(m) => data.push(m),
                MetricImpl::Composed(m) => composed.push(m),
            }
        }
        (data, composed)
    }

    fn start(&self, scope: &MetricScope<'_>) -> MetricResults {
        info!("Starting metric run with {} metrics", self.metrics.len());
        let mut results = MetricResults::new();
        results.metadata_mut().column = scope.column.map(|c| c.name.clone());
        results.metadata_mut().record_start();
        results
    }

    fn finish(&self, mut results: MetricResults) -> MetricResults {
        results.metadata_mut().record_end();
        if let Some(duration) = results.metadata().duration() {
            info!(
                "Metric run completed in {:.2}s",
                duration.num_milliseconds() as f64 / 1000.0
            );
        }
        results
    }

    /// Records a failure, or returns it when the run must stop.
    fn absorb(&self, results: &mut MetricResults, name: MetricName, err: ProfilerError) -> Result<()> {
        if err.is_type_mismatch() || !self.continue_on_error {
            return Err(err);
        }
        error!("Metric {} failed: {}", name, err);
        results.record_error(name, err);
        Ok(())
    }

    fn compute_composed(
        &self,
        results: &mut MetricResults,
        composed: &[&'static Arc<dyn ComposedMetric>],
        progress: &mut Progress,
    ) {
        for metric in composed {
            let missing: Vec<_> = metric
                .required_metrics()
                .iter()
                .filter(|dep| !results.contains(**dep))
                .collect();
            if missing.is_empty() {
                let value = metric.compute(results);
                debug!("Composed metric {} = {:?}", metric.name(), value);
                results.store(metric.name(), value);
            } else {
                let missing = missing
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                results.record_error(metric.name(), format!("missing dependencies: {missing}"));
            }
            progress.tick();
        }
    }
}

struct Progress {
    callback: Option<ProgressCallback>,
    total: f64,
    completed: f64,
}

impl Progress {
    fn new(runner: &MetricRunner) -> Self {
        Self {
            callback: runner.on_progress.clone(),
            total: runner.execution_order().len().max(1) as f64,
            completed: 0.0,
        }
    }

    fn tick(&mut self) {
        self.completed += 1.0;
        if let Some(callback) = &self.callback {
            callback(self.completed / self.total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TableEntity;
    use crate::metrics::types::MetricValue;
    use crate::sources::DataFusionRunner;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use datafusion::prelude::SessionContext;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("email", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
                Arc::new(StringArray::from(vec![
                    Some("a@example.com"),
                    Some("b@example.com"),
                    Some("c@example.com"),
                    None,
                ])),
            ],
        )
        .unwrap()
    }

    fn runner() -> DataFusionRunner {
        let ctx = SessionContext::new();
        ctx.register_batch("users", batch()).unwrap();
        DataFusionRunner::new(ctx, "users")
    }

    fn table() -> TableEntity {
        TableEntity::from_arrow_schema("users", &batch().schema())
    }

    #[test]
    fn test_dependencies_come_first() {
        let order = MetricRunner::new()
            .add(MetricName::NullProportion)
            .execution_order();
        assert_eq!(
            order,
            vec![
                MetricName::NullCount,
                MetricName::ValuesCount,
                MetricName::NullProportion
            ]
        );
    }

    #[tokio::test]
    async fn test_pushdown_run() {
        let table = table();
        let scope = MetricScope::column(&table, table.column("email").unwrap());
        let results = MetricRunner::new()
            .with_metrics([
                MetricName::AccuracyProportion,
                MetricName::ConsistencyProportion,
                MetricName::NullProportion,
            ])
            .run(&runner(), &scope)
            .await
            .unwrap();

        assert_eq!(results.get_i64(MetricName::ValuesCount), Some(3));
        assert_eq!(results.get_i64(MetricName::AccuracyEmailCount), Some(3));
        assert_eq!(
            results.get(MetricName::AccuracyProportion),
            Some(&MetricValue::Double(1.0))
        );
        assert_eq!(
            results.get(MetricName::ConsistencyProportion),
            Some(&MetricValue::Double(1.0))
        );
        assert_eq!(results.get_f64(MetricName::NullProportion), Some(0.25));
        assert!(!results.has_errors());
    }

    #[tokio::test]
    async fn test_type_mismatch_aborts_run() {
        let table = table();
        let scope = MetricScope::column(&table, table.column("id").unwrap());
        let err = MetricRunner::new()
            .add(MetricName::AccuracyEmailCount)
            .run(&runner(), &scope)
            .await
            .unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[tokio::test]
    async fn test_query_failure_is_recorded() {
        let table = table();
        let scope = MetricScope::column(&table, table.column("email").unwrap());
        let missing = DataFusionRunner::new(SessionContext::new(), "users");
        let results = MetricRunner::new()
            .add(MetricName::DistinctProportion)
            .run(&missing, &scope)
            .await
            .unwrap();
        // Both counts failed, so the ratio is reported as missing its inputs.
        assert_eq!(results.errors().len(), 3);
        assert!(!results.contains(MetricName::DistinctProportion));

        let err = MetricRunner::new()
            .add(MetricName::DistinctCount)
            .continue_on_error(false)
            .run(&missing, &scope)
            .await;
        assert!(err.is_err());
    }

    #[test]
    fn test_in_memory_run_and_progress() {
        let table = table();
        let scope = MetricScope::column(&table, table.column("email").unwrap());
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();

        let results = MetricRunner::new()
            .add(MetricName::DistinctProportion)
            .on_progress(move |p| sink.lock().unwrap().push(p))
            .run_in_memory(&scope, &[batch()])
            .unwrap();

        assert_eq!(results.get_f64(MetricName::DistinctProportion), Some(1.0));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(*seen.last().unwrap(), 1.0);
    }
}
