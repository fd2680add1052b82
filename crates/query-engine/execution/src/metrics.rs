//! Metrics setup and update for the query service.

use prometheus::core::{AtomicF64, AtomicI64, AtomicU64, GenericCounter, GenericGauge};
use prometheus::{IntCounterVec, Opts, Registry};

use crate::error::ExecutionError;
use crate::pool::PoolStatus;

pub use prometheus::Error;

#[derive(Debug, Clone)]
pub struct Metrics {
    pub query_total: GenericCounter<AtomicU64>,
    pub query_success_total: GenericCounter<AtomicU64>,
    pub rejection_total: IntCounterVec,
    pub generation_failure_total: GenericCounter<AtomicU64>,
    pub execution_timeout_total: GenericCounter<AtomicU64>,
    pub database_error_total: GenericCounter<AtomicU64>,
    pub pool_size: GenericGauge<AtomicI64>,
    pub pool_idle_count: GenericGauge<AtomicI64>,
    pub pool_active_count: GenericGauge<AtomicI64>,
    pub pool_max_connections: GenericGauge<AtomicI64>,
    pub pool_min_connections: GenericGauge<AtomicI64>,
    pub pool_acquire_timeout: GenericGauge<AtomicF64>,
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, Error> {
    let int_counter = prometheus::IntCounter::with_opts(Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}

/// Create a new int counter metric with labels and register it with the provided Prometheus Registry
fn add_int_counter_vec_metric(
    metrics_registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
    labels: &[&str],
) -> Result<IntCounterVec, Error> {
    let counter_vec = IntCounterVec::new(Opts::new(metric_name, metric_description), labels)?;
    metrics_registry.register(Box::new(counter_vec.clone()))?;
    Ok(counter_vec)
}

/// Create a new int gauge metric and register it with the provided Prometheus Registry
fn add_int_gauge_metric(
    metrics_registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericGauge<AtomicI64>, Error> {
    let int_gauge = prometheus::IntGauge::with_opts(Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_gauge.clone()))?;
    Ok(int_gauge)
}

/// Create a new gauge metric and register it with the provided Prometheus Registry
fn add_gauge_metric(
    metrics_registry: &mut Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericGauge<AtomicF64>, Error> {
    let gauge = prometheus::Gauge::with_opts(Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

/// Setup counters and gauges used to produce Prometheus metrics
pub fn initialise_metrics(metrics_registry: &mut Registry) -> Result<Metrics, Error> {
    let query_total = add_int_counter_metric(
        metrics_registry,
        "nom_nlq_query_total",
        "Total questions received.",
    )?;

    let query_success_total = add_int_counter_metric(
        metrics_registry,
        "nom_nlq_query_success_total",
        "Total questions answered with results.",
    )?;

    let rejection_total = add_int_counter_vec_metric(
        metrics_registry,
        "nom_nlq_rejection_total",
        "Total generated statements rejected by the validator, by reason.",
        &["reason"],
    )?;

    let generation_failure_total = add_int_counter_metric(
        metrics_registry,
        "nom_nlq_generation_failure_total",
        "Total failed calls to the generation service while producing SQL.",
    )?;

    let execution_timeout_total = add_int_counter_metric(
        metrics_registry,
        "nom_nlq_execution_timeout_total",
        "Total statements cancelled for exceeding the statement timeout.",
    )?;

    let database_error_total = add_int_counter_metric(
        metrics_registry,
        "nom_nlq_database_error_total",
        "Total statements that failed in the database.",
    )?;

    let pool_size = add_int_gauge_metric(
        metrics_registry,
        "nom_nlq_pool_size",
        "The number of connections currently active. This includes idle connections.",
    )?;

    let pool_idle_count = add_int_gauge_metric(
        metrics_registry,
        "nom_nlq_pool_idle",
        "The number of connections active and idle (not in use).",
    )?;

    let pool_active_count = add_int_gauge_metric(
        metrics_registry,
        "nom_nlq_pool_active",
        "The number of connections current active. This does not include idle connections.",
    )?;

    let pool_max_connections = add_int_gauge_metric(
        metrics_registry,
        "nom_nlq_pool_max_connections",
        "The maximum number of connections that this pool should maintain.",
    )?;

    let pool_min_connections = add_int_gauge_metric(
        metrics_registry,
        "nom_nlq_pool_min_connections",
        "The minimum number of connections that this pool should maintain.",
    )?;

    let pool_acquire_timeout = add_gauge_metric(
        metrics_registry,
        "nom_nlq_pool_acquire_timeout",
        "Get the maximum amount of time to spend waiting for a connection, in seconds.",
    )?;

    Ok(Metrics {
        query_total,
        query_success_total,
        rejection_total,
        generation_failure_total,
        execution_timeout_total,
        database_error_total,
        pool_size,
        pool_idle_count,
        pool_active_count,
        pool_max_connections,
        pool_min_connections,
        pool_acquire_timeout,
    })
}

impl Metrics {
    pub fn record_rejection(&self, reason: &str) {
        self.rejection_total.with_label_values(&[reason]).inc();
    }

    pub fn record_execution_error(&self, error: &ExecutionError) {
        match error {
            ExecutionError::QueryTimeout => self.execution_timeout_total.inc(),
            ExecutionError::Database(_) => self.database_error_total.inc(),
            ExecutionError::PoolUnavailable(_) => {}
        }
    }

    // update all pool gauges
    pub fn update_pool_metrics(&self, status: &PoolStatus) {
        let pool_size = i64::from(status.size);
        self.pool_size.set(pool_size);

        let pool_idle = i64::try_from(status.idle).unwrap_or(i64::MAX);
        self.pool_idle_count.set(pool_idle);
        self.pool_active_count.set(pool_size - pool_idle);

        self.pool_max_connections
            .set(i64::from(status.max_connections));
        self.pool_min_connections
            .set(i64::from(status.min_connections));
        self.pool_acquire_timeout
            .set(status.acquire_timeout.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn registers_every_metric_once() {
        let mut registry = Registry::new();
        let metrics = initialise_metrics(&mut registry).unwrap();
        metrics.record_rejection("forbidden-keyword");

        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"nom_nlq_query_total".to_string()));
        assert!(names.contains(&"nom_nlq_rejection_total".to_string()));
        assert!(names.contains(&"nom_nlq_pool_acquire_timeout".to_string()));

        assert!(initialise_metrics(&mut registry).is_err());
    }

    #[test]
    fn pool_gauges_follow_the_status() {
        let mut registry = Registry::new();
        let metrics = initialise_metrics(&mut registry).unwrap();
        metrics.update_pool_metrics(&PoolStatus {
            size: 12,
            idle: 5,
            max_connections: 20,
            min_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        });

        assert_eq!(metrics.pool_size.get(), 12);
        assert_eq!(metrics.pool_idle_count.get(), 5);
        assert_eq!(metrics.pool_active_count.get(), 7);
        assert_eq!(metrics.pool_max_connections.get(), 20);
        assert!((metrics.pool_acquire_timeout.get() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn execution_errors_are_counted_by_kind() {
        let mut registry = Registry::new();
        let metrics = initialise_metrics(&mut registry).unwrap();
        metrics.record_execution_error(&ExecutionError::QueryTimeout);
        metrics.record_execution_error(&ExecutionError::Database("boom".into()));
        metrics.record_execution_error(&ExecutionError::Database("bang".into()));

        assert_eq!(metrics.execution_timeout_total.get(), 1);
        assert_eq!(metrics.database_error_total.get(), 2);
    }
}
