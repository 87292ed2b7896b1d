use crate::error::ErrorKind;
use crate::{PodScoreError, Result};
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use std::time::Duration;

/// Prometheus instruments for scoring calls
///
/// Cheap to share behind an `Arc`: every instrument is atomic.
#[derive(Clone)]
pub struct ScoringMetrics {
    registry: Registry,
    batches_total: IntCounter,
    pods_scored_total: IntCounter,
    errors_total: IntCounterVec,
    batch_duration: Histogram,
}

impl ScoringMetrics {
    pub fn new() -> Result<Self> {
        Self::with_registry(Registry::new())
    }

    /// Register the instruments into an existing registry
    pub fn with_registry(registry: Registry) -> Result<Self> {
        let batches_total = IntCounter::with_opts(Opts::new(
            "podscore_batches_total",
            "Pod batches scored successfully",
        ))
        .map_err(metrics_err)?;

        let pods_scored_total = IntCounter::with_opts(Opts::new(
            "podscore_pods_scored_total",
            "Pods scored across all successful batches",
        ))
        .map_err(metrics_err)?;

        let errors_total = IntCounterVec::new(
            Opts::new("podscore_errors_total", "Scoring calls that failed, by error kind"),
            &["kind"],
        )
        .map_err(metrics_err)?;

        let batch_duration = Histogram::with_opts(
            HistogramOpts::new(
                "podscore_batch_duration_seconds",
                "Time spent scoring and sorting one batch",
            )
            .buckets(vec![
                0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05,
            ]),
        )
        .map_err(metrics_err)?;

        registry
            .register(Box::new(batches_total.clone()))
            .map_err(metrics_err)?;
        registry
            .register(Box::new(pods_scored_total.clone()))
            .map_err(metrics_err)?;
        registry
            .register(Box::new(errors_total.clone()))
            .map_err(metrics_err)?;
        registry
            .register(Box::new(batch_duration.clone()))
            .map_err(metrics_err)?;

        Ok(Self {
            registry,
            batches_total,
            pods_scored_total,
            errors_total,
            batch_duration,
        })
    }

    pub fn observe_batch(&self, pods: usize, elapsed: Duration) {
        self.batches_total.inc();
        self.pods_scored_total.inc_by(pods as u64);
        self.batch_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_error(&self, kind: ErrorKind) {
        self.errors_total.with_label_values(&[kind.as_str()]).inc();
    }

    pub fn batches_total(&self) -> u64 {
        self.batches_total.get()
    }

    pub fn pods_scored_total(&self) -> u64 {
        self.pods_scored_total.get()
    }

    pub fn errors_total(&self, kind: ErrorKind) -> u64 {
        self.errors_total.with_label_values(&[kind.as_str()]).get()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

fn metrics_err(e: prometheus::Error) -> PodScoreError {
    PodScoreError::MetricsError(e.to_string())
}
