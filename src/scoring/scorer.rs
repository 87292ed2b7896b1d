//! Load-based pod scoring
//!
//! Each pod gets
//!
//! ```text
//! score = trunc(ln(kv_cache_util)) * util_log_weight + queue_count * queue_penalty
//! ```
//!
//! clamped by a [`ClampPolicy`] and narrowed to `i32`. Pods are returned
//! highest score first; the sort is stable so equal scores keep input order.

use crate::config::{InvalidUtilPolicy, ScoringConfig};
use crate::metrics::ScoringMetrics;
use crate::scoring::{decode_pod_metrics, ClampPolicy};
use crate::{PodScoreError, Result};
use podscore_common::{PodMetrics, ScoredPod};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Scores and ranks pods according to a [`ScoringConfig`]
#[derive(Clone, Default)]
pub struct PodScorer {
    config: ScoringConfig,
    metrics: Option<Arc<ScoringMetrics>>,
}

impl PodScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails with `ConfigError` if `config` does not pass [`ScoringConfig::validate`]
    pub fn with_config(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: None,
        })
    }

    /// Record every call into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<ScoringMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Rank in-process records, using the configured `clamp` policy
    pub fn select_pod(&self, pods: &[PodMetrics]) -> Result<Vec<ScoredPod>> {
        let clamp = self.config.clamp;
        self.observe(|| score_pods(pods, clamp, &self.config))
    }

    /// Decode a JSON pod array, then rank it with the in-process `clamp` policy
    ///
    /// Decoding failures are recorded like scoring failures.
    pub fn select_pod_from_json(&self, raw: impl AsRef<[u8]>) -> Result<Vec<ScoredPod>> {
        let clamp = self.config.clamp;
        self.observe(|| {
            let pods = decode_pod_metrics(raw.as_ref())?;
            score_pods(&pods, clamp, &self.config)
        })
    }

    /// Runs `f` and records its outcome, if metrics are attached
    pub(crate) fn observe<F>(&self, f: F) -> Result<Vec<ScoredPod>>
    where
        F: FnOnce() -> Result<Vec<ScoredPod>>,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        match &result {
            Ok(ranked) => {
                debug!("Scored {} pods in {:?}", ranked.len(), elapsed);
                if let Some(metrics) = &self.metrics {
                    metrics.observe_batch(ranked.len(), elapsed);
                }
            }
            Err(e) => {
                warn!("Pod scoring failed: {}", e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(e.kind());
                }
            }
        }

        result
    }
}

/// Rank pods with the default configuration
pub fn select_pod(pods: &[PodMetrics]) -> Result<Vec<ScoredPod>> {
    score_pods(pods, ClampPolicy::UpperBound, &ScoringConfig::default())
}

/// Scoring core shared by every entry point
///
/// `clamp` is passed separately from `config` so that each call site picks
/// its policy explicitly.
pub fn score_pods(
    pods: &[PodMetrics],
    clamp: ClampPolicy,
    config: &ScoringConfig,
) -> Result<Vec<ScoredPod>> {
    let mut ranked = pods
        .iter()
        .enumerate()
        .map(|(index, pod)| {
            let score = score_pod(pod, index, clamp, config)?;
            Ok(ScoredPod::new(pod.pod_name.clone(), score))
        })
        .collect::<Result<Vec<_>>>()?;

    // slice::sort_by is stable
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    Ok(ranked)
}

/// Score a single pod; `index` is its position in the batch
pub fn score_pod(
    pod: &PodMetrics,
    index: usize,
    clamp: ClampPolicy,
    config: &ScoringConfig,
) -> Result<i32> {
    if pod.pod_name.is_empty() {
        return Err(PodScoreError::validation(index, "pod_name must not be empty"));
    }

    let util = pod.kv_cache_util;
    if !util.is_finite() || util <= 0.0 {
        return match config.invalid_util {
            InvalidUtilPolicy::Reject => Err(PodScoreError::domain(
                &pod.pod_name,
                format!("kv_cache_util must be positive and finite, got {}", util),
            )),
            // Bypasses the clamp: ForcedConstant would lift it to the ceiling.
            InvalidUtilPolicy::RankLast => {
                debug!(
                    "Pod {} has kv_cache_util {}, ranking last",
                    pod.pod_name, util
                );
                Ok(i32::MIN)
            }
        };
    }

    let raw = raw_score(util, pod.queue_count, config)
        .ok_or_else(|| PodScoreError::domain(&pod.pod_name, "score arithmetic overflowed"))?;

    let clamped = clamp.apply(raw);
    i32::try_from(clamped).map_err(|_| {
        PodScoreError::domain(
            &pod.pod_name,
            format!("score {} does not fit in a 32-bit signed integer", clamped),
        )
    })
}

/// Unclamped score, `None` on overflow
fn raw_score(util: f64, queue_count: u64, config: &ScoringConfig) -> Option<i64> {
    // ln of a finite positive f64 lies within roughly ±745
    let log_term = (util.ln().trunc() as i64).checked_mul(config.util_log_weight)?;
    let queue_term = i64::try_from(queue_count)
        .ok()?
        .checked_mul(config.queue_penalty)?;
    log_term.checked_add(queue_term)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(name: &str, util: f64, queue: u64) -> PodMetrics {
        PodMetrics::new(name, util, queue)
    }

    fn names(ranked: &[ScoredPod]) -> Vec<&str> {
        ranked.iter().map(|p| p.pod_name.as_str()).collect()
    }

    #[test]
    fn test_unit_util_empty_queue_scores_zero() {
        let ranked = select_pod(&[pod("p1", 1.0, 0)]).expect("Should score");
        assert_eq!(ranked, vec![ScoredPod::new("p1", 0)]);
    }

    #[test]
    fn test_log_term_truncates_toward_zero() {
        let config = ScoringConfig::default();
        let score = |util: f64| {
            score_pod(&pod("p", util, 0), 0, ClampPolicy::UpperBound, &config)
                .expect("Should score")
        };

        // ln(56.6834) ~ 4.04, ln(0.5) ~ -0.69, ln(0.01) ~ -4.6
        assert_eq!(score(56.6834), 40);
        assert_eq!(score(0.5), 0);
        assert_eq!(score(0.01), -40);
    }

    #[test]
    fn test_queue_dominates_util() {
        let ranked = select_pod(&[pod("a", 2.0, 1), pod("b", 2.0, 0)]).expect("Should score");
        assert_eq!(names(&ranked), vec!["b", "a"]);
        assert!(ranked[0].score > ranked[1].score);
        assert_eq!(ranked[1].score, -10_000);
    }

    #[test]
    fn test_original_fleet_ordering() {
        let ranked = select_pod(&[
            pod("pod1", 56.6834, 3),
            pod("pod2", 56.6834, 0),
            pod("pod3", 87.6834, 6),
        ])
        .expect("Should score");

        assert_eq!(names(&ranked), vec!["pod2", "pod1", "pod3"]);
        assert_eq!(ranked[0].score, 40);
        assert_eq!(ranked[1].score, -29_960);
        assert_eq!(ranked[2].score, -59_960);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = select_pod(&[
            pod("first", 1.5, 2),
            pod("high", 1.0, 0),
            pod("second", 1.2, 2),
            pod("third", 1.9, 2),
        ])
        .expect("Should score");

        assert_eq!(names(&ranked), vec!["high", "first", "second", "third"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_pod(&[]).expect("Should score").is_empty());
    }

    #[test]
    fn test_non_positive_util_is_domain_error() {
        for util in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = select_pod(&[pod("ok", 1.0, 0), pod("bad", util, 0)]).unwrap_err();
            match err {
                PodScoreError::DomainError { pod_name, .. } => assert_eq!(pod_name, "bad"),
                other => panic!("Expected DomainError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rank_last_policy() {
        let config = ScoringConfig {
            invalid_util: InvalidUtilPolicy::RankLast,
            ..Default::default()
        };
        let ranked = score_pods(
            &[pod("zero", 0.0, 0), pod("busy", 1.0, 5)],
            ClampPolicy::ForcedConstant,
            &config,
        )
        .expect("Should score");

        assert_eq!(names(&ranked), vec!["busy", "zero"]);
        assert_eq!(ranked[1].score, i32::MIN);
    }

    #[test]
    fn test_empty_name_is_validation_error() {
        let err = select_pod(&[pod("a", 1.0, 0), pod("", 1.0, 0)]).unwrap_err();
        assert!(matches!(err, PodScoreError::ValidationError { index: 1, .. }));
    }

    #[test]
    fn test_huge_queue_overflows() {
        let err = select_pod(&[pod("a", 1.0, u64::MAX)]).unwrap_err();
        assert!(matches!(err, PodScoreError::DomainError { .. }));

        // Fits in i64 but not in i32 after clamping
        let err = select_pod(&[pod("b", 1.0, 1_000_000)]).unwrap_err();
        assert!(err.to_string().contains("32-bit"));
    }

    #[test]
    fn test_forced_constant_erases_ranking() {
        let ranked = score_pods(
            &[pod("a", 2.0, 3), pod("b", 2.0, 0), pod("c", 9.0, 1)],
            ClampPolicy::ForcedConstant,
            &ScoringConfig::default(),
        )
        .expect("Should score");

        assert_eq!(names(&ranked), vec!["a", "b", "c"]);
        assert!(ranked.iter().all(|p| p.score == i32::MAX));
    }

    #[test]
    fn test_with_config_rejects_invalid_weights() {
        let err = PodScorer::with_config(ScoringConfig {
            queue_penalty: 0,
            ..Default::default()
        })
        .err()
        .expect("zero queue penalty should be rejected");
        assert_eq!(err.kind(), crate::ErrorKind::Config);

        let err = PodScorer::with_config(ScoringConfig {
            util_log_weight: -1,
            ..Default::default()
        })
        .err()
        .expect("negative log weight should be rejected");
        assert!(err.to_string().contains("util_log_weight"));
    }

    #[test]
    fn test_json_records_path_counts_decode_errors() {
        let metrics = Arc::new(ScoringMetrics::new().expect("metrics"));
        let scorer = PodScorer::new().with_metrics(metrics.clone());

        let err = scorer.select_pod_from_json(b"not json").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Decode);
        let err = scorer
            .select_pod_from_json(br#"[{"pod_name":"a"}]"#)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);

        assert_eq!(metrics.errors_total(crate::ErrorKind::Decode), 1);
        assert_eq!(metrics.errors_total(crate::ErrorKind::Validation), 1);
        assert_eq!(metrics.batches_total(), 0);
    }

    #[test]
    fn test_json_records_path_uses_in_process_clamp() {
        let scorer = PodScorer::with_config(ScoringConfig {
            clamp: ClampPolicy::ForcedConstant,
            ..Default::default()
        })
        .expect("valid config");
        let ranked = scorer
            .select_pod_from_json(br#"[{"pod_name":"a","kv_cache_util":1.0,"queue_count":2}]"#)
            .expect("Should score");
        assert_eq!(ranked[0].score, i32::MAX);
    }

    #[test]
    fn test_scorer_records_metrics() {
        let metrics = Arc::new(ScoringMetrics::new().expect("metrics"));
        let scorer = PodScorer::new().with_metrics(metrics.clone());

        scorer
            .select_pod(&[pod("a", 1.0, 0), pod("b", 2.0, 1)])
            .expect("Should score");
        assert!(scorer.select_pod(&[pod("c", 0.0, 0)]).is_err());

        assert_eq!(metrics.batches_total(), 1);
        assert_eq!(metrics.pods_scored_total(), 2);
        assert_eq!(metrics.errors_total(crate::ErrorKind::Domain), 1);
    }
}
