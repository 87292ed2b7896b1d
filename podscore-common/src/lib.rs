//! Shared types between the podscore library, its CLI and callers
//!
//! This crate defines the records that cross the scoring boundary:
//! - `PodMetrics` is the per-pod load snapshot a caller hands in
//! - `ScoredPod` is one entry of the ranked result
//!
//! Serde derives are gated behind the `serde` feature (on by default) so
//! callers that only build records in-process can skip the dependency.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Load snapshot of a single pod
///
/// Field names match the JSON payload consumed by the decoding path:
/// `pod_name`, `kv_cache_util`, `queue_count` and the optional `adapters`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PodMetrics {
    pub pod_name: String,
    /// KV cache utilization, must be strictly positive
    pub kv_cache_util: f64,
    pub queue_count: u64,
    /// Adapters loaded on the pod. Carried through, never scored.
    #[cfg_attr(feature = "serde", serde(default))]
    pub adapters: Vec<String>,
}

impl PodMetrics {
    pub fn new(pod_name: impl Into<String>, kv_cache_util: f64, queue_count: u64) -> Self {
        Self {
            pod_name: pod_name.into(),
            kv_cache_util,
            queue_count,
            adapters: Vec::new(),
        }
    }

    pub fn with_adapters(mut self, adapters: Vec<String>) -> Self {
        self.adapters = adapters;
        self
    }
}

/// One ranked entry: higher score means more preferred
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoredPod {
    pub pod_name: String,
    pub score: i32,
}

impl ScoredPod {
    pub fn new(pod_name: impl Into<String>, score: i32) -> Self {
        Self {
            pod_name: pod_name.into(),
            score,
        }
    }
}

/// Scoring constants
pub mod weights {
    /// Multiplier applied to the truncated `ln(kv_cache_util)` term
    pub const UTIL_LOG_WEIGHT: i64 = 10;
    /// Score added per queued request
    pub const QUEUE_PENALTY: i64 = -10_000;
    /// Upper bound of a score, the largest 32-bit signed integer
    pub const SCORE_CEILING: i64 = i32::MAX as i64;
}

const _: () = {
    assert!(
        weights::QUEUE_PENALTY < 0,
        "queue penalty must push scores down"
    );
    assert!(
        weights::SCORE_CEILING == 2_147_483_647,
        "score ceiling must match a 32-bit signed field"
    );
};
