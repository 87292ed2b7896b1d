//! Scoring configuration
//!
//! Loaded from YAML, then optionally overridden from the environment:
//!
//! ```yaml
//! clamp: upper-bound
//! decode_clamp: forced-constant
//! invalid_util: reject
//! util_log_weight: 10
//! queue_penalty: -10000
//! ```

use crate::scoring::ClampPolicy;
use crate::{PodScoreError, Result};
use podscore_common::weights::{QUEUE_PENALTY, UTIL_LOG_WEIGHT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub const ENV_CLAMP: &str = "PODSCORE_CLAMP";
pub const ENV_DECODE_CLAMP: &str = "PODSCORE_DECODE_CLAMP";
pub const ENV_INVALID_UTIL: &str = "PODSCORE_INVALID_UTIL";

/// What to do with a pod whose `kv_cache_util` has no logarithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidUtilPolicy {
    /// Fail the whole call with a domain error
    #[default]
    Reject,
    /// Score the pod `i32::MIN` so it ranks after every valid pod
    RankLast,
}

impl FromStr for InvalidUtilPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(InvalidUtilPolicy::Reject),
            "rank-last" | "rank_last" => Ok(InvalidUtilPolicy::RankLast),
            other => Err(format!(
                "unknown invalid-util policy '{}' (expected reject or rank-last)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Clamp used by `select_pod`
    pub clamp: ClampPolicy,
    /// Clamp used by `decode_and_select_pod`
    pub decode_clamp: ClampPolicy,
    pub invalid_util: InvalidUtilPolicy,
    pub util_log_weight: i64,
    pub queue_penalty: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            clamp: ClampPolicy::UpperBound,
            decode_clamp: ClampPolicy::UpperBound,
            invalid_util: InvalidUtilPolicy::Reject,
            util_log_weight: UTIL_LOG_WEIGHT,
            queue_penalty: QUEUE_PENALTY,
        }
    }
}

impl ScoringConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: ScoringConfig = serde_yaml::from_str(yaml)
            .map_err(|e| PodScoreError::ConfigError(format!("Invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading scoring config from {}", path.display());

        let contents = std::fs::read_to_string(path).map_err(|e| {
            PodScoreError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Apply `PODSCORE_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CLAMP) {
            self.clamp = parse_env(ENV_CLAMP, &value)?;
        }
        if let Some(value) = lookup(ENV_DECODE_CLAMP) {
            self.decode_clamp = parse_env(ENV_DECODE_CLAMP, &value)?;
        }
        if let Some(value) = lookup(ENV_INVALID_UTIL) {
            self.invalid_util = parse_env(ENV_INVALID_UTIL, &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_penalty >= 0 {
            return Err(PodScoreError::ConfigError(format!(
                "queue_penalty must be negative, got {}",
                self.queue_penalty
            )));
        }
        if self.util_log_weight < 0 {
            return Err(PodScoreError::ConfigError(format!(
                "util_log_weight must not be negative, got {}",
                self.util_log_weight
            )));
        }
        Ok(())
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|e| PodScoreError::ConfigError(format!("{}: {}", key, e)))
}
