//! Clamp policies applied to a raw score before it is narrowed to `i32`
//!
//! Two policies exist because the decoding entry point historically used
//! `max` where the in-process entry point used `min`. `UpperBound` is the
//! sane guard; `ForcedConstant` pins every score to the ceiling and is kept
//! only as a compatibility mode.

use podscore_common::weights::SCORE_CEILING;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClampPolicy {
    /// `min(score, i32::MAX)`
    #[default]
    UpperBound,
    /// `max(score, i32::MAX)`: every score becomes `i32::MAX`
    ForcedConstant,
}

impl ClampPolicy {
    pub fn apply(self, raw: i64) -> i64 {
        match self {
            ClampPolicy::UpperBound => raw.min(SCORE_CEILING),
            ClampPolicy::ForcedConstant => raw.max(SCORE_CEILING),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClampPolicy::UpperBound => "upper-bound",
            ClampPolicy::ForcedConstant => "forced-constant",
        }
    }
}

impl FromStr for ClampPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upper-bound" | "upper_bound" | "min" => Ok(ClampPolicy::UpperBound),
            "forced-constant" | "forced_constant" | "max" => Ok(ClampPolicy::ForcedConstant),
            other => Err(format!(
                "unknown clamp policy '{}' (expected upper-bound or forced-constant)",
                other
            )),
        }
    }
}

impl std::fmt::Display for ClampPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-bound clamp on its own, `min(raw, i32::MAX)`
pub fn clamp_upper(raw: i64) -> i64 {
    ClampPolicy::UpperBound.apply(raw)
}
