//! Decoding path: raw UTF-8 JSON bytes in, ranked pods out

use crate::config::ScoringConfig;
use crate::scoring::scorer::{score_pods, PodScorer};
use crate::{PodScoreError, Result};
use podscore_common::{PodMetrics, ScoredPod};
use serde_json::value::RawValue;

impl PodScorer {
    /// Decode a JSON pod array and rank it, using the configured `decode_clamp`
    pub fn decode_and_select_pod(&self, raw: impl AsRef<[u8]>) -> Result<Vec<ScoredPod>> {
        let clamp = self.config().decode_clamp;
        self.observe(|| {
            let pods = decode_pod_metrics(raw.as_ref())?;
            score_pods(&pods, clamp, self.config())
        })
    }
}

/// Decode and rank with the default configuration
pub fn decode_and_select_pod(raw: impl AsRef<[u8]>) -> Result<Vec<ScoredPod>> {
    let config = ScoringConfig::default();
    let pods = decode_pod_metrics(raw.as_ref())?;
    score_pods(&pods, config.decode_clamp, &config)
}

/// Decode `raw` into validated pod records
///
/// Byte, syntax and top-level shape problems are `DecodeError`s. A
/// well-formed element with missing, mistyped or unrepresentable fields is a
/// `ValidationError` carrying the element index.
pub fn decode_pod_metrics(raw: &[u8]) -> Result<Vec<PodMetrics>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| PodScoreError::DecodeError(format!("invalid UTF-8: {}", e)))?;

    // RawValue only checks syntax; numbers are converted per element below
    let document: &RawValue = serde_json::from_str(text)
        .map_err(|e| PodScoreError::DecodeError(format!("malformed JSON: {}", e)))?;

    let body = document.get().trim_start();
    if !body.starts_with('[') {
        return Err(PodScoreError::DecodeError(format!(
            "expected a JSON array of pods, got {}",
            json_type(body)
        )));
    }

    let items: Vec<&RawValue> = serde_json::from_str(body)
        .map_err(|e| PodScoreError::DecodeError(format!("malformed JSON: {}", e)))?;

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_str(item.get())
                .map_err(|e| PodScoreError::validation(index, e.to_string()))
        })
        .collect()
}

/// Kind of a syntactically valid JSON value, from its first character
fn json_type(body: &str) -> &'static str {
    match body.chars().next() {
        Some('n') => "null",
        Some('t') | Some('f') => "a boolean",
        Some('"') => "a string",
        Some('[') => "an array",
        Some('{') => "an object",
        _ => "a number",
    }
}
