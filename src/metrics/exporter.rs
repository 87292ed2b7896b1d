use crate::metrics::collector::ScoringMetrics;
use crate::{PodScoreError, Result};
use prometheus::{Encoder, TextEncoder};

impl ScoringMetrics {
    /// Render every registered instrument in the Prometheus text format
    pub fn encode(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let families = self.registry().gather();

        let mut buffer = Vec::new();
        encoder
            .encode(&families, &mut buffer)
            .map_err(|e| PodScoreError::MetricsError(e.to_string()))?;

        String::from_utf8(buffer).map_err(|e| PodScoreError::MetricsError(e.to_string()))
    }
}
