pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod metrics;
pub mod scoring;

pub use config::{InvalidUtilPolicy, ScoringConfig};
pub use error::{ErrorKind, PodScoreError, Result};
pub use podscore_common::{PodMetrics, ScoredPod};
pub use scoring::{decode_and_select_pod, select_pod, ClampPolicy, PodScorer};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
