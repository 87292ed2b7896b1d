pub mod clamp;
pub mod decode;
pub mod scorer;

pub use clamp::{clamp_upper, ClampPolicy};
pub use decode::{decode_and_select_pod, decode_pod_metrics};
pub use scorer::{score_pod, score_pods, select_pod, PodScorer};
