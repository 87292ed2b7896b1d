pub mod collector;
pub mod exporter;

pub use collector::ScoringMetrics;
