//! Synthetic pod fleets for load testing and benchmarking

use podscore_common::PodMetrics;
use rand::Rng;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetSpec {
    pub pods: usize,
    pub adapters_per_pod: usize,
    /// Exclusive upper bound of the generated queue counts
    pub max_queue: u64,
}

impl Default for FleetSpec {
    fn default() -> Self {
        Self {
            pods: 30,
            adapters_per_pod: 30,
            max_queue: 10,
        }
    }
}

/// Generate pods named `Pod0..PodN` with random load
///
/// Utilization is drawn from `(0, 1]` so every pod has a defined logarithm.
pub fn generate_fleet(spec: &FleetSpec) -> Vec<PodMetrics> {
    generate_fleet_with(spec, &mut rand::rng())
}

pub fn generate_fleet_with<R: Rng>(spec: &FleetSpec, rng: &mut R) -> Vec<PodMetrics> {
    (0..spec.pods)
        .map(|i| {
            let adapters = (0..spec.adapters_per_pod)
                .map(|_| Uuid::new_v4().to_string())
                .collect();
            let kv_cache_util = 1.0 - rng.random::<f64>();
            let queue_count = if spec.max_queue == 0 {
                0
            } else {
                rng.random_range(0..spec.max_queue)
            };

            PodMetrics::new(format!("Pod{}", i), kv_cache_util, queue_count)
                .with_adapters(adapters)
        })
        .collect()
}
