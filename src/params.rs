use serde::{Deserialize, Serialize};

use crate::types::Metric;

pub const DEFAULT_K: usize = 5;

/// Ranking defaults applied when a query leaves `k` or the metric out.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Params {
    pub k: usize,
    pub metric: Metric,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            metric: Metric::Euclidean,
        }
    }
}
