use serde::{Deserialize, Serialize};

/// Knobs for synthetic series generation. Also the memo-cache key for generated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorParams {
    pub num_quarters: usize,
    pub start_year: i32,
    pub seed: u64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            num_quarters: 12,
            start_year: 2022,
            seed: 42,
        }
    }
}
