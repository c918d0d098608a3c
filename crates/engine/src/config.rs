use serde::{Deserialize, Serialize};

pub const DEFAULT_TILE_SIZE_PX: f64 = 48.0;
pub const DEFAULT_OPACITY_SPAN: f64 = 255.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Converts horizontal shake pixels into scroll units.
    pub tile_width: f64,
    /// Converts vertical shake pixels into scroll units.
    pub tile_height: f64,
    /// Opacity covered by one full fade.
    pub opacity_span: f64,
    /// Fixed seed for random waits; entropy-seeded when absent.
    pub rng_seed: Option<u64>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_SIZE_PX,
            tile_height: DEFAULT_TILE_SIZE_PX,
            opacity_span: DEFAULT_OPACITY_SPAN,
            rng_seed: None,
        }
    }
}

impl MotionConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng_seed: Some(seed),
            ..Self::default()
        }
    }
}
