//! Directional calls emitted by the prediction generator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

/// One labeled prediction card. Recomputed from scratch every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub name: String,
    pub direction: Direction,
    /// Integer confidence in [0, 100].
    pub confidence: u8,
    pub horizon: String,
    pub rationale: String,
}
