//! Historical data port - finished games used for bootstrap pretraining.

use serde::{Deserialize, Serialize};

use crate::{Result, tictactoe::Board};

/// Outcome label attached to a recorded position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleLabel {
    /// The first player (X) won
    Win,
    /// The first player did not win (loss or draw)
    Negative,
}

impl SampleLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SampleLabel::Win => "win",
            SampleLabel::Negative => "negative",
        }
    }
}

/// A recorded (usually terminal) position and its label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub board: Board,
    pub label: SampleLabel,
}

/// Supplies historical samples.
pub trait SampleSource {
    /// Read every usable sample. Malformed records are skipped, not reported.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DataSourceUnavailable`] when the source cannot be
    /// opened at all; callers are expected to recover from it.
    fn load_samples(&self) -> Result<Vec<HistoricalSample>>;

    /// Human-readable origin of the samples, for log messages
    fn describe(&self) -> String;
}
