//! Observer port - abstraction for training observation
//!
//! Keeps progress bars, metrics and logging out of the training loop itself.

use crate::{
    Result,
    tictactoe::{GameOutcome, Player},
};

/// Summary of one finished training episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// Index of the episode (0-based)
    pub episode: usize,
    pub outcome: GameOutcome,
    /// Number of steps taken in the episode
    pub moves: usize,
    /// Which mark the learning agent played, `None` in self-play
    pub agent_player: Option<Player>,
    /// ε of the X table (or the single table) after decay
    pub epsilon_x: f64,
    /// ε of the O table after decay, self-play only
    pub epsilon_o: Option<f64>,
}

impl EpisodeSummary {
    /// Mark whose results count as wins: the learning agent, or X in self-play
    pub fn perspective(&self) -> Player {
        self.agent_player.unwrap_or(Player::X)
    }

    /// Result as seen from [`perspective`](Self::perspective): 1 win, 0 draw, -1 loss
    pub fn result(&self) -> i8 {
        match self.outcome {
            GameOutcome::Win(winner) if winner == self.perspective() => 1,
            GameOutcome::Win(_) => -1,
            GameOutcome::Draw => 0,
        }
    }
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. `on_episode_end(summary)` - after each completed episode
/// 3. `on_training_end(completed)` - once, also after cancellation
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes or is cancelled.
    ///
    /// `completed` is the number of episodes actually played.
    fn on_training_end(&mut self, _completed: usize) -> Result<()> {
        Ok(())
    }
}
