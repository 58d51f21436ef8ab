//! Observer implementations for training pipelines
//!
//! Observers collect data during training without coupling the episode loop
//! to a particular output.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{EpisodeSummary, Observer},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg}) eps {prefix}")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.result() {
            1 => self.wins += 1,
            -1 => self.losses += 1,
            _ => self.draws += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message());
            pb.set_prefix(match summary.epsilon_o {
                Some(eps_o) => format!("{:.3}/{eps_o:.3}", summary.epsilon_x),
                None => format!("{:.3}", summary.epsilon_x),
            });
        }
        Ok(())
    }

    fn on_training_end(&mut self, _completed: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Snapshot of the metrics gathered so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_game_length: f64,
    /// ε after the last episode (X table in self-play)
    pub final_epsilon: f64,
}

#[derive(Debug, Default)]
struct Metrics {
    wins: usize,
    draws: usize,
    losses: usize,
    total_games: usize,
    total_moves: usize,
    last_epsilon: f64,
}

/// Metrics observer - Tracks running tallies
///
/// Clones share their counters, so a clone kept by the caller can read the
/// metrics after the original has been boxed into a pipeline.
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    metrics: Arc<Mutex<Metrics>>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn metrics(&self) -> MutexGuard<'_, Metrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn summary(&self) -> MetricsSummary {
        let m = self.metrics();
        let rate = |count: usize| {
            if m.total_games == 0 {
                0.0
            } else {
                count as f64 / m.total_games as f64
            }
        };
        MetricsSummary {
            total_games: m.total_games,
            wins: m.wins,
            draws: m.draws,
            losses: m.losses,
            win_rate: rate(m.wins),
            draw_rate: rate(m.draws),
            loss_rate: rate(m.losses),
            avg_game_length: if m.total_games == 0 {
                0.0
            } else {
                m.total_moves as f64 / m.total_games as f64
            },
            final_epsilon: m.last_epsilon,
        }
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let mut m = self.metrics();
        m.total_games += 1;
        m.total_moves += summary.moves;
        m.last_epsilon = summary.epsilon_x;
        match summary.result() {
            1 => m.wins += 1,
            -1 => m.losses += 1,
            _ => m.draws += 1,
        }
        Ok(())
    }
}

/// Logs win/draw/loss rates over each window of `interval` episodes.
pub struct LogObserver {
    interval: usize,
    window: [usize; 3],
}

impl LogObserver {
    pub fn new(interval: usize) -> Self {
        Self {
            interval,
            window: [0; 3],
        }
    }
}

impl Observer for LogObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        log::info!("Training for {total_episodes} episodes");
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if self.interval == 0 {
            return Ok(());
        }
        match summary.result() {
            1 => self.window[0] += 1,
            0 => self.window[1] += 1,
            _ => self.window[2] += 1,
        }
        if (summary.episode + 1) % self.interval == 0 {
            let n = self.interval as f64;
            log::info!(
                "Episodes {}-{}: {} win {:.1}% draw {:.1}% loss {:.1}%",
                summary.episode + 1 - self.interval,
                summary.episode,
                summary.perspective(),
                self.window[0] as f64 / n * 100.0,
                self.window[1] as f64 / n * 100.0,
                self.window[2] as f64 / n * 100.0
            );
            self.window = [0; 3];
        }
        Ok(())
    }

    fn on_training_end(&mut self, completed: usize) -> Result<()> {
        log::info!("Training finished after {completed} episodes");
        Ok(())
    }
}
