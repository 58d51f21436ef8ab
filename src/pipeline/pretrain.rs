//! Bootstrap pretraining on historical positions.
//!
//! Recorded games are finished games, so each sample is thinned out into an
//! earlier position before the agent makes one exploratory move from it. The
//! move is learned with the ordinary TD update; the sample's label only
//! decides the reward.

use rand::{Rng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    app::PretrainConfig,
    ports::{HistoricalSample, SampleLabel, SampleSource},
    q_learning::{QLearningAgent, agent::build_rng},
    tictactoe::{Board, Cell, GameOutcome, Player, TicTacToe},
};

/// Play `games` random-vs-random games and record their final boards,
/// labelled [`SampleLabel::Win`] exactly when X won.
pub fn synthetic_samples<R: Rng + ?Sized>(games: usize, rng: &mut R) -> Result<Vec<HistoricalSample>> {
    let mut env = TicTacToe::new();
    let mut samples = Vec::with_capacity(games);

    for _ in 0..games {
        env.reset();
        let outcome = loop {
            if let Some(outcome) = env.outcome() {
                break outcome;
            }
            let legal = env.legal_actions();
            let action = *legal.choose(rng).ok_or(Error::NoValidMoves)?;
            env.step(action)?;
        };

        let label = match outcome {
            GameOutcome::Win(Player::X) => SampleLabel::Win,
            _ => SampleLabel::Negative,
        };
        samples.push(HistoricalSample {
            board: *env.board(),
            label,
        });
    }

    Ok(samples)
}

/// Read `source`, generating `fallback_games` synthetic samples if it cannot
/// be opened.
///
/// # Errors
///
/// Only errors other than [`Error::DataSourceUnavailable`] are returned.
pub fn load_or_synthesize<R: Rng + ?Sized>(
    source: &dyn SampleSource,
    fallback_games: usize,
    rng: &mut R,
) -> Result<Vec<HistoricalSample>> {
    match source.load_samples() {
        Ok(samples) => {
            log::info!("Loaded {} samples from {}", samples.len(), source.describe());
            Ok(samples)
        }
        Err(err @ Error::DataSourceUnavailable { .. }) => {
            log::warn!("{err}; generating {fallback_games} synthetic games instead");
            synthetic_samples(fallback_games, rng)
        }
        Err(err) => Err(err),
    }
}

/// Reward for a pretraining move, taken from the sample's label.
///
/// +1 if the label says X won and X has just won, -1 if the label says X did
/// not win and O has just won, 0 for everything else.
pub fn label_reward(label: SampleLabel, outcome: Option<GameOutcome>) -> f64 {
    match (label, outcome) {
        (SampleLabel::Win, Some(GameOutcome::Win(Player::X))) => 1.0,
        (SampleLabel::Negative, Some(GameOutcome::Win(Player::O))) => -1.0,
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PretrainReport {
    /// Sampled positions
    pub steps: usize,
    /// TD updates applied
    pub updates: usize,
    /// Positions that were already decided after thinning
    pub skipped_terminal: usize,
}

pub struct Pretrainer {
    config: PretrainConfig,
    rng: StdRng,
}

impl Pretrainer {
    pub fn new(config: PretrainConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            rng: build_rng(seed),
        }
    }

    /// Clear between 1 and 3 random marks, always leaving at least 2.
    ///
    /// Boards with 2 or fewer marks are returned unchanged.
    pub fn thin_out(&mut self, board: Board) -> Board {
        let mut board = board;
        let occupied = board.occupied_cells();
        if occupied.len() > 2 {
            let count = self.rng.random_range(1..=(occupied.len() - 2).min(3));
            for &position in occupied.choose_multiple(&mut self.rng, count) {
                board.set(position, Cell::Empty);
            }
        }
        board
    }

    /// Replay `config.steps` sampled positions into `agent`.
    pub fn run(
        &mut self,
        agent: &mut QLearningAgent,
        samples: &[HistoricalSample],
    ) -> Result<PretrainReport> {
        let mut report = PretrainReport::default();
        if samples.is_empty() {
            log::info!("No historical samples available, skipping pretraining");
            return Ok(report);
        }

        let total = self.config.steps;
        for step in 0..total {
            let Some(sample) = samples.choose(&mut self.rng) else {
                break;
            };
            report.steps += 1;

            let board = self.thin_out(sample.board);
            let mut env = TicTacToe::from_position(board, board.turn_from_counts());
            let legal = env.legal_actions();

            if env.is_done() || legal.is_empty() {
                log::debug!("Skipping decided position {board:?}");
                report.skipped_terminal += 1;
            } else {
                let state = env.state_key();
                let action = agent.select_action(&state, &legal, true)?;
                let outcome = env.step(action)?;
                let reward = if outcome.done {
                    label_reward(sample.label, env.outcome())
                } else {
                    0.0
                };

                agent.update(
                    &state,
                    action,
                    reward,
                    &env.state_key(),
                    &env.legal_actions(),
                    outcome.done,
                );
                report.updates += 1;
            }

            if self.config.log_every > 0 && step % self.config.log_every == 0 {
                log::info!(
                    "Pretraining step {step}/{total}, epsilon={:.3}",
                    agent.epsilon()
                );
            }
        }

        log::info!(
            "Pretraining completed: {} updates from {} samples",
            report.updates,
            samples.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::{adapters::CsvSampleSource, app::AgentConfig, types::StateKey};

    fn sample(values: [i8; 9], label: SampleLabel) -> HistoricalSample {
        HistoricalSample {
            board: Board::from_values(&values).unwrap(),
            label,
        }
    }

    #[test]
    fn test_synthetic_samples_are_finished_games() {
        let mut rng = StdRng::seed_from_u64(5);
        let samples = synthetic_samples(200, &mut rng).unwrap();
        assert_eq!(samples.len(), 200);
        for s in &samples {
            let env = TicTacToe::from_position(s.board, Player::X);
            assert!(env.is_done());
            let x_won = s.board.winner() == Some(Player::X);
            assert_eq!(s.label == SampleLabel::Win, x_won);
        }
    }

    #[test]
    fn test_missing_source_falls_back() {
        let source = CsvSampleSource::new("/nonexistent_dir_12345/tic-tac-toe.data");
        let mut rng = StdRng::seed_from_u64(1);
        let samples = load_or_synthesize(&source, 25, &mut rng).unwrap();
        assert_eq!(samples.len(), 25);
    }

    #[test]
    fn test_thin_out_bounds() {
        let mut pretrainer = Pretrainer::new(PretrainConfig::default(), Some(3));
        let full = Board::from_values(&[1, -1, 1, 1, -1, -1, -1, 1, 1]).unwrap();
        for _ in 0..200 {
            let thinned = pretrainer.thin_out(full).occupied_count();
            assert!((6..=8).contains(&thinned), "got {thinned}");
        }

        let three = Board::from_values(&[1, -1, 1, 0, 0, 0, 0, 0, 0]).unwrap();
        for _ in 0..50 {
            assert_eq!(pretrainer.thin_out(three).occupied_count(), 2);
        }

        let two = Board::from_values(&[1, 0, 0, 0, -1, 0, 0, 0, 0]).unwrap();
        assert_eq!(pretrainer.thin_out(two), two);
    }

    #[test]
    fn test_label_reward() {
        let x_won = Some(GameOutcome::Win(Player::X));
        let o_won = Some(GameOutcome::Win(Player::O));
        assert_eq!(label_reward(SampleLabel::Win, x_won), 1.0);
        assert_eq!(label_reward(SampleLabel::Negative, o_won), -1.0);
        assert_eq!(label_reward(SampleLabel::Win, o_won), 0.0);
        assert_eq!(label_reward(SampleLabel::Negative, x_won), 0.0);
        assert_eq!(label_reward(SampleLabel::Win, Some(GameOutcome::Draw)), 0.0);
        assert_eq!(label_reward(SampleLabel::Win, None), 0.0);
    }

    #[test]
    fn test_run_updates_the_sampled_decision_point() {
        let config = PretrainConfig::default().with_steps(10);
        let mut pretrainer = Pretrainer::new(config, Some(11));
        let mut agent = QLearningAgent::new(AgentConfig::default().with_seed(2)).unwrap();
        let samples = [sample([1, 0, 0, 0, -1, 0, 0, 0, 0], SampleLabel::Win)];

        let report = pretrainer.run(&mut agent, &samples).unwrap();
        assert_eq!(report.steps, 10);
        assert_eq!(report.updates, 10);
        assert_eq!(report.skipped_terminal, 0);

        let state: StateKey = "X...O...._X".parse().unwrap();
        assert!(agent.q_table().iter().all(|(s, _, _)| *s == state));
        // Non-terminal moves with an empty table keep every value at 0
        assert!(agent.q_table().iter().all(|(_, _, v)| v == 0.0));
    }

    #[test]
    fn test_steps_split_into_updates_and_skips() {
        let config = PretrainConfig::default().with_steps(300);
        let mut pretrainer = Pretrainer::new(config, Some(8));
        let mut agent = QLearningAgent::new(AgentConfig::default().with_seed(4)).unwrap();
        let samples = [
            sample([1, 1, 1, -1, -1, 0, 0, 0, 0], SampleLabel::Win),
            sample([1, -1, 1, 1, -1, -1, -1, 1, 1], SampleLabel::Negative),
            sample([-1, -1, -1, 1, 1, 0, 1, 0, 0], SampleLabel::Negative),
        ];

        let report = pretrainer.run(&mut agent, &samples).unwrap();
        assert_eq!(report.steps, 300);
        assert_eq!(report.updates + report.skipped_terminal, 300);
        assert!(report.updates > 0);
    }

    #[test]
    fn test_empty_samples_skip_pretraining() {
        let mut pretrainer = Pretrainer::new(PretrainConfig::default(), Some(1));
        let mut agent = QLearningAgent::new(AgentConfig::default()).unwrap();
        assert_eq!(pretrainer.run(&mut agent, &[]).unwrap(), PretrainReport::default());
        assert!(agent.q_table().is_empty());
    }
}
