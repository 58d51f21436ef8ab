//! Training orchestrator: self-play between two tables, or one table against
//! a random opponent.

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::{Deserialize, Serialize};

use super::opponents::RandomPolicy;
use crate::{
    Error, Result,
    ports::{EpisodeSummary, Observer, Policy},
    q_learning::QLearningAgent,
    tictactoe::{GameOutcome, Player, TicTacToe},
    types::StateKey,
};

/// Which mark the learning table plays against the random opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Fixed(Player),
    /// X on even episodes, O on odd ones
    Alternating,
}

impl AgentRole {
    pub fn player_for(self, episode: usize) -> Player {
        match self {
            AgentRole::Fixed(player) => player,
            AgentRole::Alternating if episode % 2 == 0 => Player::X,
            AgentRole::Alternating => Player::O,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    /// Two independently learning tables, one per mark
    SelfPlay,
    /// One table against a uniformly random opponent
    VersusRandom { role: AgentRole },
}

/// Training configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Random seed for the agents and the opponent
    pub seed: Option<u64>,

    pub mode: TrainingMode,

    /// Log ε every this many episodes (0 disables)
    pub log_every: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 50_000,
            seed: None,
            mode: TrainingMode::SelfPlay,
            log_every: 5_000,
        }
    }
}

/// Result of a training run
///
/// Tallies are from X's point of view in self-play and from the learning
/// table's point of view against the random opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub total_games: usize,

    pub wins: usize,

    pub draws: usize,

    pub losses: usize,

    pub win_rate: f64,

    pub draw_rate: f64,

    pub loss_rate: f64,

    /// Stopped early through the stop flag
    #[serde(default)]
    pub cancelled: bool,
}

impl TrainingResult {
    pub fn new(total_games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if total_games > 0 {
                count as f64 / total_games as f64
            } else {
                0.0
            }
        };

        Self {
            total_games,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            cancelled: false,
        }
    }

    /// Share of episodes not lost
    pub fn non_loss_rate(&self) -> f64 {
        self.win_rate + self.draw_rate
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

#[derive(Default)]
struct Tally {
    wins: usize,
    draws: usize,
    losses: usize,
    played: usize,
}

impl Tally {
    fn record(&mut self, outcome: GameOutcome, perspective: Player) {
        match outcome {
            GameOutcome::Win(winner) if winner == perspective => self.wins += 1,
            GameOutcome::Win(_) => self.losses += 1,
            GameOutcome::Draw => self.draws += 1,
        }
        self.played += 1;
    }

    fn finish(self, cancelled: bool) -> TrainingResult {
        let mut result = TrainingResult::new(self.played, self.wins, self.draws, self.losses);
        result.cancelled = cancelled;
        result
    }
}

/// Last decision of a table still waiting for its TD update
type Pending = Option<(StateKey, usize)>;

/// Episode loop shared by both training modes.
///
/// # Examples
///
/// ```
/// use ttt_qlearn::app::AgentConfig;
/// use ttt_qlearn::pipeline::{TrainingConfig, TrainingPipeline};
/// use ttt_qlearn::q_learning::QLearningAgent;
///
/// let mut agent_x = QLearningAgent::new(AgentConfig::default())?;
/// let mut agent_o = QLearningAgent::new(AgentConfig::default())?;
/// let config = TrainingConfig { episodes: 100, seed: Some(1), ..TrainingConfig::default() };
///
/// let result = TrainingPipeline::new(config).run_self_play(&mut agent_x, &mut agent_o)?;
/// assert_eq!(result.total_games, 100);
/// # Ok::<(), ttt_qlearn::Error>(())
/// ```
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
    stop_flag: Option<Arc<AtomicBool>>,
    opponent: RandomPolicy,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            stop_flag: None,
            opponent: RandomPolicy::new(config.seed.map(|seed| seed.wrapping_add(2))),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Stop before the next episode once `flag` is set.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    fn should_stop(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn seed_pair(&self, agent_x: &mut QLearningAgent, agent_o: &mut QLearningAgent) {
        if let Some(seed) = self.config.seed {
            agent_x.reseed(seed);
            agent_o.reseed(seed.wrapping_add(1));
        }
    }

    fn notify_start(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }
        Ok(())
    }

    fn notify_episode(&mut self, summary: &EpisodeSummary) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_episode_end(summary)?;
        }
        Ok(())
    }

    fn notify_end(&mut self, completed: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_end(completed)?;
        }
        Ok(())
    }

    fn log_due(&self, episode: usize) -> bool {
        self.config.log_every > 0 && episode % self.config.log_every == 0
    }

    /// Train two tables against each other, X moving first every episode.
    ///
    /// Each table's previous decision is updated with reward 0 once its next
    /// decision point is reached. When the game ends, the last decision of
    /// both tables receives its terminal reward (+1 winner, -1 loser, 0 draw),
    /// including the table whose move did not end the game. ε of both tables
    /// decays after every episode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the pipeline is configured
    /// for [`TrainingMode::VersusRandom`].
    pub fn run_self_play(
        &mut self,
        agent_x: &mut QLearningAgent,
        agent_o: &mut QLearningAgent,
    ) -> Result<TrainingResult> {
        if self.config.mode != TrainingMode::SelfPlay {
            return Err(Error::InvalidConfiguration {
                message: "self-play requires TrainingMode::SelfPlay".to_string(),
            });
        }

        self.seed_pair(agent_x, agent_o);
        self.notify_start()?;

        let total = self.config.episodes;
        let mut env = TicTacToe::new();
        let mut tally = Tally::default();
        let mut cancelled = false;
        let mut agents = [agent_x, agent_o];

        for episode in 0..total {
            if self.should_stop() {
                cancelled = true;
                break;
            }

            env.reset();
            let mut pending: [Pending; 2] = [None, None];
            let mut moves = 0;

            let outcome = loop {
                let mover = env.current_player();
                let agent = &mut agents[mover.index()];
                let state = env.state_key();
                let legal = env.legal_actions();

                if let Some((prev_state, prev_action)) = pending[mover.index()].take() {
                    agent.update(&prev_state, prev_action, 0.0, &state, &legal, false);
                }

                let action = agent.select_action(&state, &legal, true)?;
                env.step(action)?;
                moves += 1;
                pending[mover.index()] = Some((state, action));

                if let Some(outcome) = env.outcome() {
                    for player in [Player::X, Player::O] {
                        if let Some((last_state, last_action)) = pending[player.index()].take() {
                            agents[player.index()].update(
                                &last_state,
                                last_action,
                                outcome.reward_for(player),
                                &env.state_key_for(player),
                                &[],
                                true,
                            );
                        }
                    }
                    break outcome;
                }
            };

            for agent in agents.iter_mut() {
                agent.decay_epsilon();
            }
            tally.record(outcome, Player::X);

            let summary = EpisodeSummary {
                episode,
                outcome,
                moves,
                agent_player: None,
                epsilon_x: agents[0].epsilon(),
                epsilon_o: Some(agents[1].epsilon()),
            };
            self.notify_episode(&summary)?;

            if self.log_due(episode) {
                log::info!(
                    "Episode {episode}/{total} | eps X={:.3} | eps O={:.3}",
                    agents[0].epsilon(),
                    agents[1].epsilon()
                );
            }
        }

        if cancelled {
            log::warn!("Training cancelled after {} of {total} episodes", tally.played);
        }
        self.notify_end(tally.played)?;
        Ok(tally.finish(cancelled))
    }

    /// Train one table against a uniformly random opponent.
    ///
    /// The table's reward is deferred until the opponent has replied: a reply
    /// that ends the game is credited to the table's previous move as its
    /// terminal outcome (+1 / -1 / 0 from the table's side).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless the pipeline is
    /// configured for [`TrainingMode::VersusRandom`].
    pub fn run_versus_random(&mut self, agent: &mut QLearningAgent) -> Result<TrainingResult> {
        let role = match self.config.mode {
            TrainingMode::VersusRandom { role } => role,
            TrainingMode::SelfPlay => {
                return Err(Error::InvalidConfiguration {
                    message: "training against a random opponent requires TrainingMode::VersusRandom"
                        .to_string(),
                });
            }
        };

        if let Some(seed) = self.config.seed {
            agent.reseed(seed);
        }
        self.notify_start()?;

        let total = self.config.episodes;
        let mut env = TicTacToe::new();
        let mut tally = Tally::default();
        let mut cancelled = false;

        for episode in 0..total {
            if self.should_stop() {
                cancelled = true;
                break;
            }

            let agent_player = role.player_for(episode);
            env.reset();
            let mut pending: Pending = None;
            let mut moves = 0;

            let outcome = loop {
                let state = env.state_key();
                let legal = env.legal_actions();

                if env.current_player() == agent_player {
                    if let Some((prev_state, prev_action)) = pending.take() {
                        agent.update(&prev_state, prev_action, 0.0, &state, &legal, false);
                    }
                    let action = agent.select_action(&state, &legal, true)?;
                    env.step(action)?;
                    pending = Some((state, action));
                } else {
                    let action = self.opponent.choose_action(&state, &legal)?;
                    env.step(action)?;
                }
                moves += 1;

                if let Some(outcome) = env.outcome() {
                    if let Some((last_state, last_action)) = pending.take() {
                        agent.update(
                            &last_state,
                            last_action,
                            outcome.reward_for(agent_player),
                            &env.state_key_for(agent_player),
                            &[],
                            true,
                        );
                    }
                    break outcome;
                }
            };

            agent.decay_epsilon();
            tally.record(outcome, agent_player);

            let summary = EpisodeSummary {
                episode,
                outcome,
                moves,
                agent_player: Some(agent_player),
                epsilon_x: agent.epsilon(),
                epsilon_o: None,
            };
            self.notify_episode(&summary)?;

            if self.log_due(episode) {
                log::info!(
                    "Episode {episode}/{total} | eps={:.3} | agent plays {agent_player}",
                    agent.epsilon()
                );
            }
        }

        if cancelled {
            log::warn!("Training cancelled after {} of {total} episodes", tally.played);
        }
        self.notify_end(tally.played)?;
        Ok(tally.finish(cancelled))
    }
}
