//! Greedy evaluation matches between two policies.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::Policy,
    tictactoe::{GameOutcome, Player, TicTacToe},
};

/// Tally of an evaluation run, counted from `perspective`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub perspective: Player,
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl EvaluationResult {
    fn rate(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.losses)
    }

    /// Share of games won or drawn
    pub fn non_loss_rate(&self) -> f64 {
        self.rate(self.wins + self.draws)
    }
}

/// Plays complete games between an X policy and an O policy.
///
/// Neither side learns; a [`QLearningAgent`](crate::q_learning::QLearningAgent)
/// plays greedily through its [`Policy`] implementation.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    games: usize,
    perspective: Player,
}

impl Evaluator {
    /// Count results from X's side by default.
    pub fn new(games: usize) -> Self {
        Self {
            games,
            perspective: Player::X,
        }
    }

    pub fn with_perspective(mut self, perspective: Player) -> Self {
        self.perspective = perspective;
        self
    }

    /// Play one game from the empty board.
    pub fn play_game(x: &mut dyn Policy, o: &mut dyn Policy) -> Result<GameOutcome> {
        let mut env = TicTacToe::new();
        loop {
            if let Some(outcome) = env.outcome() {
                return Ok(outcome);
            }
            let state = env.state_key();
            let legal = env.legal_actions();
            let action = match env.current_player() {
                Player::X => x.choose_action(&state, &legal)?,
                Player::O => o.choose_action(&state, &legal)?,
            };
            env.step(action)?;
        }
    }

    pub fn run(&self, x: &mut dyn Policy, o: &mut dyn Policy) -> Result<EvaluationResult> {
        let mut result = EvaluationResult {
            perspective: self.perspective,
            games: 0,
            wins: 0,
            draws: 0,
            losses: 0,
        };

        for _ in 0..self.games {
            match Self::play_game(x, o)? {
                GameOutcome::Win(winner) if winner == self.perspective => result.wins += 1,
                GameOutcome::Win(_) => result.losses += 1,
                GameOutcome::Draw => result.draws += 1,
            }
            result.games += 1;
        }

        log::debug!(
            "{} (X) vs {} (O): {}/{}/{} from {}'s side",
            x.name(),
            o.name(),
            result.wins,
            result.draws,
            result.losses,
            self.perspective
        );
        Ok(result)
    }
}
