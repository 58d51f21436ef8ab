//! Game environment: the state machine driven by training, evaluation and
//! interactive front ends.

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Player},
    outcome::GameOutcome,
};
use crate::{Error, Result, types::StateKey};

/// Side-channel information attached to a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// The action targeted an occupied cell and forfeited the game
    pub illegal: bool,
}

/// Result of a single [`TicTacToe::step`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Board after the step
    pub board: Board,
    /// Reward from the perspective of the player who just moved
    pub reward: f64,
    /// Whether the game is finished
    pub done: bool,
    pub info: StepInfo,
}

/// Two-player Tic-Tac-Toe environment.
///
/// Starts empty with X to move. Each legal step places the mover's mark and
/// either ends the game or hands the turn to the opponent. Once finished the
/// environment rejects further steps until [`reset`](Self::reset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToe {
    board: Board,
    current_player: Player,
    done: bool,
    outcome: Option<GameOutcome>,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            done: false,
            outcome: None,
        }
    }

    /// Set up an arbitrary position with `to_move` on turn.
    ///
    /// Piece counts are not validated: reconstructed positions may have been
    /// thinned out of order. Terminal status is derived from the board, so a
    /// position that already contains a line (or is full) starts finished.
    pub fn from_position(board: Board, to_move: Player) -> Self {
        let mut env = Self {
            board,
            current_player: to_move,
            done: false,
            outcome: None,
        };
        env.refresh_terminal();
        env
    }

    /// Clear the board and hand the first move to X.
    pub fn reset(&mut self) -> Board {
        self.board.clear();
        self.current_player = Player::X;
        self.done = false;
        self.outcome = None;
        self.board
    }

    /// Indices of the empty cells; empty once the game is decided.
    pub fn legal_actions(&self) -> Vec<usize> {
        if self.done {
            return Vec::new();
        }
        self.board.empty_cells()
    }

    /// Apply `action` for the current player.
    ///
    /// An occupied target is not an error: the game ends immediately, the
    /// opponent is recorded as winner, and the step reports a reward of `-1`
    /// with [`StepInfo::illegal`] set.
    ///
    /// # Errors
    ///
    /// - [`Error::GameOver`] if the game has already finished
    /// - [`Error::InvalidPosition`] if `action` is not in `0..9`
    pub fn step(&mut self, action: usize) -> Result<Step> {
        if self.done {
            return Err(Error::GameOver);
        }
        if action >= 9 {
            return Err(Error::InvalidPosition { position: action });
        }

        let mover = self.current_player;

        if !self.board.is_empty_at(action) {
            self.done = true;
            self.outcome = Some(GameOutcome::Win(mover.opponent()));
            return Ok(Step {
                board: self.board,
                reward: -1.0,
                done: true,
                info: StepInfo { illegal: true },
            });
        }

        self.board.set(action, mover.to_cell());
        self.refresh_terminal();

        if let Some(outcome) = self.outcome {
            return Ok(Step {
                board: self.board,
                reward: outcome.reward_for(mover),
                done: true,
                info: StepInfo::default(),
            });
        }

        self.current_player = mover.opponent();
        Ok(Step {
            board: self.board,
            reward: 0.0,
            done: false,
            info: StepInfo::default(),
        })
    }

    fn refresh_terminal(&mut self) {
        if let Some(winner) = self.board.winner() {
            self.done = true;
            self.outcome = Some(GameOutcome::Win(winner));
        } else if self.board.is_full() {
            self.done = true;
            self.outcome = Some(GameOutcome::Draw);
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Final outcome, `None` while the game is in progress
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Key for the current decision point
    pub fn state_key(&self) -> StateKey {
        StateKey::new(self.board, self.current_player)
    }

    /// Key for the current board as seen by `player`
    pub fn state_key_for(&self, player: Player) -> StateKey {
        StateKey::new(self.board, player)
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_state() {
        let mut env = TicTacToe::new();
        env.step(4).unwrap();
        let board = env.reset();
        assert_eq!(board, Board::new());
        assert_eq!(env.current_player(), Player::X);
        assert!(!env.is_done());
        assert_eq!(env.outcome(), None);
        assert_eq!(env.legal_actions(), (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_turn_alternates_on_non_terminal_steps() {
        let mut env = TicTacToe::new();
        let step = env.step(0).unwrap();
        assert_eq!(step.reward, 0.0);
        assert!(!step.done);
        assert_eq!(env.current_player(), Player::O);
        env.step(1).unwrap();
        assert_eq!(env.current_player(), Player::X);
        assert_eq!(env.board().values()[1], -1);
    }

    #[test]
    fn test_occupied_cell_forfeits() {
        let mut env = TicTacToe::new();
        env.step(4).unwrap();
        let step = env.step(4).unwrap();
        assert!(step.done);
        assert!(step.info.illegal);
        assert_eq!(step.reward, -1.0);
        assert_eq!(env.outcome(), Some(GameOutcome::Win(Player::X)));
        assert!(env.legal_actions().is_empty());
    }

    #[test]
    fn test_out_of_range_action() {
        let mut env = TicTacToe::new();
        assert!(matches!(
            env.step(9),
            Err(Error::InvalidPosition { position: 9 })
        ));
        assert!(!env.is_done());
    }

    #[test]
    fn test_from_position_detects_terminal() {
        let board = Board::from_values(&[1, 1, 1, -1, -1, 0, 0, 0, 0]).unwrap();
        let env = TicTacToe::from_position(board, Player::O);
        assert!(env.is_done());
        assert_eq!(env.outcome(), Some(GameOutcome::Win(Player::X)));

        let board = Board::from_values(&[1, 0, 0, 0, -1, 0, 0, 0, 0]).unwrap();
        let env = TicTacToe::from_position(board, Player::X);
        assert!(!env.is_done());
        assert_eq!(env.legal_actions().len(), 7);
    }
}
