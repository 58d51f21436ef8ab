//! Tic-Tac-Toe game implementation

pub mod board;
pub mod environment;
pub mod lines;
pub mod outcome;

pub use board::{Board, Cell, Player};
pub use environment::{Step, StepInfo, TicTacToe};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use outcome::GameOutcome;
