//! Game outcomes

use serde::{Deserialize, Serialize};

use super::board::Player;

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// Terminal reward seen by `player`: +1 win, -1 loss, 0 draw
    pub fn reward_for(self, player: Player) -> f64 {
        match self {
            GameOutcome::Win(winner) if winner == player => 1.0,
            GameOutcome::Win(_) => -1.0,
            GameOutcome::Draw => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewards_are_zero_sum() {
        for outcome in [
            GameOutcome::Win(Player::X),
            GameOutcome::Win(Player::O),
            GameOutcome::Draw,
        ] {
            let total = outcome.reward_for(Player::X) + outcome.reward_for(Player::O);
            assert_eq!(total, 0.0);
        }
    }
}
