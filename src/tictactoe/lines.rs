//! Winning line analysis for Tic-Tac-Toe

use super::Player;

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Sum of the signed cell values along a line
    pub fn line_sum(values: &[i8; 9], line: &[usize; 3]) -> i8 {
        line.iter().map(|&idx| values[idx]).sum()
    }

    /// Find the owner of the first completed line.
    ///
    /// A line summing to `+3` belongs to X, `-3` to O. Lines are scanned rows,
    /// columns, then diagonals.
    pub fn line_winner(values: &[i8; 9]) -> Option<Player> {
        WINNING_LINES
            .iter()
            .find_map(|line| match Self::line_sum(values, line) {
                3 => Some(Player::X),
                -3 => Some(Player::O),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_line_wins_for_both_players() {
        for line in WINNING_LINES {
            for player in [Player::X, Player::O] {
                let mut values = [0i8; 9];
                for idx in line {
                    values[idx] = player.to_cell().value();
                }
                assert_eq!(LineAnalyzer::line_winner(&values), Some(player));
            }
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let values = [1, 1, -1, 0, 0, 0, 0, 0, 0];
        assert_eq!(LineAnalyzer::line_sum(&values, &WINNING_LINES[0]), 1);
        assert_eq!(LineAnalyzer::line_winner(&values), None);
    }
}
