//! Core value types shared across modules

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    tictactoe::{Board, Cell, Player},
};

/// Identity of a decision point: the board snapshot plus the player to move.
///
/// Two positions with identical cells and mover are the same key no matter how
/// they were reached; every value-table lookup goes through this type. Equality
/// and hashing are structural.
///
/// The textual label is the nine cells (`X`, `O`, `.`) followed by `_` and the
/// mover, e.g. `X...O...._X`. Serialized keys use this label so that tables can
/// be written to formats that only allow string map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct StateKey {
    board: Board,
    to_move: Player,
}

impl StateKey {
    pub fn new(board: Board, to_move: Player) -> Self {
        Self { board, to_move }
    }

    /// Build a key from signed cell values.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is outside `{-1, 0, 1}`.
    pub fn from_values(values: &[i8; 9], to_move: Player) -> crate::Result<Self> {
        Ok(Self::new(Board::from_values(values)?, to_move))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn values(&self) -> [i8; 9] {
        self.board.values()
    }

    pub fn label(&self) -> String {
        let mut label: String = self.board.cells().iter().map(|c| c.to_char()).collect();
        label.push('_');
        label.push(self.to_move.to_char());
        label
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for StateKey {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| Error::InvalidStateKey {
            label: label.to_string(),
            reason: reason.to_string(),
        };

        let (board_part, player_part) = label
            .split_once('_')
            .ok_or_else(|| invalid("missing '_' separator"))?;

        if board_part.chars().count() != 9 {
            return Err(invalid("board part must have exactly 9 cells"));
        }

        let mut cells = [Cell::Empty; 9];
        for (idx, c) in board_part.chars().enumerate() {
            cells[idx] = Cell::from_char(c)
                .ok_or_else(|| invalid(&format!("invalid cell character '{c}'")))?;
        }

        let to_move = match player_part {
            "X" => Player::X,
            "O" => Player::O,
            _ => return Err(invalid("player must be 'X' or 'O'")),
        };

        Ok(Self::new(Board::from_cells(cells), to_move))
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.label()
    }
}

impl TryFrom<String> for StateKey {
    type Error = Error;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_label_roundtrip() {
        let key = StateKey::from_values(&[1, 0, 0, 0, -1, 0, 0, 0, 0], Player::X).unwrap();
        assert_eq!(key.label(), "X...O...._X");
        assert_eq!("X...O...._X".parse::<StateKey>().unwrap(), key);
    }

    #[test]
    fn test_mover_is_part_of_identity() {
        let board = Board::new();
        let as_x = StateKey::new(board, Player::X);
        let as_o = StateKey::new(board, Player::O);
        assert_ne!(as_x, as_o);

        let set: HashSet<StateKey> = [as_x, as_o, StateKey::new(Board::new(), Player::X)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_parse_rejects_malformed_labels() {
        assert!("XO".parse::<StateKey>().is_err());
        assert!("........._Z".parse::<StateKey>().is_err());
        assert!("........_X".parse::<StateKey>().is_err());
        assert!("........?_X".parse::<StateKey>().is_err());
        // Digit zero is not an alias for O
        assert!("0........_X".parse::<StateKey>().is_err());
    }

    #[test]
    fn test_json_uses_label() {
        let key = StateKey::from_values(&[0, 0, 0, 0, 1, 0, 0, 0, 0], Player::O).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"....X...._O\"");
        let back: StateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
