//! Players: an identity plus a board.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::unit::Unit;

/// A player in a battle.
///
/// "Has lost" is derived from the board rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Stable player identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The player's units.
    pub board: Board,
}

impl Player {
    /// Create a player with a board.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, board: Board) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            board,
        }
    }

    /// All units, defeated ones included.
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.board.all_units()
    }

    /// Units with hp left.
    pub fn alive_units(&self) -> impl Iterator<Item = &Unit> {
        self.board.alive_units()
    }

    /// Whether the player still has a living unit.
    #[must_use]
    pub fn has_alive_units(&self) -> bool {
        self.board.has_alive_units()
    }

    /// A player has lost once no unit on the board is alive.
    #[must_use]
    pub fn has_lost(&self) -> bool {
        !self.has_alive_units()
    }

    /// Return this player with a replacement board.
    #[must_use]
    pub fn with_board(&self, board: Board) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            board,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::BoardPosition;
    use crate::unit::UnitStats;

    fn board_with(units: &[(&str, u32)]) -> Board {
        units
            .iter()
            .zip(BoardPosition::ALL)
            .fold(Board::new(), |board, ((id, hp), position)| {
                let unit = Unit::with_hp(*id, *hp, 4, 1).unwrap();
                board.place_unit(unit, position).unwrap()
            })
    }

    #[test]
    fn test_new_player() {
        let board = Board::new();
        let player = Player::new("player1", "Alice", board.clone());
        assert_eq!(player.id, "player1");
        assert_eq!(player.name, "Alice");
        assert_eq!(player.board, board);
    }

    #[test]
    fn test_alive_units() {
        let player = Player::new("p", "P", board_with(&[("a", 4), ("b", 0), ("c", 1)]));
        let alive: Vec<_> = player.alive_units().map(Unit::id).collect();
        assert_eq!(alive, vec!["a", "c"]);
        assert_eq!(player.all_units().count(), 3);
    }

    #[test]
    fn test_has_lost() {
        assert!(Player::new("p", "P", Board::new()).has_lost());
        assert!(Player::new("p", "P", board_with(&[("a", 0), ("b", 0)])).has_lost());
        assert!(!Player::new("p", "P", board_with(&[("a", 0), ("b", 2)])).has_lost());
    }

    #[test]
    fn test_with_board_is_copy_on_write() {
        let player = Player::new("p", "P", Board::new());
        let unit = Unit::from_stats(&UnitStats::new("w", 3, 2), 0, 0).unwrap();
        let board = player
            .board
            .place_unit(unit, BoardPosition::front(0).unwrap())
            .unwrap();

        let updated = player.with_board(board);
        assert!(player.has_lost());
        assert!(!updated.has_lost());
        assert_eq!(updated.id, player.id);
        assert_eq!(updated.name, player.name);
    }
}
