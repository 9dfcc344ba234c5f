//! Five-slot boards.
//!
//! A [`Board`] is a fixed array of slots indexed by [`BoardPosition::index`]:
//! three front slots followed by two back slots. Boards are values; every
//! change returns a new board so earlier snapshots stay intact.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::position::{BoardPosition, Row, BOARD_SLOTS};
use crate::unit::Unit;

/// One slot of a board, borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSlot<'a> {
    /// Where the slot is.
    pub position: BoardPosition,
    /// Occupant, if any.
    pub unit: Option<&'a Unit>,
}

/// A board of three front slots and two back slots.
///
/// Invariant: a unit id occupies at most one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard", into = "RawBoard")]
pub struct Board {
    slots: [Option<Unit>; BOARD_SLOTS],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBoard {
    slots: [Option<Unit>; BOARD_SLOTS],
}

impl TryFrom<RawBoard> for Board {
    type Error = BattleError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        let mut board = Self::new();
        for (index, unit) in raw.slots.into_iter().enumerate() {
            if let (Some(unit), Some(position)) = (unit, BoardPosition::from_index(index)) {
                board = board.place_unit(unit, position)?;
            }
        }
        Ok(board)
    }
}

impl From<Board> for RawBoard {
    fn from(board: Board) -> Self {
        Self { slots: board.slots }
    }
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All slots in scan order (front 0-2, then back 0-1).
    pub fn slots(&self) -> impl Iterator<Item = BoardSlot<'_>> {
        BoardPosition::ALL.into_iter().map(move |position| BoardSlot {
            position,
            unit: self.slots[position.index()].as_ref(),
        })
    }

    /// Occupied slots in scan order, defeated units included.
    pub fn occupied(&self) -> impl Iterator<Item = (BoardPosition, &Unit)> {
        self.slots()
            .filter_map(|slot| slot.unit.map(|unit| (slot.position, unit)))
    }

    /// Unit at a position.
    #[must_use]
    pub fn unit_at(&self, position: BoardPosition) -> Option<&Unit> {
        self.slots[position.index()].as_ref()
    }

    /// All units on the board, including defeated ones.
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.occupied().map(|(_, unit)| unit)
    }

    /// Units with hp left.
    pub fn alive_units(&self) -> impl Iterator<Item = &Unit> {
        self.all_units().filter(|unit| unit.is_alive())
    }

    /// Living units of one row with their positions, left to right.
    pub fn alive_in_row(&self, row: Row) -> impl Iterator<Item = (BoardPosition, &Unit)> {
        self.occupied()
            .filter(move |(position, unit)| position.row() == row && unit.is_alive())
    }

    /// Living front-row units.
    pub fn alive_front_row(&self) -> impl Iterator<Item = &Unit> {
        self.alive_in_row(Row::Front).map(|(_, unit)| unit)
    }

    /// Living back-row units.
    pub fn alive_back_row(&self) -> impl Iterator<Item = &Unit> {
        self.alive_in_row(Row::Back).map(|(_, unit)| unit)
    }

    /// Whether any unit on the board is alive.
    #[must_use]
    pub fn has_alive_units(&self) -> bool {
        self.alive_units().next().is_some()
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.all_units().count()
    }

    /// Sum of current hp over all units.
    #[must_use]
    pub fn total_hp(&self) -> u64 {
        self.all_units().map(|unit| u64::from(unit.hp())).sum()
    }

    /// Position of the unit with the given id.
    #[must_use]
    pub fn find_unit_position(&self, id: &str) -> Option<BoardPosition> {
        self.occupied()
            .find(|(_, unit)| unit.id() == id)
            .map(|(position, _)| position)
    }

    /// Return a board with `unit` placed at `position`, replacing any occupant.
    ///
    /// # Errors
    /// Returns [`BattleError::DuplicateUnit`] if a unit with the same id sits
    /// in a different slot.
    pub fn place_unit(&self, unit: Unit, position: BoardPosition) -> Result<Self> {
        match self.find_unit_position(unit.id()) {
            Some(existing) if existing != position => {
                Err(BattleError::DuplicateUnit(unit.id().to_string()))
            }
            _ => Ok(self.replaced(position, Some(unit))),
        }
    }

    /// Return a board with `position` emptied.
    #[must_use]
    pub fn remove_unit(&self, position: BoardPosition) -> Self {
        self.replaced(position, None)
    }

    /// Return a board with the occupant of `position` replaced by `unit`.
    ///
    /// # Errors
    /// Same as [`Board::place_unit`].
    pub fn update_unit(&self, position: BoardPosition, unit: Unit) -> Result<Self> {
        self.place_unit(unit, position)
    }

    /// Copy-on-write slot replacement without the duplicate check.
    ///
    /// Callers must only use this to swap a slot's occupant for a newer
    /// snapshot of the same unit.
    pub(crate) fn replaced(&self, position: BoardPosition, unit: Option<Unit>) -> Self {
        let mut board = self.clone();
        board.slots[position.index()] = unit;
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitStats;

    fn unit(id: &str) -> Unit {
        Unit::from_stats(&UnitStats::new(id, 3, 2), 0, 0).unwrap()
    }

    fn dead(id: &str) -> Unit {
        unit(id).take_damage(3)
    }

    fn front(slot: usize) -> BoardPosition {
        BoardPosition::front(slot).unwrap()
    }

    fn back(slot: usize) -> BoardPosition {
        BoardPosition::back(slot).unwrap()
    }

    #[test]
    fn test_empty_board_shape() {
        let board = Board::new();
        let slots: Vec<_> = board.slots().collect();
        assert_eq!(slots.len(), 5);
        assert_eq!(slots.iter().filter(|s| s.position.is_front()).count(), 3);
        assert!(slots.iter().all(|s| s.unit.is_none()));
        assert!(!board.has_alive_units());
    }

    #[test]
    fn test_place_and_get() {
        let board = Board::new().place_unit(unit("warrior"), front(1)).unwrap();
        assert_eq!(board.unit_at(front(1)).map(Unit::id), Some("warrior"));
        assert!(board.unit_at(front(0)).is_none());

        let board = board.place_unit(unit("knight"), back(0)).unwrap();
        assert_eq!(board.unit_at(back(0)).map(Unit::id), Some("knight"));
    }

    #[test]
    fn test_place_does_not_mutate_original() {
        let empty = Board::new();
        let placed = empty.place_unit(unit("warrior"), front(0)).unwrap();
        assert!(empty.unit_at(front(0)).is_none());
        assert!(placed.unit_at(front(0)).is_some());
    }

    #[test]
    fn test_duplicate_unit_rejected() {
        let board = Board::new().place_unit(unit("warrior"), front(0)).unwrap();
        assert_eq!(
            board.place_unit(unit("warrior"), back(1)),
            Err(BattleError::DuplicateUnit("warrior".to_string()))
        );
        // Same slot is a replacement, not a duplicate.
        assert!(board.place_unit(unit("warrior"), front(0)).is_ok());
    }

    #[test]
    fn test_all_units_includes_dead() {
        let board = Board::new()
            .place_unit(unit("alive"), front(0))
            .unwrap()
            .place_unit(dead("dead"), front(1))
            .unwrap();

        assert_eq!(board.all_units().count(), 2);
        let alive: Vec<_> = board.alive_units().map(Unit::id).collect();
        assert_eq!(alive, vec!["alive"]);
    }

    #[test]
    fn test_has_alive_units() {
        let board = Board::new().place_unit(dead("dead"), front(0)).unwrap();
        assert!(!board.has_alive_units());

        let board = board.place_unit(unit("warrior"), back(1)).unwrap();
        assert!(board.has_alive_units());
    }

    #[test]
    fn test_rows() {
        let board = Board::new()
            .place_unit(unit("f0"), front(0))
            .unwrap()
            .place_unit(dead("f2"), front(2))
            .unwrap()
            .place_unit(unit("b1"), back(1))
            .unwrap();

        let front_ids: Vec<_> = board.alive_front_row().map(Unit::id).collect();
        let back_ids: Vec<_> = board.alive_back_row().map(Unit::id).collect();
        assert_eq!(front_ids, vec!["f0"]);
        assert_eq!(back_ids, vec!["b1"]);
    }

    #[test]
    fn test_remove_unit() {
        let board = Board::new().place_unit(unit("warrior"), front(1)).unwrap();
        let cleared = board.remove_unit(front(1));
        assert!(cleared.unit_at(front(1)).is_none());
        assert!(board.unit_at(front(1)).is_some());
    }

    #[test]
    fn test_update_unit() {
        let board = Board::new().place_unit(unit("warrior"), front(1)).unwrap();
        let hurt = board.unit_at(front(1)).unwrap().take_damage(1);
        let updated = board.update_unit(front(1), hurt).unwrap();
        assert_eq!(updated.unit_at(front(1)).unwrap().hp(), 2);
        assert_eq!(board.unit_at(front(1)).unwrap().hp(), 3);
    }

    #[test]
    fn test_find_unit_position() {
        let board = Board::new().place_unit(unit("warrior"), front(2)).unwrap();
        assert_eq!(board.find_unit_position("warrior"), Some(front(2)));
        assert_eq!(board.find_unit_position("nonexistent"), None);
    }

    #[test]
    fn test_total_hp() {
        let board = Board::new()
            .place_unit(unit("a"), front(0))
            .unwrap()
            .place_unit(unit("b").take_damage(1), back(0))
            .unwrap();
        assert_eq!(board.total_hp(), 5);
        assert_eq!(board.unit_count(), 2);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let board = Board::new().place_unit(unit("a"), front(0)).unwrap();
        let text = ron::to_string(&board).unwrap();
        let restored: Board = ron::from_str(&text).unwrap();
        assert_eq!(restored, board);

        let duplicated = text.replacen("None", "Some((id: \"a\", hp: 3, max_hp: 3, attack: 2, x: 0, y: 0))", 1);
        let result: std::result::Result<Board, _> = ron::from_str(&duplicated);
        assert!(result.is_err());
    }
}
