//! Board coordinates.
//!
//! A board has a front row of three slots and a back row of two. A
//! [`BoardPosition`] can only be obtained through a validating constructor,
//! so every position value in the program addresses a real slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};

/// Number of slots in the front row.
pub const FRONT_SLOTS: usize = 3;

/// Number of slots in the back row.
pub const BACK_SLOTS: usize = 2;

/// Total number of slots on a board.
pub const BOARD_SLOTS: usize = FRONT_SLOTS + BACK_SLOTS;

/// Row kind of a board slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Row {
    /// Front row - targeted first.
    Front,
    /// Back row - shielded while any front-row unit lives.
    Back,
}

impl Row {
    /// Number of slots in this row.
    #[must_use]
    pub const fn slot_count(self) -> usize {
        match self {
            Self::Front => FRONT_SLOTS,
            Self::Back => BACK_SLOTS,
        }
    }

    /// Lowercase name used in the text form of positions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated slot coordinate.
///
/// Positions order front before back, then by slot index, which is the scan
/// order used for attacker and target selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct BoardPosition {
    row: Row,
    slot: usize,
}

/// Unvalidated wire form of a position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawPosition {
    row: Row,
    slot: usize,
}

impl TryFrom<RawPosition> for BoardPosition {
    type Error = BattleError;

    fn try_from(raw: RawPosition) -> Result<Self> {
        Self::new(raw.row, raw.slot)
    }
}

impl From<BoardPosition> for RawPosition {
    fn from(position: BoardPosition) -> Self {
        Self {
            row: position.row,
            slot: position.slot,
        }
    }
}

impl BoardPosition {
    /// Every position on a board, in scan order.
    pub const ALL: [Self; BOARD_SLOTS] = [
        Self::unchecked(Row::Front, 0),
        Self::unchecked(Row::Front, 1),
        Self::unchecked(Row::Front, 2),
        Self::unchecked(Row::Back, 0),
        Self::unchecked(Row::Back, 1),
    ];

    const fn unchecked(row: Row, slot: usize) -> Self {
        Self { row, slot }
    }

    /// Create a position, rejecting slot indices outside the row.
    ///
    /// # Errors
    /// Returns [`BattleError::InvalidPosition`] if `slot` is not a slot of `row`.
    pub fn new(row: Row, slot: usize) -> Result<Self> {
        if slot >= row.slot_count() {
            return Err(BattleError::InvalidPosition { row, slot });
        }
        Ok(Self { row, slot })
    }

    /// Front-row position (slots 0-2).
    pub fn front(slot: usize) -> Result<Self> {
        Self::new(Row::Front, slot)
    }

    /// Back-row position (slots 0-1).
    pub fn back(slot: usize) -> Result<Self> {
        Self::new(Row::Back, slot)
    }

    /// Row of this position.
    #[must_use]
    pub const fn row(self) -> Row {
        self.row
    }

    /// Slot index within the row.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.slot
    }

    /// Flat index into a board's slot array (front 0-2, back 3-4).
    #[must_use]
    pub const fn index(self) -> usize {
        match self.row {
            Row::Front => self.slot,
            Row::Back => FRONT_SLOTS + self.slot,
        }
    }

    /// Inverse of [`BoardPosition::index`].
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this position is in the front row.
    #[must_use]
    pub const fn is_front(self) -> bool {
        matches!(self.row, Row::Front)
    }

    /// Iterate the positions of one row, left to right.
    pub fn in_row(row: Row) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |p| p.row == row)
    }
}

impl fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.slot)
    }
}

impl FromStr for BoardPosition {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || BattleError::InvalidPositionString(s.to_string());
        let (row, slot) = s.split_once('-').ok_or_else(invalid)?;
        let row = match row {
            "front" => Row::Front,
            "back" => Row::Back,
            _ => return Err(invalid()),
        };
        let slot: usize = slot.parse().map_err(|_| invalid())?;
        Self::new(row, slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_row_accepts_zero_to_two() {
        for slot in 0..3 {
            assert!(BoardPosition::front(slot).is_ok());
        }
        assert_eq!(
            BoardPosition::front(3),
            Err(BattleError::InvalidPosition {
                row: Row::Front,
                slot: 3
            })
        );
    }

    #[test]
    fn test_back_row_accepts_zero_to_one() {
        assert!(BoardPosition::back(0).is_ok());
        assert!(BoardPosition::back(1).is_ok());
        assert!(BoardPosition::back(2).is_err());
    }

    #[test]
    fn test_index_round_trip() {
        for (i, position) in BoardPosition::ALL.iter().enumerate() {
            assert_eq!(position.index(), i);
            assert_eq!(BoardPosition::from_index(i), Some(*position));
        }
        assert_eq!(BoardPosition::from_index(BOARD_SLOTS), None);
    }

    #[test]
    fn test_scan_order() {
        let mut sorted = BoardPosition::ALL;
        sorted.sort();
        assert_eq!(sorted, BoardPosition::ALL);
        assert!(BoardPosition::front(2).unwrap() < BoardPosition::back(0).unwrap());
    }

    #[test]
    fn test_display_and_parse() {
        let position = BoardPosition::back(1).unwrap();
        assert_eq!(position.to_string(), "back-1");
        assert_eq!("back-1".parse::<BoardPosition>(), Ok(position));
        assert_eq!("front-0".parse::<BoardPosition>(), BoardPosition::front(0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("middle-0".parse::<BoardPosition>().is_err());
        assert!("front".parse::<BoardPosition>().is_err());
        assert!("front-x".parse::<BoardPosition>().is_err());
        assert!(matches!(
            "back-2".parse::<BoardPosition>(),
            Err(BattleError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: BoardPosition = ron::from_str("(row: Front, slot: 2)").unwrap();
        assert_eq!(ok, BoardPosition::front(2).unwrap());

        let bad: std::result::Result<BoardPosition, _> = ron::from_str("(row: Back, slot: 2)");
        assert!(bad.is_err());
    }

    #[test]
    fn test_in_row() {
        let back: Vec<_> = BoardPosition::in_row(Row::Back).collect();
        assert_eq!(back, vec![BoardPosition::back(0).unwrap(), BoardPosition::back(1).unwrap()]);
    }
}
