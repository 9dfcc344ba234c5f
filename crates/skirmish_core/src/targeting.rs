//! Attacker and target selection.
//!
//! Both rules are fixed priorities over the board scan order:
//! front row before back row, left to right.

use crate::board::Board;
use crate::position::{BoardPosition, Row};
use crate::unit::Unit;

/// Positions that may currently be attacked on `board`.
///
/// Living front-row units shield the back row completely. The back row is
/// returned only when no front-row unit is alive. An empty result means the
/// board has no living units at all.
#[must_use]
pub fn valid_targets(board: &Board) -> Vec<BoardPosition> {
    let front: Vec<BoardPosition> = board
        .alive_in_row(Row::Front)
        .map(|(position, _)| position)
        .collect();
    if !front.is_empty() {
        return front;
    }

    board
        .alive_in_row(Row::Back)
        .map(|(position, _)| position)
        .collect()
}

/// The position the resolver attacks: the first valid target.
#[must_use]
pub fn select_target(board: &Board) -> Option<BoardPosition> {
    valid_targets(board).into_iter().next()
}

/// The unit that acts for `board`: its first living unit in scan order.
#[must_use]
pub fn select_attacker(board: &Board) -> Option<(BoardPosition, &Unit)> {
    board.occupied().find(|(_, unit)| unit.is_alive())
}
