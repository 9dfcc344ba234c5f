//! Test fixtures and helpers.
//!
//! Pre-built units, boards and players for consistent testing.

use skirmish_core::prelude::*;

/// Front-row position. Panics on an out-of-range slot.
#[must_use]
pub fn front(slot: usize) -> BoardPosition {
    BoardPosition::front(slot).expect("front slot out of range")
}

/// Back-row position. Panics on an out-of-range slot.
#[must_use]
pub fn back(slot: usize) -> BoardPosition {
    BoardPosition::back(slot).expect("back slot out of range")
}

/// Full-health unit. Panics if `max_hp` is zero.
#[must_use]
pub fn unit(id: &str, max_hp: u32, attack: u32) -> Unit {
    Unit::from_stats(&UnitStats::new(id, max_hp, attack), 0, 0).expect("invalid fixture unit")
}

/// The 3 hp / 2 attack warrior.
#[must_use]
pub fn warrior(id: &str) -> Unit {
    unit(id, 3, 2)
}

/// The 4 hp / 1 attack knight.
#[must_use]
pub fn knight(id: &str) -> Unit {
    unit(id, 4, 1)
}

/// Board with the given units placed in order. Panics on duplicate ids.
#[must_use]
pub fn board(placements: Vec<(Unit, BoardPosition)>) -> Board {
    placements
        .into_iter()
        .fold(Board::new(), |board, (unit, position)| {
            board
                .place_unit(unit, position)
                .expect("duplicate fixture unit")
        })
}

/// Player named after its id.
#[must_use]
pub fn player(id: &str, placements: Vec<(Unit, BoardPosition)>) -> Player {
    Player::new(id, id, board(placements))
}

/// Player built from a built-in composition and the default catalog.
#[must_use]
pub fn preset_player(id: &str, composition: &str, player_num: u32) -> Player {
    let catalog = UnitCatalog::default();
    let board = compositions::named(composition, player_num)
        .and_then(|composition| composition.build_board(&catalog))
        .expect("invalid preset");
    Player::new(id, id, board)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_units() {
        assert_eq!(warrior("w").attack(), 2);
        assert_eq!(knight("k").max_hp(), 4);
    }

    #[test]
    fn test_preset_player() {
        let player = preset_player("p", "mixed", 3);
        assert_eq!(player.board.unit_count(), 4);
        assert!(player.board.find_unit_position("knight-3-1").is_some());
    }
}
