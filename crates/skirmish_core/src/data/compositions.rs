//! Built-in board compositions.
//!
//! Presets that take a player number embed it in their instance ids
//! (`knight-{n}-{i}`), so the same preset can fill both sides of a battle
//! without id clashes in the turn log.

use super::composition::{Composition, Placement};
use super::unit_data::UnitCatalog;
use crate::board::Board;
use crate::error::{BattleError, Result};
use crate::position::BoardPosition;

/// One warrior at front-1.
pub const SIMPLE_WARRIOR: &str = "simple_warrior";
/// One knight at front-1.
pub const SIMPLE_KNIGHT: &str = "simple_knight";
/// Three knights across the front row.
pub const BALANCED: &str = "balanced";
/// Warriors at front-0 and front-2, knights across the back row.
pub const MIXED: &str = "mixed";

/// Names of all built-in compositions.
pub const PRESET_NAMES: [&str; 4] = [SIMPLE_WARRIOR, SIMPLE_KNIGHT, BALANCED, MIXED];

const FRONT: [BoardPosition; 3] = [
    BoardPosition::ALL[0],
    BoardPosition::ALL[1],
    BoardPosition::ALL[2],
];
const BACK: [BoardPosition; 2] = [BoardPosition::ALL[3], BoardPosition::ALL[4]];

/// Look up a built-in composition by name for player `player_num`.
///
/// # Errors
/// Returns [`BattleError::UnknownComposition`] for unknown names.
pub fn named(name: &str, player_num: u32) -> Result<Composition> {
    let composition = match name {
        SIMPLE_WARRIOR => Composition::new().with(Placement::new("warrior", FRONT[1])),
        SIMPLE_KNIGHT => Composition::new().with(Placement::new("knight", FRONT[1])),
        BALANCED => FRONT
            .iter()
            .enumerate()
            .fold(Composition::new(), |composition, (i, &position)| {
                composition.with(
                    Placement::new("knight", position)
                        .with_instance_id(format!("knight-{player_num}-{i}")),
                )
            }),
        MIXED => Composition::new()
            .with(
                Placement::new("warrior", FRONT[0])
                    .with_instance_id(format!("warrior-{player_num}-0")),
            )
            .with(
                Placement::new("warrior", FRONT[2])
                    .with_instance_id(format!("warrior-{player_num}-1")),
            )
            .with(
                Placement::new("knight", BACK[0])
                    .with_instance_id(format!("knight-{player_num}-0")),
            )
            .with(
                Placement::new("knight", BACK[1])
                    .with_instance_id(format!("knight-{player_num}-1")),
            ),
        other => return Err(BattleError::UnknownComposition(other.to_string())),
    };
    Ok(composition)
}

/// One warrior at front-1.
///
/// # Errors
/// Fails if the catalog has no `warrior`.
pub fn simple_warrior(catalog: &UnitCatalog) -> Result<Board> {
    named(SIMPLE_WARRIOR, 0)?.build_board(catalog)
}

/// One knight at front-1.
///
/// # Errors
/// Fails if the catalog has no `knight`.
pub fn simple_knight(catalog: &UnitCatalog) -> Result<Board> {
    named(SIMPLE_KNIGHT, 0)?.build_board(catalog)
}

/// Three knights across the front row.
///
/// # Errors
/// Fails if the catalog has no `knight`.
pub fn balanced(catalog: &UnitCatalog, player_num: u32) -> Result<Board> {
    named(BALANCED, player_num)?.build_board(catalog)
}

/// Two front warriors with two knights behind them.
///
/// # Errors
/// Fails if the catalog lacks `warrior` or `knight`.
pub fn mixed(catalog: &UnitCatalog, player_num: u32) -> Result<Board> {
    named(MIXED, player_num)?.build_board(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Row;
    use crate::unit::Unit;

    #[test]
    fn test_simple_boards() {
        let catalog = UnitCatalog::default();
        let warrior = simple_warrior(&catalog).unwrap();
        assert_eq!(warrior.unit_count(), 1);
        assert_eq!(warrior.unit_at(FRONT[1]).map(Unit::id), Some("warrior"));

        let knight = simple_knight(&catalog).unwrap();
        assert_eq!(knight.unit_at(FRONT[1]).map(Unit::hp), Some(4));
    }

    #[test]
    fn test_balanced_ids() {
        let board = balanced(&UnitCatalog::default(), 2).unwrap();
        let ids: Vec<_> = board.all_units().map(Unit::id).collect();
        assert_eq!(ids, vec!["knight-2-0", "knight-2-1", "knight-2-2"]);
        assert_eq!(board.alive_back_row().count(), 0);
    }

    #[test]
    fn test_mixed_layout() {
        let board = mixed(&UnitCatalog::default(), 1).unwrap();
        let layout: Vec<_> = board
            .occupied()
            .map(|(position, unit)| (position.to_string(), unit.id().to_string()))
            .collect();
        assert_eq!(
            layout,
            vec![
                ("front-0".to_string(), "warrior-1-0".to_string()),
                ("front-2".to_string(), "warrior-1-1".to_string()),
                ("back-0".to_string(), "knight-1-0".to_string()),
                ("back-1".to_string(), "knight-1-1".to_string()),
            ]
        );
        assert_eq!(board.alive_in_row(Row::Back).count(), 2);
    }

    #[test]
    fn test_named_lookup() {
        for name in PRESET_NAMES {
            assert!(named(name, 1).is_ok(), "{name}");
        }
        assert_eq!(
            named("phalanx", 1),
            Err(BattleError::UnknownComposition("phalanx".to_string()))
        );
    }

    #[test]
    fn test_missing_catalog_entry() {
        assert!(simple_knight(&UnitCatalog::empty()).is_err());
    }
}
