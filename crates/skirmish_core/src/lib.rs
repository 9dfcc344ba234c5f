//! # Skirmish Core
//!
//! Deterministic battle resolution for two rosters of units on
//! two-row boards.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No timing or wall-clock dependence
//! - No randomness
//!
//! This separation enables:
//! - Replaying a battle from its turn log alone
//! - Headless batch runs and matchup tables
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`unit`] - Combat units and damage application
//! - [`position`] - Validated board coordinates
//! - [`board`] - Copy-on-write five-slot boards
//! - [`roster`] - Players (identity plus board)
//! - [`targeting`] - Attacker and target selection rules
//! - [`battle`] - The turn loop and battle results
//! - [`data`] - Static unit stats and board compositions
//! - [`replay`] - Battle records and turn-log playback
//!
//! ## Example
//!
//! ```
//! use skirmish_core::prelude::*;
//!
//! let catalog = UnitCatalog::default();
//! let alice = compositions::simple_warrior(&catalog)
//!     .map(|board| Player::new("p1", "Alice", board))
//!     .unwrap();
//! let bob = compositions::simple_knight(&catalog)
//!     .map(|board| Player::new("p2", "Bob", board))
//!     .unwrap();
//!
//! let result = evaluate(&alice, &bob);
//! assert_eq!(result.winner.id, "p1");
//! assert_eq!(result.turns.len(), 3);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod board;
pub mod data;
pub mod error;
pub mod position;
pub mod replay;
pub mod roster;
pub mod targeting;
pub mod unit;

pub use data::compositions;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battle::{
        evaluate, evaluate_duel, evaluate_with, Battle, BattleConfig, BattleResult, BattleState,
        BattleTurn, Combatant, ConclusionReason, Side,
    };
    pub use crate::board::{Board, BoardSlot};
    pub use crate::data::{compositions, Composition, Placement, RosterData, UnitCatalog, UnitData};
    pub use crate::error::{BattleError, Result};
    pub use crate::position::{BoardPosition, Row};
    pub use crate::replay::{BattleRecord, TurnPlayer};
    pub use crate::roster::Player;
    pub use crate::unit::{Unit, UnitId, UnitStats};
}
