//! Error types for battle construction and data loading.
//!
//! None of these are raised while a battle is being resolved: every variant
//! describes malformed input rejected at the point of construction.

use thiserror::Error;

use crate::position::Row;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for the battle core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Slot index out of range for the given row.
    #[error("Invalid board position: {row} row has no slot {slot}")]
    InvalidPosition {
        /// Row that was addressed.
        row: Row,
        /// Slot index that was requested.
        slot: usize,
    },

    /// Position text could not be parsed (expected `front-0` .. `back-1`).
    #[error("Invalid board position string: {0:?}")]
    InvalidPositionString(String),

    /// Unit stats violate the unit invariants.
    #[error("Invalid stats for unit '{id}': {reason}")]
    InvalidUnitStats {
        /// Unit identifier.
        id: String,
        /// What was wrong.
        reason: String,
    },

    /// A unit with this id already occupies a different slot.
    #[error("Unit '{0}' is already placed on this board")]
    DuplicateUnit(String),

    /// Unit id not present in the catalog.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    /// No built-in composition with this name.
    #[error("Unknown composition: {0}")]
    UnknownComposition(String),

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Invalid persisted state (record files, version mismatches).
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
