//! Board compositions: which unit stands where.

use serde::{Deserialize, Serialize};

use super::unit_data::UnitCatalog;
use crate::board::Board;
use crate::error::Result;
use crate::position::BoardPosition;
use crate::roster::Player;

/// One unit placed on a board.
///
/// # Example RON
///
/// ```ron
/// Placement(
///     unit: "knight",
///     instance_id: Some("knight-1-0"),
///     position: (row: Back, slot: 0),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Unit type id in the catalog.
    pub unit: String,

    /// Id of the placed instance. Defaults to the unit type id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,

    /// Target slot.
    pub position: BoardPosition,

    /// Presentation layout x.
    #[serde(default)]
    pub x: i32,

    /// Presentation layout y.
    #[serde(default)]
    pub y: i32,
}

impl Placement {
    /// Place a unit type at a position under its own id.
    #[must_use]
    pub fn new(unit: impl Into<String>, position: BoardPosition) -> Self {
        Self {
            unit: unit.into(),
            instance_id: None,
            position,
            x: 0,
            y: 0,
        }
    }

    /// Same placement with an explicit instance id.
    #[must_use]
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    /// Id the placed unit will carry.
    #[must_use]
    pub fn instance_id(&self) -> &str {
        self.instance_id.as_deref().unwrap_or(&self.unit)
    }
}

/// A board description, built into a [`Board`] against a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Composition {
    /// Placements, applied in order.
    pub placements: Vec<Placement>,
}

impl Composition {
    /// Create an empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placement.
    #[must_use]
    pub fn with(mut self, placement: Placement) -> Self {
        self.placements.push(placement);
        self
    }

    /// Build the board.
    ///
    /// # Errors
    /// Fails on unknown unit types and on instance ids placed twice.
    pub fn build_board(&self, catalog: &UnitCatalog) -> Result<Board> {
        self.placements
            .iter()
            .try_fold(Board::new(), |board, placement| {
                let unit = catalog.spawn(
                    &placement.unit,
                    placement.instance_id(),
                    placement.x,
                    placement.y,
                )?;
                board.place_unit(unit, placement.position)
            })
    }
}

/// A player definition as stored in scenario files.
///
/// # Example RON
///
/// ```ron
/// RosterData(
///     id: "p1",
///     name: "Alice",
///     composition: (placements: [
///         (unit: "warrior", position: (row: Front, slot: 1)),
///     ]),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterData {
    /// Player identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Board layout.
    pub composition: Composition,
}

impl RosterData {
    /// Create a roster definition.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, composition: Composition) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            composition,
        }
    }

    /// Build the player.
    ///
    /// # Errors
    /// Same as [`Composition::build_board`].
    pub fn build(&self, catalog: &UnitCatalog) -> Result<Player> {
        let board = self.composition.build_board(catalog)?;
        Ok(Player::new(self.id.clone(), self.name.clone(), board))
    }
}
