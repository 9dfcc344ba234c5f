//! Combat units.
//!
//! A [`Unit`] is a value: damage never mutates a unit in place, it returns a
//! new one. Defeated units (hp 0) stay on their board so the final state of a
//! battle can be inspected.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};

/// Stable identifier of a unit on a board.
pub type UnitId = String;

/// Static stats a unit is created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Identifier given to units created from these stats.
    pub id: UnitId,
    /// Maximum (and starting) hit points. Must be greater than zero.
    pub max_hp: u32,
    /// Damage dealt per attack.
    pub attack: u32,
}

impl UnitStats {
    /// Create a stat block.
    #[must_use]
    pub fn new(id: impl Into<UnitId>, max_hp: u32, attack: u32) -> Self {
        Self {
            id: id.into(),
            max_hp,
            attack,
        }
    }
}

/// A combat unit.
///
/// Invariant: `0 <= hp <= max_hp` and `max_hp > 0`. The layout coordinates
/// are presentation metadata and take no part in combat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawUnit", into = "RawUnit")]
pub struct Unit {
    id: UnitId,
    hp: u32,
    max_hp: u32,
    attack: u32,
    x: i32,
    y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawUnit {
    id: UnitId,
    hp: u32,
    max_hp: u32,
    attack: u32,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

impl TryFrom<RawUnit> for Unit {
    type Error = BattleError;

    fn try_from(raw: RawUnit) -> Result<Self> {
        Ok(Self::with_hp(raw.id, raw.hp, raw.max_hp, raw.attack)?.at(raw.x, raw.y))
    }
}

impl From<Unit> for RawUnit {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            hp: unit.hp,
            max_hp: unit.max_hp,
            attack: unit.attack,
            x: unit.x,
            y: unit.y,
        }
    }
}

impl Unit {
    /// Create a unit at full health from static stats.
    ///
    /// # Errors
    /// Returns [`BattleError::InvalidUnitStats`] if `max_hp` is zero.
    pub fn from_stats(stats: &UnitStats, x: i32, y: i32) -> Result<Self> {
        Ok(Self::with_hp(stats.id.clone(), stats.max_hp, stats.max_hp, stats.attack)?.at(x, y))
    }

    /// Create a unit with an explicit current hp.
    ///
    /// # Errors
    /// Returns [`BattleError::InvalidUnitStats`] if `max_hp` is zero or
    /// `hp > max_hp`.
    pub fn with_hp(id: impl Into<UnitId>, hp: u32, max_hp: u32, attack: u32) -> Result<Self> {
        let id = id.into();
        if max_hp == 0 {
            return Err(BattleError::InvalidUnitStats {
                id,
                reason: "max_hp must be greater than zero".to_string(),
            });
        }
        if hp > max_hp {
            return Err(BattleError::InvalidUnitStats {
                id,
                reason: format!("hp {hp} exceeds max_hp {max_hp}"),
            });
        }
        Ok(Self {
            id,
            hp,
            max_hp,
            attack,
            x: 0,
            y: 0,
        })
    }

    /// Same unit with new layout coordinates.
    #[must_use]
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Same unit under a different identifier.
    #[must_use]
    pub fn renamed(mut self, id: impl Into<UnitId>) -> Self {
        self.id = id.into();
        self
    }

    /// Unit identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Damage dealt per attack.
    #[must_use]
    pub const fn attack(&self) -> u32 {
        self.attack
    }

    /// Presentation layout coordinates.
    #[must_use]
    pub const fn layout(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// A unit is alive while it has hp left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Return this unit after taking `damage`, hp floored at zero.
    #[must_use]
    pub fn take_damage(&self, damage: u32) -> Self {
        Self {
            hp: self.hp.saturating_sub(damage),
            ..self.clone()
        }
    }
}
