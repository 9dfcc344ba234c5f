//! Scenario loading and configuration.
//!
//! A scenario names two rosters, the unit catalog they are built from and
//! the resolver settings.
//!
//! # Example RON
//!
//! ```ron
//! Scenario(
//!     name: "Warrior vs Knight",
//!     catalog: None,
//!     player_a: (
//!         id: "p1",
//!         name: "Alice",
//!         composition: (placements: [
//!             (unit: "warrior", position: (row: Front, slot: 1)),
//!         ]),
//!     ),
//!     player_b: (
//!         id: "p2",
//!         name: "Bob",
//!         composition: (placements: [
//!             (unit: "knight", position: (row: Front, slot: 1)),
//!         ]),
//!     ),
//!     config: (tie_break: A, max_turns: 10000),
//! )
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skirmish_core::battle::BattleConfig;
use skirmish_core::data::{compositions, RosterData, UnitCatalog};
use skirmish_core::error::BattleError;
use skirmish_core::roster::Player;
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Rosters or catalog could not be built.
    #[error("Invalid scenario: {0}")]
    Invalid(#[from] BattleError),
}

/// A complete battle setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Unit catalog file. `None` uses the built-in catalog. Relative paths
    /// are resolved against the scenario file's directory.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// First roster; attacks first.
    pub player_a: RosterData,
    /// Second roster.
    pub player_b: RosterData,
    /// Resolver settings.
    #[serde(default)]
    pub config: BattleConfig,
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let mut scenario = Self::from_ron_str(&contents)?;

        if let (Some(catalog), Some(dir)) = (&scenario.catalog, path.parent()) {
            if catalog.is_relative() {
                scenario.catalog = Some(dir.join(catalog));
            }
        }

        tracing::debug!(name = %scenario.name, path = %path.display(), "Loaded scenario");
        Ok(scenario)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Scenario pitting two built-in compositions against each other.
    pub fn from_presets(left: &str, right: &str) -> Result<Self, ScenarioError> {
        Ok(Self {
            name: format!("{left} vs {right}"),
            catalog: None,
            player_a: RosterData::new("p1", left, compositions::named(left, 1)?),
            player_b: RosterData::new("p2", right, compositions::named(right, 2)?),
            config: BattleConfig::default(),
        })
    }

    /// Load the unit catalog this scenario uses.
    pub fn load_catalog(&self) -> Result<UnitCatalog, ScenarioError> {
        match &self.catalog {
            Some(path) => Ok(UnitCatalog::load(path)?),
            None => Ok(UnitCatalog::default()),
        }
    }

    /// Build both players.
    pub fn build_players(&self) -> Result<(Player, Player), ScenarioError> {
        let catalog = self.load_catalog()?;
        let a = self.player_a.build(&catalog)?;
        let b = self.player_b.build(&catalog)?;
        Ok((a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::battle::Side;

    const WARRIOR_VS_KNIGHT: &str = r#"Scenario(
        name: "Warrior vs Knight",
        player_a: (
            id: "p1",
            name: "Alice",
            composition: (placements: [
                (unit: "warrior", position: (row: Front, slot: 1)),
            ]),
        ),
        player_b: (
            id: "p2",
            name: "Bob",
            composition: (placements: [
                (unit: "knight", position: (row: Front, slot: 1)),
            ]),
        ),
    )"#;

    #[test]
    fn test_from_ron_str_defaults() {
        let scenario = Scenario::from_ron_str(WARRIOR_VS_KNIGHT).unwrap();
        assert_eq!(scenario.name, "Warrior vs Knight");
        assert_eq!(scenario.catalog, None);
        assert_eq!(scenario.config, BattleConfig::default());

        let (a, b) = scenario.build_players().unwrap();
        assert_eq!(a.name, "Alice");
        assert_eq!(b.board.unit_count(), 1);
    }

    #[test]
    fn test_from_presets() {
        let scenario = Scenario::from_presets("mixed", "balanced").unwrap();
        assert_eq!(scenario.name, "mixed vs balanced");
        let (a, b) = scenario.build_players().unwrap();
        assert_eq!(a.id, "p1");
        assert!(a.board.find_unit_position("warrior-1-0").is_some());
        assert!(b.board.find_unit_position("knight-2-2").is_some());
    }

    #[test]
    fn test_unknown_preset() {
        let err = Scenario::from_presets("mixed", "nope").unwrap_err();
        assert!(matches!(err, ScenarioError::Invalid(BattleError::UnknownComposition(_))));
    }

    #[test]
    fn test_simple_presets_resolve() {
        let scenario = Scenario::from_presets("simple_warrior", "simple_knight").unwrap();
        let (a, b) = scenario.build_players().unwrap();
        let result = skirmish_core::battle::evaluate(&a, &b);
        assert_eq!(result.winning_side, Side::A);
        assert_eq!(result.turns.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ScenarioError::FileNotFound(_)));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Scenario::from_ron_str("Scenario(name: 3)"),
            Err(ScenarioError::ParseError(_))
        ));
    }
}
