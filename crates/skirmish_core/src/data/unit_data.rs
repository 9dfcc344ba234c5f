//! Unit data structures for data-driven unit definitions.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::unit::{Unit, UnitStats};

/// Data-driven unit definition.
///
/// # Example RON
///
/// ```ron
/// UnitData(
///     id: "warrior",
///     max_hp: 3,
///     attack: 2,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitData {
    /// Unique string identifier for this unit type.
    pub id: String,

    /// Maximum (and starting) hit points.
    pub max_hp: u32,

    /// Damage dealt per attack.
    pub attack: u32,
}

impl UnitData {
    /// Create a unit definition.
    #[must_use]
    pub fn new(id: impl Into<String>, max_hp: u32, attack: u32) -> Self {
        Self {
            id: id.into(),
            max_hp,
            attack,
        }
    }

    /// Stat block for a unit instance with the given id.
    #[must_use]
    pub fn stats_for(&self, instance_id: impl Into<String>) -> UnitStats {
        UnitStats::new(instance_id, self.max_hp, self.attack)
    }

    /// Validate the definition.
    ///
    /// # Errors
    /// Returns [`BattleError::InvalidUnitStats`] if `max_hp` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_hp == 0 {
            return Err(BattleError::InvalidUnitStats {
                id: self.id.clone(),
                reason: "max_hp must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Lookup table of unit definitions by id.
///
/// Iteration is ordered by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCatalog {
    units: BTreeMap<String, UnitData>,
}

impl Default for UnitCatalog {
    /// The built-in catalog: `warrior` (3 hp, 2 attack) and `knight`
    /// (4 hp, 1 attack).
    fn default() -> Self {
        let mut units = BTreeMap::new();
        for data in [UnitData::new("warrior", 3, 2), UnitData::new("knight", 4, 1)] {
            units.insert(data.id.clone(), data);
        }
        Self { units }
    }
}

impl UnitCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            units: BTreeMap::new(),
        }
    }

    /// Build a catalog from a list of definitions.
    ///
    /// # Errors
    /// Fails on the first invalid or duplicated definition.
    pub fn from_units(units: impl IntoIterator<Item = UnitData>) -> Result<Self> {
        let mut catalog = Self::empty();
        for data in units {
            catalog.register(data)?;
        }
        Ok(catalog)
    }

    /// Add a definition.
    ///
    /// # Errors
    /// Returns [`BattleError::InvalidUnitStats`] for invalid stats and
    /// [`BattleError::DuplicateUnit`] if the id is already registered.
    pub fn register(&mut self, data: UnitData) -> Result<()> {
        data.validate()?;
        if self.units.contains_key(&data.id) {
            return Err(BattleError::DuplicateUnit(data.id));
        }
        self.units.insert(data.id.clone(), data);
        Ok(())
    }

    /// Parse a catalog from RON text holding a list of [`UnitData`].
    ///
    /// `source` names the input in error messages.
    ///
    /// # Errors
    /// Returns [`BattleError::DataParseError`] if the text does not parse,
    /// or any error from [`UnitCatalog::from_units`].
    pub fn from_ron_str(text: &str, source: &str) -> Result<Self> {
        let units: Vec<UnitData> =
            ron::from_str(text).map_err(|e| BattleError::DataParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        Self::from_units(units)
    }

    /// Load a catalog from a RON file.
    ///
    /// # Errors
    /// Returns [`BattleError::DataParseError`] if the file cannot be read or
    /// parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|e| BattleError::DataParseError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;
        let catalog = Self::from_ron_str(&text, &path_str)?;

        tracing::info!(
            "Loaded unit catalog '{}' with {} units",
            path_str,
            catalog.len()
        );

        Ok(catalog)
    }

    /// Find a definition by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&UnitData> {
        self.units.get(id)
    }

    /// Create a full-health unit instance of type `unit_id`.
    ///
    /// # Errors
    /// Returns [`BattleError::UnknownUnit`] if the type is not registered.
    pub fn spawn(&self, unit_id: &str, instance_id: &str, x: i32, y: i32) -> Result<Unit> {
        let data = self
            .get(unit_id)
            .ok_or_else(|| BattleError::UnknownUnit(unit_id.to_string()))?;
        Unit::from_stats(&data.stats_for(instance_id), x, y)
    }

    /// Registered definitions, ordered by id.
    pub fn units(&self) -> impl Iterator<Item = &UnitData> {
        self.units.values()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the catalog has no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = UnitCatalog::default();
        assert_eq!(catalog.len(), 2);

        let warrior = catalog.get("warrior").unwrap();
        assert_eq!((warrior.max_hp, warrior.attack), (3, 2));
        let knight = catalog.get("knight").unwrap();
        assert_eq!((knight.max_hp, knight.attack), (4, 1));

        let ids: Vec<_> = catalog.units().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["knight", "warrior"]);
    }

    #[test]
    fn test_spawn() {
        let catalog = UnitCatalog::default();
        let unit = catalog.spawn("knight", "knight-1-0", 5, 6).unwrap();
        assert_eq!(unit.id(), "knight-1-0");
        assert_eq!(unit.hp(), 4);
        assert_eq!(unit.attack(), 1);
        assert_eq!(unit.layout(), (5, 6));

        assert_eq!(
            catalog.spawn("dragon", "d", 0, 0),
            Err(BattleError::UnknownUnit("dragon".to_string()))
        );
    }

    #[test]
    fn test_register_rejects_bad_data() {
        let mut catalog = UnitCatalog::empty();
        assert!(catalog.register(UnitData::new("ghost", 0, 1)).is_err());
        catalog.register(UnitData::new("archer", 2, 3)).unwrap();
        assert_eq!(
            catalog.register(UnitData::new("archer", 5, 5)),
            Err(BattleError::DuplicateUnit("archer".to_string()))
        );
    }

    #[test]
    fn test_from_ron_str() {
        let text = r#"[
            (id: "archer", max_hp: 2, attack: 3),
            (id: "golem", max_hp: 9, attack: 0),
        ]"#;
        let catalog = UnitCatalog::from_ron_str(text, "inline").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("golem").unwrap().attack, 0);
    }

    #[test]
    fn test_from_ron_str_parse_error() {
        let err = UnitCatalog::from_ron_str("[(id: 3)]", "broken.ron").unwrap_err();
        assert!(matches!(err, BattleError::DataParseError { ref path, .. } if path == "broken.ron"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = UnitCatalog::load("/nonexistent/units.ron").unwrap_err();
        assert!(matches!(err, BattleError::DataParseError { .. }));
    }
}
