//! Level catalog
//!
//! Authored route data. The catalog is read-only once built; the session
//! indexes into it directly, so an out-of-range index is a bug, not a
//! recoverable condition.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLAY_AREA;
use crate::in_play_area;
use crate::tuning::{ConfigError, Tuning};

/// One authored level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Player spawn (top-left corner)
    pub start: Vec2,
    /// Destination box (top-left corner), size comes from tuning
    pub destination: Vec2,
    pub obstacle_count: u32,
    pub resource_count: u32,
    pub min_resources_to_win: u32,
}

/// Ordered list of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig {
                    id: 1,
                    name: "South America → North America".to_string(),
                    description: "Navigate the dense terrain to reach the embassy.".to_string(),
                    start: Vec2::new(10.0, 85.0),
                    destination: Vec2::new(85.0, 15.0),
                    obstacle_count: 6,
                    resource_count: 8,
                    min_resources_to_win: 3,
                },
                LevelConfig {
                    id: 2,
                    name: "Africa → Europe".to_string(),
                    description: "Cross the Mediterranean route. Avoid maritime patrols."
                        .to_string(),
                    start: Vec2::new(20.0, 80.0),
                    destination: Vec2::new(70.0, 20.0),
                    obstacle_count: 9,
                    resource_count: 6,
                    min_resources_to_win: 3,
                },
                LevelConfig {
                    id: 3,
                    name: "Asia → North America".to_string(),
                    description: "The long Pacific journey. High difficulty.".to_string(),
                    start: Vec2::new(15.0, 50.0),
                    destination: Vec2::new(85.0, 30.0),
                    obstacle_count: 12,
                    resource_count: 5,
                    min_resources_to_win: 2,
                },
            ],
        }
    }
}

impl LevelCatalog {
    /// Build a catalog from already-authored levels
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        let catalog = Self { levels };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a JSON array of levels
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        let catalog = Self::new(levels)?;
        log::info!("Loaded level catalog ({} levels)", catalog.len());
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid(
                "level catalog must contain at least one level".to_string(),
            ));
        }
        for level in &self.levels {
            if !in_play_area(level.start) {
                return Err(ConfigError::Invalid(format!(
                    "level {} start {:?} is outside the play area",
                    level.id, level.start
                )));
            }
            if !in_play_area(level.destination) {
                return Err(ConfigError::Invalid(format!(
                    "level {} destination {:?} is outside the play area",
                    level.id, level.destination
                )));
            }
            if level.min_resources_to_win > level.resource_count {
                log::warn!(
                    "Level {} needs {} resources but only spawns {}",
                    level.id,
                    level.min_resources_to_win,
                    level.resource_count
                );
            }
        }
        Ok(())
    }

    /// Check that every start point leaves room for the player token, so
    /// spawns and resets never place it past the clamp bounds.
    pub fn validate_fit(&self, tuning: &Tuning) -> Result<(), ConfigError> {
        let max = PLAY_AREA - tuning.player_size;
        for level in &self.levels {
            let start = level.start;
            if !(0.0..=max).contains(&start.x) || !(0.0..=max).contains(&start.y) {
                return Err(ConfigError::Invalid(format!(
                    "level {} start {:?} leaves no room for a player of size {} (max {})",
                    level.id, start, tuning.player_size, max
                )));
            }
        }
        Ok(())
    }

    /// Level at `index`. Panics when out of range.
    pub fn level(&self, index: usize) -> &LevelConfig {
        &self.levels[index]
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_ordered_and_valid() {
        let catalog = LevelCatalog::default();
        assert!(catalog.validate().is_ok());
        let ids: Vec<u32> = catalog.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(catalog.is_last(2));
        assert!(!catalog.is_last(0));
    }

    #[test]
    fn json_catalog_round_trips_through_serde() {
        let json = r#"[{
            "id": 7,
            "name": "Test route",
            "description": "",
            "start": [10.0, 85.0],
            "destination": [85.0, 15.0],
            "obstacle_count": 0,
            "resource_count": 3,
            "min_resources_to_win": 3
        }]"#;
        let catalog = LevelCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.level(0).start, Vec2::new(10.0, 85.0));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            LevelCatalog::from_json("[]"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn out_of_area_start_is_rejected() {
        let mut level = LevelCatalog::default().level(0).clone();
        level.start = Vec2::new(120.0, 0.0);
        assert!(LevelCatalog::new(vec![level]).is_err());
    }

    #[test]
    fn start_must_leave_room_for_player() {
        let tuning = Tuning::default();
        assert!(LevelCatalog::default().validate_fit(&tuning).is_ok());

        let mut level = LevelCatalog::default().level(0).clone();
        level.start = Vec2::new(99.0, 99.0);
        // Inside the play area, so the catalog itself accepts it
        let catalog = LevelCatalog::new(vec![level.clone()]).unwrap();
        assert!(matches!(
            catalog.validate_fit(&tuning),
            Err(ConfigError::Invalid(_))
        ));

        level.start = Vec2::new(96.0, 0.0);
        let catalog = LevelCatalog::new(vec![level]).unwrap();
        assert!(catalog.validate_fit(&tuning).is_ok());
    }

    #[test]
    #[should_panic]
    fn indexing_past_the_end_panics() {
        let catalog = LevelCatalog::default();
        let _ = catalog.level(catalog.len());
    }
}
