//! Session configuration
//!
//! Loaded once at startup from a JSON file (any omitted section or key falls
//! back to its default) and treated as immutable for the whole session.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// All session parameters, grouped the way the config file is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    pub map: MapConfig,
    pub camp: CampConfig,
    pub seeker: SeekerConfig,
    pub goal: GoalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Match length in ticks.
    pub playtime: u64,
    pub seed: u64,
    /// Block on every player's decision; otherwise poll without waiting.
    pub wait_for_players: bool,
    /// Roster size used by the binary when it fills the match with bots.
    pub players: usize,
    /// Seekers per player.
    pub seekers: usize,
    pub goals: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            playtime: 3000,
            seed: 42,
            wait_for_players: true,
            players: 2,
            seekers: 5,
            goals: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 768.0,
            height: 768.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CampConfig {
    fn default() -> Self {
        Self {
            width: 55.0,
            height: 55.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SeekerConfig {
    pub thrust: f32,
    /// Thrust multiplier while the magnet is on.
    pub magnet_slowdown: f32,
    /// Cooldown after an unshielded collision, in ticks.
    pub disabled_time: u32,
    pub radius: f32,
    pub mass: f32,
    pub friction: f32,
}

impl Default for SeekerConfig {
    fn default() -> Self {
        Self {
            thrust: 0.1,
            magnet_slowdown: 0.2,
            disabled_time: 250,
            radius: 10.0,
            mass: 1.0,
            friction: 0.02,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GoalConfig {
    /// Consecutive ticks inside one camp needed for a capture.
    pub scoring_time: u32,
    pub radius: f32,
    pub mass: f32,
    pub thrust: f32,
    pub friction: f32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            scoring_time: 100,
            radius: 6.0,
            mass: 0.5,
            thrust: 0.1,
            friction: 0.02,
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the physical parameters the simulation depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
            }
        }
        fn friction(name: &str, value: f32) -> Result<(), ConfigError> {
            if (0.0..1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{name} must lie in [0, 1), got {value}"
                )))
            }
        }

        positive("map.width", self.map.width)?;
        positive("map.height", self.map.height)?;
        positive("camp.width", self.camp.width)?;
        positive("camp.height", self.camp.height)?;
        positive("seeker.radius", self.seeker.radius)?;
        positive("seeker.mass", self.seeker.mass)?;
        positive("goal.radius", self.goal.radius)?;
        positive("goal.mass", self.goal.mass)?;
        friction("seeker.friction", self.seeker.friction)?;
        friction("goal.friction", self.goal.friction)?;

        if self.goal.scoring_time == 0 {
            return Err(ConfigError::Invalid(
                "goal.scoring-time must be at least 1".into(),
            ));
        }
        if self.seeker.disabled_time == 0 {
            return Err(ConfigError::Invalid(
                "seeker.disabled-time must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
