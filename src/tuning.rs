//! Data-driven game balance
//!
//! Every constant that shapes difficulty lives here so it can be tweaked
//! from a JSON file without touching the simulation. `Tuning::default()`
//! reproduces the stock arcade balance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_ENEMY_SPEED, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::Viewport;

/// Tuning load/validation errors
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but make no sense
    #[error("Invalid tuning: {0}")]
    Invalid(String),
}

/// Player ship balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Lives at the start of a run
    pub lives: u32,
    /// Movement per tick (doubled by speed boost)
    pub speed: f32,
    /// Minimum seconds between held-fire shots
    pub shot_cooldown_secs: f32,
    /// Duration of every timed power-up
    pub power_up_secs: f32,
    /// Invincibility window after losing a life
    pub invincibility_secs: f32,
    /// Visibility toggle period while invincible
    pub blink_interval_secs: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            lives: 3,
            speed: 5.0,
            shot_cooldown_secs: 0.2,
            power_up_secs: 10.0,
            invincibility_secs: 2.0,
            blink_interval_secs: 0.1,
        }
    }
}

/// Level progression and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Wall-clock seconds per level
    pub level_duration_secs: f32,
    /// A boss appears on every level that is a multiple of this
    pub boss_level_threshold: u32,
    /// Level-completion bonus is `(new_level - 1) * this`
    pub level_bonus_step: u64,
    /// Levels that grant an extra life on arrival
    pub extra_life_levels: Vec<u32>,
    /// First level that grants a bomb
    pub first_bomb_level: u32,
    /// After the first bomb, one more every this many levels
    pub bomb_level_interval: u32,
    /// Score for shooting down an enemy bullet
    pub clash_reward: u64,
    /// Enemy speed baseline at level 1
    pub base_enemy_speed: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            level_duration_secs: 20.0,
            boss_level_threshold: 5,
            level_bonus_step: 100,
            extra_life_levels: vec![4, 7, 9, 10],
            first_bomb_level: 5,
            bomb_level_interval: 2,
            clash_reward: 5,
            base_enemy_speed: BASE_ENEMY_SPEED,
        }
    }
}

/// One slice of the archetype probability table.
///
/// Unlocked at `unlock_level`; the cumulative threshold is
/// `base + (level - unlock_level) * per_level`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeOdds {
    pub unlock_level: u32,
    pub base: f32,
    pub per_level: f32,
}

impl ArchetypeOdds {
    pub const fn new(unlock_level: u32, base: f32, per_level: f32) -> Self {
        Self {
            unlock_level,
            base,
            per_level,
        }
    }

    /// Cumulative threshold at `level`, or None while still locked
    pub fn threshold(&self, level: u32) -> Option<f32> {
        (level >= self.unlock_level)
            .then(|| self.base + (level - self.unlock_level) as f32 * self.per_level)
    }
}

/// Spawn director balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Interval used right after a run starts
    pub start_interval_secs: f32,
    /// Interval at level 0 of the linear curve
    pub base_interval_secs: f32,
    /// Interval reduction per level
    pub interval_step_secs: f32,
    /// Floor of the interval curve
    pub min_interval_secs: f32,
    /// Levels up to and including this one get a faster interval
    pub early_levels: u32,
    /// Divisor applied to the interval during early levels
    pub early_interval_divisor: f32,
    /// Horizontal margin for random spawn positions
    pub margin: f32,
    /// Spawn height (above the top edge)
    pub spawn_y: f32,
    pub elite: ArchetypeOdds,
    pub shooting: ArchetypeOdds,
    pub zigzag: ArchetypeOdds,
    pub fast: ArchetypeOdds,
    /// Formations replace a spawn with this chance from `formation_late_level` on
    pub formation_late_level: u32,
    pub formation_late_chance: f32,
    /// ...and with this chance up to `formation_early_level`
    pub formation_early_level: u32,
    pub formation_early_chance: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            start_interval_secs: 1.0,
            base_interval_secs: 2.0,
            interval_step_secs: 0.07,
            min_interval_secs: 0.8,
            early_levels: 2,
            early_interval_divisor: 2.0,
            margin: 50.0,
            spawn_y: -50.0,
            elite: ArchetypeOdds::new(8, 0.2, 0.0),
            shooting: ArchetypeOdds::new(5, 0.2, 0.02),
            zigzag: ArchetypeOdds::new(3, 0.3, 0.03),
            fast: ArchetypeOdds::new(2, 0.5, 0.02),
            formation_late_level: 9,
            formation_late_chance: 0.15,
            formation_early_level: 2,
            formation_early_chance: 0.05,
        }
    }
}

/// Power-up drops
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTuning {
    /// Chance a destroyed enemy drops a power-up
    pub chance: f32,
}

impl Default for DropTuning {
    fn default() -> Self {
        Self { chance: 0.2 }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub viewport: Viewport,
    pub player: PlayerTuning,
    pub session: SessionTuning,
    pub spawn: SpawnTuning,
    pub drops: DropTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            player: PlayerTuning::default(),
            session: SessionTuning::default(),
            spawn: SpawnTuning::default(),
            drops: DropTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&contents)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(name: &str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!("{name} must be > 0, got {value}")))
            }
        }
        fn probability(name: &str, value: f32) -> Result<(), TuningError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TuningError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )))
            }
        }

        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;

        positive("player.speed", self.player.speed)?;
        positive("player.shot_cooldown_secs", self.player.shot_cooldown_secs)?;
        positive("player.power_up_secs", self.player.power_up_secs)?;
        positive("player.invincibility_secs", self.player.invincibility_secs)?;
        positive("player.blink_interval_secs", self.player.blink_interval_secs)?;
        if self.player.lives == 0 {
            return Err(TuningError::Invalid("player.lives must be >= 1".into()));
        }

        positive("session.level_duration_secs", self.session.level_duration_secs)?;
        positive("session.base_enemy_speed", self.session.base_enemy_speed)?;
        if self.session.boss_level_threshold == 0 {
            return Err(TuningError::Invalid(
                "session.boss_level_threshold must be >= 1".into(),
            ));
        }
        if self.session.bomb_level_interval == 0 {
            return Err(TuningError::Invalid(
                "session.bomb_level_interval must be >= 1".into(),
            ));
        }

        positive("spawn.start_interval_secs", self.spawn.start_interval_secs)?;
        positive("spawn.min_interval_secs", self.spawn.min_interval_secs)?;
        positive("spawn.early_interval_divisor", self.spawn.early_interval_divisor)?;
        if self.spawn.margin * 2.0 >= self.viewport.width {
            return Err(TuningError::Invalid(format!(
                "spawn.margin {} leaves no room in a {} wide viewport",
                self.spawn.margin, self.viewport.width
            )));
        }
        for (name, odds) in [
            ("spawn.elite", &self.spawn.elite),
            ("spawn.shooting", &self.spawn.shooting),
            ("spawn.zigzag", &self.spawn.zigzag),
            ("spawn.fast", &self.spawn.fast),
        ] {
            probability(name, odds.base)?;
        }
        probability("spawn.formation_late_chance", self.spawn.formation_late_chance)?;
        probability("spawn.formation_early_chance", self.spawn.formation_early_chance)?;
        probability("drops.chance", self.drops.chance)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "session": { "boss_level_threshold": 3 } }"#)
            .expect("partial tuning should parse");
        assert_eq!(tuning.session.boss_level_threshold, 3);
        assert_eq!(tuning.session.level_duration_secs, 20.0);
        assert_eq!(tuning.player, PlayerTuning::default());
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let mut tuning = Tuning::default();
        tuning.drops.chance = 0.5;
        let json = tuning.to_json_pretty().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "session": { "boss_level_threshold": 0 } }"#);
        assert!(matches!(err, Err(TuningError::Invalid(_))));

        let err = Tuning::from_json(r#"{ "drops": { "chance": 1.5 } }"#);
        assert!(matches!(err, Err(TuningError::Invalid(_))));

        let err = Tuning::from_json("{ not json");
        assert!(matches!(err, Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::from_path("/definitely/not/here/tuning.json");
        assert!(matches!(err, Err(TuningError::Io(_))));
    }

    #[test]
    fn test_archetype_odds_threshold() {
        let odds = ArchetypeOdds::new(5, 0.2, 0.02);
        assert_eq!(odds.threshold(4), None);
        assert_eq!(odds.threshold(5), Some(0.2));
        assert!((odds.threshold(10).unwrap() - 0.3).abs() < 1e-6);
    }
}
