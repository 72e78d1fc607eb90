//! Spawn director: when and what to spawn
//!
//! A single uniform roll picks the archetype against cumulative level-scaled
//! thresholds. Occasionally a formation replaces the single spawn. The
//! interval shrinks linearly with level down to a floor, with a faster
//! cadence during the first levels.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyKind;
use super::geometry::Viewport;
use crate::tuning::SpawnTuning;

/// Coordinated multi-enemy spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formation {
    /// Five Shooting enemies in a V
    V,
    /// Six Fast enemies evenly spaced across the screen
    Line,
    /// Eight Zigzag enemies on a circle
    Circle,
}

impl Formation {
    pub const ALL: [Formation; 3] = [Formation::V, Formation::Line, Formation::Circle];

    /// Enemy placements (top-left corners) for this formation
    pub fn placements(self, viewport: &Viewport, spawn_y: f32) -> Vec<(EnemyKind, Vec2)> {
        let mid = viewport.width / 2.0;
        match self {
            Formation::V => (0..5)
                .map(|i| {
                    let offset_x = (i as f32 - 2.0) * 60.0;
                    let offset_y = offset_x.abs() * 0.5;
                    (EnemyKind::Shooting, Vec2::new(mid + offset_x, spawn_y - offset_y))
                })
                .collect(),
            Formation::Line => {
                let spacing = viewport.width / 7.0;
                (0..6)
                    .map(|i| (EnemyKind::Fast, Vec2::new((i + 1) as f32 * spacing, spawn_y)))
                    .collect()
            }
            Formation::Circle => (0..8)
                .map(|i| {
                    let angle = (i as f32 / 8.0) * TAU;
                    let pos = Vec2::new(mid + angle.cos() * 100.0, spawn_y - angle.sin() * 100.0);
                    (EnemyKind::Zigzag, pos)
                })
                .collect(),
        }
    }
}

/// What the director decided to spawn this tick
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPlan {
    /// Set when the plan is a formation
    pub formation: Option<Formation>,
    pub placements: Vec<(EnemyKind, Vec2)>,
}

/// Map a uniform roll in [0, 1) to an archetype for `level`.
/// Slices are checked strongest first; whatever is left is Basic.
pub fn choose_archetype(level: u32, roll: f32, tuning: &SpawnTuning) -> EnemyKind {
    let slices = [
        (EnemyKind::Elite, &tuning.elite),
        (EnemyKind::Shooting, &tuning.shooting),
        (EnemyKind::Zigzag, &tuning.zigzag),
        (EnemyKind::Fast, &tuning.fast),
    ];
    slices
        .into_iter()
        .find(|(_, odds)| odds.threshold(level).is_some_and(|t| roll < t))
        .map_or(EnemyKind::Basic, |(kind, _)| kind)
}

/// Spawn timer and decision logic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnDirector {
    /// Seconds until the next regular spawn, measured from the last one
    pub interval: f32,
    pub since_last: f32,
}

impl SpawnDirector {
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            interval: tuning.start_interval_secs,
            since_last: 0.0,
        }
    }

    /// Interval after a spawn at `level`
    pub fn interval_for_level(level: u32, tuning: &SpawnTuning) -> f32 {
        let linear = tuning.base_interval_secs - level as f32 * tuning.interval_step_secs;
        let interval = if level <= tuning.early_levels {
            linear / tuning.early_interval_divisor
        } else {
            linear
        };
        interval.max(tuning.min_interval_secs)
    }

    /// Advance the timer; returns a plan when a spawn is due
    pub fn update(
        &mut self,
        dt: f32,
        level: u32,
        tuning: &SpawnTuning,
        viewport: &Viewport,
        rng: &mut impl Rng,
    ) -> Option<SpawnPlan> {
        self.since_last += dt;
        if self.since_last < self.interval {
            return None;
        }
        self.since_last = 0.0;
        self.interval = Self::interval_for_level(level, tuning);
        Some(Self::plan(level, tuning, viewport, rng))
    }

    /// Roll one spawn decision.
    ///
    /// Draw order is fixed: x position, archetype roll, formation roll,
    /// then the formation type only when a formation triggers.
    pub fn plan(
        level: u32,
        tuning: &SpawnTuning,
        viewport: &Viewport,
        rng: &mut impl Rng,
    ) -> SpawnPlan {
        let x = rng.random_range(tuning.margin..viewport.width - tuning.margin);
        let type_roll: f32 = rng.random();
        let formation_roll: f32 = rng.random();

        let formation_due = (level >= tuning.formation_late_level
            && formation_roll < tuning.formation_late_chance)
            || (level <= tuning.formation_early_level
                && formation_roll < tuning.formation_early_chance);

        if formation_due {
            let formation = Formation::ALL[rng.random_range(0..Formation::ALL.len())];
            log::debug!("formation {formation:?} at level {level}");
            return SpawnPlan {
                formation: Some(formation),
                placements: formation.placements(viewport, tuning.spawn_y),
            };
        }

        let kind = choose_archetype(level, type_roll, tuning);
        SpawnPlan {
            formation: None,
            placements: vec![(kind, Vec2::new(x, tuning.spawn_y))],
        }
    }
}
