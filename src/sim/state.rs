//! Session state: phase, score, level flow and the entity collections
//!
//! `GameState` exclusively owns every live entity. Subsystems receive it
//! (or the fields they need) explicitly; nothing reads ambient globals.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::bullet::Bullet;
use super::enemy::{Enemy, EnemyKind};
use super::events::{ColorHint, EffectQueue, GameEvent, NotificationKind};
use super::geometry::Viewport;
use super::player::Player;
use super::powerup::PowerUp;
use super::spawn::{SpawnDirector, SpawnPlan};
use crate::ms_to_ticks;
use crate::tuning::Tuning;

/// Stream id for the cosmetic RNG, kept apart from gameplay draws
const FX_STREAM: u64 = 0x5eed_f00d;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for a begin signal
    Start,
    /// Active gameplay
    Playing,
    /// Run ended; only effects keep running
    GameOver,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Seconds of play since the run started
    pub clock_secs: f32,
    /// `clock_secs` when the current level began
    pub level_started_at: f32,
    /// Difficulty scalar; regular enemy speeds scale by baseline / base
    pub enemy_speed_baseline: f32,
    pub spawner: SpawnDirector,
    /// Boss already spawned for the current level
    pub boss_spawned: bool,
    pub player: Player,
    /// Player and enemy bullets, in insertion order
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events emitted since the last drain
    pub(crate) events: Vec<GameEvent>,
    /// Staggered cosmetic effects
    pub(crate) effects: EffectQueue,
    /// Gameplay RNG
    pub(crate) rng: Pcg32,
    /// Cosmetic RNG (effect jitter only)
    pub(crate) fx_rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning.viewport, tuning.player);
        Self {
            seed,
            phase: GamePhase::Start,
            score: 0,
            level: 1,
            clock_secs: 0.0,
            level_started_at: 0.0,
            enemy_speed_baseline: tuning.session.base_enemy_speed,
            spawner: SpawnDirector::new(&tuning.spawn),
            boss_spawned: false,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            effects: EffectQueue::new(),
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::new(seed, FX_STREAM),
            next_id: 1,
            tuning,
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.tuning.viewport
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a run from the current entity set
    pub fn start_game(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.level = 1;
        self.clock_secs = 0.0;
        self.level_started_at = 0.0;
        self.spawner = SpawnDirector::new(&self.tuning.spawn);
        self.enemy_speed_baseline = self.tuning.session.base_enemy_speed;
        self.boss_spawned = false;
        log::info!("game started (seed {})", self.seed);
    }

    /// Clear the board, rebuild the player and start a fresh run
    pub fn reset_game(&mut self) {
        self.bullets.clear();
        self.enemies.clear();
        self.power_ups.clear();
        // Explosions queued by the last run must not play into the new one
        self.effects.clear();
        self.player = Player::new(&self.tuning.viewport, self.tuning.player);
        log::info!("game reset after scoring {} on level {}", self.score, self.level);
        self.start_game();
    }

    /// Seconds spent on the current level
    pub fn level_elapsed(&self) -> f32 {
        self.clock_secs - self.level_started_at
    }

    /// Move to the next level: bonus, difficulty, extra life, bomb, boss
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.level_started_at = self.clock_secs;
        let level = self.level;
        let session = &self.tuning.session;

        let bonus = (level as u64 - 1) * session.level_bonus_step;
        self.score += bonus;
        self.enemy_speed_baseline += 0.1 + level as f32 * 0.01;
        let extra_life = session.extra_life_levels.contains(&level);
        let bomb = level == session.first_bomb_level
            || (level > session.first_bomb_level
                && (level - session.first_bomb_level) % session.bomb_level_interval == 0);
        let boss_level = level % session.boss_level_threshold == 0;

        log::info!("level {level} reached, bonus {bonus}, score {}", self.score);
        self.emit(GameEvent::Notification {
            kind: NotificationKind::Center,
            message: format!("LEVEL {} COMPLETE!", level - 1),
            sub_message: Some(format!("+{bonus} points")),
            color: ColorHint::GOOD_NEWS,
            duration_ticks: 120,
        });

        if extra_life {
            self.player.lives += 1;
            self.emit(GameEvent::Notification {
                kind: NotificationKind::Side,
                message: "EXTRA LIFE!".into(),
                sub_message: Some(format!("Lives: {}", self.player.lives)),
                color: ColorHint::GOOD_NEWS,
                duration_ticks: 120,
            });
        }

        if bomb {
            self.player.add_bomb();
            self.emit(GameEvent::Explosion {
                pos: self.player.center(),
                color: ColorHint::BOMB_GRANT,
                scale: 1.5,
            });
            self.emit(GameEvent::Notification {
                kind: NotificationKind::Side,
                message: "NUCLEAR BOMB ACQUIRED!".into(),
                sub_message: Some(format!("Bombs: {}", self.player.bombs)),
                color: ColorHint::BOMB_GRANT,
                duration_ticks: 120,
            });
        }

        if boss_level {
            self.spawn_boss();
            self.boss_spawned = true;
        } else {
            self.boss_spawned = false;
        }
    }

    /// Drop the level's boss in at the top center, with an entrance
    pub fn spawn_boss(&mut self) {
        let viewport = self.viewport();
        let size = Boss::size_for_level(self.level);
        let pos = Vec2::new((viewport.width - size.x) / 2.0, -size.y);
        let id = self.spawn_enemy(EnemyKind::Boss, pos);
        log::info!("boss {id} spawned on level {}", self.level);

        self.emit(GameEvent::ScreenShake { intensity: 10.0 });
        for _ in 0..5 {
            let pos = Vec2::new(
                self.fx_rng.random_range(0.0..viewport.width),
                self.fx_rng.random_range(0.0..50.0),
            );
            self.emit(GameEvent::explosion(pos, ColorHint::BOSS_ARRIVAL));
        }
    }

    /// True while a boss is alive
    pub fn has_boss(&self) -> bool {
        self.enemies.iter().any(Enemy::is_boss)
    }

    /// Regular spawns pause while this level's boss is alive
    pub fn spawns_suppressed(&self) -> bool {
        self.level % self.tuning.session.boss_level_threshold == 0
            && self.boss_spawned
            && self.has_boss()
    }

    /// Create one enemy. Regular enemies pick up the current speed baseline.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let viewport = self.viewport();
        let mut enemy = Enemy::new(id, kind, pos, self.level, &viewport, &mut self.rng);
        if !enemy.is_boss() {
            enemy.speed *= self.enemy_speed_baseline / self.tuning.session.base_enemy_speed;
        }
        log::debug!("spawned {kind:?} {id} at ({:.0}, {:.0})", pos.x, pos.y);
        self.enemies.push(enemy);
        id
    }

    pub fn apply_spawn_plan(&mut self, plan: SpawnPlan) {
        for (kind, pos) in plan.placements {
            self.spawn_enemy(kind, pos);
        }
    }

    /// Roll the drop table for the enemy at `index` and add the capsule
    pub(crate) fn roll_power_up_drop(&mut self, index: usize) {
        let GameState {
            enemies,
            power_ups,
            rng,
            tuning,
            next_id,
            ..
        } = self;
        let Some(enemy) = enemies.get(index) else {
            return;
        };
        let drop = enemy.drop_power_up(tuning.drops.chance, rng, || {
            let id = *next_id;
            *next_id += 1;
            id
        });
        if let Some(power_up) = drop {
            log::debug!("enemy {} dropped {:?}", enemy.id, power_up.kind);
            power_ups.push(power_up);
        }
    }

    /// Nuclear bomb: every enemy destroyed and scored, enemy fire erased.
    /// Returns false when no bomb was available.
    pub fn detonate_bomb(&mut self) -> bool {
        if !self.player.activate_bomb() {
            return false;
        }
        let bounty: u64 = self.enemies.iter().map(|e| e.points as u64).sum();
        self.score += bounty;
        log::info!(
            "bomb detonated: {} enemies, +{bounty} points",
            self.enemies.len()
        );
        self.enemies.clear();
        self.bullets.retain(|b| !b.is_enemy());

        self.emit(GameEvent::ScreenShake { intensity: 30.0 });
        let center = self.player.center();
        for ring in 0..5u32 {
            let delay = ms_to_ticks(ring * 100);
            let radius = 50.0 + ring as f32 * 100.0;
            self.effects.schedule(
                delay,
                GameEvent::Explosion {
                    pos: center,
                    color: ColorHint::BOMB,
                    scale: 3.0 + ring as f32,
                },
            );
            let bursts = 6 + ring * 2;
            for j in 0..bursts {
                let angle = (j as f32 / bursts as f32) * TAU;
                let pos = center + crate::heading(angle) * radius;
                let green = 100 + self.fx_rng.random_range(0..100u8);
                let scale = 1.5 + self.fx_rng.random_range(0.0..1.5);
                self.effects.schedule(
                    delay,
                    GameEvent::Explosion {
                        pos,
                        color: ColorHint(255, green, 0),
                        scale,
                    },
                );
            }
        }
        true
    }

    /// Player destroyed: freeze the run and play the wreck
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        log::info!(
            "game over: score {} on level {} after {} ticks",
            self.score,
            self.level,
            self.time_ticks
        );
        let center = self.player.center();
        self.emit(GameEvent::ScreenShake { intensity: 15.0 });
        self.emit(GameEvent::Explosion {
            pos: center,
            color: ColorHint::PLAYER,
            scale: 2.0,
        });
        self.schedule_chain(center, Vec2::splat(30.0), 5, 100, ColorHint::PLAYER);
    }

    /// Queue `count` explosions jittered within `spread` of `center`,
    /// `interval_ms` apart
    pub(crate) fn schedule_chain(
        &mut self,
        center: Vec2,
        spread: Vec2,
        count: u32,
        interval_ms: u32,
        color: ColorHint,
    ) {
        for i in 0..count {
            let jitter = Vec2::new(
                self.fx_rng.random_range(-1.0..=1.0),
                self.fx_rng.random_range(-1.0..=1.0),
            ) * spread;
            let scale = 1.0 + self.fx_rng.random_range(0.0..1.0);
            self.effects.schedule(
                ms_to_ticks((i + 1) * interval_ms),
                GameEvent::Explosion {
                    pos: center + jitter,
                    color,
                    scale,
                },
            );
        }
    }

    #[inline]
    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand this frame's events to the presentation layer
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued for later ticks
    pub fn pending_effects(&self) -> usize {
        self.effects.len()
    }
}
