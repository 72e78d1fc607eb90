//! Read-only views for a presentation layer
//!
//! `Hud` carries the session numbers a HUD draws; `Snapshot` lists every
//! sprite with the visual flags a renderer needs. Both serialize to JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::BossPhase;
use super::bullet::BulletOwner;
use super::enemy::{Archetype, EnemyKind};
use super::player::BOMB_ANIMATION_TICKS;
use super::powerup::PowerUpKind;
use super::state::{GamePhase, GameState};

/// Session numbers for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub bombs: u32,
    pub phase: GamePhase,
    /// Active power-ups with their remaining fraction (0-1)
    pub power_ups: Vec<(PowerUpKind, f32)>,
    /// Boss health fraction while a boss is alive
    pub boss_health: Option<f32>,
    /// Seconds left on the current level
    pub level_time_left: f32,
}

/// What a sprite is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Player,
    PlayerBullet,
    /// Oversized player bullet
    Rocket,
    EnemyBullet,
    Enemy(EnemyKind),
    PowerUp(PowerUpKind),
}

/// Per-sprite visual state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteFlags {
    pub visible: bool,
    pub invincible: bool,
    pub shielded: bool,
    /// Hit/muzzle flash intensity (0-1)
    pub flash: f32,
    pub weapon_charge: f32,
    pub shield_flash: f32,
    pub boss_phase: Option<BossPhase>,
    /// Sprite animation clock (enemies)
    pub anim_frame: f32,
    /// Engine thrust (player moved this tick)
    pub thrusting: bool,
    /// Bomb detonation glow (1 at detonation, decays to 0)
    pub bomb_glow: f32,
}

/// One drawable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub id: Option<u32>,
    pub kind: SpriteKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub flags: SpriteFlags,
}

/// Everything on screen this tick, back to front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub sprites: Vec<SpriteView>,
}

impl GameState {
    pub fn hud(&self) -> Hud {
        let player = &self.player;
        let duration = player.tuning.power_up_secs;
        let power_ups = [
            (PowerUpKind::TripleShot, &player.triple_shot),
            (PowerUpKind::SpeedBoost, &player.speed_boost),
            (PowerUpKind::Shield, &player.shield),
        ]
        .into_iter()
        .filter(|(_, effect)| effect.active)
        .map(|(kind, effect)| (kind, effect.fraction(duration)))
        .collect();

        let boss_health = self.enemies.iter().find_map(|e| {
            e.boss().map(|boss| boss.health_fraction(e.health))
        });

        Hud {
            score: self.score,
            level: self.level,
            lives: player.lives,
            bombs: player.bombs,
            phase: self.phase,
            power_ups,
            boss_health,
            level_time_left: (self.tuning.session.level_duration_secs - self.level_elapsed())
                .max(0.0),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut sprites = Vec::with_capacity(
            1 + self.bullets.len() + self.enemies.len() + self.power_ups.len(),
        );

        for power_up in &self.power_ups {
            let rect = power_up.rect();
            sprites.push(SpriteView {
                id: Some(power_up.id),
                kind: SpriteKind::PowerUp(power_up.kind),
                pos: rect.min,
                size: rect.size,
                flags: SpriteFlags {
                    visible: true,
                    ..Default::default()
                },
            });
        }

        for enemy in &self.enemies {
            let mut flags = SpriteFlags {
                visible: true,
                flash: enemy.flash,
                anim_frame: enemy.anim_frame,
                ..Default::default()
            };
            if let Archetype::Boss(boss) = &enemy.archetype {
                flags.weapon_charge = boss.weapon_charge;
                flags.shield_flash = boss.shield_flash;
                flags.boss_phase = Some(boss.phase);
            }
            sprites.push(SpriteView {
                id: Some(enemy.id),
                kind: SpriteKind::Enemy(enemy.kind()),
                pos: enemy.pos,
                size: enemy.size,
                flags,
            });
        }

        for bullet in &self.bullets {
            let kind = match bullet.owner {
                BulletOwner::Enemy => SpriteKind::EnemyBullet,
                BulletOwner::Player if bullet.is_rocket() => SpriteKind::Rocket,
                BulletOwner::Player => SpriteKind::PlayerBullet,
            };
            let rect = bullet.rect();
            sprites.push(SpriteView {
                id: None,
                kind,
                pos: rect.min,
                size: rect.size,
                flags: SpriteFlags {
                    visible: true,
                    ..Default::default()
                },
            });
        }

        let player = &self.player;
        sprites.push(SpriteView {
            id: None,
            kind: SpriteKind::Player,
            pos: player.pos,
            size: player.size,
            flags: SpriteFlags {
                visible: player.visible,
                invincible: player.is_invincible(),
                shielded: player.shield.active,
                thrusting: player.is_moving,
                bomb_glow: player.bomb_animation_ticks as f32 / BOMB_ANIMATION_TICKS as f32,
                ..Default::default()
            },
        });

        Snapshot {
            tick: self.time_ticks,
            sprites,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::Bullet;

    #[test]
    fn test_hud_lists_active_power_ups() {
        let mut state = GameState::new(1);
        state.start_game();
        let hud = state.hud();
        assert!(hud.power_ups.is_empty());
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.phase, GamePhase::Playing);
        assert!(hud.boss_health.is_none());

        state.player.activate_shield();
        state.player.update(state.tuning.player.power_up_secs / 2.0);
        let hud = state.hud();
        assert_eq!(hud.power_ups.len(), 1);
        let (kind, fraction) = hud.power_ups[0];
        assert_eq!(kind, PowerUpKind::Shield);
        assert!((fraction - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_hud_reports_boss_health() {
        let mut state = GameState::new(1);
        state.start_game();
        state.level = 5;
        state.spawn_boss();
        state.enemies[0].health -= 3;
        let fraction = state.hud().boss_health.unwrap_or_default();
        assert!((fraction - 12.0 / 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_snapshot_tags_sprites() {
        let mut state = GameState::new(1);
        state.start_game();
        state.spawn_enemy(EnemyKind::Zigzag, Vec2::new(100.0, 100.0));
        state.bullets.push(Bullet::enemy(50.0, 50.0));
        state.bullets.extend(state.player.shoot(1));

        let snap = state.snapshot();
        let kinds: Vec<SpriteKind> = snap.sprites.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SpriteKind::Enemy(EnemyKind::Zigzag),
                SpriteKind::EnemyBullet,
                SpriteKind::Rocket,
                SpriteKind::Player,
            ]
        );
        let json = serde_json::to_string(&snap).unwrap_or_default();
        assert!(json.contains("Zigzag"));
    }

    #[test]
    fn test_snapshot_carries_animation_state() {
        let mut state = GameState::new(1);
        state.start_game();
        state.spawn_enemy(EnemyKind::Basic, Vec2::new(100.0, 100.0));
        state.enemies[0].anim_frame = 2.5;
        state.player.add_bomb();
        assert!(state.player.activate_bomb());
        state.player.is_moving = true;

        let snap = state.snapshot();
        let enemy = &snap.sprites[0];
        assert_eq!(enemy.flags.anim_frame, 2.5);
        let player = snap.sprites.last().map(|s| s.flags).unwrap_or_default();
        assert!(player.thrusting);
        assert_eq!(player.bomb_glow, 1.0);

        state.player.update(1.0 / 60.0);
        let player = state.snapshot().sprites.last().map(|s| s.flags).unwrap_or_default();
        assert!(!player.thrusting);
        assert!(player.bomb_glow < 1.0 && player.bomb_glow > 0.0);
    }
}
