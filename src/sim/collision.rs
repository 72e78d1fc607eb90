//! Collision and combat resolution
//!
//! Runs once per tick after everything has moved. Passes run in a fixed
//! order and each walks its list from the end backward. Removals are
//! recorded as flags and compacted once at the end, so an entity consumed
//! by one rule is never matched again in the same pass.
//!
//! 1. Player bullets vs enemy bullets (distance test, first match wins)
//! 2. Player bullets vs enemies
//! 3. Enemy bullets vs player
//! 4. Enemies vs player (direct contact)
//! 5. Power-ups vs player

use super::bullet::Bullet;
use super::enemy::EnemyKind;
use super::events::{ColorHint, GameEvent};
use super::geometry::Hittable;
use super::state::{GamePhase, GameState};

/// Staggered explosions when a boss goes down
const BOSS_CHAIN_COUNT: u32 = 10;
const BOSS_CHAIN_INTERVAL_MS: u32 = 150;

/// What happened during one resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Player/enemy bullet pairs that cancelled out
    pub clashes: u32,
    pub enemies_destroyed: u32,
    /// Hits that landed on the player without destroying it
    pub player_hits: u32,
    pub power_ups_collected: u32,
    /// The player lost its last life this pass
    pub player_destroyed: bool,
}

/// Two bullets are close enough to cancel out
#[inline]
pub fn bullets_clash(a: &Bullet, b: &Bullet) -> bool {
    a.pos.distance(b.pos) < a.size.x + b.size.x
}

/// Resolve every interaction for this tick
pub fn resolve(state: &mut GameState) -> Resolution {
    let mut res = Resolution::default();
    let mut spent = vec![false; state.bullets.len()];
    let mut dead = vec![false; state.enemies.len()];

    clash_pass(state, &mut spent, &mut res);
    player_fire_pass(state, &mut spent, &mut dead, &mut res);
    enemy_fire_pass(state, &mut spent, &mut res);
    contact_pass(state, &mut dead, &mut res);

    retain_unflagged(&mut state.bullets, &spent);
    retain_unflagged(&mut state.enemies, &dead);

    pickup_pass(state, &mut res);
    res
}

fn clash_pass(state: &mut GameState, spent: &mut [bool], res: &mut Resolution) {
    for i in (0..state.bullets.len()).rev() {
        if spent[i] || state.bullets[i].is_enemy() {
            continue;
        }
        let partner = (0..state.bullets.len()).rev().find(|&j| {
            !spent[j]
                && state.bullets[j].is_enemy()
                && bullets_clash(&state.bullets[i], &state.bullets[j])
        });
        let Some(j) = partner else {
            continue;
        };

        spent[i] = true;
        spent[j] = true;
        res.clashes += 1;
        state.score += state.tuning.session.clash_reward;

        let mid = (state.bullets[i].pos + state.bullets[j].pos) * 0.5;
        state.emit(GameEvent::Explosion {
            pos: mid,
            color: ColorHint::CLASH,
            scale: 0.7,
        });
        state.emit(GameEvent::ScreenShake { intensity: 2.0 });
    }
}

fn player_fire_pass(
    state: &mut GameState,
    spent: &mut [bool],
    dead: &mut [bool],
    res: &mut Resolution,
) {
    for bi in (0..state.bullets.len()).rev() {
        if spent[bi] || state.bullets[bi].is_enemy() {
            continue;
        }
        let target = (0..state.enemies.len())
            .rev()
            .find(|&ei| !dead[ei] && state.bullets[bi].hits(&state.enemies[ei]));
        let Some(ei) = target else {
            continue;
        };

        // The bullet is consumed whether or not the enemy survives
        spent[bi] = true;
        let impact = state.bullets[bi].pos;
        state.emit(GameEvent::Impact {
            pos: impact,
            color: ColorHint::IMPACT,
        });
        // Twin-cannon hull flashes where it was struck
        if state.enemies[ei].kind() == EnemyKind::Shooting {
            let center = state.enemies[ei].center();
            state.emit(GameEvent::Impact {
                pos: center,
                color: EnemyKind::Shooting.color(),
            });
        }

        if state.enemies[ei].hit() {
            dead[ei] = true;
            res.enemies_destroyed += 1;
            destroy_enemy(state, ei);
        }
    }
}

/// Score, feedback and drop roll for an enemy killed by player fire
fn destroy_enemy(state: &mut GameState, index: usize) {
    let enemy = &state.enemies[index];
    let (kind, points) = (enemy.kind(), enemy.points);
    let (center, half) = (enemy.center(), enemy.size * 0.5);
    state.score += u64::from(points);

    if kind == EnemyKind::Boss {
        log::info!("boss destroyed on level {}, +{points}", state.level);
        state.emit(GameEvent::ScreenShake { intensity: 20.0 });
        state.schedule_chain(
            center,
            half,
            BOSS_CHAIN_COUNT,
            BOSS_CHAIN_INTERVAL_MS,
            ColorHint::BOSS,
        );
    } else {
        state.emit(GameEvent::explosion(center, kind.color()));
    }

    state.roll_power_up_drop(index);
}

fn enemy_fire_pass(state: &mut GameState, spent: &mut [bool], res: &mut Resolution) {
    for bi in (0..state.bullets.len()).rev() {
        if spent[bi] || !state.bullets[bi].is_enemy() {
            continue;
        }
        // Invincibility makes enemy bullets pass straight through
        if !state.bullets[bi].hits(&state.player) {
            continue;
        }
        spent[bi] = true;
        damage_player(state, res);
    }
}

fn contact_pass(state: &mut GameState, dead: &mut [bool], res: &mut Resolution) {
    let player_rect = state.player.rect();
    for ei in (0..state.enemies.len()).rev() {
        if dead[ei] || !state.enemies[ei].rect().overlaps(&player_rect) {
            continue;
        }
        damage_player(state, res);

        if state.enemies[ei].is_boss() {
            state.enemies[ei].graze();
            let nose = state.player.nose();
            state.emit(GameEvent::explosion(nose, ColorHint::IMPACT));
        } else {
            dead[ei] = true;
            let center = state.enemies[ei].center();
            state.emit(GameEvent::explosion(center, ColorHint(255, 0, 0)));
        }
    }
}

/// Apply one hit to the player and end the run if it was the last life
fn damage_player(state: &mut GameState, res: &mut Resolution) {
    let landed = state.player.can_be_hit();
    let destroyed = state.player.hit();

    if destroyed {
        res.player_destroyed = true;
        if state.phase == GamePhase::Playing {
            state.game_over();
        }
    } else if landed {
        res.player_hits += 1;
        let center = state.player.center();
        state.emit(GameEvent::Impact {
            pos: center,
            color: ColorHint::PLAYER,
        });
        state.emit(GameEvent::ScreenShake { intensity: 5.0 });
    }
}

fn pickup_pass(state: &mut GameState, res: &mut Resolution) {
    for i in (0..state.power_ups.len()).rev() {
        if !state.power_ups[i].collides_with(&state.player) {
            continue;
        }
        let power_up = state.power_ups.remove(i);
        log::debug!("collected {:?}", power_up.kind);
        power_up.apply(&mut state.player, &mut state.events);
        res.power_ups_collected += 1;
    }
}

/// Drop every item whose flag is set, preserving order
fn retain_unflagged<T>(items: &mut Vec<T>, flags: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !flags.get(index).copied().unwrap_or(false);
        index += 1;
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Archetype;
    use crate::sim::powerup::{PowerUp, PowerUpKind};
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(7);
        state.start_game();
        state
    }

    /// A point inside the player's hull
    fn on_player(state: &GameState) -> Vec2 {
        state.player.center()
    }

    #[test]
    fn test_player_bullet_destroys_basic_enemy() {
        let mut state = playing();
        state.spawn_enemy(EnemyKind::Basic, Vec2::new(100.0, 100.0));
        assert_eq!(state.enemies[0].health, 1);
        state.bullets.push(Bullet::player(120.0, 110.0));

        let res = resolve(&mut state);
        assert_eq!(res.enemies_destroyed, 1);
        assert_eq!(state.score, 10);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_shield_absorbs_enemy_bullet() {
        let mut state = playing();
        state.player.activate_shield();
        let at = on_player(&state);
        state.bullets.push(Bullet::enemy(at.x, at.y));

        let res = resolve(&mut state);
        assert!(!state.player.shield.active);
        assert_eq!(state.player.lives, 3);
        assert!(state.bullets.is_empty());
        assert!(!res.player_destroyed);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = playing();
        state.player.lives = 1;
        let at = on_player(&state);
        state.bullets.push(Bullet::enemy(at.x, at.y));

        let res = resolve(&mut state);
        assert!(res.player_destroyed);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.pending_effects() > 0);
    }

    #[test]
    fn test_opposing_bullets_cancel() {
        let mut state = playing();
        state.bullets.push(Bullet::player(400.0, 300.0));
        state.bullets.push(Bullet::enemy(403.0, 305.0));

        let res = resolve(&mut state);
        assert_eq!(res.clashes, 1);
        assert_eq!(state.score, 5);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_clash_pairs_each_bullet_once() {
        let mut state = playing();
        state.bullets.push(Bullet::player(400.0, 300.0));
        state.bullets.push(Bullet::enemy(402.0, 300.0));
        state.bullets.push(Bullet::enemy(398.0, 300.0));

        let res = resolve(&mut state);
        assert_eq!(res.clashes, 1);
        assert_eq!(state.score, 5);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].is_enemy());
    }

    #[test]
    fn test_same_side_bullets_never_clash() {
        let a = Bullet::player(0.0, 0.0);
        let b = Bullet::player(1.0, 1.0);
        let mut state = playing();
        state.bullets.push(a.clone());
        state.bullets.push(b);
        let res = resolve(&mut state);
        assert_eq!(res.clashes, 0);
        assert_eq!(state.bullets.len(), 2);
        assert!(bullets_clash(&a, &Bullet::enemy(1.0, 1.0)));
    }

    #[test]
    fn test_one_bullet_damages_one_enemy() {
        let mut state = playing();
        state.spawn_enemy(EnemyKind::Basic, Vec2::new(100.0, 100.0));
        state.spawn_enemy(EnemyKind::Basic, Vec2::new(110.0, 100.0));
        state.bullets.push(Bullet::player(125.0, 110.0));

        let res = resolve(&mut state);
        assert_eq!(res.enemies_destroyed, 1);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_tough_enemy_scores_once() {
        let mut state = playing();
        state.level = 8;
        state.spawn_enemy(EnemyKind::Elite, Vec2::new(100.0, 100.0));
        let health = state.enemies[0].health;
        assert_eq!(health, 4);

        for shot in 0..health {
            state.bullets.push(Bullet::player(130.0, 120.0));
            resolve(&mut state);
            if shot < health - 1 {
                assert_eq!(state.enemies.len(), 1);
                assert_eq!(state.score, 0);
            }
        }
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 35);
    }

    #[test]
    fn test_invincible_player_lets_bullets_through() {
        let mut state = playing();
        state.player.invincibility.activate(2.0);
        let at = on_player(&state);
        state.bullets.push(Bullet::enemy(at.x, at.y));

        resolve(&mut state);
        assert_eq!(state.player.lives, 3);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_contact_removes_regular_enemy() {
        let mut state = playing();
        let at = state.player.pos;
        state.spawn_enemy(EnemyKind::Fast, at);

        let res = resolve(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.player.lives, 2);
        assert_eq!(res.player_hits, 1);
        assert!(state.player.is_invincible());
        // No score for ramming
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_contact_on_last_life_ends_game() {
        let mut state = playing();
        state.player.lives = 1;
        let at = state.player.pos;
        state.spawn_enemy(EnemyKind::Basic, at);

        let res = resolve(&mut state);
        assert!(res.player_destroyed);
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_shield_absorbs_contact() {
        let mut state = playing();
        state.player.activate_shield();
        let at = state.player.pos;
        state.spawn_enemy(EnemyKind::Basic, at);

        let res = resolve(&mut state);
        assert!(!state.player.shield.active);
        assert_eq!(state.player.lives, 3);
        assert!(!state.player.is_invincible());
        assert!(!res.player_destroyed);
        assert!(state.enemies.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_contact_only_grazes_boss() {
        let mut state = playing();
        state.level = 5;
        let at = state.player.pos - Vec2::new(40.0, 40.0);
        state.spawn_enemy(EnemyKind::Boss, at);
        state.enemies[0].health = 2;

        for _ in 0..5 {
            resolve(&mut state);
        }
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, 1);
        assert!(matches!(state.enemies[0].archetype, Archetype::Boss(_)));
        assert_eq!(state.player.lives, 2);
    }

    #[test]
    fn test_boss_kill_queues_explosion_chain() {
        let mut state = playing();
        state.level = 5;
        state.spawn_enemy(EnemyKind::Boss, Vec2::new(100.0, 100.0));
        state.enemies[0].health = 1;
        let points = state.enemies[0].points;
        state.bullets.push(Bullet::player(150.0, 120.0));

        resolve(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, u64::from(points));
        assert!(state.pending_effects() >= BOSS_CHAIN_COUNT as usize);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ScreenShake { intensity: 20.0 }));
    }

    #[test]
    fn test_power_up_collected_and_removed() {
        let mut state = playing();
        let at = on_player(&state);
        state.power_ups.push(PowerUp::new(99, PowerUpKind::TripleShot, at));
        state
            .power_ups
            .push(PowerUp::new(100, PowerUpKind::Shield, Vec2::new(20.0, 20.0)));

        let res = resolve(&mut state);
        assert_eq!(res.power_ups_collected, 1);
        assert!(state.player.triple_shot.active);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].id, 100);
    }

    #[test]
    fn test_retain_unflagged_keeps_order() {
        let mut items = vec![1, 2, 3, 4, 5];
        retain_unflagged(&mut items, &[false, true, false, true, false]);
        assert_eq!(items, vec![1, 3, 5]);
    }
}
