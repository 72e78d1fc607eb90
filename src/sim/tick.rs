//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically. One call
//! runs the whole frame: level timer, spawns, player input, entity
//! updates, collision resolution and off-screen pruning.

use super::collision::resolve;
use super::enemy::FireContext;
use super::events::{ColorHint, GameEvent};
use super::player::Move;
use super::state::{GamePhase, GameState};

/// Horizontal aim lead applied by the boss when the player strafes
const BOSS_AIM_LEAD: f32 = 50.0;
/// Autopilot: enemy bullets closer than this get dodged
const DODGE_RADIUS: f32 = 160.0;
/// Autopilot: ignore horizontal offsets smaller than this
const STEER_DEADZONE: f32 = 6.0;
/// Autopilot: detonate a bomb when this many enemies are on screen
const CROWD_SIZE: usize = 12;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire held
    pub fire: bool,
    /// Start / restart
    pub confirm: bool,
    /// Detonate a bomb
    pub bomb: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Cosmetic effects keep running in every phase
    state.effects.advance(&mut state.events);

    let input = if input.idle_mode {
        autopilot(state)
    } else {
        input.clone()
    };

    match state.phase {
        GamePhase::Start => {
            if input.confirm || input.fire {
                state.start_game();
            }
            return;
        }
        GamePhase::GameOver => {
            if input.confirm {
                state.reset_game();
            }
            return;
        }
        GamePhase::Playing => {}
    }

    let viewport = state.viewport();

    // Level progression
    state.clock_secs += dt;
    if state.level_elapsed() > state.tuning.session.level_duration_secs {
        state.advance_level();
    }

    // Regular spawns
    if !state.spawns_suppressed() {
        let plan = state.spawner.update(
            dt,
            state.level,
            &state.tuning.spawn,
            &viewport,
            &mut state.rng,
        );
        if let Some(plan) = plan {
            state.apply_spawn_plan(plan);
        }
    }

    // Player
    state.player.update(dt);
    let moves = [
        (input.left, Move::Left),
        (input.right, Move::Right),
        (input.up, Move::Up),
        (input.down, Move::Down),
    ];
    for (held, dir) in moves {
        if held {
            state.player.move_dir(dir, &viewport);
        }
    }
    if input.fire && state.player.can_fire() {
        let shots = state.player.shoot(state.level);
        let nose = state.player.nose();
        state.emit(GameEvent::MuzzleFlash {
            pos: nose,
            color: ColorHint::PLAYER_MUZZLE,
        });
        state.bullets.extend(shots);
    }
    if input.bomb {
        state.detonate_bomb();
    }

    // Entities
    for bullet in &mut state.bullets {
        bullet.update();
    }

    let target_lead = match (input.left, input.right) {
        (true, false) => -BOSS_AIM_LEAD,
        (false, true) => BOSS_AIM_LEAD,
        _ => 0.0,
    };
    let ctx = FireContext {
        target: Some(state.player.rect()),
        level: state.level,
        frame: state.time_ticks,
        target_lead,
    };
    let GameState {
        enemies,
        bullets,
        events,
        rng,
        level,
        ..
    } = state;
    for enemy in enemies.iter_mut() {
        enemy.update(dt, *level, &viewport, rng);
        let shots = enemy.shoot(&ctx);
        if let Some(first) = shots.first() {
            events.push(GameEvent::MuzzleFlash {
                pos: first.pos,
                color: ColorHint::ENEMY_MUZZLE,
            });
        }
        bullets.extend(shots);
    }

    for power_up in &mut state.power_ups {
        power_up.update();
    }

    resolve(state);

    // Prune whatever left the screen
    state.bullets.retain(|b| !b.is_off_screen(&viewport));
    state.enemies.retain(|e| !e.is_off_screen(&viewport));
    state.power_ups.retain(|p| !p.is_off_screen(&viewport));
}

/// Demo-mode input: hold fire, dodge the nearest incoming bullet, chase
/// power-ups, line up under enemies and bomb when swarmed
pub fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        fire: true,
        ..TickInput::default()
    };
    if state.phase == GamePhase::Start {
        input.confirm = true;
        return input;
    }
    if state.phase != GamePhase::Playing {
        return input;
    }

    let me = state.player.center();
    let threat = state
        .bullets
        .iter()
        .filter(|b| b.is_enemy() && b.pos.y < me.y + 10.0)
        .map(|b| (b, b.pos.distance(me)))
        .filter(|(_, dist)| *dist < DODGE_RADIUS)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let goal_x = if let Some((bullet, _)) = threat {
        // Step away from the bullet's side
        if bullet.pos.x < me.x {
            Some(me.x + DODGE_RADIUS)
        } else {
            Some(me.x - DODGE_RADIUS)
        }
    } else if let Some(power_up) = state.power_ups.iter().min_by(|a, b| {
        a.pos
            .distance(me)
            .partial_cmp(&b.pos.distance(me))
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        Some(power_up.pos.x)
    } else {
        // Line up under the lowest enemy
        state
            .enemies
            .iter()
            .max_by(|a, b| {
                a.pos
                    .y
                    .partial_cmp(&b.pos.y)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.center().x)
    };

    if let Some(x) = goal_x {
        let dx = x - me.x;
        input.left = dx < -STEER_DEADZONE;
        input.right = dx > STEER_DEADZONE;
    }
    input.bomb = state.enemies.len() >= CROWD_SIZE && state.player.bombs > 0;
    input
}
