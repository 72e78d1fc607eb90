//! The player's ship: movement, weapons, power-up timers and the
//! life/invincibility state machine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::geometry::{Hittable, Rect, Viewport};
use crate::tuning::PlayerTuning;

/// Ship dimensions
pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 50.0;
/// Gap kept between the ship and the bottom edge
const BOTTOM_MARGIN: f32 = 20.0;
/// Spawn height above the bottom edge
const SPAWN_MARGIN: f32 = 60.0;
/// Lateral offset of the outer triple-shot barrels
const TRIPLE_SHOT_OFFSET: f32 = 20.0;
/// Frames the bomb flash animation lasts
pub(crate) const BOMB_ANIMATION_TICKS: u32 = 60;

/// One held movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

/// A boolean flag with a countdown that clears it
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub active: bool,
    /// Seconds left (meaningful only while active)
    pub remaining: f32,
}

impl TimedEffect {
    /// Turn on and reset the countdown (re-activation refreshes, never stacks)
    pub fn activate(&mut self, duration: f32) {
        self.active = true;
        self.remaining = duration;
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.remaining = 0.0;
    }

    /// Count down; clears the flag once the timer reaches zero
    pub fn tick(&mut self, dt: f32) {
        if self.active {
            self.remaining -= dt;
            if self.remaining <= 0.0 {
                self.clear();
            }
        }
    }

    /// Remaining fraction in [0, 1] for HUD bars
    pub fn fraction(&self, duration: f32) -> f32 {
        if !self.active || duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / duration).clamp(0.0, 1.0)
    }
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub lives: u32,
    pub triple_shot: TimedEffect,
    pub speed_boost: TimedEffect,
    pub shield: TimedEffect,
    pub bombs: u32,
    pub invincibility: TimedEffect,
    /// Blink state while invincible (presentation only)
    pub visible: bool,
    blink_timer: f32,
    /// Seconds since the last shot
    pub since_last_shot: f32,
    /// Whether a movement input was applied this tick
    pub is_moving: bool,
    pub bomb_animation_ticks: u32,
    pub tuning: PlayerTuning,
}

impl Player {
    pub fn new(viewport: &Viewport, tuning: PlayerTuning) -> Self {
        Self {
            pos: Vec2::new(
                viewport.width / 2.0 - PLAYER_WIDTH / 2.0,
                viewport.height - PLAYER_HEIGHT - SPAWN_MARGIN,
            ),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            lives: tuning.lives,
            triple_shot: TimedEffect::default(),
            speed_boost: TimedEffect::default(),
            shield: TimedEffect::default(),
            bombs: 0,
            invincibility: TimedEffect::default(),
            visible: true,
            blink_timer: 0.0,
            // Ready to fire immediately
            since_last_shot: tuning.shot_cooldown_secs,
            is_moving: false,
            bomb_animation_ticks: 0,
            tuning,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Nose of the ship, where bullets leave
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility.active
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.lives == 0
    }

    /// Move one step. Horizontal stays on screen; vertical stays in the
    /// lower two-thirds of the viewport.
    pub fn move_dir(&mut self, dir: Move, viewport: &Viewport) {
        self.is_moving = true;
        let step = if self.speed_boost.active {
            self.tuning.speed * 2.0
        } else {
            self.tuning.speed
        };

        match dir {
            Move::Left => self.pos.x = (self.pos.x - step).max(0.0),
            Move::Right => self.pos.x = (self.pos.x + step).min(viewport.width - self.size.x),
            Move::Up => self.pos.y = (self.pos.y - step).max(viewport.height / 3.0),
            Move::Down => {
                self.pos.y =
                    (self.pos.y + step).min(viewport.height - self.size.y - BOTTOM_MARGIN)
            }
        }
    }

    /// Whether the held-fire cooldown has elapsed
    pub fn can_fire(&self) -> bool {
        self.since_last_shot >= self.tuning.shot_cooldown_secs
    }

    /// Fire unconditionally; callers gate on `can_fire`.
    /// Rocket size grows with the level.
    pub fn shoot(&mut self, level: u32) -> Vec<Bullet> {
        self.since_last_shot = 0.0;

        let width = 6.0 + level as f32 * 0.5;
        let height = 20.0 + level as f32;
        let nose = self.nose();
        let rocket = |x: f32| Bullet::player(x, nose.y).with_size(width, height);

        if self.triple_shot.active {
            vec![
                rocket(nose.x - TRIPLE_SHOT_OFFSET),
                rocket(nose.x),
                rocket(nose.x + TRIPLE_SHOT_OFFSET),
            ]
        } else {
            vec![rocket(nose.x)]
        }
    }

    /// Take a hit. Returns true iff the ship is destroyed.
    ///
    /// Invincibility ignores the hit entirely; otherwise an active shield
    /// absorbs it; otherwise a life is lost and invincibility starts.
    pub fn hit(&mut self) -> bool {
        if self.is_invincible() {
            return false;
        }
        if self.shield.active {
            self.shield.clear();
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.invincibility.activate(self.tuning.invincibility_secs);
        self.blink_timer = 0.0;
        self.visible = false;
        self.lives == 0
    }

    pub fn activate_triple_shot(&mut self) {
        self.triple_shot.activate(self.tuning.power_up_secs);
    }

    pub fn activate_speed_boost(&mut self) {
        self.speed_boost.activate(self.tuning.power_up_secs);
    }

    pub fn activate_shield(&mut self) {
        self.shield.activate(self.tuning.power_up_secs);
    }

    pub fn add_bomb(&mut self) {
        self.bombs += 1;
    }

    /// Spend a bomb. Returns false when none are left.
    pub fn activate_bomb(&mut self) -> bool {
        if self.bombs == 0 {
            return false;
        }
        self.bombs -= 1;
        self.bomb_animation_ticks = BOMB_ANIMATION_TICKS;
        true
    }

    /// Advance timers by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.is_moving = false;
        self.since_last_shot += dt;

        self.triple_shot.tick(dt);
        self.speed_boost.tick(dt);
        self.shield.tick(dt);

        if self.invincibility.active {
            self.invincibility.tick(dt);
            self.blink_timer += dt;
            if self.blink_timer >= self.tuning.blink_interval_secs {
                self.blink_timer -= self.tuning.blink_interval_secs;
                self.visible = !self.visible;
            }
            if !self.invincibility.active {
                self.visible = true;
            }
        }

        self.bomb_animation_ticks = self.bomb_animation_ticks.saturating_sub(1);
    }
}

impl Hittable for Player {
    fn hitbox(&self) -> Rect {
        self.rect()
    }

    fn can_be_hit(&self) -> bool {
        !self.is_invincible()
    }
}
