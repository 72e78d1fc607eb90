//! Falling power-up capsules

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::events::{ColorHint, GameEvent};
use super::geometry::{Rect, Viewport};
use super::player::Player;
use crate::consts::{POWER_UP_SIZE, POWER_UP_SPEED};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    TripleShot,
    SpeedBoost,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::TripleShot,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Shield,
    ];

    /// Uniform one-in-three pick
    pub fn random(rng: &mut impl Rng) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.33 {
            PowerUpKind::TripleShot
        } else if roll < 0.66 {
            PowerUpKind::SpeedBoost
        } else {
            PowerUpKind::Shield
        }
    }

    pub fn color(self) -> ColorHint {
        match self {
            PowerUpKind::TripleShot => ColorHint(0, 255, 0),
            PowerUpKind::SpeedBoost => ColorHint(255, 255, 0),
            PowerUpKind::Shield => ColorHint(0, 200, 255),
        }
    }

    /// Banner text and tint shown on pickup
    fn banner(self) -> (&'static str, ColorHint) {
        match self {
            PowerUpKind::TripleShot => ("BURST FIRE ACQUIRED!", ColorHint(255, 50, 50)),
            PowerUpKind::SpeedBoost => ("NITRO BOOST ACQUIRED!", ColorHint(255, 150, 0)),
            PowerUpKind::Shield => ("SHIELD ACTIVATED!", ColorHint(0, 200, 255)),
        }
    }
}

/// A power-up capsule. `pos` is its center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed (pixels per tick)
    pub speed: f32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, center: Vec2) -> Self {
        Self {
            id,
            kind,
            pos: center,
            size: Vec2::splat(POWER_UP_SIZE),
            speed: POWER_UP_SPEED,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn is_off_screen(&self, viewport: &Viewport) -> bool {
        viewport.is_outside(&self.rect())
    }

    /// AABB test against the player. Power-ups are collected even while
    /// the player is invincible.
    pub fn collides_with(&self, player: &Player) -> bool {
        self.rect().overlaps(&player.rect())
    }

    /// Grant the effect and announce it
    pub fn apply(&self, player: &mut Player, events: &mut Vec<GameEvent>) {
        match self.kind {
            PowerUpKind::TripleShot => player.activate_triple_shot(),
            PowerUpKind::SpeedBoost => player.activate_speed_boost(),
            PowerUpKind::Shield => player.activate_shield(),
        }

        let (message, color) = self.kind.banner();
        events.push(GameEvent::Impact {
            pos: self.pos,
            color: self.kind.color(),
        });
        events.push(GameEvent::side_notice(message, color));
    }
}
