//! Core-to-presentation event surface
//!
//! The simulation never draws anything. It emits fire-and-forget events that
//! a particle/notification layer consumes after each tick. Staggered effects
//! (chained explosions) go through `EffectQueue`, which is advanced by the
//! simulation clock and only ever produces events. It never touches score,
//! health or entity lists.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// RGB tint suggestion for an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorHint(pub u8, pub u8, pub u8);

impl ColorHint {
    pub const PLAYER: Self = Self(0, 150, 255);
    pub const PLAYER_MUZZLE: Self = Self(0, 255, 255);
    pub const ENEMY_MUZZLE: Self = Self(255, 100, 50);
    pub const IMPACT: Self = Self(255, 100, 100);
    pub const CLASH: Self = Self(255, 200, 0);
    pub const WHITE: Self = Self(255, 255, 255);
    pub const BOSS: Self = Self(100, 100, 255);
    pub const BOSS_ARRIVAL: Self = Self(100, 150, 255);
    pub const BOMB: Self = Self(255, 200, 50);
    pub const BOMB_GRANT: Self = Self(255, 50, 50);
    pub const GOOD_NEWS: Self = Self(0, 255, 0);
}

/// Where a notification is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Stacked side banner (power-ups, lives, bombs)
    Side,
    /// Big center banner (level progression)
    Center,
}

/// A presentation event emitted by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Explosion {
        pos: Vec2,
        color: ColorHint,
        scale: f32,
    },
    Impact {
        pos: Vec2,
        color: ColorHint,
    },
    MuzzleFlash {
        pos: Vec2,
        color: ColorHint,
    },
    Notification {
        kind: NotificationKind,
        message: String,
        sub_message: Option<String>,
        color: ColorHint,
        duration_ticks: u32,
    },
    ScreenShake {
        intensity: f32,
    },
}

impl GameEvent {
    pub fn explosion(pos: Vec2, color: ColorHint) -> Self {
        Self::Explosion {
            pos,
            color,
            scale: 1.0,
        }
    }

    pub fn side_notice(message: impl Into<String>, color: ColorHint) -> Self {
        Self::Notification {
            kind: NotificationKind::Side,
            message: message.into(),
            sub_message: None,
            color,
            duration_ticks: 120,
        }
    }
}

/// An event waiting for its delay to elapse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEffect {
    pub delay_ticks: u32,
    pub event: GameEvent,
}

/// Deferred cosmetic effects, ticked by the simulation clock
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectQueue {
    pending: Vec<ScheduledEffect>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire after `delay_ticks` ticks (0 = next advance)
    pub fn schedule(&mut self, delay_ticks: u32, event: GameEvent) {
        self.pending.push(ScheduledEffect { delay_ticks, event });
    }

    /// Advance one tick, moving due events into `out` in scheduling order
    pub fn advance(&mut self, out: &mut Vec<GameEvent>) {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut effect in self.pending.drain(..) {
            if effect.delay_ticks == 0 {
                out.push(effect.event);
            } else {
                effect.delay_ticks -= 1;
                still_pending.push(effect);
            }
        }
        self.pending = still_pending;
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shake(intensity: f32) -> GameEvent {
        GameEvent::ScreenShake { intensity }
    }

    #[test]
    fn test_effect_queue_fires_in_order() {
        let mut queue = EffectQueue::new();
        queue.schedule(2, shake(2.0));
        queue.schedule(0, shake(0.0));
        queue.schedule(1, shake(1.0));

        let mut out = Vec::new();
        queue.advance(&mut out);
        assert_eq!(out, vec![shake(0.0)]);

        out.clear();
        queue.advance(&mut out);
        assert_eq!(out, vec![shake(1.0)]);

        out.clear();
        queue.advance(&mut out);
        assert_eq!(out, vec![shake(2.0)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_effect_queue_clear() {
        let mut queue = EffectQueue::new();
        queue.schedule(5, shake(1.0));
        assert_eq!(queue.len(), 1);
        queue.clear();
        let mut out = Vec::new();
        for _ in 0..10 {
            queue.advance(&mut out);
        }
        assert!(out.is_empty());
    }
}
