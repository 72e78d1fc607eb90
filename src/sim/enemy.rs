//! Enemy archetypes: movement, health and weapon patterns
//!
//! Every enemy shares one base record (position, health, points, weapon).
//! Archetype-specific state lives in the `Archetype` payload and all
//! behaviour dispatches with a single `match` on it.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::bullet::Bullet;
use super::events::ColorHint;
use super::geometry::{Hittable, Rect, Viewport};
use super::powerup::{PowerUp, PowerUpKind};
use crate::consts::MIN_ENEMY_COOLDOWN;
use crate::heading;

/// Archetype tag (what the presentation layer draws)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Zigzag,
    Shooting,
    Elite,
    Boss,
}

impl EnemyKind {
    /// Explosion tint when destroyed
    pub fn color(self) -> ColorHint {
        match self {
            EnemyKind::Basic => ColorHint(255, 0, 0),
            EnemyKind::Fast => ColorHint(255, 150, 0),
            EnemyKind::Zigzag => ColorHint(200, 0, 200),
            EnemyKind::Shooting | EnemyKind::Elite => ColorHint(0, 0, 255),
            EnemyKind::Boss => ColorHint::BOSS,
        }
    }
}

/// Named fire patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirePattern {
    Straight,
    Spread,
    Aimed,
    Spiral,
    Burst,
}

/// A cooldown-gated gun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub pattern: FirePattern,
    /// Seconds between shots
    pub cooldown: f32,
    /// Pixels per tick
    pub bullet_speed: f32,
    pub since_last_shot: f32,
}

impl Weapon {
    /// A new weapon starts ready to fire
    pub fn new(pattern: FirePattern, cooldown: f32, bullet_speed: f32) -> Self {
        let cooldown = cooldown.max(MIN_ENEMY_COOLDOWN);
        Self {
            pattern,
            cooldown,
            bullet_speed,
            since_last_shot: cooldown,
        }
    }

    pub fn ready(&self) -> bool {
        self.since_last_shot >= self.cooldown
    }
}

/// Sine-wave strafing while descending
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZigzagMotion {
    pub center_x: f32,
    pub time: f32,
    pub amplitude: f32,
    pub frequency: f32,
}

/// Dive to a hover line, then drift side to side
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverMotion {
    pub pulse_phase: f32,
}

/// Archetype-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Archetype {
    Basic,
    Fast,
    Zigzag(ZigzagMotion),
    Shooting,
    Elite(HoverMotion),
    Boss(Boss),
}

/// What an enemy knows about the world when it fires
#[derive(Debug, Clone, Copy, Default)]
pub struct FireContext {
    /// Player hitbox, if there is a player to aim at
    pub target: Option<Rect>,
    pub level: u32,
    /// Simulation tick counter (spiral phase)
    pub frame: u64,
    /// Horizontal lead for predictive aim (player's held direction)
    pub target_lead: f32,
}

/// Zigzag strafing constants
const ZIGZAG_AMPLITUDE: f32 = 20.0;
const ZIGZAG_FREQUENCY: f32 = 0.05;
/// Elite hover line as a fraction of viewport height
const ELITE_HOVER_LINE: f32 = 0.3;

/// An enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: Archetype,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Descent per tick
    pub speed: f32,
    pub health: i32,
    pub points: u32,
    pub weapon: Option<Weapon>,
    /// Animation clock
    pub anim_frame: f32,
    pub anim_speed: f32,
    /// Hit/muzzle flash intensity (0-1, decays)
    pub flash: f32,
}

impl Enemy {
    /// Build an enemy of `kind` with stats scaled for `level`
    pub fn new(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        level: u32,
        viewport: &Viewport,
        rng: &mut impl Rng,
    ) -> Self {
        let lvl = level as f32;
        let mut enemy = Self {
            id,
            archetype: Archetype::Basic,
            pos,
            size: Vec2::new(40.0, 40.0),
            speed: 2.0,
            health: 1,
            points: 10,
            weapon: None,
            anim_frame: 0.0,
            anim_speed: rng.random_range(0.05..0.15),
            flash: 0.0,
        };

        match kind {
            EnemyKind::Basic => {
                if level >= 2 {
                    let pattern = if level >= 6 {
                        FirePattern::Spread
                    } else {
                        FirePattern::Straight
                    };
                    enemy.weapon = Some(Weapon::new(pattern, 3.0 - lvl * 0.12, 3.0 + lvl * 0.1));
                }
            }
            EnemyKind::Fast => {
                enemy.archetype = Archetype::Fast;
                enemy.size = Vec2::new(30.0, 35.0);
                enemy.speed = 4.0;
                enemy.points = 20;
                if level >= 3 {
                    let pattern = if level >= 7 {
                        FirePattern::Aimed
                    } else {
                        FirePattern::Straight
                    };
                    enemy.weapon =
                        Some(Weapon::new(pattern, 2.5 - lvl * 0.08, 4.0 + lvl * 0.15));
                }
            }
            EnemyKind::Zigzag => {
                enemy.archetype = Archetype::Zigzag(ZigzagMotion {
                    center_x: pos.x,
                    time: 0.0,
                    amplitude: ZIGZAG_AMPLITUDE,
                    frequency: ZIGZAG_FREQUENCY,
                });
                enemy.speed = 3.0;
                enemy.points = 15;
                if level >= 2 {
                    let pattern = if level >= 6 {
                        FirePattern::Spiral
                    } else {
                        FirePattern::Spread
                    };
                    enemy.weapon =
                        Some(Weapon::new(pattern, 2.8 - lvl * 0.1, 3.5 + lvl * 0.12));
                }
            }
            EnemyKind::Shooting => {
                enemy.archetype = Archetype::Shooting;
                enemy.points = 25;
                enemy.health = 1 + (level / 4) as i32;
                let (pattern, bullet_speed) = if level >= 8 {
                    (FirePattern::Burst, 4.2)
                } else if level >= 6 {
                    (FirePattern::Aimed, 3.8)
                } else {
                    (FirePattern::Spread, 3.5)
                };
                enemy.weapon = Some(Weapon::new(pattern, 2.0 - lvl * 0.09, bullet_speed));
            }
            EnemyKind::Elite => {
                enemy.archetype = Archetype::Elite(HoverMotion {
                    pulse_phase: rng.random_range(0.0..TAU),
                });
                enemy.size = Vec2::new(60.0, 60.0);
                enemy.speed = 1.5;
                enemy.points = 35;
                enemy.health = 2 + (level / 4) as i32;
                let pattern = if level >= 9 {
                    FirePattern::Burst
                } else if level >= 7 {
                    FirePattern::Spiral
                } else {
                    FirePattern::Aimed
                };
                enemy.weapon = Some(Weapon::new(pattern, 1.8 - lvl * 0.07, 4.0 + lvl * 0.15));
            }
            EnemyKind::Boss => {
                let boss = Boss::new(level, viewport);
                enemy.size = Boss::size_for_level(level);
                enemy.speed = Boss::SPEED;
                enemy.points = Boss::points_for_level(level);
                enemy.health = boss.max_health;
                enemy.archetype = Archetype::Boss(boss);
            }
        }

        enemy
    }

    pub fn kind(&self) -> EnemyKind {
        match self.archetype {
            Archetype::Basic => EnemyKind::Basic,
            Archetype::Fast => EnemyKind::Fast,
            Archetype::Zigzag(_) => EnemyKind::Zigzag,
            Archetype::Shooting => EnemyKind::Shooting,
            Archetype::Elite(_) => EnemyKind::Elite,
            Archetype::Boss(_) => EnemyKind::Boss,
        }
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        matches!(self.archetype, Archetype::Boss(_))
    }

    pub fn boss(&self) -> Option<&Boss> {
        match &self.archetype {
            Archetype::Boss(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Advance one tick of `dt` seconds
    pub fn update(&mut self, dt: f32, level: u32, viewport: &Viewport, rng: &mut impl Rng) {
        self.anim_frame += self.anim_speed;
        self.flash = (self.flash - 0.1).max(0.0);
        if let Some(weapon) = &mut self.weapon {
            weapon.since_last_shot += dt;
        }
        if self.is_boss() {
            self.update_boss(dt, level, viewport, rng);
            return;
        }

        match &mut self.archetype {
            Archetype::Basic | Archetype::Fast | Archetype::Shooting => {
                self.pos.y += self.speed;
            }
            Archetype::Zigzag(motion) => {
                self.pos.y += self.speed;
                motion.time += 1.0;
                self.pos.x =
                    motion.center_x + (motion.time * motion.frequency).sin() * motion.amplitude;
            }
            Archetype::Elite(motion) => {
                motion.pulse_phase += 0.05;
                if self.pos.y < viewport.height * ELITE_HOVER_LINE {
                    self.pos.y += self.speed;
                } else {
                    self.pos.y += self.speed * 0.3;
                    self.pos.x += motion.pulse_phase.sin() * 1.5;
                    self.pos.x = viewport.clamp_x(self.pos.x, self.size.x);
                }
            }
            Archetype::Boss(_) => {}
        }
    }

    /// Off-screen check. Regular enemies leave through the bottom; a boss
    /// only counts as gone when fully above the top edge.
    pub fn is_off_screen(&self, viewport: &Viewport) -> bool {
        if self.is_boss() {
            viewport.is_above(&self.rect())
        } else {
            viewport.is_below(&self.rect())
        }
    }

    /// Take one point of damage. Returns true when this hit destroys it.
    pub fn hit(&mut self) -> bool {
        self.health -= 1;
        self.flash = 1.0;
        if let Archetype::Boss(boss) = &mut self.archetype {
            boss.shield_flash = 1.0;
        }
        self.health <= 0
    }

    /// Roll for a power-up drop at the enemy's center
    pub fn drop_power_up(
        &self,
        chance: f32,
        rng: &mut impl Rng,
        next_id: impl FnOnce() -> u32,
    ) -> Option<PowerUp> {
        let roll: f32 = rng.random();
        if roll >= chance {
            return None;
        }
        let kind = PowerUpKind::random(rng);
        Some(PowerUp::new(next_id(), kind, self.center()))
    }

    /// Fire if able. Returns the new bullets (empty when not firing).
    pub fn shoot(&mut self, ctx: &FireContext) -> Vec<Bullet> {
        if self.is_boss() {
            return self.boss_volley(ctx);
        }
        let Some(weapon) = self.weapon.as_mut() else {
            return Vec::new();
        };
        if !weapon.ready() {
            return Vec::new();
        }
        weapon.since_last_shot = 0.0;
        let weapon = *weapon;
        self.flash = 1.0;

        if matches!(self.archetype, Archetype::Shooting) {
            self.twin_cannon_volley(&weapon, ctx)
        } else {
            self.single_cannon_volley(&weapon, ctx)
        }
    }

    fn single_cannon_volley(&self, weapon: &Weapon, ctx: &FireContext) -> Vec<Bullet> {
        let bottom = Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y);
        let center = self.center();
        let speed = weapon.bullet_speed;

        match weapon.pattern {
            FirePattern::Straight => vec![Bullet::enemy(bottom.x, bottom.y).with_speed(speed)],
            FirePattern::Spread => (-1..=1)
                .map(|i| {
                    Bullet::enemy(bottom.x, bottom.y)
                        .with_speed(speed)
                        .with_velocity(Vec2::new(i as f32 * 1.5, speed))
                })
                .collect(),
            FirePattern::Aimed => match ctx.target {
                Some(target) => {
                    let dir = (target.center() - center).normalize_or(Vec2::Y);
                    vec![
                        Bullet::enemy(bottom.x, bottom.y)
                            .with_speed(speed)
                            .with_velocity(dir * speed),
                    ]
                }
                None => vec![Bullet::enemy(bottom.x, bottom.y).with_speed(speed)],
            },
            FirePattern::Spiral => {
                let phase = ctx.frame as f32 * 0.01;
                ring(center, 4, phase, speed)
            }
            FirePattern::Burst => ring(center, 8, 0.0, speed),
        }
    }

    /// Shooting archetype: two muzzles under the wings
    fn twin_cannon_volley(&self, weapon: &Weapon, ctx: &FireContext) -> Vec<Bullet> {
        let muzzle_y = self.pos.y + self.size.y * 0.7 + 15.0;
        let muzzles = [self.pos.x + 10.0, self.pos.x + self.size.x - 10.0];
        let speed = weapon.bullet_speed;
        let mut bullets = Vec::new();

        match weapon.pattern {
            FirePattern::Spread => {
                for i in -1..=1 {
                    for x in muzzles {
                        bullets.push(
                            Bullet::enemy(x, muzzle_y)
                                .with_speed(speed)
                                .with_velocity(Vec2::new(i as f32 * 0.7, speed)),
                        );
                    }
                }
            }
            FirePattern::Aimed => match ctx.target {
                Some(target) => {
                    let gun = Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y * 0.7);
                    let to_target = target.center() - gun;
                    let angle = to_target.y.atan2(to_target.x);
                    for (x, offset) in muzzles.into_iter().zip([-0.2, 0.2]) {
                        bullets.push(
                            Bullet::enemy(x, muzzle_y)
                                .with_speed(speed)
                                .with_velocity(heading(angle + offset) * speed),
                        );
                    }
                }
                None => {
                    for x in muzzles {
                        bullets.push(Bullet::enemy(x, muzzle_y).with_speed(speed));
                    }
                }
            },
            FirePattern::Burst => {
                // Forward hemisphere only
                let y = self.pos.y + self.size.y * 0.7 + 10.0;
                for i in 0..6 {
                    let angle = (i as f32 / 6.0) * PI + PI / 2.0;
                    for x in muzzles {
                        bullets.push(
                            Bullet::enemy(x, y)
                                .with_speed(speed)
                                .with_velocity(heading(angle) * speed),
                        );
                    }
                }
            }
            FirePattern::Straight | FirePattern::Spiral => {
                for x in muzzles {
                    bullets.push(Bullet::enemy(x, muzzle_y).with_speed(speed));
                }
            }
        }

        bullets
    }
}

/// `count` bullets evenly spaced around a full circle
pub(crate) fn ring(origin: Vec2, count: usize, phase: f32, speed: f32) -> Vec<Bullet> {
    (0..count)
        .map(|i| {
            let angle = (i as f32 / count as f32) * TAU + phase;
            Bullet::enemy(origin.x, origin.y)
                .with_speed(speed)
                .with_velocity(heading(angle) * speed)
        })
        .collect()
}

impl Hittable for Enemy {
    fn hitbox(&self) -> Rect {
        self.rect()
    }
}
