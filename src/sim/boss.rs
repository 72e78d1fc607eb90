//! Boss behaviour: approach, attack and retreat phases
//!
//! The boss is an `Enemy` whose archetype payload is a `Boss`. It slides
//! down to a hover line, sways while cycling through four attack patterns,
//! and may retreat off the top edge to regenerate when badly damaged.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::enemy::{Archetype, Enemy, FireContext, ring};
use super::geometry::Viewport;
use crate::consts::{BULLET_SPEED, MIN_ENEMY_COOLDOWN};
use crate::remap;

/// Boss movement phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Approach,
    Attack,
    Retreat,
}

/// Seconds between attack pattern rotations
const PATTERN_CHANGE_SECS: f32 = 8.0;
/// Health fraction at or below which retreat becomes possible
const RETREAT_HEALTH_FRACTION: f32 = 0.3;
/// Per-tick retreat probability once damaged
const RETREAT_CHANCE: f32 = 0.001;
/// Health regained on each return from a retreat
const RETREAT_REGEN: i32 = 2;
/// Minimum ticks between volleys while the weapon is charged
const REFIRE_TICKS: u32 = 4;
/// Hover line as a fraction of viewport height
const HOVER_LINE: f32 = 0.2;

/// Boss-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub phase: BossPhase,
    pub max_health: i32,
    /// Hover line (top edge y)
    pub target_y: f32,
    /// Seconds between weapon charges
    pub attack_cooldown: f32,
    pub since_attack: f32,
    /// Active pattern, 0-3
    pub attack_pattern: u8,
    /// Rotation step within the pattern, 0-5
    pub pattern_step: u8,
    pub since_pattern_change: f32,
    /// Hit feedback (0-1, decays)
    pub shield_flash: f32,
    /// Charge level (0-1, decays); volleys need > 0.2
    pub weapon_charge: f32,
    /// Ticks spent attacking (drives the sway)
    pub sway_ticks: u32,
    refire_ticks: u32,
}

impl Boss {
    /// Descent speed while approaching (pixels per tick)
    pub const SPEED: f32 = 0.7;

    pub fn new(level: u32, viewport: &Viewport) -> Self {
        Self {
            phase: BossPhase::Approach,
            max_health: Self::health_for_level(level),
            target_y: viewport.height * HOVER_LINE,
            attack_cooldown: (2.0 - level as f32 * 0.07).max(MIN_ENEMY_COOLDOWN),
            since_attack: 0.0,
            attack_pattern: 0,
            pattern_step: 0,
            since_pattern_change: 0.0,
            shield_flash: 0.0,
            weapon_charge: 0.0,
            sway_ticks: 0,
            refire_ticks: 0,
        }
    }

    pub fn size_for_level(level: u32) -> Vec2 {
        let lvl = level as f32;
        Vec2::new(120.0 + lvl * 3.0, 80.0 + lvl * 2.0)
    }

    pub fn points_for_level(level: u32) -> u32 {
        100 + level * 15
    }

    pub fn health_for_level(level: u32) -> i32 {
        (8.0 + level as f32 * 1.5).floor() as i32
    }

    /// Fraction of health left, for the HUD bar
    pub fn health_fraction(&self, health: i32) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (health as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }

    fn can_fire(&self) -> bool {
        self.phase == BossPhase::Attack
            && self.since_attack > self.attack_cooldown / 4.0
            && self.weapon_charge > 0.2
            && self.refire_ticks == 0
    }

    /// Bullets for the active pattern, fired from a boss at `pos` of `size`
    pub fn volley(&self, pos: Vec2, size: Vec2, ctx: &FireContext) -> Vec<Bullet> {
        let lvl = ctx.level as f32;
        let main = Vec2::new(pos.x + size.x * 0.5, pos.y + size.y * 0.6);
        let center = pos + size * 0.5;

        match self.attack_pattern {
            0 => {
                // Fan from the main cannon
                // Offsets run -count/2..=count/2, so odd counts straddle the center
                let count = 3 + ctx.level / 4;
                let first = -(count as f32) / 2.0;
                let speed = 4.0 + lvl * 0.2;
                (0..=count)
                    .map(|k| {
                        let lane = first + k as f32;
                        Bullet::enemy(main.x, main.y)
                            .with_speed(speed)
                            .with_velocity(Vec2::new(lane * 0.8, speed))
                    })
                    .collect()
            }
            1 => {
                // Side cannons, straight down
                let count = 2 + ctx.level / 5;
                let y = pos.y + size.y * 0.5 + 15.0;
                let speed = 3.5 + lvl * 0.15;
                let mut bullets = Vec::with_capacity(count as usize * 2);
                for i in 0..count {
                    let spacing = 10.0 * i as f32 + 4.0;
                    for cannon in [0.25, 0.75] {
                        let x = pos.x + size.x * cannon - 15.0 + spacing;
                        bullets.push(Bullet::enemy(x, y).with_speed(speed));
                    }
                }
                bullets
            }
            2 => {
                // Aimed with lead on the player's held direction
                let Some(target) = ctx.target else {
                    return vec![Bullet::enemy(main.x, main.y)];
                };
                let aim = Vec2::new(target.center().x + ctx.target_lead, target.center().y);
                let to_target = aim - center;
                let base = to_target.y.atan2(to_target.x);
                let count = 1 + ctx.level / 2;
                let speed = 6.0 + lvl * 0.3;
                (0..count)
                    .map(|i| {
                        let offset = remap(i as f32, 0.0, (count - 1) as f32, -0.2, 0.2);
                        Bullet::enemy(main.x, main.y)
                            .with_speed(speed)
                            .with_velocity(crate::heading(base + offset) * speed)
                    })
                    .collect()
            }
            _ => {
                if ctx.level >= 5 {
                    let count = 6 + ctx.level as usize / 2;
                    let phase = self.pattern_step as f32 * PI / 3.0;
                    ring(center, count, phase, 4.0 + lvl * 0.2)
                } else {
                    (-2..=2)
                        .map(|i| {
                            Bullet::enemy(main.x, main.y)
                                .with_velocity(Vec2::new(i as f32 * 1.2, BULLET_SPEED))
                        })
                        .collect()
                }
            }
        }
    }
}

impl Enemy {
    /// Per-tick boss movement and weapon cycle
    pub(crate) fn update_boss(
        &mut self,
        dt: f32,
        level: u32,
        viewport: &Viewport,
        rng: &mut impl Rng,
    ) {
        let Archetype::Boss(boss) = &mut self.archetype else {
            return;
        };
        boss.refire_ticks = boss.refire_ticks.saturating_sub(1);
        boss.shield_flash = (boss.shield_flash - 0.01).max(0.0);

        match boss.phase {
            BossPhase::Approach => {
                self.pos.y = (self.pos.y + self.speed).min(boss.target_y);
                if self.pos.y >= boss.target_y {
                    boss.phase = BossPhase::Attack;
                    boss.since_attack = 0.0;
                }
            }
            BossPhase::Attack => {
                boss.sway_ticks += 1;
                let sway = (boss.sway_ticks as f32 * 0.02).sin() * 1.5 * (1.0 + level as f32 * 0.2);
                self.pos.x = viewport.clamp_x(self.pos.x + sway, self.size.x);

                boss.since_pattern_change += dt;
                if boss.since_pattern_change > PATTERN_CHANGE_SECS {
                    boss.attack_pattern = (boss.attack_pattern + 1) % 4;
                    boss.pattern_step = 0;
                    boss.since_pattern_change = 0.0;
                }

                boss.since_attack += dt;
                if boss.since_attack > boss.attack_cooldown {
                    boss.since_attack = 0.0;
                    boss.pattern_step = (boss.pattern_step + 1) % 6;
                    boss.weapon_charge = 1.0;
                }
                boss.weapon_charge = (boss.weapon_charge - 0.02).max(0.0);

                let damaged =
                    self.health as f32 <= boss.max_health as f32 * RETREAT_HEALTH_FRACTION;
                if damaged && rng.random::<f32>() < RETREAT_CHANCE {
                    log::debug!("boss {} retreating at {} hp", self.id, self.health);
                    boss.phase = BossPhase::Retreat;
                }
            }
            BossPhase::Retreat => {
                self.pos.y -= self.speed * 1.5;
                if self.pos.y < -self.size.y {
                    let span = (viewport.width - self.size.x).max(1.0);
                    self.pos.x = rng.random_range(0.0..span);
                    self.pos.y = -self.size.y;
                    self.health = (self.health + RETREAT_REGEN).min(boss.max_health);
                    boss.phase = BossPhase::Approach;
                }
            }
        }
    }

    /// Boss firing, gated on phase, charge and the refire gap
    pub(crate) fn boss_volley(&mut self, ctx: &FireContext) -> Vec<Bullet> {
        let Archetype::Boss(boss) = &mut self.archetype else {
            return Vec::new();
        };
        if !boss.can_fire() {
            return Vec::new();
        }
        boss.refire_ticks = REFIRE_TICKS;
        self.flash = 1.0;
        boss.volley(self.pos, self.size, ctx)
    }

    /// Contact damage for the boss. It never drops below one point of
    /// health here; only player fire finishes it.
    pub fn graze(&mut self) {
        self.health = (self.health - 1).max(1);
        if let Archetype::Boss(boss) = &mut self.archetype {
            boss.shield_flash = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::geometry::Rect;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn vp() -> Viewport {
        Viewport::new(800.0, 800.0)
    }

    fn boss_enemy(level: u32) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(3);
        let size = Boss::size_for_level(level);
        let pos = Vec2::new((800.0 - size.x) / 2.0, -size.y);
        Enemy::new(1, EnemyKind::Boss, pos, level, &vp(), &mut rng)
    }

    fn boss_mut(e: &mut Enemy) -> &mut Boss {
        match &mut e.archetype {
            Archetype::Boss(b) => b,
            _ => panic!("not a boss"),
        }
    }

    fn ctx(level: u32, target: Option<Rect>, lead: f32) -> FireContext {
        FireContext {
            target,
            level,
            frame: 0,
            target_lead: lead,
        }
    }

    #[test]
    fn test_level_scaled_stats() {
        let e = boss_enemy(5);
        assert_eq!(e.size, Vec2::new(135.0, 90.0));
        assert_eq!(e.points, 175);
        assert_eq!(e.health, 15);
        assert_eq!(e.boss().unwrap().max_health, 15);
        assert_eq!(e.speed, Boss::SPEED);
        assert!(e.is_boss());
    }

    #[test]
    fn test_spawn_is_not_off_screen() {
        let e = boss_enemy(5);
        assert!(!e.is_off_screen(&vp()));
    }

    #[test]
    fn test_approach_stops_at_hover_line() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = boss_enemy(5);
        for _ in 0..1000 {
            e.update(DT, 5, &vp(), &mut rng);
            if e.boss().unwrap().phase == BossPhase::Attack {
                break;
            }
        }
        assert_eq!(e.boss().unwrap().phase, BossPhase::Attack);
        assert_eq!(e.pos.y, 160.0);
    }

    #[test]
    fn test_attack_stays_on_screen() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = boss_enemy(10);
        e.pos.y = 160.0;
        boss_mut(&mut e).phase = BossPhase::Attack;
        for _ in 0..2000 {
            e.update(DT, 10, &vp(), &mut rng);
            if e.boss().unwrap().phase != BossPhase::Attack {
                break;
            }
            assert!(e.pos.x >= 0.0 && e.pos.x + e.size.x <= 800.0);
        }
    }

    #[test]
    fn test_pattern_rotates_after_interval() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = boss_enemy(5);
        e.pos.y = 160.0;
        boss_mut(&mut e).phase = BossPhase::Attack;
        for _ in 0..(PATTERN_CHANGE_SECS / DT) as usize + 2 {
            e.update(DT, 5, &vp(), &mut rng);
        }
        assert_eq!(e.boss().unwrap().attack_pattern, 1);
    }

    #[test]
    fn test_fires_only_while_charged() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = boss_enemy(5);
        let c = ctx(5, None, 0.0);
        assert!(e.shoot(&c).is_empty());

        e.pos.y = 160.0;
        boss_mut(&mut e).phase = BossPhase::Attack;
        let mut volleys = 0;
        for _ in 0..300 {
            e.update(DT, 5, &vp(), &mut rng);
            if !e.shoot(&c).is_empty() {
                volleys += 1;
            }
        }
        assert!(volleys > 0);
        // Refire gap keeps it well under one volley per tick
        assert!(volleys < 300 / REFIRE_TICKS as usize);
    }

    #[test]
    fn test_fan_and_side_cannon_counts() {
        let e = boss_enemy(8);
        let mut boss = e.boss().unwrap().clone();
        let c = ctx(8, None, 0.0);

        boss.attack_pattern = 0;
        let fan = boss.volley(e.pos, e.size, &c);
        assert_eq!(fan.len(), 6);
        let vx: Vec<f32> = fan.iter().map(|b| b.velocity.unwrap().x).collect();
        for (got, want) in vx.iter().zip([-2.0, -1.2, -0.4, 0.4, 1.2, 2.0]) {
            assert!((got - want).abs() < 1e-4, "{vx:?}");
        }

        boss.attack_pattern = 1;
        assert_eq!(boss.volley(e.pos, e.size, &c).len(), 6);
    }

    #[test]
    fn test_aimed_volley_leads_target() {
        let e = boss_enemy(1);
        let mut boss = e.boss().unwrap().clone();
        boss.attack_pattern = 2;
        let center = e.pos + e.size * 0.5;
        let target = Rect::centered(Vec2::new(center.x, center.y + 300.0), Vec2::splat(50.0));

        let straight = boss.volley(e.pos, e.size, &ctx(1, Some(target), 0.0));
        assert_eq!(straight.len(), 1);
        assert!(straight[0].velocity.unwrap().x.abs() < 1e-3);

        let led = boss.volley(e.pos, e.size, &ctx(1, Some(target), 50.0));
        assert!(led[0].velocity.unwrap().x > 0.0);
    }

    #[test]
    fn test_ring_pattern_from_level_five() {
        let e = boss_enemy(6);
        let mut boss = e.boss().unwrap().clone();
        boss.attack_pattern = 3;
        assert_eq!(boss.volley(e.pos, e.size, &ctx(6, None, 0.0)).len(), 9);
        assert_eq!(boss.volley(e.pos, e.size, &ctx(4, None, 0.0)).len(), 5);
    }

    #[test]
    fn test_retreat_regenerates_and_returns() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = boss_enemy(5);
        e.health = 3;
        e.pos.y = -e.size.y + 0.5;
        boss_mut(&mut e).phase = BossPhase::Retreat;
        e.update(DT, 5, &vp(), &mut rng);
        assert_eq!(e.boss().unwrap().phase, BossPhase::Approach);
        assert_eq!(e.health, 5);
        assert_eq!(e.pos.y, -e.size.y);
        assert!(e.pos.x >= 0.0 && e.pos.x + e.size.x <= 800.0);
    }

    #[test]
    fn test_graze_never_kills() {
        let mut e = boss_enemy(1);
        e.health = 2;
        e.graze();
        e.graze();
        e.graze();
        assert_eq!(e.health, 1);
        assert!(e.hit());
    }

    #[test]
    fn test_off_screen_only_above_top() {
        let mut e = boss_enemy(5);
        e.pos.y = 900.0;
        assert!(!e.is_off_screen(&vp()));
        e.pos.y = -e.size.y - 1.0;
        assert!(e.is_off_screen(&vp()));
    }
}
