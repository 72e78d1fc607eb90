//! Projectiles fired by the player and by enemies

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Hittable, Rect, Viewport};
use crate::consts::{BULLET_HEIGHT, BULLET_SPEED, BULLET_WIDTH};

/// Which side fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    /// Damages enemies and enemy bullets
    Player,
    /// Damages only the player
    Enemy,
}

/// Vertical travel direction for bullets without a velocity vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Sign of y motion in screen space
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Up => -1.0,
            Direction::Down => 1.0,
        }
    }
}

/// A bullet. `pos` is the horizontal center and the top edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub owner: BulletOwner,
    pub direction: Direction,
    /// Scalar speed along `direction` (pixels per tick)
    pub speed: f32,
    /// Explicit velocity; overrides direction/speed when set
    pub velocity: Option<Vec2>,
}

impl Bullet {
    /// Standard player bullet moving up
    pub fn player(x: f32, y: f32) -> Self {
        Self::new(x, y, BulletOwner::Player, Direction::Up)
    }

    /// Standard enemy bullet moving down
    pub fn enemy(x: f32, y: f32) -> Self {
        Self::new(x, y, BulletOwner::Enemy, Direction::Down)
    }

    fn new(x: f32, y: f32, owner: BulletOwner, direction: Direction) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            owner,
            direction,
            speed: BULLET_SPEED,
            velocity: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Vec2::new(width, height);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    #[inline]
    pub fn is_enemy(&self) -> bool {
        self.owner == BulletOwner::Enemy
    }

    /// Oversized player bullets render as rockets
    pub fn is_rocket(&self) -> bool {
        self.owner == BulletOwner::Player
            && (self.size.x > BULLET_WIDTH || self.size.y > BULLET_HEIGHT)
    }

    /// Advance one tick
    pub fn update(&mut self) {
        match self.velocity {
            Some(vel) => self.pos += vel,
            None => self.pos.y += self.direction.sign() * self.speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(
            self.pos.x - self.size.x / 2.0,
            self.pos.y,
            self.size.x,
            self.size.y,
        )
    }

    pub fn is_off_screen(&self, viewport: &Viewport) -> bool {
        viewport.is_outside(&self.rect())
    }

    /// AABB hit test; never hits a target that currently cannot be hit
    pub fn hits(&self, target: &impl Hittable) -> bool {
        target.can_be_hit() && self.rect().overlaps(&target.hitbox())
    }
}

impl Hittable for Bullet {
    fn hitbox(&self) -> Rect {
        self.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Ghost(Rect);

    impl Hittable for Ghost {
        fn hitbox(&self) -> Rect {
            self.0
        }
        fn can_be_hit(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_direction_fallback_movement() {
        let mut up = Bullet::player(100.0, 100.0);
        up.update();
        assert_eq!(up.pos, Vec2::new(100.0, 93.0));

        let mut down = Bullet::enemy(100.0, 100.0).with_speed(3.0);
        down.update();
        assert_eq!(down.pos, Vec2::new(100.0, 103.0));
    }

    #[test]
    fn test_velocity_overrides_direction() {
        let mut b = Bullet::enemy(0.0, 0.0).with_velocity(Vec2::new(1.5, -2.0));
        b.update();
        assert_eq!(b.pos, Vec2::new(1.5, -2.0));
    }

    #[test]
    fn test_rocket_classification() {
        assert!(!Bullet::player(0.0, 0.0).is_rocket());
        assert!(Bullet::player(0.0, 0.0).with_size(6.5, 21.0).is_rocket());
        assert!(!Bullet::enemy(0.0, 0.0).with_size(9.0, 30.0).is_rocket());
    }

    #[test]
    fn test_off_screen_each_side() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(!Bullet::player(400.0, 300.0).is_off_screen(&vp));
        assert!(Bullet::player(400.0, -16.0).is_off_screen(&vp));
        assert!(Bullet::enemy(400.0, 601.0).is_off_screen(&vp));
        assert!(Bullet::enemy(-10.0, 300.0).is_off_screen(&vp));
        assert!(Bullet::enemy(810.0, 300.0).is_off_screen(&vp));
    }

    #[test]
    fn test_hits_uses_center_x_and_top_y() {
        let target = Rect::new(100.0, 100.0, 40.0, 40.0);
        // Center just inside the left edge
        assert!(Bullet::player(98.0, 120.0).hits(&target));
        // Fully left of the target
        assert!(!Bullet::player(96.0, 120.0).hits(&target));
        // Bottom of bullet just above target top
        assert!(!Bullet::player(120.0, 85.0).hits(&target));
    }

    proptest! {
        #[test]
        fn prop_hits_matches_geometric_overlap(
            bx in -50.0f32..250.0, by in -50.0f32..250.0,
            tx in 0.0f32..200.0, ty in 0.0f32..200.0,
            tw in 1.0f32..80.0, th in 1.0f32..80.0,
        ) {
            let bullet = Bullet::enemy(bx, by);
            let target = Rect::new(tx, ty, tw, th);
            prop_assert_eq!(bullet.hits(&target), target.overlaps(&bullet.rect()));
        }

        #[test]
        fn prop_never_hits_unhittable(
            bx in 0.0f32..100.0, by in 0.0f32..100.0,
        ) {
            let bullet = Bullet::enemy(bx, by);
            let ghost = Ghost(Rect::new(0.0, 0.0, 200.0, 200.0));
            prop_assert!(!bullet.hits(&ghost));
        }
    }
}
