//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, pruned back-to-front)
//! - No rendering or platform dependencies

pub mod boss;
pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod events;
pub mod geometry;
pub mod player;
pub mod powerup;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossPhase};
pub use bullet::{Bullet, BulletOwner, Direction};
pub use collision::{Resolution, bullets_clash, resolve};
pub use enemy::{Archetype, Enemy, EnemyKind, FireContext, FirePattern, Weapon};
pub use events::{ColorHint, EffectQueue, GameEvent, NotificationKind};
pub use geometry::{Hittable, Rect, Viewport};
pub use player::{Move, Player, TimedEffect};
pub use powerup::{PowerUp, PowerUpKind};
pub use snapshot::{Hud, Snapshot, SpriteKind, SpriteView};
pub use spawn::{Formation, SpawnDirector, SpawnPlan, choose_archetype};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
