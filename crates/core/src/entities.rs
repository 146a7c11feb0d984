//! Entity types and identity for the simulation.
//!
//! All live objects share one header (id, centre position, collision radius)
//! and a closed set of variants. The store is a plain `Vec` so iteration
//! order is stable within a frame; nothing is removed mid-walk.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::random::SeededRandom;

/// Unique identifier for an entity. Never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out monotonically increasing entity ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdGenerator {
    next_id: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Restart the counter for a fresh run.
    pub fn reset(&mut self) {
        self.next_id = 0;
    }
}

// Variant tuning for the header-only entities.

/// Player shot: collision radius and upward speed.
pub const PROJECTILE_RADIUS: f32 = 8.0;
pub const PROJECTILE_SPEED_Y: f32 = -900.0;

/// Enemy shot: slower, downward.
pub const ENEMY_PROJECTILE_RADIUS: f32 = 10.0;
pub const ENEMY_PROJECTILE_SPEED_Y: f32 = 380.0;

/// Pickups drift straight down until collected or gone.
pub const PICKUP_RADIUS: f32 = 12.0;
pub const PICKUP_FALL_SPEED: f32 = 50.0;

/// Explosions are cosmetic; the radius only sizes the rendered flash.
pub const EXPLOSION_RADIUS: f32 = 128.0;
pub const EXPLOSION_LIFETIME: f32 = 0.25;

/// Player ship state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Hits remaining, capped at [`Self::MAX_HEALTH`].
    pub health: i32,
    /// Seconds until the ship can be damaged again.
    pub hit_cooldown: f32,
    /// Decaying fire feedback timer, 1.0 right after a shot.
    pub recoil: f32,
    /// Current weapon tier; selects the shot pattern.
    pub gun_level: u32,
    /// Seconds until the next shot is allowed.
    pub fire_cooldown: f32,
}

impl PlayerState {
    pub const RADIUS: f32 = 24.0;
    pub const MAX_HEALTH: i32 = 3;
    pub const SPEED: f32 = 400.0;
    /// Invulnerability window after taking a hit.
    pub const HIT_COOLDOWN: f32 = 1.3;
    pub const RELOAD: f32 = 0.15;
    pub const RECOIL_DECAY: f32 = 7.35;

    pub fn new() -> Self {
        Self {
            health: Self::MAX_HEALTH,
            hit_cooldown: 0.0,
            recoil: 0.0,
            gun_level: 0,
            fire_cooldown: 0.0,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Regular enemy: drifts down while weaving sideways on a sine curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyState {
    pub health: i32,
    /// Seconds during which further projectile hits are ignored.
    pub hit_cooldown: f32,
    /// Downward drift in px/s, fixed at spawn.
    pub speed: f32,
    /// Weave parameters, randomized at spawn to desynchronize the wave.
    pub phase: f32,
    pub phase_speed: f32,
    pub phase_mag: f32,
}

impl EnemyState {
    pub const RADIUS: f32 = 32.0;
    pub const START_HEALTH: i32 = 1;
    pub const KILL_BONUS: f32 = 100.0;

    pub fn randomized(rng: &mut SeededRandom) -> Self {
        Self {
            health: Self::START_HEALTH,
            hit_cooldown: 0.0,
            speed: rng.next() * 200.0 + 150.0,
            phase: rng.next() * 100.0,
            phase_speed: rng.next() * 3.0 + 1.0,
            phase_mag: rng.next() * 1.2,
        }
    }
}

/// Large enemy: tougher, slower, and fires back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigEnemyState {
    pub health: i32,
    pub hit_cooldown: f32,
    pub speed: f32,
    pub phase: f32,
    pub phase_speed: f32,
    pub phase_mag: f32,
    /// Accumulates toward the next probabilistic shot.
    pub shoot_timer: f32,
}

impl BigEnemyState {
    pub const RADIUS: f32 = 48.0;
    pub const START_HEALTH: i32 = 7;
    pub const KILL_BONUS: f32 = 500.0;
    /// Seconds between shot opportunities.
    pub const SHOOT_PERIOD: f32 = 0.9;

    pub fn randomized(rng: &mut SeededRandom) -> Self {
        Self {
            health: Self::START_HEALTH,
            hit_cooldown: 0.0,
            speed: rng.next() * 120.0 + 90.0,
            phase: rng.next() * 100.0,
            phase_speed: rng.next() * 3.0 + 1.0,
            phase_mag: rng.next() * 1.2,
            shoot_timer: 0.0,
        }
    }
}

/// Variant tag plus variant-specific state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Player(PlayerState),
    Enemy(EnemyState),
    EnemyBig(BigEnemyState),
    /// Player shot.
    Projectile { velocity: Vec2 },
    EnemyProjectile { velocity: Vec2 },
    /// Raises the player's gun level on pickup.
    PowerUp { fall_speed: f32 },
    /// Restores one point of player health on pickup.
    HealthUp { fall_speed: f32 },
    /// Cosmetic flash; no collision behavior.
    Explosion { progress: f32, for_player: bool },
}

/// One simulated object: common header plus variant state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Centre of the collision circle, playfield space, +y down.
    pub pos: Vec2,
    /// Collision radius. Fixed at creation.
    pub radius: f32,
    pub kind: EntityKind,
}

impl Entity {
    #[inline]
    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    /// Borrow the player state if this entity is the player.
    #[inline]
    pub fn player(&self) -> Option<&PlayerState> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn player_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    /// True for the variants that damage the player on contact.
    #[inline]
    pub fn harms_player(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Enemy(_) | EntityKind::EnemyBig(_) | EntityKind::EnemyProjectile { .. }
        )
    }
}
