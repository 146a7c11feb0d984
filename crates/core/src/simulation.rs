//! Core game simulation.
//!
//! The host calls [`Simulation::update`] once per frame with the elapsed
//! seconds and that frame's input snapshot. One walk over the entity store
//! dispatches per-variant behavior; entities spawned mid-frame land in the
//! trailing range of the same walk, and deletions queue up until the walk
//! completes so indices stay stable for the nested collision scans.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entities::{
    BigEnemyState, EnemyState, Entity, EntityId, EntityKind, IdGenerator, PlayerState,
    ENEMY_PROJECTILE_RADIUS, ENEMY_PROJECTILE_SPEED_Y, EXPLOSION_LIFETIME, EXPLOSION_RADIUS,
    PICKUP_FALL_SPEED, PICKUP_RADIUS, PROJECTILE_RADIUS, PROJECTILE_SPEED_Y,
};
use crate::input::FrameInput;
use crate::physics::{circles_collide, PlayField};
use crate::random::SeededRandom;

/// Ambient survival score per second while the run is alive.
const SCORE_RATE: f32 = 10.0;

/// Fastest the displayed score may climb toward the true score, per second.
const DISPLAY_CATCH_RATE: f32 = 600.0;

const POWER_UP_BONUS: f32 = 200.0;
const HEALTH_UP_BONUS: f32 = 500.0;

/// Shots leave the ship this far above its centre.
const MUZZLE_OFFSET: f32 = 32.0;

/// Level-0 shots jitter sideways and inherit drift from the jitter.
const JITTER: f32 = 12.0;
const JITTER_SPEED_FACTOR: f32 = 6.3;

/// Spread-pattern shots: fixed offsets and outward speeds.
const SPREAD_OFFSET_X: f32 = 16.0;
const SPREAD_SPEED_X: f32 = 132.0;

/// Post-hit window during which an enemy ignores further shots.
/// Keeps the rest of a volley from landing in the same frame.
const ENEMY_HIT_COOLDOWN: f32 = 0.15;

/// Sideways speed a big enemy's shot inherits from its weave.
const ENEMY_SHOT_WEAVE_FACTOR: f32 = 30.0;

const HEALTH_UP_CHANCE: f32 = 0.03;

/// Chance a big enemy actually fires at each shot opportunity.
/// Scales with the player's weapon tier.
fn big_shot_chance(gun_level: u32) -> f32 {
    match gun_level {
        0 => 0.2,
        1 => 0.35,
        _ => 0.5,
    }
}

/// Power-up drop chance on a kill. Tapers off as the gun levels up.
fn power_up_chance(gun_level: u32) -> f32 {
    match gun_level {
        0 => 0.12,
        1 => 0.08,
        _ => 0.05,
    }
}

/// Randomized reentry point above the top edge, used when an enemy is
/// recycled rather than destroyed.
fn recycle_point(field: PlayField, radius: f32, rng: &mut SeededRandom) -> Vec2 {
    Vec2::new(
        rng.next_range(field.min.x + radius, field.max.x - radius),
        field.min.y - radius - rng.next() * radius * 2.0,
    )
}

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub field: PlayField,
    pub player_start: Vec2,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            field: PlayField::default(),
            player_start: Vec2::new(400.0, 700.0),
        }
    }
}

/// The complete game state: the entity store plus run-level counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub entities: Vec<Entity>,
    pub score: f32,
    /// Presentation value trailing `score`; never exceeds it.
    pub displayed_score: f32,
    pub game_over: bool,
    /// Seconds elapsed since the game-over flag was set.
    pub time_dead: f32,
    pub rng: SeededRandom,
    pub ids: IdGenerator,
    /// Ids queued for removal this frame. Compacted after the walk.
    doomed: Vec<EntityId>,
}

impl GameState {
    pub fn new(seed: u32) -> Self {
        Self {
            entities: Vec::with_capacity(64),
            score: 0.0,
            displayed_score: 0.0,
            game_over: false,
            time_dead: 0.0,
            rng: SeededRandom::new(seed),
            ids: IdGenerator::new(),
            doomed: Vec::new(),
        }
    }

    fn push(&mut self, pos: Vec2, radius: f32, kind: EntityKind) -> EntityId {
        let id = self.ids.next();
        self.entities.push(Entity {
            id,
            pos,
            radius,
            kind,
        });
        id
    }

    pub fn spawn_player(&mut self, pos: Vec2) -> EntityId {
        self.push(pos, PlayerState::RADIUS, EntityKind::Player(PlayerState::new()))
    }

    pub fn spawn_enemy(&mut self, pos: Vec2) -> EntityId {
        let state = EnemyState::randomized(&mut self.rng);
        self.push(pos, EnemyState::RADIUS, EntityKind::Enemy(state))
    }

    pub fn spawn_enemy_big(&mut self, pos: Vec2) -> EntityId {
        let state = BigEnemyState::randomized(&mut self.rng);
        self.push(pos, BigEnemyState::RADIUS, EntityKind::EnemyBig(state))
    }

    pub fn spawn_projectile(&mut self, pos: Vec2, velocity: Vec2) -> EntityId {
        self.push(pos, PROJECTILE_RADIUS, EntityKind::Projectile { velocity })
    }

    pub fn spawn_enemy_projectile(&mut self, pos: Vec2, speed_x: f32) -> EntityId {
        let velocity = Vec2::new(speed_x, ENEMY_PROJECTILE_SPEED_Y);
        self.push(
            pos,
            ENEMY_PROJECTILE_RADIUS,
            EntityKind::EnemyProjectile { velocity },
        )
    }

    pub fn spawn_power_up(&mut self, pos: Vec2) -> EntityId {
        self.push(
            pos,
            PICKUP_RADIUS,
            EntityKind::PowerUp {
                fall_speed: PICKUP_FALL_SPEED,
            },
        )
    }

    pub fn spawn_health_up(&mut self, pos: Vec2) -> EntityId {
        self.push(
            pos,
            PICKUP_RADIUS,
            EntityKind::HealthUp {
                fall_speed: PICKUP_FALL_SPEED,
            },
        )
    }

    pub fn spawn_explosion(&mut self, pos: Vec2, for_player: bool) -> EntityId {
        self.push(
            pos,
            EXPLOSION_RADIUS,
            EntityKind::Explosion {
                progress: 0.0,
                for_player,
            },
        )
    }

    /// The player entity, if one is alive. Derived lookup; the store is the
    /// sole owner.
    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.is_player())
    }

    fn player_index(&self) -> Option<usize> {
        self.entities.iter().position(Entity::is_player)
    }

    fn player_gun_level(&self) -> u32 {
        self.entities
            .iter()
            .find_map(Entity::player)
            .map(|p| p.gun_level)
            .unwrap_or(0)
    }

    /// Queue an entity for removal at the end of the frame.
    /// Duplicate ids are tolerated; removal of an absent id is a no-op.
    fn doom(&mut self, id: EntityId) {
        self.doomed.push(id);
    }

    fn flush_removals(&mut self) {
        if self.doomed.is_empty() {
            return;
        }
        let doomed = std::mem::take(&mut self.doomed);
        self.entities.retain(|e| !doomed.contains(&e.id));
    }

    /// Lump-sum score award. Ignored once the run is over.
    fn add_score(&mut self, amount: f32) {
        if !self.game_over {
            self.score += amount;
        }
    }
}

/// The simulation engine: fixed configuration plus the mutable run state.
pub struct Simulation {
    pub config: SimulationConfig,
    pub state: GameState,
}

impl Simulation {
    pub fn new(config: SimulationConfig, seed: u32) -> Self {
        let mut sim = Self {
            config,
            state: GameState::new(seed),
        };
        sim.init_run();
        sim
    }

    /// Reset all run state and spawn the opening layout: the player plus
    /// two staggered ranks of enemies with three big enemies above them.
    /// The RNG sequence is left where it is; reseeding is the host's call.
    pub fn init_run(&mut self) {
        let state = &mut self.state;
        state.entities.clear();
        state.doomed.clear();
        state.ids.reset();
        state.score = 0.0;
        state.displayed_score = 0.0;
        state.game_over = false;
        state.time_dead = 0.0;

        state.spawn_player(self.config.player_start);

        for rank in 0..2 {
            for col in 0..7 {
                let x = 100.0 + col as f32 * 100.0;
                let y = if col % 2 == 0 { -64.0 } else { -32.0 } - rank as f32 * 128.0;
                state.spawn_enemy(Vec2::new(x, y));
            }
        }

        for x in [200.0, 400.0, 600.0] {
            state.spawn_enemy_big(Vec2::new(x, -288.0));
        }

        log::debug!("run initialized with {} entities", state.entities.len());
    }

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        let mut i = 0;
        while i < self.state.entities.len() {
            match &self.state.entities[i].kind {
                EntityKind::Player(_) => self.update_player(i, dt, input),
                EntityKind::Enemy(_) => self.update_enemy(i, dt),
                EntityKind::EnemyBig(_) => self.update_enemy_big(i, dt),
                EntityKind::Projectile { .. } => self.update_projectile(i, dt),
                EntityKind::EnemyProjectile { .. } => self.update_enemy_projectile(i, dt),
                EntityKind::PowerUp { .. } => self.update_power_up(i, dt),
                EntityKind::HealthUp { .. } => self.update_health_up(i, dt),
                EntityKind::Explosion { .. } => self.update_explosion(i, dt),
            }
            i += 1;
        }

        self.state.flush_removals();

        if self.state.game_over {
            self.state.time_dead += dt;
        } else {
            self.state.score += SCORE_RATE * dt;
        }

        let gap = self.state.score - self.state.displayed_score;
        if gap > 0.0 {
            self.state.displayed_score += gap.min(DISPLAY_CATCH_RATE * dt);
        }
    }

    fn update_player(&mut self, i: usize, dt: f32, input: &FrameInput) {
        let field = self.config.field;

        let (ship, gun_level, fires) = {
            let ent = &mut self.state.entities[i];
            let radius = ent.radius;
            let EntityKind::Player(p) = &mut ent.kind else {
                return;
            };
            p.hit_cooldown -= dt;
            p.fire_cooldown -= dt;

            if input.mouse_aim {
                ent.pos = input.mouse;
            } else {
                ent.pos += input.axes() * PlayerState::SPEED * dt;
            }
            ent.pos = field.clamp_with_radius(ent.pos, radius);

            (ent.pos, p.gun_level, input.fire && p.fire_cooldown <= 0.0)
        };

        if fires {
            self.fire_pattern(ship, gun_level);
            if let Some(p) = self.state.entities[i].player_mut() {
                p.fire_cooldown = PlayerState::RELOAD;
                p.recoil = 1.0;
            }
        }

        if let Some(p) = self.state.entities[i].player_mut() {
            p.recoil = (p.recoil - PlayerState::RECOIL_DECAY * dt).max(0.0);
        }

        // Contact damage, gated by the invulnerability window. This branch
        // owns every player-contact check; enemy projectiles do none of
        // their own.
        let contact = {
            let ent = &self.state.entities[i];
            let Some(p) = ent.player() else {
                return;
            };
            if p.hit_cooldown > 0.0 {
                return;
            }
            let (pos, radius) = (ent.pos, ent.radius);
            self.state
                .entities
                .iter()
                .find(|other| {
                    other.harms_player() && circles_collide(pos, radius, other.pos, other.radius)
                })
                .map(|other| {
                    (
                        other.id,
                        matches!(other.kind, EntityKind::EnemyProjectile { .. }),
                    )
                })
        };

        let Some((other_id, was_shot)) = contact else {
            return;
        };
        if was_shot {
            // One shot lands one hit, then it is spent.
            self.state.doom(other_id);
        }

        let destroyed = {
            let Some(p) = self.state.entities[i].player_mut() else {
                return;
            };
            p.health -= 1;
            if p.health <= 0 {
                true
            } else {
                p.hit_cooldown = PlayerState::HIT_COOLDOWN;
                false
            }
        };

        if destroyed {
            let (id, pos) = {
                let ent = &self.state.entities[i];
                (ent.id, ent.pos)
            };
            self.state.doom(id);
            self.state.spawn_explosion(pos, true);
            self.state.game_over = true;
            log::debug!("player destroyed, run over");
        }
    }

    /// Spawn the shot pattern for the current weapon tier.
    fn fire_pattern(&mut self, ship: Vec2, gun_level: u32) {
        let muzzle = ship - Vec2::new(0.0, MUZZLE_OFFSET);
        match gun_level {
            0 => {
                let jitter = self.state.rng.next_signed() * JITTER;
                self.state.spawn_projectile(
                    muzzle + Vec2::new(jitter, 0.0),
                    Vec2::new(jitter * JITTER_SPEED_FACTOR, PROJECTILE_SPEED_Y),
                );
            }
            level => {
                self.state.spawn_projectile(
                    muzzle - Vec2::new(SPREAD_OFFSET_X, 0.0),
                    Vec2::new(-SPREAD_SPEED_X, PROJECTILE_SPEED_Y),
                );
                self.state.spawn_projectile(
                    muzzle + Vec2::new(SPREAD_OFFSET_X, 0.0),
                    Vec2::new(SPREAD_SPEED_X, PROJECTILE_SPEED_Y),
                );
                if level > 1 {
                    self.state
                        .spawn_projectile(muzzle, Vec2::new(0.0, PROJECTILE_SPEED_Y));
                }
            }
        }
    }

    fn update_enemy(&mut self, i: usize, dt: f32) {
        let field = self.config.field;
        let GameState { entities, rng, .. } = &mut self.state;
        let ent = &mut entities[i];
        let radius = ent.radius;
        let EntityKind::Enemy(e) = &mut ent.kind else {
            return;
        };

        e.phase += dt;
        e.hit_cooldown -= dt;
        ent.pos.y += e.speed * dt;
        ent.pos.x += (e.phase * e.phase_speed).sin() * e.phase_mag;

        // Recycled in place, never destroyed: the wave population is
        // constant by construction.
        if field.past_bottom(ent.pos, radius) {
            ent.pos = recycle_point(field, radius, rng);
        }
        ent.pos.x = field.clamp_x_with_radius(ent.pos.x, radius);
    }

    fn update_enemy_big(&mut self, i: usize, dt: f32) {
        let field = self.config.field;

        let shot = {
            let GameState { entities, rng, .. } = &mut self.state;
            let ent = &mut entities[i];
            let radius = ent.radius;
            let EntityKind::EnemyBig(e) = &mut ent.kind else {
                return;
            };

            e.phase += dt;
            e.hit_cooldown -= dt;
            ent.pos.y += e.speed * dt;
            ent.pos.x += (e.phase * e.phase_speed).sin() * e.phase_mag;

            if field.past_bottom(ent.pos, radius) {
                ent.pos = recycle_point(field, radius, rng);
            }
            ent.pos.x = field.clamp_x_with_radius(ent.pos.x, radius);

            e.shoot_timer += dt;
            if e.shoot_timer > BigEnemyState::SHOOT_PERIOD {
                e.shoot_timer = 0.0;
                let weave_vel = (e.phase * e.phase_speed).cos() * e.phase_speed * e.phase_mag;
                Some((
                    ent.pos + Vec2::new(0.0, radius),
                    weave_vel * ENEMY_SHOT_WEAVE_FACTOR,
                ))
            } else {
                None
            }
        };

        if let Some((muzzle, speed_x)) = shot {
            let chance = big_shot_chance(self.state.player_gun_level());
            if self.state.rng.next_bool(chance) {
                self.state.spawn_enemy_projectile(muzzle, speed_x);
            }
        }
    }

    fn update_projectile(&mut self, i: usize, dt: f32) {
        let field = self.config.field;

        {
            let ent = &mut self.state.entities[i];
            let EntityKind::Projectile { velocity } = ent.kind else {
                return;
            };
            ent.pos += velocity * dt;
        }
        let (id, pos, radius) = {
            let ent = &self.state.entities[i];
            (ent.id, ent.pos, ent.radius)
        };

        // First enemy still open to damage this frame.
        let target = self.state.entities.iter().position(|other| {
            let open = match &other.kind {
                EntityKind::Enemy(e) => e.hit_cooldown <= 0.0,
                EntityKind::EnemyBig(e) => e.hit_cooldown <= 0.0,
                _ => false,
            };
            open && circles_collide(pos, radius, other.pos, other.radius)
        });

        if let Some(j) = target {
            self.state.doom(id);

            let kill = {
                let GameState { entities, rng, .. } = &mut self.state;
                let tgt = &mut entities[j];
                let tgt_radius = tgt.radius;
                let kill_pos = tgt.pos;
                match &mut tgt.kind {
                    EntityKind::Enemy(e) => {
                        e.hit_cooldown = ENEMY_HIT_COOLDOWN;
                        e.health -= 1;
                        if e.health <= 0 {
                            e.health = EnemyState::START_HEALTH;
                            tgt.pos = recycle_point(field, tgt_radius, rng);
                            Some((kill_pos, EnemyState::KILL_BONUS))
                        } else {
                            None
                        }
                    }
                    EntityKind::EnemyBig(e) => {
                        e.hit_cooldown = ENEMY_HIT_COOLDOWN;
                        e.health -= 1;
                        if e.health <= 0 {
                            e.health = BigEnemyState::START_HEALTH;
                            tgt.pos = recycle_point(field, tgt_radius, rng);
                            Some((kill_pos, BigEnemyState::KILL_BONUS))
                        } else {
                            None
                        }
                    }
                    _ => None,
                }
            };

            if let Some((kill_pos, bonus)) = kill {
                self.state.spawn_explosion(kill_pos, false);
                self.state.add_score(bonus);
                self.roll_drops(kill_pos);
            }
            return;
        }

        if field.past_top(pos, radius) {
            self.state.doom(id);
        }
    }

    /// Kill reward roll: maybe a health-up, maybe a power-up, usually
    /// nothing. Drop rates taper as the gun levels up.
    fn roll_drops(&mut self, at: Vec2) {
        let gun_level = self.state.player_gun_level();
        let roll = self.state.rng.next();
        if roll < HEALTH_UP_CHANCE {
            self.state.spawn_health_up(at);
        } else if roll < HEALTH_UP_CHANCE + power_up_chance(gun_level) {
            self.state.spawn_power_up(at);
        }
    }

    fn update_enemy_projectile(&mut self, i: usize, dt: f32) {
        let field = self.config.field;

        {
            let ent = &mut self.state.entities[i];
            let EntityKind::EnemyProjectile { velocity } = ent.kind else {
                return;
            };
            ent.pos += velocity * dt;
        }
        let (id, pos, radius) = {
            let ent = &self.state.entities[i];
            (ent.id, ent.pos, ent.radius)
        };

        if field.past_bottom(pos, radius) {
            self.state.doom(id);
        }
    }

    fn update_power_up(&mut self, i: usize, dt: f32) {
        let field = self.config.field;

        {
            let ent = &mut self.state.entities[i];
            let EntityKind::PowerUp { fall_speed } = ent.kind else {
                return;
            };
            ent.pos.y += fall_speed * dt;
        }
        let (id, pos, radius) = {
            let ent = &self.state.entities[i];
            (ent.id, ent.pos, ent.radius)
        };

        // Pickup is plain circle contact; player invulnerability does not
        // block it.
        if let Some(j) = self.state.player_index() {
            let player = &self.state.entities[j];
            if circles_collide(pos, radius, player.pos, player.radius) {
                self.state.doom(id);
                if let Some(p) = self.state.entities[j].player_mut() {
                    p.gun_level += 1;
                }
                self.state.add_score(POWER_UP_BONUS);
                return;
            }
        }

        if field.past_bottom(pos, radius) {
            self.state.doom(id);
        }
    }

    fn update_health_up(&mut self, i: usize, dt: f32) {
        let field = self.config.field;

        {
            let ent = &mut self.state.entities[i];
            let EntityKind::HealthUp { fall_speed } = ent.kind else {
                return;
            };
            ent.pos.y += fall_speed * dt;
        }
        let (id, pos, radius) = {
            let ent = &self.state.entities[i];
            (ent.id, ent.pos, ent.radius)
        };

        if let Some(j) = self.state.player_index() {
            let player = &self.state.entities[j];
            if circles_collide(pos, radius, player.pos, player.radius) {
                self.state.doom(id);
                if let Some(p) = self.state.entities[j].player_mut() {
                    p.health = (p.health + 1).min(PlayerState::MAX_HEALTH);
                }
                self.state.add_score(HEALTH_UP_BONUS);
                return;
            }
        }

        if field.past_bottom(pos, radius) {
            self.state.doom(id);
        }
    }

    fn update_explosion(&mut self, i: usize, dt: f32) {
        let (id, done) = {
            let ent = &mut self.state.entities[i];
            let EntityKind::Explosion { progress, .. } = &mut ent.kind else {
                return;
            };
            *progress += dt;
            (ent.id, *progress > EXPLOSION_LIFETIME)
        };
        if done {
            self.state.doom(id);
        }
    }

    // Read-only host queries.

    pub fn entities(&self) -> &[Entity] {
        &self.state.entities
    }

    pub fn player(&self) -> Option<&Entity> {
        self.state.player()
    }

    pub fn score(&self) -> f32 {
        self.state.score
    }

    pub fn displayed_score(&self) -> f32 {
        self.state.displayed_score
    }

    pub fn game_over(&self) -> bool {
        self.state.game_over
    }

    pub fn time_dead(&self) -> f32 {
        self.state.time_dead
    }
}
