//! Stardive Core - per-frame arcade shooter simulation.
//!
//! The deterministic heart of a top-down shooter. Owns every in-game entity,
//! advances the world one frame at a time, resolves collisions and combat,
//! and tracks score and game-over state. Rendering, audio, frame timing and
//! device polling live in the host; the simulation only sees an input
//! snapshot per frame and a seeded random sequence.
//!
//! # Frame contract
//!
//! 1. One store walk per [`Simulation::update`] call; every entity observes
//!    that frame's `dt` exactly once
//! 2. Entities are only appended during the walk, never removed mid-walk
//! 3. Removals queue up and compact after the walk, so indices stay stable
//!    for the nested collision scans
//! 4. All randomness flows through [`SeededRandom`] - a fixed seed replays
//!    a fixed sequence

pub mod entities;
pub mod input;
pub mod physics;
pub mod random;
pub mod simulation;

pub use entities::{Entity, EntityId, EntityKind};
pub use input::FrameInput;
pub use physics::PlayField;
pub use random::SeededRandom;
pub use simulation::{GameState, Simulation, SimulationConfig};
