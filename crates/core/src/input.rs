//! Per-frame input snapshot supplied by the host.
//!
//! The simulation never polls devices. The host samples keyboard and mouse
//! once per frame and hands the result in through this struct. Mouse
//! coordinates are in the same space as entity positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Horizontal movement axis, roughly [-1, 1].
    pub move_x: f32,

    /// Vertical movement axis, roughly [-1, 1]. Positive is down.
    pub move_y: f32,

    /// Fire button held this frame.
    pub fire: bool,

    /// When set, the ship tracks the mouse instead of the movement axes.
    pub mouse_aim: bool,

    /// Mouse position in playfield coordinates.
    pub mouse: Vec2,
}

impl FrameInput {
    /// No input at all (idle frame).
    pub const fn none() -> Self {
        Self {
            move_x: 0.0,
            move_y: 0.0,
            fire: false,
            mouse_aim: false,
            mouse: Vec2::ZERO,
        }
    }

    /// Keyboard movement on both axes.
    pub fn with_axes(move_x: f32, move_y: f32) -> Self {
        Self {
            move_x,
            move_y,
            ..Self::none()
        }
    }

    /// Mouse-tracking mode at the given position.
    pub fn with_mouse(x: f32, y: f32) -> Self {
        Self {
            mouse_aim: true,
            mouse: Vec2::new(x, y),
            ..Self::none()
        }
    }

    /// Same input with the fire button held.
    pub fn firing(self) -> Self {
        Self { fire: true, ..self }
    }

    /// Movement axes as a vector, each component clamped to [-1, 1].
    /// Hosts with analog sticks can report slightly out-of-range values.
    pub fn axes(&self) -> Vec2 {
        Vec2::new(self.move_x.clamp(-1.0, 1.0), self.move_y.clamp(-1.0, 1.0))
    }
}
