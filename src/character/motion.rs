//! Discrete motion state consumed by the renderer and audio layer.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionState {
    #[default]
    Idle,
    /// Being pulled toward an attractor.
    Sucked,
    Fall,
    /// Terminal.  Only a fresh spawn leaves this state.
    Dead,
}

/// Horizontal facing of the sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing that looks from `from_x` toward `target_x`; `None` when they line up.
    pub fn toward(from_x: f32, target_x: f32) -> Option<Self> {
        if target_x > from_x {
            Some(Facing::Right)
        } else if target_x < from_x {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Derive this tick's motion state.
///
/// `attractor` is the world position of whatever is currently pulling the
/// character, if anything.  Returns the new state and, while sucked, the facing
/// toward the attractor.  A `Dead` character is returned unchanged.
pub fn project_motion(
    current: MotionState,
    position: Vec2,
    velocity: Vec2,
    attractor: Option<Vec2>,
) -> (MotionState, Option<Facing>) {
    if current == MotionState::Dead {
        return (MotionState::Dead, None);
    }
    if let Some(source) = attractor {
        return (MotionState::Sucked, Facing::toward(position.x, source.x));
    }
    if velocity.y >= 0.0 {
        (MotionState::Idle, None)
    } else {
        (MotionState::Fall, None)
    }
}
