//! Character core for a physics-driven 2D platformer.
//!
//! A single character eats items to restore energy, loses energy near black
//! holes, takes knockback and an invincibility window from hazards, and falls
//! out of the stage when its last life is gone.  Everything runs on Bevy's
//! fixed timestep alongside Rapier2D.

pub mod audio;
pub mod character;
pub mod config;
pub mod constants;
pub mod error;
pub mod food;
pub mod game_state;
pub mod simulation;
