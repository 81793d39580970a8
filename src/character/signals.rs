//! External signals the fixed tick samples.

use bevy::prelude::*;

/// Black-hole status, written by whatever owns attractors on the stage.
///
/// `black_hole_active` drives energy drain; `pulling_from` drives the `Sucked`
/// motion state.  A black hole can be active without pulling the character
/// (out of range), so they are separate.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Attraction {
    pub black_hole_active: bool,
    /// World position of the attractor currently pulling the character.
    pub pulling_from: Option<Vec2>,
}

/// Whether the character is standing on the map, refreshed every fixed tick by
/// [`super::systems::probe_ground_system`].
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Grounded(pub bool);
