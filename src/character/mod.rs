//! Character module: vitality, eating, invincibility, knockback and motion state.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`energy`] | Energy scalar: environment-dependent drain/recovery, meal bonus, hungry flag |
//! | [`invincibility`] | Post-damage invincibility countdown |
//! | [`eating`] | Fixed-capacity unordered set of items being eaten |
//! | [`mouth`] | Mouth open/close tracking with the mid-clip close guard |
//! | [`motion`] | `MotionState` projection from velocity and suction |
//! | [`contact`] | Contact categories, responses, knockback direction |
//! | [`controller`] | `CharacterController` resource: fixed tick + contact handling |
//! | [`signals`] | External signals sampled each tick (attraction, grounded) |
//! | [`viewport`] | One-shot camera left-edge clamp |
//! | [`systems`] | Bevy systems gluing the controller to Rapier components |
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::character::*` imports.

pub mod contact;
pub mod controller;
pub mod eating;
pub mod energy;
pub mod invincibility;
pub mod motion;
pub mod mouth;
pub mod signals;
pub mod systems;
pub mod viewport;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use contact::{
    knockback_direction, Contact, ContactResponse, ContactTag, DamageOutcome, Inhaling,
    PlayerContact,
};
pub use controller::{CharacterController, MealOutcome, TickOutcome, TickSignals};
pub use eating::{EatAttempt, EatingQueue};
pub use energy::{Energy, EnergyRate};
pub use invincibility::InvincibilityGate;
pub use motion::{project_motion, Facing, MotionState};
pub use mouth::{Mouth, MouthCue, MouthPhase};
pub use signals::{Attraction, Grounded};
pub use systems::{
    announce_start_system, character_tick_system, contact_response_system,
    eat_completion_system, gather_contacts_system, probe_ground_system,
};
pub use viewport::{
    clamp_left_edge, track_view_edge_system, viewport_clamp_system, ClampToViewport, ViewLeftEdge,
};

// ── Collision layers ──────────────────────────────────────────────────────────

use bevy_rapier2d::prelude::Group;

/// Static stage geometry; the grounded probe only hits this layer.
pub const MAP_GROUP: Group = Group::GROUP_1;
pub const PLAYER_GROUP: Group = Group::GROUP_2;
pub const FOOD_GROUP: Group = Group::GROUP_3;
/// Enemies and damage tiles.
pub const HAZARD_GROUP: Group = Group::GROUP_4;
pub const CLEAR_ZONE_GROUP: Group = Group::GROUP_5;
/// Layer of a character that lost its last life.  Collides with nothing.
pub const GAME_OVER_GROUP: Group = Group::GROUP_6;

// ── Character spawn ───────────────────────────────────────────────────────────

use crate::config::CharacterConfig;
use crate::error::CharacterError;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Marker component for the character's physics body.
#[derive(Component)]
pub struct Player;

/// Collision groups of a live character.
pub fn live_collision_groups() -> CollisionGroups {
    CollisionGroups::new(
        PLAYER_GROUP,
        MAP_GROUP | FOOD_GROUP | HAZARD_GROUP | CLEAR_ZONE_GROUP,
    )
}

/// Collision groups after game over: its own layer, no interactions.
pub fn game_over_collision_groups() -> CollisionGroups {
    CollisionGroups::new(GAME_OVER_GROUP, Group::NONE)
}

/// Spawn the character body and create its [`CharacterController`].
///
/// Runs on `OnEnter(GamePhase::Playing)`.  The controller is a resource, so a
/// second character cannot exist; a spawn while one is alive is refused.
///
/// The body is a rotation-locked box with its mass pinned to `PLAYER_MASS` so
/// knockback impulses translate directly into velocity.
pub fn spawn_character(
    mut commands: Commands,
    existing: Option<Res<CharacterController>>,
    config: Res<CharacterConfig>,
) {
    if existing.is_some() {
        warn!("{}", CharacterError::CharacterAlreadySpawned);
        return;
    }

    let body = commands
        .spawn((
            Player,
            // Physics
            RigidBody::Dynamic,
            Collider::cuboid(config.player_half_width, config.player_half_height),
            ColliderMassProperties::Mass(crate::constants::PLAYER_MASS),
            LockedAxes::ROTATION_LOCKED,
            Velocity::zero(),
            ExternalImpulse::default(),
            GravityScale(config.player_gravity_scale),
            live_collision_groups(),
            ActiveEvents::COLLISION_EVENTS,
            // Transform / visibility
            Transform::from_xyz(config.spawn_x, config.spawn_y, 0.0),
            Visibility::default(),
        ))
        .id();
    commands.insert_resource(CharacterController::new(body, &config));

    info!(
        "Character spawned at ({:.1}, {:.1})",
        config.spawn_x, config.spawn_y
    );
}
