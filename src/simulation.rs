//! Plugins registering the character simulation with a Bevy `App`.
//!
//! | Plugin                  | Needs Rapier | Contents                                      |
//! |-------------------------|--------------|-----------------------------------------------|
//! | [`CharacterPlugin`]     | no           | state, resources, messages, tick + responses  |
//! | [`PhysicsSensePlugin`]  | yes          | ground probe and contact gathering            |
//!
//! Splitting the Rapier queries out lets tests run the whole character
//! pipeline headless by writing [`PlayerContact`] messages and the
//! [`Grounded`] resource themselves.

use crate::audio::{
    bgm_fade_system, reset_bgm_system, start_bgm_fade_system, AudioCue, BgmFader, BgmVolume,
};
use crate::character::{
    announce_start_system, character_tick_system, contact_response_system,
    eat_completion_system, gather_contacts_system, probe_ground_system, spawn_character,
    track_view_edge_system, viewport_clamp_system, Attraction, ClampToViewport, Grounded,
    MouthCue, PlayerContact, ViewLeftEdge,
};
use crate::config::{load_character_config, CharacterConfig};
use crate::food::{
    abort_consumption_system, begin_consumption_system, food_consumption_system,
    AbortConsumption, BeginConsumption, ConsumptionComplete,
};
use crate::game_state::{
    game_over_system, CharacterDied, GamePhase, LivesChanged, PlayerLives, SceneTransition,
};
use bevy::prelude::*;

/// Ordering of the fixed-step pipeline.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterSet {
    /// Read the physics world into signals and contact messages.
    Sense,
    /// Controller fixed tick.
    Tick,
    /// Contact responses, food consumption, meal credit, phase changes.
    Respond,
}

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GamePhase>()
            .init_resource::<CharacterConfig>()
            .init_resource::<PlayerLives>()
            .init_resource::<SceneTransition>()
            .init_resource::<Attraction>()
            .init_resource::<Grounded>()
            .init_resource::<ViewLeftEdge>()
            .init_resource::<BgmFader>()
            .init_resource::<BgmVolume>()
            .add_message::<PlayerContact>()
            .add_message::<BeginConsumption>()
            .add_message::<AbortConsumption>()
            .add_message::<ConsumptionComplete>()
            .add_message::<MouthCue>()
            .add_message::<AudioCue>()
            .add_message::<LivesChanged>()
            .add_message::<CharacterDied>()
            .add_message::<ClampToViewport>()
            .configure_sets(
                FixedUpdate,
                (CharacterSet::Sense, CharacterSet::Tick, CharacterSet::Respond).chain(),
            )
            // Config first so the lives ledger sees the final values.
            .add_systems(Startup, (load_character_config, reset_lives_system).chain())
            .add_systems(
                OnEnter(GamePhase::Playing),
                (spawn_character, announce_start_system, reset_bgm_system),
            )
            .add_systems(OnEnter(GamePhase::Clear), start_bgm_fade_system)
            .add_systems(OnEnter(GamePhase::GameOver), start_bgm_fade_system)
            .add_systems(FixedUpdate, character_tick_system.in_set(CharacterSet::Tick))
            .add_systems(
                FixedUpdate,
                (
                    contact_response_system,
                    // Aborts first: damage plus a stay contact in one step
                    // releases an item and queues it again.
                    abort_consumption_system,
                    begin_consumption_system,
                    food_consumption_system,
                    eat_completion_system,
                    game_over_system,
                )
                    .chain()
                    .in_set(CharacterSet::Respond),
            )
            .add_systems(
                Update,
                (
                    bgm_fade_system,
                    (track_view_edge_system, viewport_clamp_system).chain(),
                ),
            );
    }
}

/// Rapier-backed sensing.  Add alongside `RapierPhysicsPlugin`.
pub struct PhysicsSensePlugin;

impl Plugin for PhysicsSensePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (probe_ground_system, gather_contacts_system).in_set(CharacterSet::Sense),
        );
    }
}

/// Startup: size the lives ledger from the loaded config.
pub fn reset_lives_system(mut lives: ResMut<PlayerLives>, config: Res<CharacterConfig>) {
    *lives = PlayerLives::new(&config);
}
