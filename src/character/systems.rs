//! Bevy systems wiring the [`CharacterController`] into the world.
//!
//! ## Pipeline (runs in order every `FixedUpdate` step)
//!
//! 1. [`probe_ground_system`]: ray-casts down against the map layer into [`Grounded`].
//! 2. [`gather_contacts_system`]: one [`PlayerContact`] per touching tagged collider.
//! 3. [`character_tick_system`]: the controller's fixed tick.
//! 4. [`contact_response_system`]: hands each contact to the controller and
//!    applies the response to the body (knockback, layers, gravity).
//! 5. Food consumption systems (see [`crate::food`]), then
//!    [`eat_completion_system`] credits finished meals.
//!
//! Steps 1–2 are the only ones that talk to Rapier's query pipeline; they live
//! in [`crate::simulation::PhysicsSensePlugin`] so the rest can run headless.

use super::contact::{Contact, ContactResponse, ContactTag, DamageOutcome, Inhaling, PlayerContact};
use super::controller::{CharacterController, TickSignals};
use super::mouth::MouthCue;
use super::signals::{Attraction, Grounded};
use super::{game_over_collision_groups, MAP_GROUP};
use crate::audio::AudioCue;
use crate::config::CharacterConfig;
use crate::food::{AbortConsumption, BeginConsumption, ConsumptionComplete};
use crate::game_state::{
    movement_permitted, CharacterDied, GamePhase, LivesChanged, PlayerLives, SceneTransition,
};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Sensing (Rapier) ──────────────────────────────────────────────────────────

/// Cast a short ray straight down from the body's centre against [`MAP_GROUP`].
pub fn probe_ground_system(
    rapier_context: ReadRapierContext,
    controller: Option<Res<CharacterController>>,
    q_body: Query<&Transform>,
    config: Res<CharacterConfig>,
    mut grounded: ResMut<Grounded>,
) {
    let Some(controller) = controller else {
        return;
    };
    let Ok(rapier) = rapier_context.single() else {
        return;
    };
    let Ok(transform) = q_body.get(controller.body()) else {
        return;
    };

    let filter = QueryFilter::new()
        .exclude_collider(controller.body())
        .groups(CollisionGroups::new(Group::ALL, MAP_GROUP));
    grounded.0 = rapier
        .cast_ray(
            transform.translation.truncate(),
            Vec2::NEG_Y,
            config.player_half_height + config.ground_probe_distance,
            true,
            filter,
        )
        .is_some();
}

fn other_collider(a: Entity, b: Entity, body: Entity) -> Option<Entity> {
    if a == body {
        Some(b)
    } else if b == body {
        Some(a)
    } else {
        None
    }
}

/// Report every tagged collider currently touching the body.
///
/// Solid contacts come from the narrow phase's contact pairs, sensors from its
/// intersection pairs.  Both are re-reported every step while they last.
pub fn gather_contacts_system(
    rapier_context: ReadRapierContext,
    controller: Option<Res<CharacterController>>,
    q_body: Query<&Transform>,
    q_tagged: Query<(&ContactTag, &Collider, &GlobalTransform)>,
    mut contacts: MessageWriter<PlayerContact>,
) {
    let Some(controller) = controller else {
        return;
    };
    let Ok(rapier) = rapier_context.single() else {
        return;
    };
    let body = controller.body();
    let Ok(body_transform) = q_body.get(body) else {
        return;
    };
    let position = body_transform.translation.truncate();

    let touching: Vec<Entity> = rapier
        .contact_pairs_with(body)
        .filter(|pair| pair.has_any_active_contact())
        .filter_map(|pair| other_collider(pair.collider1()?, pair.collider2()?, body))
        .chain(
            rapier
                .intersection_pairs_with(body)
                .filter(|(_, _, intersecting)| *intersecting)
                .filter_map(|(a, b, _)| other_collider(a, b, body)),
        )
        .collect();

    for other in touching {
        let Ok((tag, collider, transform)) = q_tagged.get(other) else {
            continue;
        };
        let (_, rotation, translation) = transform.to_scale_rotation_translation();
        let closest = collider
            .project_point(
                translation.truncate(),
                rotation.to_euler(EulerRot::ZYX).0,
                position,
                true,
            )
            .point;
        contacts.write(PlayerContact(Contact::from_tag(*tag, other, closest)));
    }
}

// ── Fixed tick ────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn character_tick_system(
    time: Res<Time>,
    controller: Option<ResMut<CharacterController>>,
    mut q_body: Query<(&Transform, &mut Velocity)>,
    phase: Res<State<GamePhase>>,
    transition: Res<SceneTransition>,
    attraction: Res<Attraction>,
    grounded: Res<Grounded>,
    config: Res<CharacterConfig>,
) {
    let Some(mut controller) = controller else {
        return;
    };
    let Ok((transform, mut velocity)) = q_body.get_mut(controller.body()) else {
        return;
    };

    let phase = *phase.get();
    let signals = TickSignals {
        movement_permitted: movement_permitted(phase, &transition),
        playing: phase == GamePhase::Playing,
        black_hole_active: attraction.black_hole_active,
        grounded: grounded.0,
        attractor: attraction.pulling_from,
    };
    controller.fixed_tick(
        time.delta_secs(),
        &signals,
        transform.translation.truncate(),
        &mut velocity.linvel,
        &config,
    );
}

// ── Contacts ──────────────────────────────────────────────────────────────────

/// Outgoing messages produced while responding to contacts.
#[derive(SystemParam)]
pub struct ResponseWriters<'w> {
    pub begin: MessageWriter<'w, BeginConsumption>,
    pub abort: MessageWriter<'w, AbortConsumption>,
    pub mouth: MessageWriter<'w, MouthCue>,
    pub audio: MessageWriter<'w, AudioCue>,
    pub lives: MessageWriter<'w, LivesChanged>,
    pub died: MessageWriter<'w, CharacterDied>,
}

/// Physics components of the body that a damage response rewrites.
type BodyMut = (
    &'static Transform,
    &'static mut Velocity,
    &'static mut ExternalImpulse,
    &'static mut CollisionGroups,
    &'static mut GravityScale,
);

/// Hand every [`PlayerContact`] of this step to the controller.
#[allow(clippy::too_many_arguments)]
pub fn contact_response_system(
    mut commands: Commands,
    mut contacts: MessageReader<PlayerContact>,
    controller: Option<ResMut<CharacterController>>,
    mut q_body: Query<BodyMut>,
    phase: Res<State<GamePhase>>,
    mut next_phase: ResMut<NextState<GamePhase>>,
    mut lives: ResMut<PlayerLives>,
    config: Res<CharacterConfig>,
    mut out: ResponseWriters,
) {
    let Some(mut controller) = controller else {
        contacts.clear();
        return;
    };
    let Ok((transform, mut velocity, mut impulse, mut groups, mut gravity)) =
        q_body.get_mut(controller.body())
    else {
        contacts.clear();
        return;
    };

    // `State` only changes between frames; track the phase this step decided.
    let mut phase_now = *phase.get();
    for PlayerContact(contact) in contacts.read().copied() {
        let position = transform.translation.truncate();
        match controller.respond(contact, position, phase_now, &mut *lives, &config) {
            ContactResponse::Ignored => {}
            ContactResponse::EatStarted {
                item,
                opens_mouth,
                normal_duration,
                min_duration,
            } => {
                out.begin.write(BeginConsumption {
                    item,
                    normal_duration,
                    min_duration,
                });
                if opens_mouth {
                    out.mouth.write(MouthCue::Open);
                }
                out.audio.write(AudioCue::Pickup);
            }
            ContactResponse::EatRefused { item, attempt } => {
                debug!("Eat of {item:?} refused: {attempt:?}");
            }
            ContactResponse::Damaged(DamageOutcome {
                impulse: knockback,
                released,
                close_mouth,
                game_over,
            }) => {
                velocity.linvel = Vec2::ZERO;
                impulse.impulse = knockback;
                for item in released {
                    out.abort.write(AbortConsumption { item });
                }
                if close_mouth {
                    out.mouth.write(MouthCue::Close);
                }
                out.audio.write(AudioCue::Damage);
                out.lives.write(LivesChanged {
                    delta: -1,
                    remaining: lives.remaining,
                });

                if game_over {
                    *groups = game_over_collision_groups();
                    gravity.0 = config.game_over_gravity_scale;
                    out.died.write(CharacterDied);
                    out.audio.write(AudioCue::Death);
                    info!("Character died; no lives remaining");
                } else {
                    info!("Character hit! Lives remaining: {}", lives.remaining);
                }
            }
            ContactResponse::StageClear { zone } => {
                phase_now = GamePhase::Clear;
                next_phase.set(GamePhase::Clear);
                commands.entity(zone).try_insert(Inhaling);
                info!("Stage clear");
            }
        }
    }
}

/// Credit finished meals to the controller.
pub fn eat_completion_system(
    mut completed: MessageReader<ConsumptionComplete>,
    controller: Option<ResMut<CharacterController>>,
    config: Res<CharacterConfig>,
    mut mouth: MessageWriter<MouthCue>,
) {
    let Some(mut controller) = controller else {
        completed.clear();
        return;
    };
    for &ConsumptionComplete { item } in completed.read() {
        if let Some(meal) = controller.complete_eat(item, &config) {
            debug!(
                "Ate {item:?}: energy {:.2}, {} still eating",
                meal.energy, meal.still_eating
            );
            if meal.close_mouth {
                mouth.write(MouthCue::Close);
            }
        }
    }
}

/// `OnEnter(Playing)`: announce the stage start.
pub fn announce_start_system(mut audio: MessageWriter<AudioCue>) {
    audio.write(AudioCue::Start);
}
