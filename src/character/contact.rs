//! Contact categories and what the character does about them.
//!
//! Every interactive collider carries a [`ContactTag`].  The physics adapter
//! turns each touching collider into a [`PlayerContact`] message every fixed
//! tick for as long as the contact lasts, so handling must be safe to repeat.

use super::eating::EatAttempt;
use crate::constants::EATING_CAPACITY;
use arrayvec::ArrayVec;
use bevy::prelude::*;

/// Category of an interactive collider.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactTag {
    Food,
    Enemy,
    DamageTile,
    ClearZone,
}

/// Inserted on a clear zone once the character reaches it; the zone's own
/// effect systems play the inhale.
#[derive(Component, Debug, Default)]
pub struct Inhaling;

/// One touching collider, as seen from the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Food { item: Entity },
    /// `point` is the point on the enemy's collider closest to the character.
    Enemy { point: Vec2 },
    DamageTile { point: Vec2 },
    ClearZone { zone: Entity },
}

impl Contact {
    /// Build a contact from a tagged collider.
    pub fn from_tag(tag: ContactTag, other: Entity, closest_point: Vec2) -> Self {
        match tag {
            ContactTag::Food => Contact::Food { item: other },
            ContactTag::Enemy => Contact::Enemy {
                point: closest_point,
            },
            ContactTag::DamageTile => Contact::DamageTile {
                point: closest_point,
            },
            ContactTag::ClearZone => Contact::ClearZone { zone: other },
        }
    }
}

/// Fixed-tick contact report for the character.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct PlayerContact(pub Contact);

/// What a damaging contact did.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageOutcome {
    /// Impulse to apply after zeroing the body's velocity.
    pub impulse: Vec2,
    /// Items whose consumption has to be aborted.
    pub released: ArrayVec<Entity, EATING_CAPACITY>,
    /// Whether the close-mouth clip should (re)start.
    pub close_mouth: bool,
    /// The ledger ran out of lives; the character is now `Dead`.
    pub game_over: bool,
}

/// Result of handing a [`Contact`] to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactResponse {
    /// Suppressed: invincible, dead, or the phase does not allow it.
    Ignored,
    /// The item took a slot and should start its consumption.
    EatStarted {
        item: Entity,
        opens_mouth: bool,
        normal_duration: f32,
        min_duration: f32,
    },
    /// The item was not accepted (already eating it, or no free slot).
    EatRefused { item: Entity, attempt: EatAttempt },
    Damaged(DamageOutcome),
    /// The stage is cleared; the zone should play its inhale effect.
    StageClear { zone: Entity },
}

/// Unit vector pushing the character away from `contact_point`.
///
/// Falls back to straight up when the two points coincide (e.g. the
/// character's centre is inside a damage tile), so the result is never NaN.
pub fn knockback_direction(player_position: Vec2, contact_point: Vec2) -> Vec2 {
    (player_position - contact_point)
        .try_normalize()
        .unwrap_or(Vec2::Y)
}
