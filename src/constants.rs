//! Centralised character and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Every constant below is mirrored by a field of
//! [`crate::config::CharacterConfig`] except [`EATING_CAPACITY`], which sizes a
//! fixed-capacity buffer and therefore has to be known at compile time.
//! Override the others in `assets/character.toml` instead of editing them here.

// ── Energy ────────────────────────────────────────────────────────────────────

/// Lower clamp for the per-tick energy update.
///
/// Negative on purpose: the band `[ENERGY_MIN, 0)` is the "already starving"
/// margin.  A meal never leaves energy inside it (see [`FOOD_ENERGY_BONUS`]).
pub const ENERGY_MIN: f32 = -0.1;

/// Upper clamp for energy; also the value a fresh character starts with.
pub const ENERGY_MAX: f32 = 1.0;

/// Energy change per second while a black hole is active anywhere on the stage.
///
/// Takes priority over both recovery rates.
pub const BLACK_HOLE_ENERGY_RATE: f32 = -0.3;

/// Energy recovered per second while standing on the map.
pub const GROUND_ENERGY_RATE: f32 = 0.05;

/// Energy recovered per second while airborne.  Smaller than the ground rate.
pub const AIR_ENERGY_RATE: f32 = 0.02;

/// Energy added when an item finishes being eaten.
///
/// The result is clamped to `[0, ENERGY_MAX]`, not `[ENERGY_MIN, ENERGY_MAX]`.
pub const FOOD_ENERGY_BONUS: f32 = 0.5;

/// Below this energy the character is "hungry" (visual layer only).
pub const HUNGRY_THRESHOLD: f32 = 0.33;

// ── Damage ────────────────────────────────────────────────────────────────────

/// Seconds of invincibility granted after taking damage.
pub const INVINCIBILITY_DURATION: f32 = 2.0;

/// Magnitude of the knockback impulse applied on damage.
///
/// The body's mass is pinned to 1.0 (see [`PLAYER_MASS`]) so this is also the
/// resulting speed in world units per second.
pub const KNOCKBACK_IMPULSE: f32 = 400.0;

/// Gravity scale applied after the final life is lost (slow, dramatic fall).
pub const GAME_OVER_GRAVITY_SCALE: f32 = 0.25;

/// Gravity scale during normal play.
pub const PLAYER_GRAVITY_SCALE: f32 = 1.0;

/// Lives at the start of a run.
pub const PLAYER_LIVES: i32 = 3;

// ── Eating ────────────────────────────────────────────────────────────────────

/// Maximum number of items that can be eaten at the same time.
pub const EATING_CAPACITY: usize = 8;

/// Seconds an untouched item takes to be eaten.
pub const EAT_NORMAL_DURATION: f32 = 1.5;

/// Lower bound on the eating time of a partially eaten item.
pub const EAT_MIN_DURATION: f32 = 0.3;

/// Length of the mouth-closing animation in seconds.
///
/// A close request arriving after half of this has elapsed is ignored.
pub const MOUTH_CLOSE_DURATION: f32 = 0.4;

// ── Body ──────────────────────────────────────────────────────────────────────

/// Half width of the player's box collider (world units).
pub const PLAYER_HALF_WIDTH: f32 = 16.0;

/// Half height of the player's box collider (world units).
pub const PLAYER_HALF_HEIGHT: f32 = 16.0;

/// Mass pinned on the player collider so impulses map 1:1 onto velocity.
pub const PLAYER_MASS: f32 = 1.0;

/// Extra ray length below the collider's bottom edge for the grounded probe.
pub const GROUND_PROBE_DISTANCE: f32 = 2.0;

/// World position the character is spawned at.
pub const PLAYER_SPAWN_X: f32 = 0.0;
pub const PLAYER_SPAWN_Y: f32 = 0.0;

/// World gravity (world units / s²).  Applied through Rapier's configuration.
pub const WORLD_GRAVITY: f32 = -980.0;

// ── Audio ─────────────────────────────────────────────────────────────────────

/// Seconds the background music takes to fade out on death or stage clear.
pub const BGM_FADE_DURATION: f32 = 1.5;
