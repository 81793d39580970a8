//! Runtime character configuration loaded from `assets/character.toml`.
//!
//! [`CharacterConfig`] is a Bevy [`Resource`] that mirrors the constants in
//! [`crate::constants`].  At startup, [`load_character_config`] reads
//! `assets/character.toml` and overwrites the defaults with any values present
//! in the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<CharacterConfig>` to any system parameter list and read
//! values with `config.food_energy_bonus`, `config.knockback_impulse`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `CharacterConfig::default()`.

use crate::constants::*;
use crate::error::{validate_positive, validate_range, CharacterError, CharacterResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Path of the optional override file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/character.toml";

/// Runtime-tunable character configuration.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    // ── Energy ────────────────────────────────────────────────────────────────
    pub energy_min: f32,
    pub energy_max: f32,
    pub black_hole_energy_rate: f32,
    pub ground_energy_rate: f32,
    pub air_energy_rate: f32,
    pub food_energy_bonus: f32,
    pub hungry_threshold: f32,

    // ── Damage ────────────────────────────────────────────────────────────────
    pub invincibility_duration: f32,
    pub knockback_impulse: f32,
    pub game_over_gravity_scale: f32,
    pub player_gravity_scale: f32,
    pub player_lives: i32,

    // ── Eating ────────────────────────────────────────────────────────────────
    pub eat_normal_duration: f32,
    pub eat_min_duration: f32,
    pub mouth_close_duration: f32,

    // ── Body ──────────────────────────────────────────────────────────────────
    pub player_half_width: f32,
    pub player_half_height: f32,
    pub ground_probe_distance: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub world_gravity: f32,

    // ── Audio ─────────────────────────────────────────────────────────────────
    pub bgm_fade_duration: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            // Energy
            energy_min: ENERGY_MIN,
            energy_max: ENERGY_MAX,
            black_hole_energy_rate: BLACK_HOLE_ENERGY_RATE,
            ground_energy_rate: GROUND_ENERGY_RATE,
            air_energy_rate: AIR_ENERGY_RATE,
            food_energy_bonus: FOOD_ENERGY_BONUS,
            hungry_threshold: HUNGRY_THRESHOLD,
            // Damage
            invincibility_duration: INVINCIBILITY_DURATION,
            knockback_impulse: KNOCKBACK_IMPULSE,
            game_over_gravity_scale: GAME_OVER_GRAVITY_SCALE,
            player_gravity_scale: PLAYER_GRAVITY_SCALE,
            player_lives: PLAYER_LIVES,
            // Eating
            eat_normal_duration: EAT_NORMAL_DURATION,
            eat_min_duration: EAT_MIN_DURATION,
            mouth_close_duration: MOUTH_CLOSE_DURATION,
            // Body
            player_half_width: PLAYER_HALF_WIDTH,
            player_half_height: PLAYER_HALF_HEIGHT,
            ground_probe_distance: GROUND_PROBE_DISTANCE,
            spawn_x: PLAYER_SPAWN_X,
            spawn_y: PLAYER_SPAWN_Y,
            world_gravity: WORLD_GRAVITY,
            // Audio
            bgm_fade_duration: BGM_FADE_DURATION,
        }
    }
}

impl CharacterConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> CharacterResult<Self> {
        toml::from_str::<CharacterConfig>(contents).map_err(|e| CharacterError::ConfigParse {
            path: CONFIG_PATH.to_string(),
            message: e.to_string(),
        })
    }

    /// Reject values that would make the character misbehave.
    ///
    /// Rates are deliberately not checked: the energy clamp recovers from any
    /// rate, including a sign-flipped one.
    pub fn validate(&self) -> CharacterResult<()> {
        validate_range("energy", self.energy_min, self.energy_max)?;
        validate_range("eat_duration", self.eat_min_duration, self.eat_normal_duration)?;
        validate_positive("energy_max", self.energy_max)?;
        validate_positive("invincibility_duration", self.invincibility_duration)?;
        validate_positive("knockback_impulse", self.knockback_impulse)?;
        validate_positive("eat_min_duration", self.eat_min_duration)?;
        validate_positive("mouth_close_duration", self.mouth_close_duration)?;
        validate_positive("player_half_width", self.player_half_width)?;
        validate_positive("player_half_height", self.player_half_height)?;
        validate_positive("bgm_fade_duration", self.bgm_fade_duration)?;
        if self.player_lives <= 0 {
            return Err(CharacterError::UnsafeConstant {
                name: "player_lives",
                value: self.player_lives as f32,
                safe_range: "[1, ∞)",
            });
        }
        Ok(())
    }
}

/// Startup system: attempt to load `assets/character.toml` and overwrite the
/// `CharacterConfig` resource with any values present in the file.
///
/// Parse and validation errors are logged and the compiled defaults are kept.
/// A missing file is not an error.
pub fn load_character_config(mut config: ResMut<CharacterConfig>) {
    let Ok(contents) = std::fs::read_to_string(CONFIG_PATH) else {
        info!("No {CONFIG_PATH} found; using compiled defaults");
        return;
    };
    match CharacterConfig::from_toml_str(&contents).and_then(|loaded| {
        loaded.validate()?;
        Ok(loaded)
    }) {
        Ok(loaded) => {
            *config = loaded;
            info!("Loaded character config from {CONFIG_PATH}");
        }
        Err(e) => warn!("{e}; using defaults"),
    }
}
