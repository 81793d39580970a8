//! Character-specific error types.
//!
//! Nothing in the per-tick path can fail: capacity overflows are rejected,
//! degenerate geometry falls back to a fixed direction, and energy is clamped.
//! The errors below cover the edges of the crate instead, chiefly loading and
//! validating [`crate::config::CharacterConfig`].
//!
//! ## Usage
//!
//! ```rust
//! use glutton::error::{validate_positive, CharacterResult};
//!
//! fn check(duration: f32) -> CharacterResult<()> {
//!     validate_positive("invincibility_duration", duration)?;
//!     Ok(())
//! }
//! assert!(check(2.0).is_ok());
//! assert!(check(0.0).is_err());
//! ```

use std::fmt;

/// Top-level error enum for the character core.
#[derive(Debug)]
pub enum CharacterError {
    /// A tunable that must be strictly positive was zero, negative or NaN.
    UnsafeConstant {
        /// Name of the config field (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A `(low, high)` pair of tunables is inverted.
    InvalidRange {
        /// Name of the range (for logging).
        name: &'static str,
        low: f32,
        high: f32,
    },

    /// `assets/character.toml` exists but is not valid TOML for the config.
    ConfigParse {
        path: String,
        message: String,
    },

    /// A second character spawn was requested while one is already alive.
    CharacterAlreadySpawned,
}

impl fmt::Display for CharacterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            CharacterError::InvalidRange { name, low, high } => write!(
                f,
                "range '{}' is inverted: low {} is greater than high {}",
                name, low, high
            ),
            CharacterError::ConfigParse { path, message } => {
                write!(f, "failed to parse {}: {}", path, message)
            }
            CharacterError::CharacterAlreadySpawned => {
                write!(f, "a character is already spawned; only one may exist")
            }
        }
    }
}

impl std::error::Error for CharacterError {}

/// Convenience alias: a `Result` using `CharacterError` as the error type.
pub type CharacterResult<T> = Result<T, CharacterError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is strictly positive (NaN is rejected).
pub fn validate_positive(name: &'static str, value: f32) -> CharacterResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CharacterError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if `low > high`.
pub fn validate_range(name: &'static str, low: f32, high: f32) -> CharacterResult<()> {
    if low <= high {
        Ok(())
    } else {
        Err(CharacterError::InvalidRange { name, low, high })
    }
}
