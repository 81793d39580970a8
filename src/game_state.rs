//! Game phase, scene transitions and the life ledger.
//!
//! These are the collaborators the character reads from and reports to.  The
//! character never owns them: it asks "may I move?" every tick and hands
//! damage to [`LifeLedger::report_damage`].
//!
//! ## Systems
//!
//! | System                 | Schedule       | Purpose                                  |
//! |------------------------|----------------|------------------------------------------|
//! | `game_over_system`     | `FixedUpdate`  | `CharacterDied` → `GamePhase::GameOver`  |

use crate::config::CharacterConfig;
use bevy::prelude::*;

// ── Game phase ────────────────────────────────────────────────────────────────

/// Top-level phase of a stage.
///
/// Character movement, energy and invincibility only advance in `Playing`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    /// Before the stage starts.
    #[default]
    Title,
    /// Active gameplay.
    Playing,
    /// The clear zone was reached; the stage is being wrapped up.
    Clear,
    /// The last life was lost.
    GameOver,
}

/// Fade overlay / scene loader status, written by the presentation layer.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SceneTransition {
    pub fading: bool,
    pub scene_changing: bool,
}

/// Whether the character may move this tick.
#[inline]
pub fn movement_permitted(phase: GamePhase, transition: &SceneTransition) -> bool {
    !transition.fading && !transition.scene_changing && phase == GamePhase::Playing
}

// ── Lives ─────────────────────────────────────────────────────────────────────

/// Receiver for damage reports.
pub trait LifeLedger {
    /// Take one life.  Returns `true` when that was the last one.
    fn report_damage(&mut self) -> bool;
}

/// Lives left in the current run, including the one being played.
#[derive(Resource, Debug, Clone)]
pub struct PlayerLives {
    pub remaining: i32,
}

impl PlayerLives {
    pub fn new(config: &CharacterConfig) -> Self {
        Self {
            remaining: config.player_lives,
        }
    }
}

impl Default for PlayerLives {
    fn default() -> Self {
        Self::new(&CharacterConfig::default())
    }
}

impl LifeLedger for PlayerLives {
    fn report_damage(&mut self) -> bool {
        self.remaining = (self.remaining - 1).max(0);
        self.remaining == 0
    }
}

/// Life-count delta, written whenever the ledger changes.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivesChanged {
    pub delta: i32,
    pub remaining: i32,
}

/// The character entered the terminal `Dead` state.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterDied;

/// Move to `GameOver` once the character reports its death.
pub fn game_over_system(
    mut died: MessageReader<CharacterDied>,
    mut next_phase: ResMut<NextState<GamePhase>>,
) {
    if died.read().count() > 0 {
        next_phase.set(GamePhase::GameOver);
    }
}
