//! Mouth open/close state, tracked so close requests can be filtered.
//!
//! The sprite animation itself belongs to the renderer; this only mirrors how
//! far the closing clip has played.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MouthPhase {
    #[default]
    Closed,
    Open,
    /// Seconds since the closing clip started.
    Closing { elapsed: f32 },
}

/// What the renderer should play after a request.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthCue {
    Open,
    Close,
}

#[derive(Debug, Clone)]
pub struct Mouth {
    phase: MouthPhase,
    close_duration: f32,
}

impl Mouth {
    pub fn new(close_duration: f32) -> Self {
        Self {
            phase: MouthPhase::Closed,
            close_duration,
        }
    }

    #[inline]
    pub fn phase(&self) -> MouthPhase {
        self.phase
    }

    pub fn open(&mut self) -> MouthCue {
        self.phase = MouthPhase::Open;
        MouthCue::Open
    }

    /// Start (or restart) the closing clip.
    ///
    /// Ignored when already closed, and once an in-flight close has passed its
    /// midpoint so a clip that is nearly done is not rewound.
    pub fn request_close(&mut self) -> Option<MouthCue> {
        match self.phase {
            MouthPhase::Closed => return None,
            MouthPhase::Closing { elapsed } if elapsed > self.close_duration * 0.5 => {
                return None;
            }
            _ => {}
        }
        self.phase = MouthPhase::Closing { elapsed: 0.0 };
        Some(MouthCue::Close)
    }

    pub fn tick(&mut self, dt: f32) {
        if let MouthPhase::Closing { elapsed } = self.phase {
            let elapsed = elapsed + dt;
            self.phase = if elapsed >= self.close_duration {
                MouthPhase::Closed
            } else {
                MouthPhase::Closing { elapsed }
            };
        }
    }
}
