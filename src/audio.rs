//! Audio cues and the background-music fade-out task.
//!
//! The character only emits [`AudioCue`]s; playback belongs to whoever reads
//! them.  The one latent piece is the BGM fade: a [`FadeOut`] task polled once
//! per rendered frame that lowers [`BgmVolume`] and, when it reaches silence,
//! asks for the track to stop.  It can be cancelled from anywhere holding its
//! [`CancelToken`]; the token is checked before the stop is requested, so a
//! fade cancelled on its final frame never stops the music.

use crate::config::CharacterConfig;
use bevy::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fire-and-forget sound requests.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Stage started.
    Start,
    /// An item started being eaten.
    Pickup,
    Damage,
    Death,
    /// The background track should stop now.
    StopBgm,
}

/// Shared cancellation flag for a [`FadeOut`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Outcome of one [`FadeOut::poll`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadePoll {
    /// Still fading; carries the volume for this frame.
    Pending(f32),
    /// Reached silence; the caller must stop the track.
    Finished,
    /// Cancelled; the caller must not touch the track.
    Cancelled,
}

/// Linear fade from the starting volume to zero.
#[derive(Debug)]
pub struct FadeOut {
    from: f32,
    duration: f32,
    elapsed: f32,
    token: CancelToken,
}

impl FadeOut {
    pub fn new(from: f32, duration: f32) -> Self {
        Self {
            from,
            duration,
            elapsed: 0.0,
            token: CancelToken::default(),
        }
    }

    /// Handle that cancels this fade.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Advance by one frame.
    pub fn poll(&mut self, dt: f32) -> FadePoll {
        if self.token.is_cancelled() {
            return FadePoll::Cancelled;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            return FadePoll::Finished;
        }
        FadePoll::Pending(self.from * (1.0 - self.elapsed / self.duration))
    }
}

/// Background-music volume in `[0, 1]`, read by the playback layer.
#[derive(Resource, Debug, Clone, Copy)]
pub struct BgmVolume(pub f32);

impl Default for BgmVolume {
    fn default() -> Self {
        Self(1.0)
    }
}

/// The fade currently in flight, if any.
#[derive(Resource, Default)]
pub struct BgmFader {
    task: Option<FadeOut>,
}

impl BgmFader {
    /// Start fading from `volume`.  A fade already running keeps going.
    pub fn start(&mut self, volume: f32, duration: f32) -> CancelToken {
        self.task
            .get_or_insert_with(|| FadeOut::new(volume, duration))
            .token()
    }

    /// Cancel the running fade, if any.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.token().cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

/// `OnEnter(GameOver)` / `OnEnter(Clear)`: fade the music out.
pub fn start_bgm_fade_system(
    mut fader: ResMut<BgmFader>,
    volume: Res<BgmVolume>,
    config: Res<CharacterConfig>,
) {
    fader.start(volume.0, config.bgm_fade_duration);
}

/// `OnEnter(Playing)`: abandon any fade and restore full volume.
pub fn reset_bgm_system(mut fader: ResMut<BgmFader>, mut volume: ResMut<BgmVolume>) {
    fader.cancel();
    volume.0 = 1.0;
}

/// `Update`: poll the fade once per frame.
pub fn bgm_fade_system(
    time: Res<Time>,
    mut fader: ResMut<BgmFader>,
    mut volume: ResMut<BgmVolume>,
    mut cues: MessageWriter<AudioCue>,
) {
    let Some(task) = fader.task.as_mut() else {
        return;
    };
    match task.poll(time.delta_secs()) {
        FadePoll::Pending(v) => volume.0 = v,
        FadePoll::Finished => {
            volume.0 = 0.0;
            cues.write(AudioCue::StopBgm);
            fader.task = None;
        }
        FadePoll::Cancelled => fader.task = None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_reaches_silence_then_finishes() {
        let mut fade = FadeOut::new(1.0, 1.0);
        assert_eq!(fade.poll(0.25), FadePoll::Pending(0.75));
        assert_eq!(fade.poll(0.25), FadePoll::Pending(0.5));
        assert_eq!(fade.poll(0.5), FadePoll::Finished);
    }

    #[test]
    fn cancellation_wins_over_completion() {
        let mut fade = FadeOut::new(1.0, 0.5);
        let token = fade.token();
        fade.poll(0.25);
        token.cancel();
        // Enough time has passed to finish, but the stop must not happen.
        assert_eq!(fade.poll(10.0), FadePoll::Cancelled);
    }

    #[test]
    fn fader_keeps_the_running_fade() {
        let mut fader = BgmFader::default();
        let first = fader.start(1.0, 2.0);
        let second = fader.start(0.3, 9.0);
        second.cancel();
        assert!(first.is_cancelled(), "both handles point at the same task");
    }

    #[test]
    fn fader_cancel_clears_task() {
        let mut fader = BgmFader::default();
        let token = fader.start(1.0, 2.0);
        fader.cancel();
        assert!(!fader.is_running());
        assert!(token.is_cancelled());
    }
}
