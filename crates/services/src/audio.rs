use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

/// Errors reported by an audio backend.
///
/// These never reach the wizard or the data model; the controller logs them
/// and carries on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AudioError {
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Capability for looping ambient playback, injected by the host.
///
/// Implementations live at the presentation boundary (a real audio device, a
/// test fake, or nothing at all); the core never touches a global handle.
pub trait AudioPlayer: Send + Sync {
    /// Start or resume looping playback.
    ///
    /// # Errors
    ///
    /// Returns `AudioError` if the backend cannot play.
    fn play(&self) -> Result<(), AudioError>;

    /// Pause playback in place.
    ///
    /// # Errors
    ///
    /// Returns `AudioError` if the backend cannot pause.
    fn pause(&self) -> Result<(), AudioError>;

    /// Stop playback and rewind to the beginning.
    ///
    /// # Errors
    ///
    /// Returns `AudioError` if the backend cannot stop.
    fn stop(&self) -> Result<(), AudioError>;
}

/// Player for hosts without audio; every operation succeeds and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudioPlayer;

impl AudioPlayer for NullAudioPlayer {
    fn play(&self) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Session-scoped ambient audio control.
///
/// Playback runs from the start of exposure until the dashboard (or a reset),
/// independent of the mute toggle, which only pauses and resumes in place.
/// The mute preference itself outlives individual sessions. Backend failures
/// are logged and ignored; they have no effect on wizard state.
pub struct AmbientAudio {
    player: Arc<dyn AudioPlayer>,
    muted: bool,
    active: bool,
}

impl AmbientAudio {
    #[must_use]
    pub fn new(player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            player,
            muted: false,
            active: false,
        }
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Begin the session soundtrack. Playback actually starts only when not
    /// muted, but the session is marked active either way so a later unmute
    /// resumes it.
    pub fn begin(&mut self) {
        self.active = true;
        if !self.muted {
            self.try_op("play", self.player.play());
        }
    }

    /// End the session soundtrack and rewind.
    pub fn end(&mut self) {
        if self.active {
            self.active = false;
            self.try_op("stop", self.player.stop());
        }
    }

    /// Flip the mute toggle, pausing or resuming any active playback.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        if self.active {
            if muted {
                self.try_op("pause", self.player.pause());
            } else {
                self.try_op("play", self.player.play());
            }
        }
    }

    fn try_op(&self, op: &'static str, result: Result<(), AudioError>) {
        if let Err(err) = result {
            debug!(%err, op, "ambient audio unavailable");
        }
    }
}
