use std::sync::{Arc, Mutex, MutexGuard};

use storage::UserStore;
use worry_core::model::{AnxietyRating, User};
use worry_core::{Clock, ExampleWorry, PromptSet};

use crate::audio::{AmbientAudio, AudioPlayer};
use crate::history::{HistoryService, HistorySummary};
use crate::ticker::SessionTicker;
use crate::wizard::{Wizard, WizardSnapshot};

fn lock_wizard(wizard: &Mutex<Wizard>) -> MutexGuard<'_, Wizard> {
    // a poisoned lock still holds a valid wizard; keep going with it
    match wizard.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Composition root for a wizard run.
///
/// Owns the state machine, the history service, the ambient audio controller
/// and the session ticker, and keeps the latter two in step with the current
/// stage after every trigger. The presentation layer talks only to this type:
/// it forwards the named triggers and renders from `snapshot`/`dashboard`.
///
/// The persisted `User` is loaded once at construction and the in-memory copy
/// is the source of truth for the rest of the run.
pub struct WizardFlow {
    wizard: Arc<Mutex<Wizard>>,
    history: HistoryService,
    audio: AmbientAudio,
    ticker: SessionTicker,
    user: Option<User>,
    examples: Vec<ExampleWorry>,
}

impl WizardFlow {
    /// Build a flow over injected storage and audio capabilities.
    ///
    /// Must be called from within a tokio runtime (the ticker spawns there).
    #[must_use]
    pub fn new(
        prompts: Arc<PromptSet>,
        clock: Clock,
        store: Arc<dyn UserStore>,
        player: Arc<dyn AudioPlayer>,
    ) -> Self {
        let history = HistoryService::new(store);
        let user = history.load();

        Self {
            wizard: Arc::new(Mutex::new(Wizard::new(prompts, clock))),
            history,
            audio: AmbientAudio::new(player),
            ticker: SessionTicker::new(),
            user,
            examples: ExampleWorry::builtin(),
        }
    }

    //
    // ── render boundary ──
    //

    #[must_use]
    pub fn snapshot(&self) -> WizardSnapshot {
        lock_wizard(&self.wizard).snapshot()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Aggregates for the dashboard; empty when no history exists yet.
    #[must_use]
    pub fn dashboard(&self) -> HistorySummary {
        self.user
            .as_ref()
            .map_or_else(HistorySummary::empty, |user| {
                HistoryService::aggregate(user)
            })
    }

    /// Sample worries with coping suggestions, rendered on demand while the
    /// user fills in the input form.
    #[must_use]
    pub fn example_worries(&self) -> &[ExampleWorry] {
        &self.examples
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    //
    // ── triggers ──
    //

    pub fn start(&mut self) -> bool {
        lock_wizard(&self.wizard).start()
    }

    pub fn set_worry(&mut self, worry: impl Into<String>) {
        lock_wizard(&self.wizard).set_worry(worry);
    }

    pub fn set_duration_minutes(&mut self, minutes: u32) {
        lock_wizard(&self.wizard).set_duration_minutes(minutes);
    }

    pub fn set_initial_anxiety(&mut self, rating: AnxietyRating) {
        lock_wizard(&self.wizard).set_initial_anxiety(rating);
    }

    pub fn set_final_anxiety(&mut self, rating: AnxietyRating) {
        lock_wizard(&self.wizard).set_final_anxiety(rating);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        lock_wizard(&self.wizard).set_text(text);
    }

    /// Begin the exposure stage: starts elapsed-time accumulation and the
    /// ambient soundtrack.
    pub fn start_exposure(&mut self) -> bool {
        let moved = lock_wizard(&self.wizard).start_exposure();
        if moved {
            self.audio.begin();
            self.sync_ticker();
        }
        moved
    }

    pub fn submit_answer(&mut self) -> bool {
        let moved = lock_wizard(&self.wizard).submit_answer();
        if moved {
            self.sync_ticker();
        }
        moved
    }

    pub fn back(&mut self) -> bool {
        let moved = lock_wizard(&self.wizard).back();
        if moved {
            self.sync_ticker();
        }
        moved
    }

    pub fn continue_to_reflection(&mut self) -> bool {
        let moved = lock_wizard(&self.wizard).continue_to_reflection();
        if moved {
            self.sync_ticker();
        }
        moved
    }

    pub fn submit_reflection(&mut self) -> bool {
        let moved = lock_wizard(&self.wizard).submit_reflection();
        if moved {
            self.sync_ticker();
        }
        moved
    }

    /// Finalize the session, append it to history (persisting synchronously,
    /// best-effort) and land on the dashboard.
    pub fn complete(&mut self) -> bool {
        let session = lock_wizard(&self.wizard).complete();
        let Some(session) = session else {
            return false;
        };

        self.user = Some(self.history.append(self.user.as_ref(), session));
        self.ticker.stop();
        self.audio.end();
        true
    }

    /// Discard the working state and return to input for a fresh session.
    pub fn reset(&mut self) -> bool {
        let moved = lock_wizard(&self.wizard).reset();
        if moved {
            self.ticker.stop();
            self.audio.end();
        }
        moved
    }

    /// Mute or unmute the ambient soundtrack. Orthogonal to the state
    /// machine: playback pauses or resumes in place.
    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    fn sync_ticker(&mut self) {
        let accumulates = lock_wizard(&self.wizard).stage().accumulates_time();
        if accumulates {
            let wizard = Arc::clone(&self.wizard);
            self.ticker.start(move || {
                lock_wizard(&wizard).tick();
            });
        } else {
            self.ticker.stop();
        }
    }
}
