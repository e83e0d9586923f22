use std::sync::Arc;

use chrono::{DateTime, Utc};

use worry_core::model::{AnxietyRating, Session, SessionDraft};
use worry_core::{Clock, PromptSet};

//
// ─── STAGES ────────────────────────────────────────────────────────────────────
//

/// The linear stages of a wizard run.
///
/// `Splash` is the initial stage; `Dashboard` is terminal for a run but offers
/// `reset` back to `Input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Welcome screen before anything is collected.
    Splash,
    /// Collect the worry text, session duration and pre-exposure rating.
    Input,
    /// Free-write answers to the exposure prompts, one at a time.
    Exposure,
    /// Rate anxiety right after the exposure prompts.
    ExposureRating,
    /// Answer the debrief questions, one at a time.
    Reflection,
    /// Re-rate anxiety after reflecting; this value is the one recorded.
    ReflectionRating,
    /// Session saved; show aggregates and offer a fresh start.
    Dashboard,
}

impl Stage {
    /// True for the stages in which exposure time accumulates.
    #[must_use]
    pub fn accumulates_time(self) -> bool {
        matches!(self, Stage::Exposure | Stage::Reflection)
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Everything the presentation layer needs to render the current stage.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSnapshot {
    pub stage: Stage,
    /// Prompt or question text while traversing a list; `None` elsewhere.
    pub prompt: Option<String>,
    pub cursor: usize,
    /// The editable free-text draft for the current prompt.
    pub text: String,
    /// Answers submitted so far over total exposure prompts, in 0.0..=1.0.
    pub progress: f32,
    pub worry: String,
    pub duration_minutes: u32,
    pub initial_anxiety: Option<AnxietyRating>,
    pub final_anxiety: Option<AnxietyRating>,
    pub elapsed_seconds: u64,
}

//
// ─── WIZARD ────────────────────────────────────────────────────────────────────
//

/// The session wizard state machine.
///
/// Owns the in-progress draft and all transition logic. Every trigger checks
/// its guard first and reports whether the transition happened; a `false`
/// return means nothing changed, which is the only failure channel guards
/// have. Validation errors are therefore impossible to observe from outside:
/// an action whose guard fails is simply inert.
#[derive(Debug, Clone)]
pub struct Wizard {
    prompts: Arc<PromptSet>,
    clock: Clock,
    stage: Stage,
    draft: SessionDraft,
    cursor: usize,
    text: String,
    started_at: Option<DateTime<Utc>>,
}

impl Wizard {
    #[must_use]
    pub fn new(prompts: Arc<PromptSet>, clock: Clock) -> Self {
        Self {
            prompts,
            clock,
            stage: Stage::Splash,
            draft: SessionDraft::new(),
            cursor: 0,
            text: String::new(),
            started_at: None,
        }
    }

    //
    // ── accessors ──
    //

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.draft.elapsed_seconds()
    }

    /// The prompt or question under the cursor, while traversing a list.
    #[must_use]
    pub fn current_prompt(&self) -> Option<&str> {
        match self.stage {
            Stage::Exposure => self.prompts.exposure_prompt(self.cursor),
            Stage::Reflection => self.prompts.reflection_question(self.cursor),
            _ => None,
        }
    }

    /// Fraction of exposure prompts answered so far.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f32 {
        self.draft.answers_recorded() as f32 / self.prompts.exposure_len() as f32
    }

    #[must_use]
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            stage: self.stage,
            prompt: self.current_prompt().map(str::to_owned),
            cursor: self.cursor,
            text: self.text.clone(),
            progress: self.progress(),
            worry: self.draft.worry().to_owned(),
            duration_minutes: self.draft.duration_minutes(),
            initial_anxiety: self.draft.initial_anxiety(),
            final_anxiety: self.draft.final_anxiety(),
            elapsed_seconds: self.draft.elapsed_seconds(),
        }
    }

    //
    // ── input-stage mutators ──
    //

    /// Update the worry text. Only meaningful while collecting input.
    pub fn set_worry(&mut self, worry: impl Into<String>) {
        if self.stage == Stage::Input {
            self.draft.set_worry(worry);
        }
    }

    /// Select the advisory exposure duration. Recorded on the session but
    /// never used to gate or force a transition.
    pub fn set_duration_minutes(&mut self, minutes: u32) {
        if self.stage == Stage::Input {
            self.draft.set_duration_minutes(minutes);
        }
    }

    pub fn set_initial_anxiety(&mut self, rating: AnxietyRating) {
        if self.stage == Stage::Input {
            self.draft.set_initial_anxiety(rating);
        }
    }

    /// Update the editable free-text draft for the current prompt.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if matches!(self.stage, Stage::Exposure | Stage::Reflection) {
            self.text = text.into();
        }
    }

    /// Take or overwrite the post-exposure rating. Accepted at both rating
    /// stages; the reflection-stage value wins.
    pub fn set_final_anxiety(&mut self, rating: AnxietyRating) {
        if matches!(self.stage, Stage::ExposureRating | Stage::ReflectionRating) {
            self.draft.set_final_anxiety(rating);
        }
    }

    //
    // ── guards ──
    //

    #[must_use]
    pub fn can_start_exposure(&self) -> bool {
        self.stage == Stage::Input
            && !self.draft.worry().trim().is_empty()
            && self.draft.duration_minutes() > 0
            && self.draft.initial_anxiety().is_some()
    }

    #[must_use]
    pub fn can_submit_answer(&self) -> bool {
        self.stage == Stage::Exposure && !self.text.trim().is_empty()
    }

    #[must_use]
    pub fn can_continue_to_reflection(&self) -> bool {
        self.stage == Stage::ExposureRating && self.draft.final_anxiety().is_some()
    }

    #[must_use]
    pub fn can_submit_reflection(&self) -> bool {
        self.stage == Stage::Reflection && !self.text.trim().is_empty()
    }

    #[must_use]
    pub fn can_complete(&self) -> bool {
        self.stage == Stage::ReflectionRating && self.draft.final_anxiety().is_some()
    }

    //
    // ── triggers ──
    //

    /// Splash → Input.
    pub fn start(&mut self) -> bool {
        if self.stage != Stage::Splash {
            return false;
        }
        self.stage = Stage::Input;
        true
    }

    /// Input → Exposure, once worry, duration and the pre-exposure rating are
    /// all present. Notes the wall-clock start of the session.
    pub fn start_exposure(&mut self) -> bool {
        if !self.can_start_exposure() {
            return false;
        }
        self.stage = Stage::Exposure;
        self.cursor = 0;
        self.text = self.draft.answer(0).unwrap_or("").to_owned();
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
        true
    }

    /// Store the current text as the answer under the cursor and advance:
    /// to the next prompt, or to `ExposureRating` after the last one.
    pub fn submit_answer(&mut self) -> bool {
        if !self.can_submit_answer() {
            return false;
        }
        if self
            .draft
            .record_answer(self.cursor, self.text.clone())
            .is_err()
        {
            return false;
        }

        if self.cursor + 1 < self.prompts.exposure_len() {
            self.cursor += 1;
            self.text = self.draft.answer(self.cursor).unwrap_or("").to_owned();
        } else {
            self.stage = Stage::ExposureRating;
            self.text.clear();
        }
        true
    }

    /// Step one prompt back, restoring the stored answer as the editable
    /// draft; at the first prompt, leave the list entirely.
    pub fn back(&mut self) -> bool {
        match self.stage {
            Stage::Exposure => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.text = self.draft.answer(self.cursor).unwrap_or("").to_owned();
                } else {
                    self.stage = Stage::Input;
                    self.text.clear();
                }
                true
            }
            Stage::Reflection => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.text = self.draft.reflection(self.cursor).unwrap_or("").to_owned();
                } else {
                    self.stage = Stage::ExposureRating;
                    self.text.clear();
                }
                true
            }
            _ => false,
        }
    }

    /// ExposureRating → Reflection, once the interim rating is taken.
    pub fn continue_to_reflection(&mut self) -> bool {
        if !self.can_continue_to_reflection() {
            return false;
        }
        self.stage = Stage::Reflection;
        self.cursor = 0;
        self.text = self.draft.reflection(0).unwrap_or("").to_owned();
        true
    }

    /// Store the current text as the reflection under the cursor and advance:
    /// to the next question, or to `ReflectionRating` after the last one.
    pub fn submit_reflection(&mut self) -> bool {
        if !self.can_submit_reflection() {
            return false;
        }
        if self
            .draft
            .record_reflection(self.cursor, self.text.clone())
            .is_err()
        {
            return false;
        }

        if self.cursor + 1 < self.prompts.reflection_len() {
            self.cursor += 1;
            self.text = self.draft.reflection(self.cursor).unwrap_or("").to_owned();
        } else {
            self.stage = Stage::ReflectionRating;
            self.text.clear();
        }
        true
    }

    /// ReflectionRating → Dashboard: finalize the draft into an immutable
    /// `Session` and return it for the caller to persist.
    ///
    /// The draft is consumed on success; the guards make finalization
    /// infallible in practice, and a draft that somehow cannot finalize
    /// leaves the wizard unchanged.
    pub fn complete(&mut self) -> Option<Session> {
        if !self.can_complete() {
            return None;
        }
        let started_at = self.started_at.unwrap_or_else(|| self.clock.now());
        let completed_at = self.clock.now();

        match self
            .draft
            .clone()
            .finalize(&self.prompts, started_at, completed_at)
        {
            Ok(session) => {
                self.stage = Stage::Dashboard;
                self.draft = SessionDraft::new();
                self.started_at = None;
                Some(session)
            }
            Err(_) => None,
        }
    }

    /// Dashboard → Input with a cleared draft.
    pub fn reset(&mut self) -> bool {
        if self.stage != Stage::Dashboard {
            return false;
        }
        self.stage = Stage::Input;
        self.draft = SessionDraft::new();
        self.cursor = 0;
        self.text.clear();
        self.started_at = None;
        true
    }

    /// Record one second of wall-clock time. Counts only while exposed or
    /// reflecting; a tick landing in any other stage is ignored.
    pub fn tick(&mut self) -> bool {
        if !self.stage.accumulates_time() {
            return false;
        }
        self.draft.add_elapsed_second();
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use worry_core::time::{fixed_clock, fixed_now};

    fn rating(value: u8) -> AnxietyRating {
        AnxietyRating::new(value).unwrap()
    }

    fn small_wizard() -> Wizard {
        let prompts = PromptSet::new(vec!["p1", "p2", "p3"], vec!["q1", "q2"]).unwrap();
        Wizard::new(Arc::new(prompts), fixed_clock())
    }

    fn wizard_at_exposure() -> Wizard {
        let mut wizard = small_wizard();
        wizard.start();
        wizard.set_worry("Losing my job");
        wizard.set_duration_minutes(2);
        wizard.set_initial_anxiety(rating(3));
        assert!(wizard.start_exposure());
        wizard
    }

    fn answer_all(wizard: &mut Wizard) {
        for i in 0..wizard.prompts().exposure_len() {
            wizard.set_text(format!("answer {i}"));
            assert!(wizard.submit_answer());
        }
    }

    fn reflect_all(wizard: &mut Wizard) {
        for i in 0..wizard.prompts().reflection_len() {
            wizard.set_text(format!("reflection {i}"));
            assert!(wizard.submit_reflection());
        }
    }

    #[test]
    fn starts_at_splash_and_moves_to_input() {
        let mut wizard = small_wizard();
        assert_eq!(wizard.stage(), Stage::Splash);
        assert!(wizard.start());
        assert_eq!(wizard.stage(), Stage::Input);
        // start is inert once past the splash
        assert!(!wizard.start());
    }

    #[test]
    fn start_exposure_guard_requires_all_inputs() {
        let mut wizard = small_wizard();
        wizard.start();

        assert!(!wizard.start_exposure());
        wizard.set_worry("Losing my job");
        assert!(!wizard.start_exposure());
        wizard.set_duration_minutes(2);
        assert!(!wizard.start_exposure());
        wizard.set_initial_anxiety(rating(3));
        assert!(wizard.start_exposure());
        assert_eq!(wizard.stage(), Stage::Exposure);
        assert_eq!(wizard.cursor(), 0);
    }

    #[test]
    fn blank_worry_does_not_satisfy_the_guard() {
        let mut wizard = small_wizard();
        wizard.start();
        wizard.set_worry("   ");
        wizard.set_duration_minutes(1);
        wizard.set_initial_anxiety(rating(2));
        assert!(!wizard.start_exposure());
    }

    #[test]
    fn submit_requires_non_blank_text() {
        let mut wizard = wizard_at_exposure();
        assert!(!wizard.submit_answer());
        wizard.set_text("  ");
        assert!(!wizard.submit_answer());
        wizard.set_text("something real");
        assert!(wizard.submit_answer());
        assert_eq!(wizard.cursor(), 1);
    }

    #[test]
    fn last_answer_moves_to_exposure_rating() {
        let mut wizard = wizard_at_exposure();
        answer_all(&mut wizard);
        assert_eq!(wizard.stage(), Stage::ExposureRating);
        assert!((wizard.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn progress_tracks_submitted_answers() {
        let mut wizard = wizard_at_exposure();
        assert_eq!(wizard.progress(), 0.0);
        wizard.set_text("first");
        wizard.submit_answer();
        assert!((wizard.progress() - 1.0 / 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn back_restores_the_stored_answer_verbatim() {
        let mut wizard = wizard_at_exposure();
        wizard.set_text("original answer");
        wizard.submit_answer();
        wizard.set_text("half-typed");

        assert!(wizard.back());
        assert_eq!(wizard.cursor(), 0);
        assert_eq!(wizard.text(), "original answer");
    }

    #[test]
    fn resubmitting_after_back_overwrites_in_place() {
        let mut wizard = wizard_at_exposure();
        wizard.set_text("original");
        wizard.submit_answer();
        wizard.back();
        wizard.set_text("edited");
        wizard.submit_answer();

        // length unchanged, content replaced, forward draft restored
        assert_eq!(wizard.cursor(), 1);
        let session = {
            answer_all_from(&mut wizard, 1);
            finish(&mut wizard)
        };
        assert_eq!(session.answers()[0], "edited");
        assert_eq!(session.answers().len(), 3);
    }

    fn answer_all_from(wizard: &mut Wizard, from: usize) {
        for i in from..wizard.prompts().exposure_len() {
            wizard.set_text(format!("answer {i}"));
            assert!(wizard.submit_answer());
        }
    }

    fn finish(wizard: &mut Wizard) -> Session {
        wizard.set_final_anxiety(rating(4));
        assert!(wizard.continue_to_reflection());
        for i in 0..wizard.prompts().reflection_len() {
            wizard.set_text(format!("reflection {i}"));
            assert!(wizard.submit_reflection());
        }
        wizard.set_final_anxiety(rating(2));
        wizard.complete().expect("session finalizes")
    }

    #[test]
    fn back_at_first_prompt_returns_to_input() {
        let mut wizard = wizard_at_exposure();
        assert!(wizard.back());
        assert_eq!(wizard.stage(), Stage::Input);
    }

    #[test]
    fn reentering_exposure_repopulates_the_first_answer() {
        let mut wizard = wizard_at_exposure();
        wizard.set_text("kept answer");
        wizard.submit_answer();
        wizard.back(); // cursor 1 -> 0
        wizard.back(); // -> Input

        assert!(wizard.start_exposure());
        assert_eq!(wizard.text(), "kept answer");
    }

    #[test]
    fn reflection_back_at_first_question_returns_to_rating() {
        let mut wizard = wizard_at_exposure();
        answer_all(&mut wizard);
        wizard.set_final_anxiety(rating(4));
        wizard.continue_to_reflection();

        assert!(wizard.back());
        assert_eq!(wizard.stage(), Stage::ExposureRating);
    }

    #[test]
    fn rating_stages_guard_their_transitions() {
        let mut wizard = wizard_at_exposure();
        answer_all(&mut wizard);

        assert!(!wizard.continue_to_reflection());
        wizard.set_final_anxiety(rating(4));
        assert!(wizard.continue_to_reflection());

        reflect_all(&mut wizard);
        assert_eq!(wizard.stage(), Stage::ReflectionRating);
        // the interim rating carries over, so complete is already unlocked;
        // re-rating overwrites it
        wizard.set_final_anxiety(rating(2));
        let session = wizard.complete().expect("completes");
        assert_eq!(session.final_anxiety().value(), 2);
    }

    #[test]
    fn tick_counts_only_while_exposed_or_reflecting() {
        let mut wizard = small_wizard();
        assert!(!wizard.tick());
        wizard.start();
        assert!(!wizard.tick());

        wizard.set_worry("w");
        wizard.set_duration_minutes(1);
        wizard.set_initial_anxiety(rating(3));
        wizard.start_exposure();
        assert!(wizard.tick());
        assert!(wizard.tick());
        assert_eq!(wizard.elapsed_seconds(), 2);

        answer_all(&mut wizard);
        assert!(!wizard.tick()); // ExposureRating
        wizard.set_final_anxiety(rating(3));
        wizard.continue_to_reflection();
        assert!(wizard.tick());
        assert_eq!(wizard.elapsed_seconds(), 3);
    }

    #[test]
    fn completed_session_has_full_sequences_and_elapsed_time() {
        let mut wizard = wizard_at_exposure();
        wizard.tick();
        wizard.tick();
        answer_all(&mut wizard);
        wizard.set_final_anxiety(rating(4));
        wizard.continue_to_reflection();
        wizard.tick();
        reflect_all(&mut wizard);
        wizard.set_final_anxiety(rating(2));

        let session = wizard.complete().expect("completes");
        assert_eq!(wizard.stage(), Stage::Dashboard);
        assert_eq!(session.answers().len(), 3);
        assert_eq!(session.reflections().len(), 2);
        assert_eq!(session.elapsed_seconds(), 3);
        assert_eq!(session.initial_anxiety().value(), 3);
        assert_eq!(session.final_anxiety().value(), 2);
        assert_eq!(session.started_at(), fixed_now());
    }

    #[test]
    fn complete_is_inert_outside_reflection_rating() {
        let mut wizard = wizard_at_exposure();
        answer_all(&mut wizard);
        assert!(wizard.complete().is_none());
        assert_eq!(wizard.stage(), Stage::ExposureRating);
    }

    #[test]
    fn reset_returns_to_input_with_a_clean_slate() {
        let mut wizard = wizard_at_exposure();
        wizard.tick();
        answer_all(&mut wizard);
        wizard.set_final_anxiety(rating(4));
        wizard.continue_to_reflection();
        reflect_all(&mut wizard);
        wizard.set_final_anxiety(rating(1));
        wizard.complete().unwrap();

        assert!(wizard.reset());
        assert_eq!(wizard.stage(), Stage::Input);
        assert_eq!(wizard.elapsed_seconds(), 0);
        assert_eq!(wizard.progress(), 0.0);
        assert_eq!(wizard.snapshot().worry, "");
    }

    #[test]
    fn reset_is_only_offered_from_the_dashboard() {
        let mut wizard = wizard_at_exposure();
        assert!(!wizard.reset());
        assert_eq!(wizard.stage(), Stage::Exposure);
    }

    #[test]
    fn snapshot_carries_the_current_prompt() {
        let mut wizard = wizard_at_exposure();
        let snap = wizard.snapshot();
        assert_eq!(snap.stage, Stage::Exposure);
        assert_eq!(snap.prompt.as_deref(), Some("p1"));

        wizard.set_text("a");
        wizard.submit_answer();
        assert_eq!(wizard.snapshot().prompt.as_deref(), Some("p2"));
    }
}
