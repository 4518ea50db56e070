use crate::conjugation::{ConjugationSession, GradeReport, GridAnswers};
use crate::dataset::{ConjugationEntry, DatasetError};
use crate::typing::{Submission, TypingSession};
use rand::Rng;
use std::time::SystemTime;

/// Which exercise the trainer is currently set up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Mode {
    Typing,
    Conjugation,
}

/// Live timer readout republished on every tick while a typing round runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerView {
    pub elapsed_secs: f64,
    pub wpm: f64,
}

/// Routes start/reset/submit/tick commands to the session of the active
/// mode. At most one session is live at a time; idle means no session.
#[derive(Debug)]
pub struct Trainer {
    mode: Mode,
    round_size: usize,
    words: Vec<String>,
    conjugations: Vec<ConjugationEntry>,
    typing: Option<TypingSession>,
    conjugation: Option<ConjugationSession>,
}

impl Trainer {
    pub fn new(words: Vec<String>, conjugations: Vec<ConjugationEntry>, round_size: usize) -> Self {
        Self {
            mode: Mode::Typing,
            round_size,
            words,
            conjugations,
            typing: None,
            conjugation: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn round_size(&self) -> usize {
        self.round_size
    }

    /// Switches the active mode. Both modes drop back to idle; nothing
    /// auto-starts.
    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    /// Discards any live session, returning the active mode to idle.
    pub fn reset(&mut self) {
        self.typing = None;
        self.conjugation = None;
    }

    /// Starts a round in the active mode. Dataset failures from the session
    /// constructors propagate unchanged.
    pub fn start(&mut self, now: SystemTime) -> Result<(), DatasetError> {
        self.start_with_rng(&mut rand::thread_rng(), now)
    }

    pub fn start_with_rng<R: Rng>(
        &mut self,
        rng: &mut R,
        now: SystemTime,
    ) -> Result<(), DatasetError> {
        self.reset();
        match self.mode {
            Mode::Typing => {
                self.typing = Some(TypingSession::start(
                    &self.words,
                    self.round_size,
                    rng,
                    now,
                )?);
            }
            Mode::Conjugation => {
                self.conjugation = Some(ConjugationSession::start(&self.conjugations, rng)?);
            }
        }
        Ok(())
    }

    /// Feeds one typed word to the live typing session. `None` when no
    /// typing session is live (stray submissions are ignored, not errors).
    pub fn submit_typed_word(&mut self, text: &str) -> Option<Submission> {
        self.typing.as_mut().map(|session| session.submit(text))
    }

    /// Feeds a grid submission to the live conjugation session.
    pub fn submit_conjugation_grid(&mut self, answers: &GridAnswers) -> Option<&GradeReport> {
        self.conjugation
            .as_mut()
            .map(|session| &*session.grade(answers))
    }

    /// Timer snapshot for the display. `Some` only while a typing round is
    /// actually running; the instant the round finishes (or after a reset)
    /// ticks produce nothing, which stops the readout.
    pub fn tick(&self, now: SystemTime) -> Option<TimerView> {
        let session = self.typing.as_ref().filter(|s| !s.is_finished())?;
        Some(TimerView {
            elapsed_secs: session.elapsed_seconds(now),
            wpm: session.live_wpm(now),
        })
    }

    pub fn typing(&self) -> Option<&TypingSession> {
        self.typing.as_ref()
    }

    pub fn conjugation(&self) -> Option<&ConjugationSession> {
        self.conjugation.as_ref()
    }
}
