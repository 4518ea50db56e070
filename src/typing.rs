use crate::dataset::{self, DatasetError};
use crate::score;
use rand::Rng;
use std::time::SystemTime;

/// Default number of words per typing round.
pub const DEFAULT_ROUND_SIZE: usize = 10;

/// Outcome of submitting one typed word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The typed text did not match the current word; nothing changed.
    NoMatch,
    /// Match accepted, the round moved on to the next word.
    Advanced,
    /// Match accepted and it was the last word, the round is over.
    Finished,
}

/// Final scores for a completed typing round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundResult {
    pub wpm: f64,
    pub accuracy: f64,
    pub elapsed_secs: f64,
    pub correct_count: usize,
    pub round_size: usize,
}

/// One timed typing drill over a sampled word sequence.
///
/// A session only exists while a round is running or finished; idle is the
/// absence of a session. Only an exact (trimmed, case-sensitive) match
/// advances the index, so a finished round always has a perfect score --
/// that is the product's intended behavior, not an accident.
#[derive(Debug, Clone)]
pub struct TypingSession {
    words: Vec<String>,
    current: usize,
    correct_count: usize,
    started_at: SystemTime,
}

impl TypingSession {
    /// Samples a fresh round from `words` and starts the clock at `now`.
    /// Fails when the vocabulary is empty; takes fewer than `round_size`
    /// words when the vocabulary is smaller.
    pub fn start<R: Rng>(
        words: &[String],
        round_size: usize,
        rng: &mut R,
        now: SystemTime,
    ) -> Result<Self, DatasetError> {
        if words.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(Self {
            words: dataset::sample_round(words, round_size, rng),
            current: 0,
            correct_count: 0,
            started_at: now,
        })
    }

    /// The word to type next, `None` once the round is finished.
    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.current).map(String::as_str)
    }

    pub fn round_size(&self) -> usize {
        self.words.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// (completed, total) word counters for the progress display.
    pub fn progress(&self) -> (usize, usize) {
        (self.current, self.words.len())
    }

    pub fn is_finished(&self) -> bool {
        self.current == self.words.len()
    }

    /// Grades one submission against the current word. Leading/trailing
    /// whitespace is ignored; the comparison itself is case-sensitive. A
    /// mismatch leaves the session untouched -- no penalty, no advance.
    pub fn submit(&mut self, typed: &str) -> Submission {
        let Some(expected) = self.current_word() else {
            return Submission::Finished;
        };
        if typed.trim() != expected {
            return Submission::NoMatch;
        }

        self.correct_count += 1;
        self.current += 1;
        if self.is_finished() {
            Submission::Finished
        } else {
            Submission::Advanced
        }
    }

    /// Seconds since the round started. Pure in `now` so the timer is
    /// correct no matter when it is sampled.
    pub fn elapsed_seconds(&self, now: SystemTime) -> f64 {
        score::elapsed_seconds(self.started_at, now)
    }

    /// Words-per-minute as of `now`, for the live readout.
    pub fn live_wpm(&self, now: SystemTime) -> f64 {
        score::words_per_minute(self.correct_count, self.elapsed_seconds(now))
    }

    /// Final scores, available only once every word has been typed.
    pub fn finish(&self, now: SystemTime) -> Option<RoundResult> {
        if !self.is_finished() {
            return None;
        }
        let elapsed_secs = self.elapsed_seconds(now);
        Some(RoundResult {
            wpm: score::words_per_minute(self.correct_count, elapsed_secs),
            accuracy: score::accuracy_percent(self.correct_count, self.words.len()),
            elapsed_secs,
            correct_count: self.correct_count,
            round_size: self.words.len(),
        })
    }
}
