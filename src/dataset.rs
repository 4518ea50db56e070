use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use thiserror::Error;

static DATA_DIR: Dir = include_dir!("src/data");

/// Errors the practice core can surface when building a round.
///
/// Everything else (wrong words, blank grid cells, stray keystrokes) is a
/// normal session state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// The dataset needed by the selected mode is empty, so there is
    /// nothing to build a round from. Recoverable once data loads.
    #[error("dataset is empty, nothing to practice")]
    EmptyDataset,
    /// The sampled conjugation entry does not form a rectangular
    /// person x form grid and cannot be graded.
    #[error("conjugation entry for '{verb}' has an uneven answer grid")]
    MalformedEntry { verb: String },
}

/// One verb with its full table of expected inflections.
///
/// `answers` maps form/tense -> person -> inflected string. BTreeMap keeps
/// key order canonical regardless of how the source JSON was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConjugationEntry {
    pub verb: String,
    pub answers: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConjugationEntry {
    /// Sorted grammatical forms (outer keys of the grid).
    pub fn forms(&self) -> Vec<&str> {
        self.answers.keys().map(String::as_str).collect()
    }

    /// Sorted grammatical persons (inner keys, taken from the first form).
    pub fn persons(&self) -> Vec<&str> {
        self.answers
            .values()
            .next()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Checks the answer grid is non-empty and rectangular: every form must
    /// carry the exact same set of persons.
    pub fn validate(&self) -> Result<(), DatasetError> {
        let malformed = || DatasetError::MalformedEntry {
            verb: self.verb.clone(),
        };

        if self.answers.is_empty() || self.answers.values().any(|row| row.is_empty()) {
            return Err(malformed());
        }
        let rectangular = self
            .answers
            .values()
            .map(|row| row.keys().collect::<Vec<_>>())
            .all_equal();
        if !rectangular {
            return Err(malformed());
        }
        Ok(())
    }
}

/// Uniform shuffle-then-take sample of the vocabulary, without replacement.
/// Takes fewer than `round_size` words when the dataset is smaller.
pub fn sample_round<R: Rng>(words: &[String], round_size: usize, rng: &mut R) -> Vec<String> {
    let mut pool: Vec<String> = words.to_vec();
    pool.shuffle(rng);
    pool.truncate(round_size.min(words.len()));
    pool
}

/// Loads the vocabulary list, from `path` when given, otherwise from the
/// bundled resource. I/O and parse failures degrade to an empty list so the
/// session layer sees "unavailable" rather than a crash.
pub fn load_words(path: Option<&Path>) -> Vec<String> {
    match path {
        Some(p) => read_json_file(p).unwrap_or_else(|e| {
            eprintln!("ripasso: could not load words from {}: {}", p.display(), e);
            Vec::new()
        }),
        None => bundled("words.json"),
    }
}

/// Loads the conjugation table, same soft-failure contract as `load_words`.
pub fn load_conjugations(path: Option<&Path>) -> Vec<ConjugationEntry> {
    match path {
        Some(p) => read_json_file(p).unwrap_or_else(|e| {
            eprintln!(
                "ripasso: could not load conjugations from {}: {}",
                p.display(),
                e
            );
            Vec::new()
        }),
        None => bundled("conjugations.json"),
    }
}

fn read_json_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn bundled<T: for<'de> Deserialize<'de> + Default>(file_name: &str) -> T {
    DATA_DIR
        .get_file(file_name)
        .and_then(|f| f.contents_utf8())
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
