use crate::dataset::{ConjugationEntry, DatasetError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Submitted grid answers, keyed by (person, form).
///
/// Missing cells are graded as empty strings, which never match.
pub type GridAnswers = HashMap<(String, String), String>;

/// One input cell of the conjugation grid, in grading order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub person: String,
    pub form: String,
}

/// One wrong cell: where it was and what was expected there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub person: String,
    pub form: String,
    pub expected: String,
}

/// Result of grading a full grid submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GradeReport {
    pub correct: usize,
    pub total: usize,
    pub mismatches: Vec<Mismatch>,
}

/// One conjugation challenge: a randomly drawn verb and its answer grid.
///
/// The session exposes the verb and the (person, form) cells so the caller
/// can build an input grid without the core knowing about rendering.
/// Grading is a pure function of the stored grid and the submission;
/// repeated calls re-grade rather than starting a new attempt.
#[derive(Debug, Clone)]
pub struct ConjugationSession {
    entry: ConjugationEntry,
    report: Option<GradeReport>,
}

impl ConjugationSession {
    /// Draws one entry uniformly at random and validates its grid. A
    /// malformed entry aborts the round here, before any input is taken.
    pub fn start<R: Rng>(entries: &[ConjugationEntry], rng: &mut R) -> Result<Self, DatasetError> {
        let entry = entries.choose(rng).ok_or(DatasetError::EmptyDataset)?;
        entry.validate()?;
        Ok(Self {
            entry: entry.clone(),
            report: None,
        })
    }

    pub fn verb(&self) -> &str {
        &self.entry.verb
    }

    pub fn forms(&self) -> Vec<&str> {
        self.entry.forms()
    }

    pub fn persons(&self) -> Vec<&str> {
        self.entry.persons()
    }

    /// All grid cells in row-major order: person outermost, form innermost.
    pub fn cells(&self) -> Vec<GridCell> {
        let mut cells = Vec::new();
        for person in self.entry.persons() {
            for form in self.entry.forms() {
                cells.push(GridCell {
                    person: person.to_string(),
                    form: form.to_string(),
                });
            }
        }
        cells
    }

    pub fn is_graded(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<&GradeReport> {
        self.report.as_ref()
    }

    /// Grades every cell of the grid against `submitted`. Both sides are
    /// normalized (trimmed, lowercased) before the exact comparison.
    /// Mismatches come back in the same row-major order as `cells()`.
    pub fn grade(&mut self, submitted: &GridAnswers) -> &GradeReport {
        let mut correct = 0;
        let mut mismatches = Vec::new();

        for person in self.entry.persons() {
            for form in self.entry.forms() {
                let expected = &self.entry.answers[form][person];
                let answer = submitted
                    .get(&(person.to_string(), form.to_string()))
                    .map(String::as_str)
                    .unwrap_or("");

                if normalize(answer) == normalize(expected) {
                    correct += 1;
                } else {
                    mismatches.push(Mismatch {
                        person: person.to_string(),
                        form: form.to_string(),
                        expected: expected.clone(),
                    });
                }
            }
        }

        let total = self.entry.forms().len() * self.entry.persons().len();
        self.report = Some(GradeReport {
            correct,
            total,
            mismatches,
        });
        self.report.as_ref().unwrap()
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parlare_entry() -> ConjugationEntry {
        serde_json::from_str(
            r#"{
                "verb": "parlare",
                "answers": {
                    "present": {"io": "parlo", "tu": "parli"},
                    "past": {"io": "ho parlato", "tu": "hai parlato"}
                }
            }"#,
        )
        .unwrap()
    }

    fn started_session() -> ConjugationSession {
        let mut rng = StdRng::seed_from_u64(3);
        ConjugationSession::start(&[parlare_entry()], &mut rng).unwrap()
    }

    fn answer(person: &str, form: &str, text: &str) -> ((String, String), String) {
        ((person.to_string(), form.to_string()), text.to_string())
    }

    #[test]
    fn test_start_empty_dataset_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = ConjugationSession::start(&[], &mut rng);
        assert_matches!(result, Err(DatasetError::EmptyDataset));
    }

    #[test]
    fn test_start_rejects_malformed_entry() {
        let ragged: ConjugationEntry = serde_json::from_str(
            r#"{
                "verb": "rompere",
                "answers": {
                    "present": {"io": "rompo", "tu": "rompi"},
                    "past": {"io": "ho rotto"}
                }
            }"#,
        )
        .unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let result = ConjugationSession::start(&[ragged], &mut rng);
        assert_matches!(result, Err(DatasetError::MalformedEntry { ref verb }) if verb == "rompere");
    }

    #[test]
    fn test_cells_are_row_major() {
        let session = started_session();
        let cells: Vec<(String, String)> = session
            .cells()
            .into_iter()
            .map(|c| (c.person, c.form))
            .collect();

        // person-major, forms sorted within each person
        assert_eq!(
            cells,
            vec![
                ("io".to_string(), "past".to_string()),
                ("io".to_string(), "present".to_string()),
                ("tu".to_string(), "past".to_string()),
                ("tu".to_string(), "present".to_string()),
            ]
        );
    }

    #[test]
    fn test_grade_all_correct() {
        let mut session = started_session();
        let submitted: GridAnswers = [
            answer("io", "present", "parlo"),
            answer("tu", "present", "parli"),
            answer("io", "past", "ho parlato"),
            answer("tu", "past", "hai parlato"),
        ]
        .into_iter()
        .collect();

        let report = session.grade(&submitted);
        assert_eq!(report.correct, 4);
        assert_eq!(report.total, 4);
        assert!(report.mismatches.is_empty());
    }

    #[test]
    fn test_grade_all_blank() {
        let mut session = started_session();
        let report = session.grade(&GridAnswers::new());

        assert_eq!(report.correct, 0);
        assert_eq!(report.total, 4);
        assert_eq!(report.mismatches.len(), 4);
    }

    #[test]
    fn test_grade_single_mistake() {
        let mut session = started_session();
        let submitted: GridAnswers = [
            answer("io", "present", "parlo"),
            answer("tu", "present", "WRONG"),
            answer("io", "past", "ho parlato"),
            answer("tu", "past", "hai parlato"),
        ]
        .into_iter()
        .collect();

        let report = session.grade(&submitted);
        assert_eq!(report.correct, 3);
        assert_eq!(report.total, 4);
        assert_eq!(
            report.mismatches,
            vec![Mismatch {
                person: "tu".to_string(),
                form: "present".to_string(),
                expected: "parli".to_string(),
            }]
        );
    }

    #[test]
    fn test_grade_normalizes_case_and_whitespace() {
        let mut session = started_session();
        let submitted: GridAnswers = [
            answer("io", "present", " Parlo "),
            answer("tu", "present", "PARLI"),
            answer("io", "past", "ho  parlato"),
            answer("tu", "past", "hai parlato"),
        ]
        .into_iter()
        .collect();

        let report = session.grade(&submitted);
        // inner whitespace is not collapsed, so "ho  parlato" stays wrong
        assert_eq!(report.correct, 3);
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].form, "past");
    }

    #[test]
    fn test_grade_missing_cells_count_as_wrong() {
        let mut session = started_session();
        let submitted: GridAnswers = [answer("io", "present", "parlo")].into_iter().collect();

        let report = session.grade(&submitted);
        assert_eq!(report.correct, 1);
        assert_eq!(report.mismatches.len(), 3);
    }

    #[test]
    fn test_regrade_is_stable() {
        let mut session = started_session();
        let submitted: GridAnswers = [
            answer("io", "present", "parlo"),
            answer("tu", "present", "parli"),
        ]
        .into_iter()
        .collect();

        let first = session.grade(&submitted).clone();
        assert!(session.is_graded());

        let second = session.grade(&submitted).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_mismatch_order_follows_cells() {
        let mut session = started_session();
        let report = session.grade(&GridAnswers::new());

        let order: Vec<(String, String)> = report
            .mismatches
            .iter()
            .map(|m| (m.person.clone(), m.form.clone()))
            .collect();
        let cells: Vec<(String, String)> = session
            .cells()
            .into_iter()
            .map(|c| (c.person, c.form))
            .collect();
        assert_eq!(order, cells);
    }
}
