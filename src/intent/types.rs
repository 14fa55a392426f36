use serde::{Deserialize, Serialize};
use std::fmt;

/// Paraphrases of one utterance, case-insensitively distinct from each other
/// and from the utterance. Only [`crate::intent::paraphrase::normalize`] builds one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParaphraseSet {
    pub(crate) entries: Vec<String>,
}

impl ParaphraseSet {
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

/// Numbered listing used inside the generation prompt.
impl fmt::Display for ParaphraseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", i, entry)?;
        }
        Ok(())
    }
}

/// Accepted label guesses for one utterance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub candidates: Vec<String>,
    /// Generator calls spent building the pool.
    pub attempts: usize,
    /// Slots that never passed validation and kept their last candidate.
    pub failed_open: usize,
}

impl CandidatePool {
    /// Adds a candidate unless an identical one is already pooled.
    pub fn insert(&mut self, candidate: String) -> bool {
        if self.candidates.contains(&candidate) {
            return false;
        }
        self.candidates.push(candidate);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.candidates.iter().any(|c| c == label)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisambiguationResult {
    pub label: String,
    /// Score of the selected (rank 0) label.
    pub top_score: f32,
    /// Score of the rank 1 label, when the ranking had one.
    pub runner_up_score: Option<f32>,
}

impl DisambiguationResult {
    /// Distance to the runner-up; the whole top score when there is no competitor.
    pub fn margin(&self) -> f32 {
        self.top_score - self.runner_up_score.unwrap_or(0.0)
    }
}
