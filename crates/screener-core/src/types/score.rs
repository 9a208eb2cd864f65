//! Composite score results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One scoring rule that fired, with its point delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub label: String,
    pub points: i32,
}

impl Reason {
    pub fn new(label: impl Into<String>, points: i32) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+} {}", self.points, self.label)
    }
}

/// Integer score with the ordered reasons that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: i32,
    pub reasons: Vec<Reason>,
}

impl ScoreResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rule hit and add its points to the score.
    pub fn add(&mut self, label: impl Into<String>, points: i32) {
        self.score += points;
        self.reasons.push(Reason::new(label, points));
    }

    /// Reasons rendered as strings, e.g. "+3 Golden Cross".
    pub fn reason_strings(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.to_string()).collect()
    }
}
