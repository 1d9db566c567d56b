//! Task scores and the monotonic score ratchet.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Score of a single task completion, always within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoreError {
    #[error("score must be between 0.0 and 1.0, got {0}")]
    OutOfRange(f64),
}

impl Score {
    /// Score awarded for a correct auto-checked answer.
    pub const CORRECT: Self = Self(1.0);
    /// Score awarded for an incorrect auto-checked answer.
    pub const INCORRECT: Self = Self(0.0);

    /// Build a score, rejecting NaN and anything outside `[0.0, 1.0]`.
    pub fn new(value: f64) -> Result<Self, ScoreError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ScoreError::OutOfRange(value))
        }
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Score {
    type Error = ScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of applying a submission to a stored task completion score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreChange {
    /// The stored score stays as it is.
    Unchanged,
    /// The stored score moves up, from ungraded or from a lower value.
    Raised { from: Option<Score>, to: Score },
}

impl ScoreChange {
    /// The score to write back, if any.
    pub const fn new_score(&self) -> Option<Score> {
        match self {
            Self::Unchanged => None,
            Self::Raised { to, .. } => Some(*to),
        }
    }

    pub const fn is_raised(&self) -> bool {
        matches!(self, Self::Raised { .. })
    }
}

/// Decide how a submitted score affects the stored one.
///
/// Scores only ever move up: ungraded becomes graded, a lower score is
/// replaced by a higher one. An incorrect resubmission never erases an
/// earlier correct answer, and a submission without a score leaves the
/// stored value alone.
///
/// # Examples
///
/// ```
/// use cm_progress::{Score, ScoreChange, ratchet};
///
/// let change = ratchet(Some(Score::CORRECT), Some(Score::INCORRECT));
/// assert_eq!(change, ScoreChange::Unchanged);
///
/// let change = ratchet(Some(Score::INCORRECT), Some(Score::CORRECT));
/// assert_eq!(change.new_score(), Some(Score::CORRECT));
/// ```
pub fn ratchet(stored: Option<Score>, submitted: Option<Score>) -> ScoreChange {
    match (stored, submitted) {
        (_, None) => ScoreChange::Unchanged,
        (None, Some(to)) => ScoreChange::Raised { from: None, to },
        (Some(from), Some(to)) if to > from => ScoreChange::Raised {
            from: Some(from),
            to,
        },
        (Some(_), Some(_)) => ScoreChange::Unchanged,
    }
}
