//! Auto-check grading of single-choice task submissions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::score::Score;

/// One answer option of a task, as far as grading is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOption {
    pub id: i64,
    pub is_correct: bool,
}

/// Answer key of a task: its auto-check flag and its own options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoCheckTask {
    pub id: i64,
    pub has_autocheck: bool,
    pub options: Vec<TaskOption>,
}

/// Result of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradingResult {
    pub is_correct: bool,
    /// Exactly [`Score::CORRECT`] or [`Score::INCORRECT`]; no partial credit.
    pub score: Score,
}

impl GradingResult {
    /// Human readable feedback shown to the student.
    pub const fn message(&self) -> &'static str {
        if self.is_correct {
            "Correct answer!"
        } else {
            "Incorrect answer, try again"
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    #[error("Task {0} does not support automatic checking")]
    UnsupportedOperation(i64),
    #[error("Option {option_id} not found for task {task_id}")]
    InvalidOption { task_id: i64, option_id: i64 },
}

/// Grade a submitted option against the task's answer key.
///
/// The submitted option must be one of the task's own options; an unknown
/// option id and an option of another task are rejected the same way.
/// Tasks with zero or several options flagged correct are still graded, the
/// flag of the chosen option decides.
///
/// # Examples
///
/// ```
/// use cm_progress::{AutoCheckTask, Score, TaskOption, grade};
///
/// let task = AutoCheckTask {
///     id: 42,
///     has_autocheck: true,
///     options: vec![
///         TaskOption { id: 7, is_correct: true },
///         TaskOption { id: 8, is_correct: false },
///     ],
/// };
///
/// let result = grade(&task, 7).unwrap();
/// assert!(result.is_correct);
/// assert_eq!(result.score, Score::CORRECT);
/// ```
pub fn grade(task: &AutoCheckTask, submitted_option_id: i64) -> Result<GradingResult, GradingError> {
    if !task.has_autocheck {
        return Err(GradingError::UnsupportedOperation(task.id));
    }

    let option = task
        .options
        .iter()
        .find(|o| o.id == submitted_option_id)
        .ok_or(GradingError::InvalidOption {
            task_id: task.id,
            option_id: submitted_option_id,
        })?;

    let score = if option.is_correct {
        Score::CORRECT
    } else {
        Score::INCORRECT
    };

    Ok(GradingResult {
        is_correct: option.is_correct,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_42() -> AutoCheckTask {
        AutoCheckTask {
            id: 42,
            has_autocheck: true,
            options: vec![
                TaskOption {
                    id: 7,
                    is_correct: true,
                },
                TaskOption {
                    id: 8,
                    is_correct: false,
                },
                TaskOption {
                    id: 9,
                    is_correct: false,
                },
            ],
        }
    }

    #[test]
    fn test_grade_correct_option() {
        let result = grade(&task_42(), 7).unwrap();
        assert!(result.is_correct);
        assert_eq!(result.score, Score::CORRECT);
        assert_eq!(result.message(), "Correct answer!");
    }

    #[test]
    fn test_grade_incorrect_option() {
        let result = grade(&task_42(), 8).unwrap();
        assert!(!result.is_correct);
        assert_eq!(result.score, Score::INCORRECT);
        assert_eq!(result.message(), "Incorrect answer, try again");
    }

    #[test]
    fn test_grade_without_autocheck() {
        let mut task = task_42();
        task.has_autocheck = false;

        assert_eq!(grade(&task, 7), Err(GradingError::UnsupportedOperation(42)));
    }

    #[test]
    fn test_grade_unknown_option() {
        // 100 may be another task's option or no option at all; both look the same here
        assert_eq!(
            grade(&task_42(), 100),
            Err(GradingError::InvalidOption {
                task_id: 42,
                option_id: 100
            })
        );
    }

    #[test]
    fn test_grade_tolerates_misconfigured_keys() {
        let no_correct = AutoCheckTask {
            id: 1,
            has_autocheck: true,
            options: vec![TaskOption {
                id: 1,
                is_correct: false,
            }],
        };
        assert!(!grade(&no_correct, 1).unwrap().is_correct);

        let two_correct = AutoCheckTask {
            id: 2,
            has_autocheck: true,
            options: vec![
                TaskOption {
                    id: 1,
                    is_correct: true,
                },
                TaskOption {
                    id: 2,
                    is_correct: true,
                },
            ],
        };
        assert!(grade(&two_correct, 1).unwrap().is_correct);
        assert!(grade(&two_correct, 2).unwrap().is_correct);
    }

    #[test]
    fn test_grade_task_without_options() {
        let empty = AutoCheckTask {
            id: 3,
            has_autocheck: true,
            options: Vec::new(),
        };
        assert!(matches!(
            grade(&empty, 1),
            Err(GradingError::InvalidOption { .. })
        ));
    }
}
