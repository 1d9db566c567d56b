//! Progress and grading library for CodeMaster
//!
//! This crate holds the pure decision logic behind student progress:
//! grading a submitted option against a task's answer key, ratcheting the
//! stored score of a task completion, and recomputing the per-course
//! progress summary from the full set of completion records.
//!
//! Nothing in here touches the database. The API layer loads records,
//! calls into this crate, and persists the outcome.

pub mod aggregate;
pub mod grading;
pub mod score;

pub use aggregate::{LessonCompletion, ProgressSummary, TaskCompletion, recompute};
pub use grading::{AutoCheckTask, GradingError, GradingResult, TaskOption, grade};
pub use score::{Score, ScoreChange, ScoreError, ratchet};
