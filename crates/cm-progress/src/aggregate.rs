//! Recomputation of the per-(user, course) progress summary.
//!
//! The summary is a cache. It is always rebuilt from the full set of
//! completion records rather than patched with increments. Callers that
//! persist it must serialize rebuilds of the same (user, course) and read the
//! records only once they hold that lock, otherwise a rebuild from an older
//! view can be written last.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::score::Score;

/// A completed lesson, tagged with the course the lesson belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCompletion {
    pub user_id: i64,
    pub lesson_id: i64,
    pub course_id: i64,
}

/// A completed task, tagged with the course of the task's lesson.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub user_id: i64,
    pub task_id: i64,
    pub course_id: i64,
    /// `None` until the task has been graded
    pub score: Option<Score>,
}

/// Aggregated progress of one user in one course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub user_id: i64,
    pub course_id: i64,
    pub lessons_completed: i32,
    pub tasks_completed: i32,
    /// Mean of graded task scores, `0.0` when nothing is graded yet
    pub score_avg: f64,
}

impl ProgressSummary {
    /// Summary of a user who has not completed anything in the course.
    pub const fn empty(user_id: i64, course_id: i64) -> Self {
        Self {
            user_id,
            course_id,
            lessons_completed: 0,
            tasks_completed: 0,
            score_avg: 0.0,
        }
    }
}

/// Rebuild the summary for `(user_id, course_id)` from completion records.
///
/// Records of other users or other courses are ignored, so callers may pass
/// a wider set than strictly needed. Each lesson and task is counted once.
/// Scores are summed in task id order, which makes the result independent of
/// the order the records arrive in, down to the last bit of `score_avg`.
pub fn recompute(
    user_id: i64,
    course_id: i64,
    lessons: &[LessonCompletion],
    tasks: &[TaskCompletion],
) -> ProgressSummary {
    let completed_lessons: BTreeSet<i64> = lessons
        .iter()
        .filter(|l| l.user_id == user_id && l.course_id == course_id)
        .map(|l| l.lesson_id)
        .collect();

    let mut completed_tasks: BTreeMap<i64, Option<Score>> = BTreeMap::new();
    for task in tasks
        .iter()
        .filter(|t| t.user_id == user_id && t.course_id == course_id)
    {
        let entry = completed_tasks.entry(task.task_id).or_insert(None);
        // The store keeps one record per task; if duplicates slip through keep the best score
        *entry = match (*entry, task.score) {
            (Some(a), Some(b)) => Some(if b > a { b } else { a }),
            (a, b) => a.or(b),
        };
    }

    let graded: Vec<f64> = completed_tasks
        .values()
        .filter_map(|score| score.map(Score::value))
        .collect();

    let score_avg = if graded.is_empty() {
        0.0
    } else {
        graded.iter().sum::<f64>() / graded.len() as f64
    };

    ProgressSummary {
        user_id,
        course_id,
        lessons_completed: count(completed_lessons.len()),
        tasks_completed: count(completed_tasks.len()),
        score_avg,
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
