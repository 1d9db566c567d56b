//! Progress aggregator: rebuilds and persists the (user, course) summary.

use cm_db::{
    models::{LessonCompletionRow, ProgressRow, TaskCompletionRow},
    repositories::{completion, progress},
};
use cm_progress::{LessonCompletion, ProgressSummary, Score, TaskCompletion};
use sqlx::PgConnection;

use super::store::corrupt_score;
use crate::{error::ApiError, metrics};

/// Why a summary is being rebuilt, used as a metrics label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeTrigger {
    LessonCompleted,
    TaskCompleted,
    AnswerSubmitted,
    Enrollment,
    Read,
}

impl RecomputeTrigger {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LessonCompleted => "lesson_completed",
            Self::TaskCompleted => "task_completed",
            Self::AnswerSubmitted => "answer_submitted",
            Self::Enrollment => "enrollment",
            Self::Read => "read",
        }
    }
}

/// Recompute the summary from the completion tables and replace the stored row.
///
/// The summary row is locked before the completions are read, so of two
/// concurrent recomputes for the same pair the second one sees the first
/// one's completions.
pub async fn recompute(
    conn: &mut PgConnection,
    user_id: i64,
    course_id: i64,
    trigger: RecomputeTrigger,
) -> Result<ProgressSummary, ApiError> {
    progress::lock_for_recompute(&mut *conn, user_id, course_id).await?;

    let lessons = completion::list_lesson_completions(&mut *conn, user_id, course_id).await?;
    let tasks = completion::list_task_completions(&mut *conn, user_id, course_id).await?;

    let lessons: Vec<LessonCompletion> = lessons.iter().map(lesson_completion).collect();
    let tasks = tasks
        .iter()
        .map(task_completion)
        .collect::<Result<Vec<_>, _>>()?;

    let summary = cm_progress::recompute(user_id, course_id, &lessons, &tasks);

    progress::replace(
        &mut *conn,
        user_id,
        course_id,
        summary.lessons_completed,
        summary.tasks_completed,
        summary.score_avg,
    )
    .await?;

    metrics::record_progress_recompute(trigger.as_str());
    tracing::debug!(
        user_id,
        course_id,
        trigger = trigger.as_str(),
        lessons_completed = summary.lessons_completed,
        tasks_completed = summary.tasks_completed,
        score_avg = summary.score_avg,
        "Progress recomputed"
    );

    Ok(summary)
}

/// Stored summary if there is one, otherwise build it from the completion tables.
pub async fn load_or_recompute(
    conn: &mut PgConnection,
    user_id: i64,
    course_id: i64,
    trigger: RecomputeTrigger,
) -> Result<ProgressSummary, ApiError> {
    match progress::find(&mut *conn, user_id, course_id).await? {
        Some(row) => Ok(summary_from_row(row)),
        None => recompute(conn, user_id, course_id, trigger).await,
    }
}

pub fn summary_from_row(row: ProgressRow) -> ProgressSummary {
    ProgressSummary {
        user_id: row.user_id,
        course_id: row.course_id,
        lessons_completed: row.lessons_completed,
        tasks_completed: row.tasks_completed,
        score_avg: row.score_avg,
    }
}

fn lesson_completion(row: &LessonCompletionRow) -> LessonCompletion {
    LessonCompletion {
        user_id: row.user_id,
        lesson_id: row.lesson_id,
        course_id: row.course_id,
    }
}

fn task_completion(row: &TaskCompletionRow) -> Result<TaskCompletion, ApiError> {
    Ok(TaskCompletion {
        user_id: row.user_id,
        task_id: row.task_id,
        course_id: row.course_id,
        score: row.score.map(Score::new).transpose().map_err(corrupt_score)?,
    })
}
