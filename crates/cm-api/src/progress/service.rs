//! Progress operations exposed to the route layer.
//!
//! Each public function is one unit of work: it opens a transaction, writes
//! completions through the store, rebuilds the affected summary and commits.
//! A unit of work that loses a uniqueness race is retried from scratch up to
//! `retries` more times.

use std::future::Future;

use cm_db::{
    models::{CourseWithProgress, StudentProgressRow},
    repositories::{course, lesson, progress, task, user},
};
use cm_progress::{AutoCheckTask, GradingResult, ProgressSummary, Score, TaskOption, grade};
use sqlx::PgPool;

use super::{
    aggregator::{self, RecomputeTrigger},
    store,
};
use crate::{error::ApiError, metrics};

/// Run `unit_of_work`, retrying it while it fails with a conflict and attempts remain.
pub async fn with_conflict_retry<T, F, Fut>(
    retries: u32,
    operation: &'static str,
    mut unit_of_work: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match unit_of_work().await {
            Err(err) if err.is_conflict() && attempt < retries => {
                attempt += 1;
                metrics::record_completion_conflict(operation);
                tracing::warn!(operation, attempt, error = %err, "Retrying after conflict");
            }
            result => return result,
        }
    }
}

/// Mark a lesson completed and return the refreshed course summary.
pub async fn complete_lesson(
    pool: &PgPool,
    retries: u32,
    user_id: i64,
    lesson_id: i64,
) -> Result<ProgressSummary, ApiError> {
    with_conflict_retry(retries, "complete_lesson", || async move {
        let mut tx = pool.begin().await?;

        let lesson = lesson::find_ref(&mut *tx, lesson_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Lesson not found".to_string()))?;

        let outcome = store::upsert_lesson_completion(&mut tx, user_id, lesson_id).await?;
        let summary = aggregator::recompute(
            &mut tx,
            user_id,
            lesson.course_id,
            RecomputeTrigger::LessonCompleted,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(user_id, lesson_id, ?outcome, "Lesson completion recorded");
        Ok(summary)
    })
    .await
}

/// Mark a task without auto-check completed, optionally with a score.
///
/// Auto-check tasks are graded from a submitted option only, so a
/// self-reported score is refused for them.
pub async fn complete_task(
    pool: &PgPool,
    retries: u32,
    user_id: i64,
    task_id: i64,
    score: Option<Score>,
) -> Result<ProgressSummary, ApiError> {
    with_conflict_retry(retries, "complete_task", || async move {
        let mut tx = pool.begin().await?;

        let task = task::find_ref(&mut *tx, task_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        if task.has_autocheck {
            return Err(ApiError::UnsupportedOperation(format!(
                "Task {task_id} is checked automatically, submit an answer instead"
            )));
        }

        let outcome = store::upsert_task_completion(&mut tx, user_id, task_id, score, None).await?;

        let summary = if outcome.changes_progress() {
            aggregator::recompute(&mut tx, user_id, task.course_id, RecomputeTrigger::TaskCompleted)
                .await?
        } else {
            aggregator::load_or_recompute(
                &mut tx,
                user_id,
                task.course_id,
                RecomputeTrigger::TaskCompleted,
            )
            .await?
        };

        tx.commit().await?;

        tracing::info!(user_id, task_id, ?outcome, "Task completion recorded");
        Ok(summary)
    })
    .await
}

/// Grade a submitted option, record the attempt and refresh progress when it changed.
///
/// A wrong answer is a normal result, not an error. Nothing is written when
/// grading itself fails (unknown task, no auto-check, foreign option).
pub async fn submit_task_answer(
    pool: &PgPool,
    retries: u32,
    user_id: i64,
    task_id: i64,
    option_id: i64,
) -> Result<GradingResult, ApiError> {
    let result = with_conflict_retry(retries, "submit_task_answer", || async move {
        let mut tx = pool.begin().await?;

        let task_ref = task::find_ref(&mut *tx, task_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

        let options = if task_ref.has_autocheck {
            task::list_options(&mut *tx, task_id).await?
        } else {
            Vec::new()
        };

        let answer_key = AutoCheckTask {
            id: task_ref.id,
            has_autocheck: task_ref.has_autocheck,
            options: options
                .into_iter()
                .map(|o| TaskOption {
                    id: o.id,
                    is_correct: o.is_correct,
                })
                .collect(),
        };

        let result = grade(&answer_key, option_id)?;

        let outcome = store::upsert_task_completion(
            &mut tx,
            user_id,
            task_id,
            Some(result.score),
            Some(option_id),
        )
        .await?;

        if outcome.changes_progress() {
            aggregator::recompute(
                &mut tx,
                user_id,
                task_ref.course_id,
                RecomputeTrigger::AnswerSubmitted,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            user_id,
            task_id,
            option_id,
            is_correct = result.is_correct,
            ?outcome,
            "Answer graded"
        );
        Ok(result)
    })
    .await;

    if let Ok(graded) = &result {
        metrics::record_grading(graded.is_correct);
    }
    result
}

/// Progress of a user in a course, built on first read.
pub async fn get_progress(
    pool: &PgPool,
    user_id: i64,
    course_id: i64,
) -> Result<ProgressSummary, ApiError> {
    if !course::exists(pool, course_id).await? {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    if let Some(row) = progress::find(pool, user_id, course_id).await? {
        return Ok(aggregator::summary_from_row(row));
    }

    let mut tx = pool.begin().await?;
    let summary =
        aggregator::load_or_recompute(&mut tx, user_id, course_id, RecomputeTrigger::Read).await?;
    tx.commit().await?;

    Ok(summary)
}

/// Progress of a student in a course, as seen by the course's teacher.
///
/// Course ownership is checked by the caller.
pub async fn get_course_progress_for_teacher(
    pool: &PgPool,
    course_id: i64,
    student_id: i64,
) -> Result<ProgressSummary, ApiError> {
    if !user::exists(pool, student_id).await? {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }
    get_progress(pool, student_id, course_id).await
}

/// Start tracking a course for a user; idempotent.
pub async fn enroll(
    pool: &PgPool,
    user_id: i64,
    course_id: i64,
) -> Result<ProgressSummary, ApiError> {
    let mut tx = pool.begin().await?;

    if !course::exists(&mut *tx, course_id).await? {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    let summary =
        aggregator::recompute(&mut tx, user_id, course_id, RecomputeTrigger::Enrollment).await?;
    tx.commit().await?;

    tracing::info!(user_id, course_id, "User enrolled in course");
    Ok(summary)
}

/// Every summary of a student restricted to the courses a teacher owns.
pub async fn list_student_progress_for_teacher(
    pool: &PgPool,
    teacher_id: i64,
    student_id: i64,
) -> Result<Vec<ProgressSummary>, ApiError> {
    let rows = progress::list_for_owner(pool, student_id, teacher_id).await?;
    Ok(rows.into_iter().map(aggregator::summary_from_row).collect())
}

/// Every student with progress in a teacher's courses, summed over those courses.
pub async fn list_students_progress_for_teacher(
    pool: &PgPool,
    teacher_id: i64,
) -> Result<Vec<StudentProgressRow>, ApiError> {
    Ok(progress::list_students_for_owner(pool, teacher_id).await?)
}

/// Courses a user has progress in, with their summaries.
pub async fn list_my_courses(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<CourseWithProgress>, ApiError> {
    Ok(progress::list_courses_with_progress(pool, user_id).await?)
}
