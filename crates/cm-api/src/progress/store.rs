//! Completion store: idempotent upserts of lesson and task completions.
//!
//! Every function takes the connection of the caller's transaction, so the
//! upsert and the progress recompute that follows it commit together.

use cm_db::repositories::completion;
use cm_progress::{Score, ScoreError, ratchet};
use sqlx::PgConnection;

use crate::error::ApiError;

/// What an upsert did to the stored completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// First completion of the pair.
    Created,
    /// The record existed and its score went up.
    ScoreRaised,
    /// Nothing the progress summary depends on changed.
    Unchanged,
}

impl CompletionOutcome {
    /// Whether the progress summary of the course must be rebuilt.
    pub const fn changes_progress(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Record a lesson completion. Repeats are no-ops and keep the first timestamp.
pub async fn upsert_lesson_completion(
    conn: &mut PgConnection,
    user_id: i64,
    lesson_id: i64,
) -> Result<CompletionOutcome, ApiError> {
    let created = completion::insert_lesson_completion(&mut *conn, user_id, lesson_id).await?;

    Ok(if created {
        CompletionOutcome::Created
    } else {
        CompletionOutcome::Unchanged
    })
}

/// Record a task completion, ratcheting the stored score.
///
/// The score only moves up (see [`cm_progress::ratchet`]). The selected
/// option, when given, always replaces the stored one so it reflects the
/// latest submission. If a concurrent request inserts the same pair first,
/// this one falls back to updating the row the other request created.
pub async fn upsert_task_completion(
    conn: &mut PgConnection,
    user_id: i64,
    task_id: i64,
    score: Option<Score>,
    selected_option_id: Option<i64>,
) -> Result<CompletionOutcome, ApiError> {
    let stored = match completion::lock_task_completion(&mut *conn, user_id, task_id).await? {
        Some(stored) => stored,
        None => {
            let inserted = completion::insert_task_completion(
                &mut *conn,
                user_id,
                task_id,
                score.map(f64::from),
                selected_option_id,
            )
            .await?;

            if inserted {
                return Ok(CompletionOutcome::Created);
            }

            tracing::debug!(user_id, task_id, "Lost first-insert race, updating instead");
            completion::lock_task_completion(&mut *conn, user_id, task_id)
                .await?
                .ok_or_else(|| conflict(user_id, task_id))?
        }
    };

    let stored_score = stored.score.map(Score::new).transpose().map_err(corrupt_score)?;
    let change = ratchet(stored_score, score);

    let option_changed =
        selected_option_id.is_some() && selected_option_id != stored.selected_option_id;

    if change.is_raised() || option_changed {
        let updated = completion::update_task_completion(
            &mut *conn,
            user_id,
            task_id,
            change.new_score().map(f64::from),
            selected_option_id,
        )
        .await?;

        if !updated {
            return Err(conflict(user_id, task_id));
        }
    }

    Ok(if change.is_raised() {
        CompletionOutcome::ScoreRaised
    } else {
        CompletionOutcome::Unchanged
    })
}

fn conflict(user_id: i64, task_id: i64) -> ApiError {
    ApiError::Conflict(format!(
        "Completion of task {task_id} by user {user_id} changed concurrently, please retry"
    ))
}

/// A stored score outside `[0, 1]` means the row bypassed the schema check.
pub(crate) fn corrupt_score(err: ScoreError) -> ApiError {
    ApiError::Database(sqlx::Error::Decode(Box::new(err)))
}
