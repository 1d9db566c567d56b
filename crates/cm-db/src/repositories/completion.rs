use sqlx::{Executor, Postgres};

use crate::models::{LessonCompletionRow, StoredTaskCompletion, TaskCompletionRow};

/// Record that a user completed a lesson.
///
/// Returns `false` when the completion already existed; the original
/// `completed_at` is kept in that case.
pub async fn insert_lesson_completion<'e, E>(
    executor: E,
    user_id: i64,
    lesson_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO lesson_completions (user_id, lesson_id, completed_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, lesson_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(lesson_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Read a task completion and lock its row until the end of the transaction.
pub async fn lock_task_completion<'e, E>(
    executor: E,
    user_id: i64,
    task_id: i64,
) -> Result<Option<StoredTaskCompletion>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT score, selected_option_id
            FROM task_completions
            WHERE user_id = $1 AND task_id = $2
            FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(task_id)
    .fetch_optional(executor)
    .await
}

/// Insert a first task completion.
///
/// Returns `false` when a concurrent request inserted the same (user, task)
/// pair first; the caller then takes the update path.
pub async fn insert_task_completion<'e, E>(
    executor: E,
    user_id: i64,
    task_id: i64,
    score: Option<f64>,
    selected_option_id: Option<i64>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO task_completions (user_id, task_id, completed_at, updated_at, score, selected_option_id)
            VALUES ($1, $2, NOW(), NOW(), $3, $4)
            ON CONFLICT (user_id, task_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(task_id)
    .bind(score)
    .bind(selected_option_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Update an existing task completion. `None` arguments leave the column untouched.
///
/// Returns `false` if the row vanished (e.g. cascaded away) in the meantime.
pub async fn update_task_completion<'e, E>(
    executor: E,
    user_id: i64,
    task_id: i64,
    score: Option<f64>,
    selected_option_id: Option<i64>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE task_completions
            SET score = COALESCE($3, score),
                selected_option_id = COALESCE($4, selected_option_id),
                updated_at = NOW()
            WHERE user_id = $1 AND task_id = $2
        "#,
    )
    .bind(user_id)
    .bind(task_id)
    .bind(score)
    .bind(selected_option_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// All lesson completions of a user within one course.
pub async fn list_lesson_completions<'e, E>(
    executor: E,
    user_id: i64,
    course_id: i64,
) -> Result<Vec<LessonCompletionRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT lc.user_id, lc.lesson_id, l.course_id, lc.completed_at
            FROM lesson_completions lc
            JOIN lessons l ON l.id = lc.lesson_id
            WHERE lc.user_id = $1 AND l.course_id = $2
            ORDER BY lc.lesson_id
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_all(executor)
    .await
}

/// All task completions of a user whose task's lesson belongs to the course.
pub async fn list_task_completions<'e, E>(
    executor: E,
    user_id: i64,
    course_id: i64,
) -> Result<Vec<TaskCompletionRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT tc.user_id, tc.task_id, l.course_id, tc.score, tc.selected_option_id, tc.completed_at
            FROM task_completions tc
            JOIN tasks t ON t.id = tc.task_id
            JOIN lessons l ON l.id = t.lesson_id
            WHERE tc.user_id = $1 AND l.course_id = $2
            ORDER BY tc.task_id
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_all(executor)
    .await
}
