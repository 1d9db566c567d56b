use sqlx::{Executor, Postgres};

use crate::models::{TaskOption, TaskRef};

/// Look up a task together with the course its lesson belongs to.
pub async fn find_ref<'e, E>(executor: E, task_id: i64) -> Result<Option<TaskRef>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT t.id, t.lesson_id, l.course_id, t.has_autocheck
            FROM tasks t
            JOIN lessons l ON l.id = t.lesson_id
            WHERE t.id = $1
        "#,
    )
    .bind(task_id)
    .fetch_optional(executor)
    .await
}

pub async fn list_options<'e, E>(executor: E, task_id: i64) -> Result<Vec<TaskOption>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, task_id, text, is_correct
            FROM task_options
            WHERE task_id = $1
            ORDER BY id
        "#,
    )
    .bind(task_id)
    .fetch_all(executor)
    .await
}
