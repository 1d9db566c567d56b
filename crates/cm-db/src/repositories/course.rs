use sqlx::{Executor, Postgres};

/// Owner of a course, `None` if the course does not exist.
pub async fn find_owner_id<'e, E>(executor: E, course_id: i64) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT owner_id
            FROM courses
            WHERE id = $1
        "#,
    )
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

pub async fn exists<'e, E>(executor: E, course_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)
        "#,
    )
    .bind(course_id)
    .fetch_one(executor)
    .await
}
