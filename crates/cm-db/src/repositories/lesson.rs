use sqlx::{Executor, Postgres};

use crate::models::LessonRef;

pub async fn find_ref<'e, E>(executor: E, lesson_id: i64) -> Result<Option<LessonRef>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, course_id
            FROM lessons
            WHERE id = $1
        "#,
    )
    .bind(lesson_id)
    .fetch_optional(executor)
    .await
}
