use sqlx::{Executor, Postgres};

use crate::models::{CourseWithProgress, ProgressRow, StudentProgressRow};

pub async fn find<'e, E>(
    executor: E,
    user_id: i64,
    course_id: i64,
) -> Result<Option<ProgressRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT user_id, course_id, lessons_completed, tasks_completed, score_avg, updated_at
            FROM progress
            WHERE user_id = $1 AND course_id = $2
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(executor)
    .await
}

/// Lock the summary row of (user, course) until the end of the transaction,
/// creating an empty row first if there is none.
///
/// Concurrent recomputes of the same pair queue up here, so each one reads
/// the completions the previous one committed.
pub async fn lock_for_recompute<'e, E>(
    executor: E,
    user_id: i64,
    course_id: i64,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO progress (user_id, course_id, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, course_id)
            DO UPDATE SET updated_at = progress.updated_at
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Create or replace the summary row for (user, course) with freshly computed values.
pub async fn replace<'e, E>(
    executor: E,
    user_id: i64,
    course_id: i64,
    lessons_completed: i32,
    tasks_completed: i32,
    score_avg: f64,
) -> Result<ProgressRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO progress (user_id, course_id, lessons_completed, tasks_completed, score_avg, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (user_id, course_id)
            DO UPDATE SET
                lessons_completed = EXCLUDED.lessons_completed,
                tasks_completed = EXCLUDED.tasks_completed,
                score_avg = EXCLUDED.score_avg,
                updated_at = NOW()
            RETURNING user_id, course_id, lessons_completed, tasks_completed, score_avg, updated_at
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(lessons_completed)
    .bind(tasks_completed)
    .bind(score_avg)
    .fetch_one(executor)
    .await
}

/// Summaries of one student restricted to the courses owned by `owner_id`.
pub async fn list_for_owner<'e, E>(
    executor: E,
    user_id: i64,
    owner_id: i64,
) -> Result<Vec<ProgressRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT p.user_id, p.course_id, p.lessons_completed, p.tasks_completed, p.score_avg, p.updated_at
            FROM progress p
            JOIN courses c ON c.id = p.course_id
            WHERE p.user_id = $1 AND c.owner_id = $2
            ORDER BY p.course_id
        "#,
    )
    .bind(user_id)
    .bind(owner_id)
    .fetch_all(executor)
    .await
}

/// Every course a user has a summary for, with course details.
pub async fn list_courses_with_progress<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Vec<CourseWithProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                c.id as course_id,
                c.title as course_title,
                c.description as course_description,
                p.lessons_completed,
                p.tasks_completed,
                p.score_avg
            FROM progress p
            JOIN courses c ON c.id = p.course_id
            WHERE p.user_id = $1
            ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// One row per student with a summary in any course owned by `owner_id`,
/// aggregated over those courses.
pub async fn list_students_for_owner<'e, E>(
    executor: E,
    owner_id: i64,
) -> Result<Vec<StudentProgressRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                u.id as user_id,
                u.email,
                u.full_name,
                COUNT(DISTINCT c.id) as courses_count,
                COALESCE(SUM(p.lessons_completed), 0)::BIGINT as lessons_completed,
                COALESCE(SUM(p.tasks_completed), 0)::BIGINT as tasks_completed,
                AVG(p.score_avg) as score_avg
            FROM users u
            JOIN progress p ON p.user_id = u.id
            JOIN courses c ON c.id = p.course_id
            WHERE c.owner_id = $1
            GROUP BY u.id, u.email, u.full_name
            ORDER BY u.id
        "#,
    )
    .bind(owner_id)
    .fetch_all(executor)
    .await
}
