use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lesson reference - just enough to scope a completion to its course
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct LessonRef {
    pub id: i64,
    pub course_id: i64,
}

/// Task reference with its owning lesson and course (resolved through the lesson)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskRef {
    pub id: i64,
    pub lesson_id: i64,
    pub course_id: i64,
    pub has_autocheck: bool,
}

/// Answer option of an auto-check task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskOption {
    pub id: i64,
    pub task_id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// Lesson completion joined with the lesson's course
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LessonCompletionRow {
    pub user_id: i64,
    pub lesson_id: i64,
    pub course_id: i64,
    pub completed_at: DateTime<Utc>,
}

/// Task completion joined with the course of the task's lesson
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskCompletionRow {
    pub user_id: i64,
    pub task_id: i64,
    pub course_id: i64,
    /// `None` until graded (double precision, checked to `[0, 1]` by the schema)
    pub score: Option<f64>,
    pub selected_option_id: Option<i64>,
    pub completed_at: DateTime<Utc>,
}

/// Mutable part of a stored task completion, read under a row lock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredTaskCompletion {
    pub score: Option<f64>,
    pub selected_option_id: Option<i64>,
}

/// Persisted progress summary for one (user, course) pair
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressRow {
    pub user_id: i64,
    pub course_id: i64,
    pub lessons_completed: i32,
    pub tasks_completed: i32,
    pub score_avg: f64,
    pub updated_at: DateTime<Utc>,
}

/// Progress summary together with the course it belongs to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CourseWithProgress {
    pub course_id: i64,
    pub course_title: String,
    pub course_description: Option<String>,
    pub lessons_completed: i32,
    pub tasks_completed: i32,
    pub score_avg: f64,
}

/// A student's progress summed over every course of one teacher
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentProgressRow {
    pub user_id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub courses_count: i64,
    pub lessons_completed: i64,
    pub tasks_completed: i64,
    /// Mean of the per-course averages
    pub score_avg: Option<f64>,
}
