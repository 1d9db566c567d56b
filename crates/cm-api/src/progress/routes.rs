use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use cm_db::{
    models::{CourseWithProgress, StudentProgressRow},
    repositories::course,
};
use cm_progress::{ProgressSummary, Score};

use super::{model::CompleteTaskRequest, service};
use crate::{
    ApiState,
    auth::{AuthUser, StudentUser, TeacherUser},
    error::ApiError,
    validation::{validate_id, validate_request},
};

/// Create the progress routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/progress/lessons/{lesson_id}/complete",
            post(complete_lesson),
        )
        .route("/progress/tasks/{task_id}/complete", post(complete_task))
        .route("/progress/courses/{course_id}/enroll", post(enroll))
        .route("/progress/me/{course_id}", get(get_my_progress))
        .route("/progress/my-courses", get(get_my_courses))
        .route(
            "/progress/users/{user_id}/courses/{course_id}",
            get(get_student_course_progress),
        )
        .route("/progress/users/{user_id}", get(get_student_progress))
        .route("/teacher/students-progress", get(get_students_progress))
}

/// Mark a lesson as completed
async fn complete_lesson(
    StudentUser(user): StudentUser,
    State(state): State<ApiState>,
    Path(lesson_id): Path<i64>,
) -> Result<Json<ProgressSummary>, ApiError> {
    validate_id("lesson_id", lesson_id)?;

    let summary =
        service::complete_lesson(&state.pool, state.conflict_retries, user.user_id, lesson_id)
            .await?;
    Ok(Json(summary))
}

/// Mark a task without auto-check as completed
async fn complete_task(
    StudentUser(user): StudentUser,
    State(state): State<ApiState>,
    Path(task_id): Path<i64>,
    Json(payload): Json<CompleteTaskRequest>,
) -> Result<Json<ProgressSummary>, ApiError> {
    validate_id("task_id", task_id)?;

    validate_request(&payload)?;
    let score = payload
        .score
        .map(Score::new)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let summary = service::complete_task(
        &state.pool,
        state.conflict_retries,
        user.user_id,
        task_id,
        score,
    )
    .await?;
    Ok(Json(summary))
}

/// Start tracking a course
async fn enroll(
    StudentUser(user): StudentUser,
    State(state): State<ApiState>,
    Path(course_id): Path<i64>,
) -> Result<Json<ProgressSummary>, ApiError> {
    validate_id("course_id", course_id)?;

    let summary = service::enroll(&state.pool, user.user_id, course_id).await?;
    Ok(Json(summary))
}

/// Progress of the caller in a course
async fn get_my_progress(
    user: AuthUser,
    State(state): State<ApiState>,
    Path(course_id): Path<i64>,
) -> Result<Json<ProgressSummary>, ApiError> {
    validate_id("course_id", course_id)?;

    let summary = service::get_progress(&state.pool, user.user_id, course_id).await?;
    Ok(Json(summary))
}

/// Courses the caller has progress in
async fn get_my_courses(
    StudentUser(user): StudentUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<CourseWithProgress>>, ApiError> {
    let courses = service::list_my_courses(&state.pool, user.user_id).await?;
    Ok(Json(courses))
}

/// Progress of a student in one of the caller's courses
async fn get_student_course_progress(
    TeacherUser(teacher): TeacherUser,
    State(state): State<ApiState>,
    Path((user_id, course_id)): Path<(i64, i64)>,
) -> Result<Json<ProgressSummary>, ApiError> {
    validate_id("user_id", user_id)?;
    validate_id("course_id", course_id)?;

    // Authorization check: only the owner of the course sees its students
    let owner_id = course::find_owner_id(&state.pool, course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;
    if owner_id != teacher.user_id {
        return Err(ApiError::Forbidden(
            "You are not the owner of this course".to_string(),
        ));
    }

    let summary =
        service::get_course_progress_for_teacher(&state.pool, course_id, user_id).await?;
    Ok(Json(summary))
}

/// Progress of a student across the caller's courses
async fn get_student_progress(
    TeacherUser(teacher): TeacherUser,
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ProgressSummary>>, ApiError> {
    validate_id("user_id", user_id)?;

    let summaries =
        service::list_student_progress_for_teacher(&state.pool, teacher.user_id, user_id).await?;
    Ok(Json(summaries))
}

/// Dashboard of every student in the caller's courses
async fn get_students_progress(
    TeacherUser(teacher): TeacherUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<StudentProgressRow>>, ApiError> {
    let students =
        service::list_students_progress_for_teacher(&state.pool, teacher.user_id).await?;
    Ok(Json(students))
}
