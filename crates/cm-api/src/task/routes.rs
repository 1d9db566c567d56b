use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::{
    ApiState,
    auth::StudentUser,
    error::ApiError,
    progress::{
        model::{SubmitAnswerRequest, SubmitAnswerResponse},
        service,
    },
    validation::validate_id,
};

/// Create the task routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/tasks/{task_id}/submit-answer", post(submit_answer))
}

/// Grade the option a student picked for an auto-check task
async fn submit_answer(
    StudentUser(user): StudentUser,
    State(state): State<ApiState>,
    Path(task_id): Path<i64>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    validate_id("task_id", task_id)?;

    let result = service::submit_task_answer(
        &state.pool,
        state.conflict_retries,
        user.user_id,
        task_id,
        payload.option_id,
    )
    .await?;

    Ok(Json(result.into()))
}
