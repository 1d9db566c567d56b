use validator::Validate;

use crate::error::ApiError;

/// Validate a request body, turning field errors into a 400
///
/// # Examples
/// ```
/// use cm_api::{progress::model::CompleteTaskRequest, validation::validate_request};
///
/// assert!(validate_request(&CompleteTaskRequest { score: Some(0.5) }).is_ok());
/// assert!(validate_request(&CompleteTaskRequest { score: Some(2.0) }).is_err());
/// ```
pub fn validate_request<T: Validate>(payload: &T) -> Result<(), ApiError> {
    payload.validate().map_err(ApiError::from)
}

/// Reject identifiers that cannot name a stored row
pub fn validate_id(name: &str, id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::Validation(format!(
            "Invalid {name}: '{id}'. Must be a positive integer"
        )));
    }

    Ok(())
}
