use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of a manual task completion
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CompleteTaskRequest {
    /// Self-reported score, leaves the stored score untouched when absent
    #[validate(range(min = 0.0, max = 1.0, message = "Score must be between 0 and 1"))]
    pub score: Option<f64>,
}

/// Body of an auto-check answer submission
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub option_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitAnswerResponse {
    pub is_correct: bool,
    pub message: String,
}

impl From<cm_progress::GradingResult> for SubmitAnswerResponse {
    fn from(result: cm_progress::GradingResult) -> Self {
        Self {
            is_correct: result.is_correct,
            message: result.message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cm_progress::{GradingResult, Score};

    #[test]
    fn test_complete_task_request_score_range() {
        assert!(CompleteTaskRequest { score: Some(0.75) }.validate().is_ok());
        assert!(CompleteTaskRequest { score: None }.validate().is_ok());
        assert!(CompleteTaskRequest { score: Some(1.5) }.validate().is_err());
        assert!(CompleteTaskRequest { score: Some(-0.1) }.validate().is_err());
    }

    #[test]
    fn test_submit_answer_response_from_result() {
        let correct = SubmitAnswerResponse::from(GradingResult {
            is_correct: true,
            score: Score::CORRECT,
        });
        assert_eq!(
            correct,
            SubmitAnswerResponse {
                is_correct: true,
                message: "Correct answer!".to_string(),
            }
        );

        let wrong = SubmitAnswerResponse::from(GradingResult {
            is_correct: false,
            score: Score::INCORRECT,
        });
        assert_eq!(wrong.message, "Incorrect answer, try again");
    }
}
