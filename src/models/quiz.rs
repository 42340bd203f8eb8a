use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'quiz' table. The owning user hosts all games of the quiz.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// DTO for attaching a question to a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct AddQuizQuestionRequest {
    pub question_id: i64,
    /// Scoring multiplier, defaults to 1.
    #[validate(range(min = 1, max = 100))]
    pub weight: Option<i64>,
}
