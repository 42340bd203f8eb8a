// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

/// Represents the 'question' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text shown to players.
    pub questiontext: String,

    /// The expected answer. Never sent to players.
    #[serde(skip_serializing)]
    pub answer: String,

    /// Leaf category the question is filed under.
    pub category_id: i64,

    /// Author.
    pub user_id: i64,

    pub created: i64,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub questiontext: String,
    #[validate(length(min = 1, max = 500))]
    pub answer: String,
    pub category_id: i64,
}
