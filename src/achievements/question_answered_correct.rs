use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Achievement, UserEvent};
use crate::{db, error::AppError};

/// Granted once a user has answered `question-count` questions correctly.
pub struct QuestionAnsweredCorrect;

#[async_trait]
impl Achievement for QuestionAnsweredCorrect {
    async fn grant(&self, pool: &SqlitePool, event: &UserEvent, _now: i64) -> Result<bool, AppError> {
        let required = event.get("question-count")?;
        let count = db::performance::correct_answer_count(pool, event.user_id).await?;
        Ok(count >= required)
    }
}
