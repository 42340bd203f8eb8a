use serde::Serialize;
use sqlx::FromRow;

/// A recorded grant from the 'user_achievement' table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAchievement {
    pub achievement_key: String,
    pub granted_at: i64,
}
