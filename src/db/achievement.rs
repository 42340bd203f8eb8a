use sqlx::SqlitePool;

use crate::{error::AppError, models::achievement::UserAchievement};

pub async fn has_achievement(pool: &SqlitePool, user_id: i64, key: &str) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM user_achievement WHERE user_id = ? AND achievement_key = ?",
    )
    .bind(user_id)
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// Records a grant. Returns `false` if the user already had it.
pub async fn record(pool: &SqlitePool, user_id: i64, key: &str, now: i64) -> Result<bool, AppError> {
    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO user_achievement (user_id, achievement_key, granted_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(key)
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(inserted == 1)
}

pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<UserAchievement>, AppError> {
    let list = sqlx::query_as::<_, UserAchievement>(
        r#"
        SELECT achievement_key, granted_at
        FROM user_achievement
        WHERE user_id = ?
        ORDER BY granted_at DESC, achievement_key ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}
