use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{achievements::AchievementRegistry, db, error::AppError, utils::jwt::Claims};

/// The caller's games: hosted, participated in, and currently running.
pub async fn my_games(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let hosted = db::game::hosted_by(&pool, user_id).await?;
    let participated = db::game::participated_by(&pool, user_id).await?;
    let active = db::game::active_games(&pool, user_id, Utc::now().timestamp()).await?;

    Ok(Json(json!({
        "hosted": hosted,
        "participated": participated,
        "active": active,
    })))
}

pub async fn my_achievements(
    State(pool): State<SqlitePool>,
    State(registry): State<Arc<AchievementRegistry>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let list: Vec<_> = db::achievement::list_for_user(&pool, claims.user_id()?)
        .await?
        .into_iter()
        .map(|a| {
            json!({
                "key": a.achievement_key,
                "title": registry.title_of(&a.achievement_key),
                "granted_at": a.granted_at,
            })
        })
        .collect();

    Ok(Json(list))
}
