// src/handlers/game.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    achievements::{AchievementRegistry, GAME_END, QUESTION_ANSWERED, UserEvent},
    db,
    error::AppError,
    models::game::{CreateGameRequest, NewGameSession, SubmitAnswerRequest},
    utils::{
        duration::{format_duration, parse_duration},
        jwt::Claims,
    },
};

/// Lists games that have not started yet.
pub async fn list_open_games(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(db::game::open_games(&pool).await?))
}

/// Creates a game for one of the caller's quizzes.
///
/// * All of `quiz_id`, `name` and `duration` (`HH:MM:SS`) are required.
/// * Only the quiz owner may host games of it.
pub async fn create_game(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let user_id = claims.user_id()?;

    let (Some(quiz_id), Some(name), Some(duration)) = (req.quiz_id, req.name, req.duration) else {
        return Err(AppError::InvalidInput(
            "quiz_id, name and duration are required".to_string(),
        ));
    };
    let duration = parse_duration(&duration)
        .ok_or_else(|| AppError::InvalidInput("duration must be HH:MM:SS".to_string()))?;

    db::quiz::require_quiz_owner(&pool, user_id, quiz_id).await?;

    let id = db::game::create(&pool, &NewGameSession { quiz_id, name, duration }).await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Game details plus its current lifecycle status.
pub async fn get_game(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let info = db::game::info(&pool, id).await?;
    let status = db::game::get(&pool, id).await?.status(Utc::now().timestamp());
    let duration_hms = format_duration(info.duration);

    Ok(Json(json!({
        "game": info,
        "status": status,
        "duration_hms": duration_hms,
    })))
}

pub async fn delete_game(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    db::game::remove(&pool, claims.user_id()?, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Starts the game (host only). Starting twice keeps the first starttime.
pub async fn start_game(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let previous = db::game::start(&pool, claims.user_id()?, id, Utc::now().timestamp()).await?;

    Ok(Json(json!({
        "previous_starttime": previous,
        "already_started": previous.is_some(),
    })))
}

/// Ends the game (any member) and evaluates game-end achievements for
/// all members.
pub async fn stop_game(
    State(pool): State<SqlitePool>,
    State(registry): State<Arc<AchievementRegistry>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now().timestamp();
    let previous = db::game::stop(&pool, claims.user_id()?, id, now).await?;

    let mut granted = Vec::new();
    if previous.is_none() {
        for member in db::game::members(&pool, id).await? {
            let event = UserEvent::new(member.user_id, GAME_END).with("game-id", id);
            for key in registry.dispatch(&pool, &event, now).await {
                granted.push(json!({ "user_id": member.user_id, "achievement": key }));
            }
        }
    }

    Ok(Json(json!({
        "previous_endtime": previous,
        "already_stopped": previous.is_some(),
        "achievements": granted,
    })))
}

pub async fn join_game(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let joined = db::game::join(&pool, claims.user_id()?, id, Utc::now().timestamp()).await?;
    Ok(Json(json!({ "joined": joined })))
}

pub async fn leave_game(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let left = db::game::leave(&pool, claims.user_id()?, id).await?;
    Ok(Json(json!({ "left": left })))
}

pub async fn list_members(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    db::game::get(&pool, id).await?;
    Ok(Json(db::game::members(&pool, id).await?))
}

/// Ranked game report: score first, then time per question.
pub async fn get_report(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(db::report::game_report(&pool, id, Utc::now().timestamp()).await?))
}

pub async fn get_question_details(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(db::game::question_details(&pool, id).await?))
}

/// Progress of the calling player, for resuming a game.
pub async fn get_session_data(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(db::game::session_data(&pool, claims.user_id()?, id).await?))
}

/// Records an answer and evaluates answer achievements.
pub async fn submit_answer(
    State(pool): State<SqlitePool>,
    State(registry): State<Arc<AchievementRegistry>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let user_id = claims.user_id()?;
    let now = Utc::now().timestamp();

    let outcome = db::performance::record_answer(&pool, user_id, id, req.question_id, &req.answer, now).await?;

    let event = UserEvent::new(user_id, QUESTION_ANSWERED).with("game-id", id);
    let granted = registry.dispatch(&pool, &event, now).await;

    Ok(Json(json!({
        "correct": outcome.correct,
        "gamecounter": outcome.gamecounter,
        "total_questions": outcome.total_questions,
        "finished": outcome.gamecounter >= outcome.total_questions,
        "achievements": granted,
    })))
}
