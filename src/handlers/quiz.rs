// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    db,
    error::AppError,
    models::{
        question::CreateQuestionRequest,
        quiz::{AddQuizQuestionRequest, CreateQuizRequest},
    },
    utils::jwt::Claims,
};

/// Creates a question owned by the caller. The category must be a leaf.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let id = db::quiz::create_question(
        &pool,
        claims.user_id()?,
        &req.questiontext,
        &req.answer,
        req.category_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn create_quiz(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let id = db::quiz::create_quiz(&pool, claims.user_id()?, &req.name).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Adds a question to one of the caller's quizzes.
pub async fn add_question(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(req): Json<AddQuizQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    db::quiz::add_question(
        &pool,
        claims.user_id()?,
        quiz_id,
        req.question_id,
        req.weight.unwrap_or(1),
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_my_quizzes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(db::quiz::quizzes_by_user(&pool, claims.user_id()?).await?))
}
