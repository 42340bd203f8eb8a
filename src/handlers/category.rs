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
    models::category::{CategoryOverview, CreateCategoryRequest},
    utils::jwt::Claims,
};

/// Top-level categories with subtree question counts, plus the overall total.
pub async fn overview(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let categories = db::category::roots_with_question_count(&pool).await?;
    let total_questions = db::category::total_question_count(&pool).await?;

    Ok(Json(CategoryOverview {
        categories,
        total_questions,
    }))
}

pub async fn get_category(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let category = db::category::get(&pool, id).await?;
    let question_count = db::category::question_count(&pool, id).await?;
    let is_leaf = db::category::is_true_child(&pool, id).await?;

    Ok(Json(json!({
        "category": category,
        "questioncount": question_count,
        "is_leaf": is_leaf,
    })))
}

pub async fn list_children(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    db::category::get(&pool, id).await?;
    Ok(Json(db::category::children(&pool, id).await?))
}

pub async fn list_descendants(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    db::category::get(&pool, id).await?;
    Ok(Json(db::category::all_children(&pool, id).await?))
}

pub async fn list_leaves(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(db::category::true_children(&pool).await?))
}

pub async fn list_middle(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(db::category::middle(&pool).await?))
}

pub async fn list_questions(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    db::category::get(&pool, id).await?;
    Ok(Json(db::category::questions(&pool, id).await?))
}

/// Superuser only (enforced by middleware).
pub async fn create_category(
    State(pool): State<SqlitePool>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let id = db::category::create(&pool, &req.name, req.parent_id).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn delete_category(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    db::category::remove(&pool, claims.superuser, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
