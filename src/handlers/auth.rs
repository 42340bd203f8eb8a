// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{Credentials, RegisterRequest, Session, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Inserts a user. Maps the unique-username violation to `Conflict`.
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    superuser: bool,
) -> Result<User, AppError> {
    let hashed_password = hash_password(password)?;

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, superuser)
        VALUES (?, ?, ?)
        RETURNING id, username, password, superuser, created_at
        "#,
    )
    .bind(username)
    .bind(hashed_password)
    .bind(superuser)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return AppError::Conflict(format!("Username '{}' already exists", username));
            }
        }
        tracing::error!("Failed to register user: {:?}", e);
        AppError::from(e)
    })
}

/// Registers a new user.
///
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = insert_user(&pool, &payload.username, &payload.password, false).await?;
    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token carrying id and superuser flag.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, superuser, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::AuthError("Invalid username or password".to_string()))?;

    if !verify_password(&payload.password, &user.password) {
        return Err(AppError::AuthError("Invalid username or password".to_string()));
    }

    let token = sign_jwt(user.id, user.superuser, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(Session {
        token,
        token_type: "Bearer",
        user_id: user.id,
        superuser: user.superuser,
    }))
}
