// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A player or quiz author. Superusers additionally curate the category tree.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,

    /// Argon2 hash; never serialized.
    #[serde(skip)]
    pub password: String,

    pub superuser: bool,

    /// Unix seconds.
    pub created_at: i64,
}

/// Registration payload. Accounts created this way are never superusers.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3 to 50 characters."))]
    pub username: String,
    #[validate(length(min = 4, max = 128, message = "Password must be 4 to 128 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Issued token plus the identity it carries.
#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub user_id: i64,
    pub superuser: bool,
}
