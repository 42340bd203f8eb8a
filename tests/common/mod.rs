// tests/common/mod.rs
#![allow(dead_code)]

use quiz_arena::{config::Config, routes, state::AppState};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

/// Fixed "now" used by store tests.
pub const T: i64 = 1_700_000_000;

/// A fresh in-memory database with the schema applied.
/// One connection that never expires, so the database lives as long as the pool.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        admin_username: None,
        admin_password: None,
    }
}

/// Spawns the app on a random port.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the pool behind it.
pub async fn spawn_app() -> (String, SqlitePool) {
    let pool = test_pool().await;
    let app = routes::create_router(AppState::new(pool.clone(), test_config()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{}", port), pool)
}

/// Inserts a user directly, bypassing password hashing.
pub async fn add_user(pool: &SqlitePool, username: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO users (username, password) VALUES (?, 'x') RETURNING id")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub struct Fixture {
    pub owner: i64,
    pub alice: i64,
    pub bob: i64,
    pub carol: i64,
    pub quiz_id: i64,
    pub questions: Vec<i64>,
    pub game_id: i64,
}

/// Owner with a five-question quiz (answers "a0".."a4", weight 1) and a
/// ten-minute game; alice, bob and carol exist but have not joined.
pub async fn seed_game(pool: &SqlitePool) -> Fixture {
    use quiz_arena::{db, models::game::NewGameSession};

    let owner = add_user(pool, "owner").await;
    let alice = add_user(pool, "alice").await;
    let bob = add_user(pool, "bob").await;
    let carol = add_user(pool, "carol").await;

    let science = db::category::create(pool, "Science", None).await.unwrap();
    let physics = db::category::create(pool, "Physics", Some(science)).await.unwrap();

    let quiz_id = db::quiz::create_quiz(pool, owner, "Physics basics").await.unwrap();
    let mut questions = Vec::new();
    for i in 0..5 {
        let q = db::quiz::create_question(pool, owner, &format!("Question {}", i), &format!("a{}", i), physics)
            .await
            .unwrap();
        db::quiz::add_question(pool, owner, quiz_id, q, 1).await.unwrap();
        questions.push(q);
    }

    let game_id = db::game::create(
        pool,
        &NewGameSession {
            quiz_id,
            name: "Friday game".to_string(),
            duration: 600,
        },
    )
    .await
    .unwrap();

    Fixture {
        owner,
        alice,
        bob,
        carol,
        quiz_id,
        questions,
        game_id,
    }
}
