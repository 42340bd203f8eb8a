//! Achievements granted after user events.
//!
//! An [`Achievement`] is a read-only predicate over a [`UserEvent`]. The
//! [`AchievementRegistry`] decides which predicates run for an event,
//! merges each definition's arguments into the event, and records grants.

pub mod game_win_fastest;
pub mod question_answered_correct;

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{db, error::AppError};

use self::{game_win_fastest::GameWinFastest, question_answered_correct::QuestionAnsweredCorrect};

/// Fired for every member when a game is stopped. Carries `game-id`.
pub const GAME_END: &str = "game-end";

/// Fired after a user answered a question in a game. Carries `game-id`.
pub const QUESTION_ANSWERED: &str = "question-answered";

/// Something a user did, with event-specific integer arguments.
#[derive(Debug, Clone)]
pub struct UserEvent {
    pub user_id: i64,
    pub name: String,
    pub args: HashMap<String, i64>,
}

impl UserEvent {
    pub fn new(user_id: i64, name: &str) -> Self {
        Self {
            user_id,
            name: name.to_string(),
            args: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: i64) -> Self {
        self.args.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Result<i64, AppError> {
        self.args
            .get(key)
            .copied()
            .ok_or_else(|| AppError::InvalidInput(format!("Event '{}' lacks argument '{}'", self.name, key)))
    }
}

/// A grant predicate evaluated at `now`. Implementations may read from the
/// database but must never write; recording is the registry's job.
#[async_trait]
pub trait Achievement: Send + Sync {
    async fn grant(&self, pool: &SqlitePool, event: &UserEvent, now: i64) -> Result<bool, AppError>;
}

pub struct AchievementDefinition {
    pub key: &'static str,
    pub title: &'static str,
    /// Event name this achievement listens to.
    pub event: &'static str,
    /// Arguments merged into the event before evaluation.
    pub args: Vec<(&'static str, i64)>,
    pub achievement: Box<dyn Achievement>,
}

pub struct AchievementRegistry {
    definitions: Vec<AchievementDefinition>,
}

impl Default for AchievementRegistry {
    fn default() -> Self {
        Self::new(vec![
            AchievementDefinition {
                key: "game-win-fastest",
                title: "Fastest winner",
                event: GAME_END,
                args: vec![("member-count", 3)],
                achievement: Box::new(GameWinFastest),
            },
            AchievementDefinition {
                key: "question-correct-10",
                title: "10 correct answers",
                event: QUESTION_ANSWERED,
                args: vec![("question-count", 10)],
                achievement: Box::new(QuestionAnsweredCorrect),
            },
            AchievementDefinition {
                key: "question-correct-100",
                title: "100 correct answers",
                event: QUESTION_ANSWERED,
                args: vec![("question-count", 100)],
                achievement: Box::new(QuestionAnsweredCorrect),
            },
        ])
    }
}

impl AchievementRegistry {
    pub fn new(definitions: Vec<AchievementDefinition>) -> Self {
        Self { definitions }
    }

    pub fn title_of(&self, key: &str) -> Option<&'static str> {
        self.definitions
            .iter()
            .find(|d| d.key == key)
            .map(|d| d.title)
    }

    /// Evaluates every achievement listening to `event` that the user does not
    /// hold yet, and records the ones that grant. Returns the new keys.
    ///
    /// Failures are logged and skipped; they never fail the caller.
    pub async fn dispatch(&self, pool: &SqlitePool, event: &UserEvent, now: i64) -> Vec<&'static str> {
        let mut granted = Vec::new();

        for def in self.definitions.iter().filter(|d| d.event == event.name) {
            match db::achievement::has_achievement(pool, event.user_id, def.key).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Could not check achievement {}: {}", def.key, e);
                    continue;
                }
            }

            let mut scoped = event.clone();
            for (key, value) in &def.args {
                scoped.args.insert(key.to_string(), *value);
            }

            match def.achievement.grant(pool, &scoped, now).await {
                Ok(true) => match db::achievement::record(pool, event.user_id, def.key, now).await {
                    Ok(true) => {
                        tracing::info!("User {} earned achievement {}", event.user_id, def.key);
                        granted.push(def.key);
                    }
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Could not record achievement {}: {}", def.key, e),
                },
                Ok(false) => {}
                Err(e) => tracing::warn!(
                    "Achievement {} failed for user {}: {}",
                    def.key,
                    event.user_id,
                    e
                ),
            }
        }

        granted
    }
}
