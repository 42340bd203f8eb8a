// src/models/game.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'game_session' table.
/// All timestamps are unix seconds; `duration` is in seconds.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GameSession {
    pub id: i64,
    pub quiz_id: i64,
    pub name: String,
    pub duration: i64,
    /// Write-once. `None` while the game is open.
    pub starttime: Option<i64>,
    /// Write-once, never later than `starttime + duration`.
    pub endtime: Option<i64>,
    pub created_on: i64,
}

/// Where a game is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Open,
    Running,
    Finished,
}

impl GameSession {
    /// The latest moment the game may end.
    pub fn calc_endtime(&self) -> Option<i64> {
        self.starttime.map(|start| start + self.duration)
    }

    /// A game is finished once its endtime is written or its duration has elapsed.
    pub fn status(&self, now: i64) -> GameStatus {
        match (self.starttime, self.endtime) {
            (None, _) => GameStatus::Open,
            (Some(_), Some(_)) => GameStatus::Finished,
            (Some(start), None) if now >= start + self.duration => GameStatus::Finished,
            (Some(_), None) => GameStatus::Running,
        }
    }
}

/// Input for creating a game session. The caller has already verified
/// that the acting user owns `quiz_id`.
#[derive(Debug, Clone)]
pub struct NewGameSession {
    pub quiz_id: i64,
    pub name: String,
    pub duration: i64,
}

/// Joined view of a game, its quiz and the quiz owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GameInfo {
    pub game_id: i64,
    pub gamename: String,
    pub created_on: i64,
    pub starttime: Option<i64>,
    pub endtime: Option<i64>,
    pub duration: i64,
    pub calc_endtime: Option<i64>,
    pub quiz_id: i64,
    pub owner_id: i64,
    pub quizname: String,
    pub quiz_created_on: i64,
}

/// Row of the various game listings (open, hosted, participated, active).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GameListItem {
    pub id: i64,
    pub name: String,
    /// Username of the hosting quiz owner.
    pub owner: String,
    pub members: i64,
    pub starttime: Option<i64>,
    pub duration: i64,
    pub calc_endtime: Option<i64>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GameMember {
    pub user_id: i64,
    pub username: String,
}

/// Per-question statistics for one game.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestionDetail {
    pub question_id: i64,
    pub questiontext: String,
    pub answered_total: i64,
    pub answered_correct: i64,
    pub answered_wrong: i64,
    pub weight: i64,
}

/// What a player needs to resume a game: how many answers they gave
/// and the quiz's question ids in order.
#[derive(Debug, Clone, Serialize)]
pub struct SessionData {
    pub gamecounter: i64,
    pub gamequestions: Vec<i64>,
}

/// Result of recording one answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub gamecounter: i64,
    pub total_questions: i64,
}

/// Outcome of the ownership check for a game.
///
/// `Unknown` means the game (or its quiz) does not exist. Authorization
/// treats it as a denial; callers that report errors map it to not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    Unknown,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// DTO for creating a game.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGameRequest {
    pub quiz_id: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    /// `HH:MM:SS`
    pub duration: Option<String>,
}

/// DTO for answering a question inside a game.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    pub question_id: i64,
    #[validate(length(min = 1, max = 500))]
    pub answer: String,
}
