// src/models/report.rs

use serde::Serialize;
use sqlx::FromRow;

/// Raw per-member aggregates as they come out of the database.
/// Sums are `None` when the member has no answers in the game.
#[derive(Debug, Clone, FromRow)]
pub struct MemberAggregate {
    pub user_id: i64,
    pub username: String,
    /// Number of answer records.
    pub answered_count: i64,
    /// Total weight of answered questions.
    pub weight_answered: Option<i64>,
    /// Total weight of questions answered fully correct.
    pub weight_correct: Option<i64>,
    /// Timestamp of the member's last answer.
    pub last_answer_at: Option<i64>,
}

/// Timing facts of the game a report is computed for.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReportTiming {
    pub starttime: Option<i64>,
    pub endtime: Option<i64>,
    pub duration: i64,
    /// Sum of all question weights in the quiz.
    pub total_weight: i64,
}

/// One ranked line of the game report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub rank: i64,
    pub user_id: i64,
    pub username: String,
    pub question_answered: Option<i64>,
    pub question_answered_correct: Option<i64>,
    pub total_questions: i64,
    pub answered_count: i64,
    pub total_time_in_sec: Option<i64>,
    pub time_per_question: Option<f64>,
    pub user_endtime: Option<i64>,
}
