use std::cmp::Ordering;

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Achievement, UserEvent};
use crate::{db, error::AppError, models::report::ReportRow};

/// Granted to the player who both won a game and finished it fastest,
/// provided at least `member-count` players took part.
///
/// Event arguments: `game-id`, `member-count`.
pub struct GameWinFastest;

/// `report` must be in rank order.
pub fn is_fastest_winner(report: &[ReportRow], user_id: i64, member_count: i64) -> bool {
    let Some(winner) = report.first() else {
        return false;
    };

    let fastest = report.iter().min_by(|a, b| match (a.total_time_in_sec, b.total_time_in_sec) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    winner.user_id == user_id
        && winner.question_answered_correct.is_some()
        && report.len() as i64 >= member_count
        && fastest.is_some_and(|f| f.user_id == user_id)
}

#[async_trait]
impl Achievement for GameWinFastest {
    async fn grant(&self, pool: &SqlitePool, event: &UserEvent, now: i64) -> Result<bool, AppError> {
        let game_id = event.get("game-id")?;
        let member_count = event.get("member-count")?;

        let report = db::report::game_report(pool, game_id, now).await?;
        Ok(is_fastest_winner(&report, event.user_id, member_count))
    }
}
