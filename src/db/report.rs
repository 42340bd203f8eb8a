use sqlx::SqlitePool;

use crate::{
    config::ANSWER_CORRECT,
    error::AppError,
    leaderboard::rank_members,
    models::report::{MemberAggregate, ReportRow, ReportTiming},
};

/// Ranked report of all members of a game.
///
/// Aggregation happens in SQL; timing and ranking in `leaderboard`.
/// Members without answers are left-joined in with empty aggregates.
pub async fn game_report(pool: &SqlitePool, game_id: i64, now: i64) -> Result<Vec<ReportRow>, AppError> {
    let timing = sqlx::query_as::<_, ReportTiming>(
        r#"
        SELECT
            g.starttime,
            g.endtime,
            g.duration,
            COALESCE((SELECT SUM(weight) FROM quiz_question WHERE quiz_id = g.quiz_id), 0) AS total_weight
        FROM game_session g
        WHERE g.id = ?
        "#,
    )
    .bind(game_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;

    let members = sqlx::query_as::<_, MemberAggregate>(
        r#"
        SELECT
            m.user_id,
            u.username,
            COUNT(qp.id) AS answered_count,
            SUM(qq.weight) AS weight_answered,
            SUM(CASE WHEN qp.correct = ? THEN qq.weight ELSE 0 END) AS weight_correct,
            MAX(qp.timestamp) AS last_answer_at
        FROM game_member m
        JOIN users u ON u.id = m.user_id
        JOIN game_session g ON g.id = m.gamesession_id
        LEFT JOIN question_performance qp
            ON qp.gamesession_id = m.gamesession_id AND qp.user_id = m.user_id
        LEFT JOIN quiz_question qq
            ON qq.quiz_id = g.quiz_id AND qq.question_id = qp.question_id
        WHERE m.gamesession_id = ?
        GROUP BY m.user_id, u.username
        "#,
    )
    .bind(ANSWER_CORRECT)
    .bind(game_id)
    .fetch_all(pool)
    .await?;

    Ok(rank_members(&timing, members, now))
}
