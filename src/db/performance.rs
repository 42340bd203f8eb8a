use sqlx::SqlitePool;

use crate::{
    config::{ANSWER_CORRECT, ANSWER_WRONG},
    db::game,
    error::AppError,
    models::game::{AnswerOutcome, GameStatus},
};

/// Records a member's answer to one question of a running game.
///
/// Each question can be answered once per game and user; a repeat is a
/// `Conflict`. The answer is correct when it matches the stored answer
/// after trimming surrounding whitespace.
pub async fn record_answer(
    pool: &SqlitePool,
    user_id: i64,
    game_id: i64,
    question_id: i64,
    answer: &str,
    now: i64,
) -> Result<AnswerOutcome, AppError> {
    let session = game::get(pool, game_id).await?;

    if !game::is_member(pool, user_id, game_id).await? {
        tracing::warn!("Non-member {} tried to answer in game {}", user_id, game_id);
        return Err(AppError::Unauthorized("Join the game before answering".to_string()));
    }

    match session.status(now) {
        GameStatus::Open => {
            return Err(AppError::InvalidInput("Game has not started".to_string()));
        }
        GameStatus::Finished => {
            return Err(AppError::InvalidInput("Game is already over".to_string()));
        }
        GameStatus::Running => {}
    }

    let expected = sqlx::query_scalar::<_, String>(
        r#"
        SELECT q.answer
        FROM quiz_question qq
        JOIN question q ON q.id = qq.question_id
        WHERE qq.quiz_id = ? AND qq.question_id = ?
        "#,
    )
    .bind(session.quiz_id)
    .bind(question_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::InvalidInput("Question is not part of this game".to_string()))?;

    let correct = answer.trim() == expected.trim();

    let inserted = sqlx::query(
        r#"
        INSERT OR IGNORE INTO question_performance
            (user_id, question_id, gamesession_id, correct, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .bind(game_id)
    .bind(if correct { ANSWER_CORRECT } else { ANSWER_WRONG })
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected();

    if inserted == 0 {
        return Err(AppError::Conflict("Question already answered".to_string()));
    }

    let gamecounter = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(id) FROM question_performance WHERE gamesession_id = ? AND user_id = ?",
    )
    .bind(game_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let total_questions = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quiz_question WHERE quiz_id = ?")
        .bind(session.quiz_id)
        .fetch_one(pool)
        .await?;

    Ok(AnswerOutcome {
        correct,
        gamecounter,
        total_questions,
    })
}

/// Number of questions the user ever answered at least partially correct.
pub async fn correct_answer_count(pool: &SqlitePool, user_id: i64) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM question_performance WHERE user_id = ? AND correct > 0",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
