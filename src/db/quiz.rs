use sqlx::SqlitePool;

use crate::{
    db::category,
    error::AppError,
    models::quiz::Quiz,
};

/// Files a new question under a leaf category.
pub async fn create_question(
    pool: &SqlitePool,
    owner: i64,
    questiontext: &str,
    answer: &str,
    category_id: i64,
) -> Result<i64, AppError> {
    category::get(pool, category_id).await?;
    if !category::is_true_child(pool, category_id).await? {
        return Err(AppError::InvalidInput(
            "Questions can only be filed under leaf categories".to_string(),
        ));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO question (questiontext, answer, category_id, user_id) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(questiontext)
    .bind(answer)
    .bind(category_id)
    .bind(owner)
    .fetch_one(pool)
    .await?;

    tracing::info!("User {} created question {}", owner, id);
    Ok(id)
}

pub async fn create_quiz(pool: &SqlitePool, owner: i64, name: &str) -> Result<i64, AppError> {
    let id = sqlx::query_scalar::<_, i64>("INSERT INTO quiz (name, user_id) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(owner)
        .fetch_one(pool)
        .await?;

    tracing::info!("User {} created quiz {}", owner, id);
    Ok(id)
}

pub async fn quiz_owner(pool: &SqlitePool, quiz_id: i64) -> Result<Option<i64>, AppError> {
    let owner = sqlx::query_scalar::<_, i64>("SELECT user_id FROM quiz WHERE id = ?")
        .bind(quiz_id)
        .fetch_optional(pool)
        .await?;
    Ok(owner)
}

/// Fails unless `actor` owns the quiz.
pub async fn require_quiz_owner(pool: &SqlitePool, actor: i64, quiz_id: i64) -> Result<(), AppError> {
    match quiz_owner(pool, quiz_id).await? {
        None => Err(AppError::NotFound(format!("Quiz {} not found", quiz_id))),
        Some(owner) if owner == actor => Ok(()),
        Some(_) => {
            tracing::warn!("Unauthorized try to modify quiz {} by user {}", quiz_id, actor);
            Err(AppError::Unauthorized("You do not own this quiz".to_string()))
        }
    }
}

/// Adds a question to a quiz, or updates its weight if already present.
pub async fn add_question(
    pool: &SqlitePool,
    actor: i64,
    quiz_id: i64,
    question_id: i64,
    weight: i64,
) -> Result<(), AppError> {
    require_quiz_owner(pool, actor, quiz_id).await?;
    if weight < 1 {
        return Err(AppError::InvalidInput("Weight must be at least 1".to_string()));
    }

    let question = sqlx::query_scalar::<_, i64>("SELECT id FROM question WHERE id = ?")
        .bind(question_id)
        .fetch_optional(pool)
        .await?;
    if question.is_none() {
        return Err(AppError::NotFound(format!("Question {} not found", question_id)));
    }

    sqlx::query(
        r#"
        INSERT INTO quiz_question (quiz_id, question_id, weight)
        VALUES (?, ?, ?)
        ON CONFLICT(quiz_id, question_id) DO UPDATE SET weight = excluded.weight
        "#,
    )
    .bind(quiz_id)
    .bind(question_id)
    .bind(weight)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn quizzes_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Quiz>, AppError> {
    let list = sqlx::query_as::<_, Quiz>(
        "SELECT id, name, user_id, created FROM quiz WHERE user_id = ? ORDER BY id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(list)
}
