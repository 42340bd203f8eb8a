//! Game session store: lifecycle, membership, ownership checks and listings.
//!
//! Every permission-sensitive function takes the acting user's id.
//! `starttime` and `endtime` are written with guarded UPDATEs so concurrent
//! start/stop requests cannot overwrite a value once it is set.

use sqlx::SqlitePool;

use crate::{
    config::MAX_GAME_DURATION_SECS,
    error::AppError,
    models::game::{
        GameInfo, GameListItem, GameMember, GameSession, GameStatus, NewGameSession, Permission,
        QuestionDetail, SessionData,
    },
};

const LIST_SELECT: &str = r#"
    SELECT
        g.id,
        g.name,
        u.username AS owner,
        COALESCE(s.members, 0) AS members,
        g.starttime,
        g.duration,
        g.starttime + g.duration AS calc_endtime
    FROM game_session g
    JOIN quiz q ON g.quiz_id = q.id
    JOIN users u ON q.user_id = u.id
    LEFT JOIN (
        SELECT gamesession_id, COUNT(user_id) AS members
        FROM game_member
        GROUP BY gamesession_id
    ) s ON s.gamesession_id = g.id
"#;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Game {} not found", id))
}

/// Creates a game for a quiz and returns its id.
/// Ownership of the quiz must be checked by the caller.
pub async fn create(pool: &SqlitePool, new: &NewGameSession) -> Result<i64, AppError> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("Game name must not be empty".to_string()));
    }
    if new.duration <= 0 || new.duration > MAX_GAME_DURATION_SECS {
        return Err(AppError::InvalidInput("Game duration out of range".to_string()));
    }

    let quiz = sqlx::query_scalar::<_, i64>("SELECT id FROM quiz WHERE id = ?")
        .bind(new.quiz_id)
        .fetch_optional(pool)
        .await?;
    if quiz.is_none() {
        return Err(AppError::NotFound(format!("Quiz {} not found", new.quiz_id)));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO game_session (name, quiz_id, duration) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(name)
    .bind(new.quiz_id)
    .bind(new.duration)
    .fetch_one(pool)
    .await?;

    tracing::info!("Created game {} for quiz {}", id, new.quiz_id);
    Ok(id)
}

pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<GameSession>, AppError> {
    let session = sqlx::query_as::<_, GameSession>(
        r#"
        SELECT id, quiz_id, name, duration, starttime, endtime, created_on
        FROM game_session
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<GameSession, AppError> {
    find(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Owner of a game, resolved through its quiz.
pub async fn owner_of(pool: &SqlitePool, id: i64) -> Result<Option<i64>, AppError> {
    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT q.user_id FROM game_session g JOIN quiz q ON g.quiz_id = q.id WHERE g.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(owner)
}

/// Whether `user_id` owns the game. `Unknown` if the game does not exist.
pub async fn has_permission(pool: &SqlitePool, user_id: i64, id: i64) -> Result<Permission, AppError> {
    Ok(match owner_of(pool, id).await? {
        None => Permission::Unknown,
        Some(owner) if owner == user_id => Permission::Granted,
        Some(_) => Permission::Denied,
    })
}

async fn require_owner(pool: &SqlitePool, actor: i64, id: i64, action: &str) -> Result<(), AppError> {
    match has_permission(pool, actor, id).await? {
        Permission::Granted => Ok(()),
        Permission::Denied => {
            tracing::warn!("Unauthorized try to {} game {} by user {}", action, id, actor);
            Err(AppError::Unauthorized(format!("Only the host may {} this game", action)))
        }
        Permission::Unknown => Err(not_found(id)),
    }
}

/// Starts a game. Owner only.
///
/// Returns the previous starttime: `None` if this call started the game,
/// `Some(t)` if it was already running since `t` (nothing is changed then).
pub async fn start(pool: &SqlitePool, actor: i64, id: i64, now: i64) -> Result<Option<i64>, AppError> {
    require_owner(pool, actor, id, "start").await?;

    let updated = sqlx::query("UPDATE game_session SET starttime = ? WHERE id = ? AND starttime IS NULL")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if updated.rows_affected() == 1 {
        tracing::info!("Started game {}", id);
        return Ok(None);
    }

    let previous = sqlx::query_scalar::<_, Option<i64>>("SELECT starttime FROM game_session WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(previous)
}

/// Ends a game. Any member may stop it.
///
/// The written endtime is `min(now, starttime + duration)`. Returns the
/// previous endtime, `None` if this call ended the game.
pub async fn stop(pool: &SqlitePool, actor: i64, id: i64, now: i64) -> Result<Option<i64>, AppError> {
    let session = get(pool, id).await?;

    if !is_member(pool, actor, id).await? {
        tracing::warn!("Unauthorized try to stop game {} by user {}", id, actor);
        return Err(AppError::Unauthorized("Only members may stop this game".to_string()));
    }
    if session.starttime.is_none() {
        return Err(AppError::InvalidInput("Game has not started".to_string()));
    }

    let updated = sqlx::query(
        r#"
        UPDATE game_session
        SET endtime = MIN(?, starttime + duration)
        WHERE id = ? AND endtime IS NULL AND starttime IS NOT NULL
        "#,
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 1 {
        tracing::info!("Stopped game {}", id);
        return Ok(None);
    }

    let previous = sqlx::query_scalar::<_, Option<i64>>("SELECT endtime FROM game_session WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(previous)
}

/// Deletes a game with its members and answers. Owner only.
pub async fn remove(pool: &SqlitePool, actor: i64, id: i64) -> Result<(), AppError> {
    require_owner(pool, actor, id, "remove").await?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM question_performance WHERE gamesession_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM game_member WHERE gamesession_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM game_session WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("Removed game {}", id);
    Ok(())
}

pub async fn has_started(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    Ok(get(pool, id).await?.starttime.is_some())
}

/// Adds the user to the game. Joining twice is a no-op.
/// Returns `true` if a new membership was created.
pub async fn join(pool: &SqlitePool, user_id: i64, id: i64, now: i64) -> Result<bool, AppError> {
    let session = get(pool, id).await?;
    if session.status(now) == GameStatus::Finished {
        return Err(AppError::InvalidInput("Game is already over".to_string()));
    }

    let inserted = sqlx::query("INSERT OR IGNORE INTO game_member (gamesession_id, user_id) VALUES (?, ?)")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected()
        == 1;

    if inserted {
        tracing::info!("User {} joined game {}", user_id, id);
    }
    Ok(inserted)
}

/// Removes the user from the game. Returns `true` if they were a member.
pub async fn leave(pool: &SqlitePool, user_id: i64, id: i64) -> Result<bool, AppError> {
    get(pool, id).await?;

    let removed = sqlx::query("DELETE FROM game_member WHERE gamesession_id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected()
        > 0;

    if removed {
        tracing::info!("User {} left game {}", user_id, id);
    }
    Ok(removed)
}

pub async fn is_member(pool: &SqlitePool, user_id: i64, id: i64) -> Result<bool, AppError> {
    let member = sqlx::query_scalar::<_, i64>(
        "SELECT user_id FROM game_member WHERE gamesession_id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(member.is_some())
}

pub async fn members(pool: &SqlitePool, id: i64) -> Result<Vec<GameMember>, AppError> {
    let members = sqlx::query_as::<_, GameMember>(
        r#"
        SELECT m.user_id, u.username
        FROM game_member m
        JOIN users u ON u.id = m.user_id
        WHERE m.gamesession_id = ?
        ORDER BY u.username ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(members)
}

pub async fn info(pool: &SqlitePool, id: i64) -> Result<GameInfo, AppError> {
    sqlx::query_as::<_, GameInfo>(
        r#"
        SELECT
            g.id AS game_id,
            g.name AS gamename,
            g.created_on,
            g.starttime,
            g.endtime,
            g.duration,
            g.starttime + g.duration AS calc_endtime,
            g.quiz_id,
            q.user_id AS owner_id,
            q.name AS quizname,
            q.created AS quiz_created_on
        FROM game_session g
        JOIN quiz q ON g.quiz_id = q.id
        WHERE g.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

/// Games nobody has started yet.
pub async fn open_games(pool: &SqlitePool) -> Result<Vec<GameListItem>, AppError> {
    let sql = format!("{} WHERE g.starttime IS NULL ORDER BY g.id DESC", LIST_SELECT);
    let games = sqlx::query_as::<_, GameListItem>(&sql).fetch_all(pool).await?;
    Ok(games)
}

/// Games of quizzes owned by the user.
pub async fn hosted_by(pool: &SqlitePool, user_id: i64) -> Result<Vec<GameListItem>, AppError> {
    let sql = format!("{} WHERE q.user_id = ? ORDER BY g.id DESC", LIST_SELECT);
    let games = sqlx::query_as::<_, GameListItem>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(games)
}

/// Games the user is a member of.
pub async fn participated_by(pool: &SqlitePool, user_id: i64) -> Result<Vec<GameListItem>, AppError> {
    let sql = format!(
        "{} WHERE g.id IN (SELECT gamesession_id FROM game_member WHERE user_id = ?) ORDER BY g.id DESC",
        LIST_SELECT
    );
    let games = sqlx::query_as::<_, GameListItem>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(games)
}

/// Running games the user is a member of.
pub async fn active_games(pool: &SqlitePool, user_id: i64, now: i64) -> Result<Vec<GameListItem>, AppError> {
    let sql = format!(
        r#"{}
        WHERE g.id IN (SELECT gamesession_id FROM game_member WHERE user_id = ?)
          AND g.starttime IS NOT NULL
          AND g.endtime IS NULL
          AND g.starttime + g.duration > ?
        ORDER BY g.starttime ASC"#,
        LIST_SELECT
    );
    let games = sqlx::query_as::<_, GameListItem>(&sql)
        .bind(user_id)
        .bind(now)
        .fetch_all(pool)
        .await?;
    Ok(games)
}

/// Per-question answer statistics for a game.
pub async fn question_details(pool: &SqlitePool, id: i64) -> Result<Vec<QuestionDetail>, AppError> {
    get(pool, id).await?;

    let details = sqlx::query_as::<_, QuestionDetail>(
        r#"
        SELECT
            q.id AS question_id,
            q.questiontext,
            COUNT(qp.id) AS answered_total,
            COALESCE(SUM(CASE WHEN qp.correct = 100 THEN 1 ELSE 0 END), 0) AS answered_correct,
            COALESCE(SUM(CASE WHEN qp.correct = 0 THEN 1 ELSE 0 END), 0) AS answered_wrong,
            qq.weight
        FROM game_session g
        JOIN quiz_question qq ON qq.quiz_id = g.quiz_id
        JOIN question q ON q.id = qq.question_id
        LEFT JOIN question_performance qp
            ON qp.gamesession_id = g.id AND qp.question_id = qq.question_id
        WHERE g.id = ?
        GROUP BY q.id, q.questiontext, qq.weight
        ORDER BY q.id ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(details)
}

/// State a player needs to resume a game after losing their client session.
pub async fn session_data(pool: &SqlitePool, user_id: i64, id: i64) -> Result<SessionData, AppError> {
    get(pool, id).await?;

    let gamecounter = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(id) FROM question_performance WHERE gamesession_id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let gamequestions = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT qq.question_id
        FROM game_session g
        JOIN quiz_question qq ON g.quiz_id = qq.quiz_id
        WHERE g.id = ?
        ORDER BY qq.question_id ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(SessionData {
        gamecounter,
        gamequestions,
    })
}
