use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        category::{Category, CategoryWithCount},
        question::Question,
    },
};

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Category, AppError> {
    sqlx::query_as::<_, Category>("SELECT id, name, parent_id FROM category WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
}

pub async fn create(pool: &SqlitePool, name: &str, parent_id: Option<i64>) -> Result<i64, AppError> {
    if let Some(parent) = parent_id {
        get(pool, parent).await?;
    }

    let id = sqlx::query_scalar::<_, i64>("INSERT INTO category (name, parent_id) VALUES (?, ?) RETURNING id")
        .bind(name)
        .bind(parent_id)
        .fetch_one(pool)
        .await?;

    tracing::info!("Created category '{}' ({}) under {:?}", name, id, parent_id);
    Ok(id)
}

/// Deletes a category together with its subtree and their questions.
/// Superusers only.
pub async fn remove(pool: &SqlitePool, superuser: bool, id: i64) -> Result<(), AppError> {
    if !superuser {
        tracing::warn!("Unauthorized try to remove category {}", id);
        return Err(AppError::Unauthorized("Only superusers may remove categories".to_string()));
    }

    let deleted = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound(format!("Category {} not found", id)));
    }

    tracing::info!("Removed category {} with its questions", id);
    Ok(())
}

/// Direct children, by name.
pub async fn children(pool: &SqlitePool, id: i64) -> Result<Vec<Category>, AppError> {
    let list = sqlx::query_as::<_, Category>(
        "SELECT id, name, parent_id FROM category WHERE parent_id = ? ORDER BY name ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}

/// Every descendant of a category, at any depth.
pub async fn all_children(pool: &SqlitePool, id: i64) -> Result<Vec<Category>, AppError> {
    let list = sqlx::query_as::<_, Category>(
        r#"
        WITH RECURSIVE subtree(id) AS (
            SELECT id FROM category WHERE parent_id = ?
            UNION ALL
            SELECT c.id FROM category c JOIN subtree s ON c.parent_id = s.id
        )
        SELECT c.id, c.name, c.parent_id
        FROM category c
        JOIN subtree s ON s.id = c.id
        ORDER BY c.name ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}

/// Leaves of the tree: categories that are nobody's parent.
pub async fn true_children(pool: &SqlitePool) -> Result<Vec<Category>, AppError> {
    let list = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, parent_id
        FROM category
        WHERE id NOT IN (SELECT parent_id FROM category WHERE parent_id IS NOT NULL)
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(list)
}

pub async fn is_true_child(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let leaf = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM category WHERE id = ?)
           AND NOT EXISTS(SELECT 1 FROM category WHERE parent_id = ?)
        "#,
    )
    .bind(id)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(leaf)
}

/// Inner nodes: categories with both a parent and children.
pub async fn middle(pool: &SqlitePool) -> Result<Vec<Category>, AppError> {
    let list = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, parent_id
        FROM category
        WHERE parent_id IS NOT NULL
          AND id IN (SELECT parent_id FROM category WHERE parent_id IS NOT NULL)
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(list)
}

/// Top-level categories with the question count of their whole subtree.
pub async fn roots_with_question_count(pool: &SqlitePool) -> Result<Vec<CategoryWithCount>, AppError> {
    let list = sqlx::query_as::<_, CategoryWithCount>(
        r#"
        WITH RECURSIVE tree(root_id, id) AS (
            SELECT id, id FROM category WHERE parent_id IS NULL
            UNION ALL
            SELECT t.root_id, c.id FROM category c JOIN tree t ON c.parent_id = t.id
        )
        SELECT r.id, r.name, r.parent_id, COUNT(q.id) AS questioncount
        FROM category r
        JOIN tree t ON t.root_id = r.id
        LEFT JOIN question q ON q.category_id = t.id
        GROUP BY r.id, r.name, r.parent_id
        ORDER BY r.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(list)
}

pub async fn questions(pool: &SqlitePool, id: i64) -> Result<Vec<Question>, AppError> {
    let list = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, questiontext, answer, category_id, user_id, created
        FROM question
        WHERE category_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}

pub async fn question_count(pool: &SqlitePool, id: i64) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM question WHERE category_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn total_question_count(pool: &SqlitePool) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM question")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
