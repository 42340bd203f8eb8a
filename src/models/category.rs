// src/models/category.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'category' table. Categories form a tree through
/// `parent_id`; a category without children is a "true child" (leaf).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

/// Category annotated with the number of questions in its whole subtree.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub questioncount: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryOverview {
    pub categories: Vec<CategoryWithCount>,
    pub total_questions: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub parent_id: Option<i64>,
}
