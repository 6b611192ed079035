use serde::Serialize;
use sqlx::FromRow;

/// Recipe row as stored and as returned to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub ingredients: String,
    pub preparation_steps: String,
    pub cooking_time: i32,
    pub serving_size: i32,
    pub category: String,
    pub user_id: i32,
    pub rating: Option<f64>,
}
