use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult, MessageBody},
    extract::{AppJson, RecipeId},
    recipes::{dto::RecipeFields, repo_types::Recipe},
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/recipes/category/:category", get(list_recipes_by_category))
}

#[instrument(skip(state, fields))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(fields): AppJson<RecipeFields>,
) -> AppResult<(StatusCode, Json<MessageBody>)> {
    let id = Recipe::create(&state.db, user_id, &fields)
        .await
        .map_err(|e| {
            if owner_missing(&e) {
                warn!(user_id, "token refers to a missing user");
                return AppError::Unauthorized("User not found".into());
            }
            AppError::from(e)
        })?;
    info!(user_id, recipe_id = id, "recipe created");
    Ok((
        StatusCode::CREATED,
        MessageBody::new("Recipe created successfully"),
    ))
}

/// The insert named an owner the users table does not have: the token is
/// valid but its user is gone.
fn owner_missing(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Recipe>>> {
    let recipes = Recipe::list_by_user(&state.db, user_id).await?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn list_recipes_by_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(category): Path<String>,
) -> AppResult<Json<Vec<Recipe>>> {
    let recipes = Recipe::list_by_category(&state.db, user_id, &category).await?;
    if recipes.is_empty() {
        return Err(AppError::NotFound(format!(
            "No recipes found in category: {category}"
        )));
    }
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecipeId(id): RecipeId,
) -> AppResult<Json<Recipe>> {
    Recipe::find_owned(&state.db, user_id, id)
        .await?
        .map(Json)
        .ok_or_else(AppError::recipe_not_found)
}

#[instrument(skip(state, fields))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecipeId(id): RecipeId,
    AppJson(fields): AppJson<RecipeFields>,
) -> AppResult<Json<MessageBody>> {
    if !Recipe::update_owned(&state.db, user_id, id, &fields).await? {
        return Err(AppError::recipe_not_found());
    }
    info!(user_id, recipe_id = id, "recipe updated");
    Ok(MessageBody::new("Recipe updated successfully"))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    RecipeId(id): RecipeId,
) -> AppResult<Json<MessageBody>> {
    if !Recipe::delete_owned(&state.db, user_id, id).await? {
        return Err(AppError::recipe_not_found());
    }
    info!(user_id, recipe_id = id, "recipe deleted");
    Ok(MessageBody::new("Recipe deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_foreign_key_failures_mean_a_missing_owner() {
        assert!(!owner_missing(&sqlx::Error::RowNotFound));
        assert!(!owner_missing(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn recipe_serializes_with_owner_and_nullable_rating() {
        let recipe = Recipe {
            id: 1,
            title: "Soup".into(),
            description: "Warm".into(),
            ingredients: "water".into(),
            preparation_steps: "boil".into(),
            cooking_time: 30,
            serving_size: 2,
            category: "Starter".into(),
            user_id: 9,
            rating: None,
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["user_id"], 9);
        assert!(json["rating"].is_null());
        assert_eq!(json["preparation_steps"], "boil");
    }
}
