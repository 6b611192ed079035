use sqlx::PgPool;

use super::{dto::RecipeFields, repo_types::Recipe};

// Every query below is scoped by user_id: a recipe is invisible to anyone
// but its owner.
impl Recipe {
    pub async fn create(db: &PgPool, user_id: i32, f: &RecipeFields) -> sqlx::Result<i32> {
        let (id,) = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO recipes
                (title, description, ingredients, preparation_steps,
                 cooking_time, serving_size, category, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&f.title)
        .bind(&f.description)
        .bind(&f.ingredients)
        .bind(&f.preparation_steps)
        .bind(f.cooking_time)
        .bind(f.serving_size)
        .bind(&f.category)
        .bind(user_id)
        .fetch_one(db)
        .await?;
        Ok(id)
    }

    pub async fn list_by_user(db: &PgPool, user_id: i32) -> sqlx::Result<Vec<Recipe>> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, preparation_steps,
                   cooking_time, serving_size, category, user_id, rating
            FROM recipes
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Exact, case-sensitive match on category.
    pub async fn list_by_category(
        db: &PgPool,
        user_id: i32,
        category: &str,
    ) -> sqlx::Result<Vec<Recipe>> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, preparation_steps,
                   cooking_time, serving_size, category, user_id, rating
            FROM recipes
            WHERE user_id = $1 AND category = $2
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(category)
        .fetch_all(db)
        .await
    }

    pub async fn find_owned(db: &PgPool, user_id: i32, id: i32) -> sqlx::Result<Option<Recipe>> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, description, ingredients, preparation_steps,
                   cooking_time, serving_size, category, user_id, rating
            FROM recipes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Replaces the caller-editable fields; rating is left alone.
    /// Returns false when no recipe with this id belongs to the user.
    pub async fn update_owned(
        db: &PgPool,
        user_id: i32,
        id: i32,
        f: &RecipeFields,
    ) -> sqlx::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE recipes
               SET title = $1,
                   description = $2,
                   ingredients = $3,
                   preparation_steps = $4,
                   cooking_time = $5,
                   serving_size = $6,
                   category = $7
             WHERE id = $8 AND user_id = $9
            "#,
        )
        .bind(&f.title)
        .bind(&f.description)
        .bind(&f.ingredients)
        .bind(&f.preparation_steps)
        .bind(f.cooking_time)
        .bind(f.serving_size)
        .bind(&f.category)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn delete_owned(db: &PgPool, user_id: i32, id: i32) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
