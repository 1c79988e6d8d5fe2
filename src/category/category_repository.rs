use crate::error::Result;
use super::category_models::{Category, CategoryColor};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        description: &str,
        color: CategoryColor,
    ) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (user_id, name, description, color)
             VALUES ($1, $2, $3, $4)
             RETURNING *"
        )
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(color)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn find_all(&self, user_id: Uuid) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn find_by_id(&self, id: Uuid, user_id: Uuid) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND user_id = $2"
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn find_by_name(&self, user_id: Uuid, name: &str) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE user_id = $1 AND name = $2"
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        color: Option<CategoryColor>,
    ) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET
                name = COALESCE($1, name),
                description = COALESCE($2, description),
                color = COALESCE($3, color),
                updated_at = NOW()
             WHERE id = $4 AND user_id = $5
             RETURNING *"
        )
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn delete_with_tx(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}
