// src/db/snack_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;
use crate::{common::error::AppError, models::snacks::SnackItem};

#[derive(Clone)]
pub struct SnackRepository {
    pool: PgPool,
}

impl SnackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn count_available(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar!(
            r#"SELECT COUNT(*) as "count!" FROM snack_items WHERE is_available"#
        )
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    // Lista paginada, em ordem alfabética
    pub async fn list_available(&self, limit: i64, offset: i64) -> Result<Vec<SnackItem>, AppError> {
        let snacks = sqlx::query_as!(
            SnackItem,
            r#"
            SELECT
                si.id, si.category_id, sc.name as "category_name?",
                si.name, si.description, si.price, si.image_url, si.is_available,
                si.created_at, si.updated_at
            FROM snack_items si
            LEFT JOIN snack_categories sc ON sc.id = si.category_id
            WHERE si.is_available
            ORDER BY si.name ASC
            LIMIT $1 OFFSET $2
            "#,
            limit,
            offset
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(snacks)
    }

    // Destaques da home: os atualizados mais recentemente
    pub async fn list_featured(&self, limit: i64) -> Result<Vec<SnackItem>, AppError> {
        let snacks = sqlx::query_as!(
            SnackItem,
            r#"
            SELECT
                si.id, si.category_id, sc.name as "category_name?",
                si.name, si.description, si.price, si.image_url, si.is_available,
                si.created_at, si.updated_at
            FROM snack_items si
            LEFT JOIN snack_categories sc ON sc.id = si.category_id
            WHERE si.is_available
            ORDER BY si.updated_at DESC
            LIMIT $1
            "#,
            limit
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(snacks)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        snack_id: Uuid,
    ) -> Result<Option<SnackItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let snack = sqlx::query_as!(
            SnackItem,
            r#"
            SELECT
                si.id, si.category_id, sc.name as "category_name?",
                si.name, si.description, si.price, si.image_url, si.is_available,
                si.created_at, si.updated_at
            FROM snack_items si
            LEFT JOIN snack_categories sc ON sc.id = si.category_id
            WHERE si.id = $1
            "#,
            snack_id
        )
            .fetch_optional(executor)
            .await?;

        Ok(snack)
    }
}
