// src/db/customer_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;
use crate::{common::error::AppError, models::customer::Customer};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // get_or_create em uma única query. O DO UPDATE "vazio" existe só para
    // o RETURNING devolver a linha que já existia.
    pub async fn get_or_create_for_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as!(
            Customer,
            r#"
            INSERT INTO customers (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, created_at
            "#,
            user_id
        )
            .fetch_one(executor)
            .await?;

        Ok(customer)
    }

    // Versão fora de transação, direto na pool
    pub async fn ensure_for_user(&self, user_id: Uuid) -> Result<Customer, AppError> {
        self.get_or_create_for_user(&self.pool, user_id).await
    }
}
