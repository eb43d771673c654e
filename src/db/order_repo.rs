// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::orders::{Order, OrderSnackLine, OrderStatus, OrderTicketLine, PaymentMethod, TicketStatus},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PEDIDOS
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        total_amount: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as!(
            Order,
            r#"
            INSERT INTO orders (customer_id, status, total_amount)
            VALUES ($1, 'PENDING', $2)
            RETURNING
                id, display_id, customer_id,
                status as "status: OrderStatus",
                total_amount,
                payment_method as "payment_method: PaymentMethod",
                paid_at, created_at, updated_at
            "#,
            customer_id,
            total_amount
        )
            .fetch_one(executor)
            .await?;

        Ok(order)
    }

    // O pedido PENDING mais recente do cliente, travado para a transação
    pub async fn find_latest_pending_for_update<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as!(
            Order,
            r#"
            SELECT
                id, display_id, customer_id,
                status as "status: OrderStatus",
                total_amount,
                payment_method as "payment_method: PaymentMethod",
                paid_at, created_at, updated_at
            FROM orders
            WHERE customer_id = $1 AND status = 'PENDING'
            ORDER BY created_at DESC
            LIMIT 1
            FOR UPDATE
            "#,
            customer_id
        )
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    // Pedido do usuário (via cliente). Pedido de outro usuário = não encontrado.
    pub async fn find_for_user<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as!(
            Order,
            r#"
            SELECT
                o.id, o.display_id, o.customer_id,
                o.status as "status: OrderStatus",
                o.total_amount,
                o.payment_method as "payment_method: PaymentMethod",
                o.paid_at, o.created_at, o.updated_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1 AND c.user_id = $2
            "#,
            order_id,
            user_id
        )
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    // Mesma busca, travando a linha
    pub async fn find_for_user_for_update<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as!(
            Order,
            r#"
            SELECT
                o.id, o.display_id, o.customer_id,
                o.status as "status: OrderStatus",
                o.total_amount,
                o.payment_method as "payment_method: PaymentMethod",
                o.paid_at, o.created_at, o.updated_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1 AND c.user_id = $2
            FOR UPDATE OF o
            "#,
            order_id,
            user_id
        )
            .fetch_optional(executor)
            .await?;

        Ok(order)
    }

    // Do mais recente para o mais antigo
    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as!(
            Order,
            r#"
            SELECT
                id, display_id, customer_id,
                status as "status: OrderStatus",
                total_amount,
                payment_method as "payment_method: PaymentMethod",
                paid_at, created_at, updated_at
            FROM orders
            WHERE customer_id = $1
            ORDER BY created_at DESC
            "#,
            customer_id
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    pub async fn mark_paid<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        payment_method: PaymentMethod,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as!(
            Order,
            r#"
            UPDATE orders
            SET status = 'PAID', payment_method = $2, paid_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, display_id, customer_id,
                status as "status: OrderStatus",
                total_amount,
                payment_method as "payment_method: PaymentMethod",
                paid_at, created_at, updated_at
            "#,
            order_id,
            payment_method as PaymentMethod
        )
            .fetch_one(executor)
            .await?;

        Ok(order)
    }

    pub async fn mark_canceled<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as!(
            Order,
            r#"
            UPDATE orders
            SET status = 'CANCELED', updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, display_id, customer_id,
                status as "status: OrderStatus",
                total_amount,
                payment_method as "payment_method: PaymentMethod",
                paid_at, created_at, updated_at
            "#,
            order_id
        )
            .fetch_one(executor)
            .await?;

        Ok(order)
    }

    // Recalcula o cache de total a partir das linhas do pedido
    pub async fn recalculate_total<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as!(
            Order,
            r#"
            UPDATE orders
            SET total_amount =
                COALESCE((
                    SELECT SUM(t.price)
                    FROM order_tickets ot
                    JOIN tickets t ON t.id = ot.ticket_id
                    WHERE ot.order_id = $1
                ), 0)
                + COALESCE((
                    SELECT SUM(os.qty * os.price)
                    FROM order_snacks os
                    WHERE os.order_id = $1
                ), 0),
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, display_id, customer_id,
                status as "status: OrderStatus",
                total_amount,
                payment_method as "payment_method: PaymentMethod",
                paid_at, created_at, updated_at
            "#,
            order_id
        )
            .fetch_one(executor)
            .await?;

        Ok(order)
    }

    // =========================================================================
    //  LINHAS (INGRESSOS E SNACKS)
    // =========================================================================

    pub async fn link_ticket<'e, E>(&self, executor: E, order_id: Uuid, ticket_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query!(
            "INSERT INTO order_tickets (order_id, ticket_id) VALUES ($1, $2)",
            order_id,
            ticket_id
        )
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn unlink_tickets<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query!("DELETE FROM order_tickets WHERE order_id = $1", order_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // get_or_create da linha: se o snack já está no pedido, soma a quantidade
    // (limitada a `max_qty`) e mantém o preço da primeira inclusão.
    pub async fn add_snack_line<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        snack_id: Uuid,
        qty: i32,
        price: Decimal,
        max_qty: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query!(
            r#"
            INSERT INTO order_snacks (order_id, snack_id, qty, price)
            VALUES ($1, $2, LEAST($3::INTEGER, $5::INTEGER), $4)
            ON CONFLICT (order_id, snack_id)
            DO UPDATE SET qty = LEAST(order_snacks.qty + EXCLUDED.qty, $5::INTEGER)
            "#,
            order_id,
            snack_id,
            qty,
            price,
            max_qty
        )
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn list_ticket_lines<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderTicketLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as!(
            OrderTicketLine,
            r#"
            SELECT
                t.id AS ticket_id, t.showtime_id, t.seat_id,
                s.row_label, s.col,
                t.status as "status: TicketStatus",
                t.price
            FROM order_tickets ot
            JOIN tickets t ON t.id = ot.ticket_id
            JOIN seats s ON s.id = t.seat_id
            WHERE ot.order_id = $1
            ORDER BY s.row_label, s.col
            "#,
            order_id
        )
            .fetch_all(executor)
            .await?;

        Ok(lines)
    }

    pub async fn list_snack_lines<'e, E>(&self, executor: E, order_id: Uuid) -> Result<Vec<OrderSnackLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as!(
            OrderSnackLine,
            r#"
            SELECT os.id, os.snack_id, si.name, os.qty, os.price
            FROM order_snacks os
            JOIN snack_items si ON si.id = os.snack_id
            WHERE os.order_id = $1
            ORDER BY os.created_at
            "#,
            order_id
        )
            .fetch_all(executor)
            .await?;

        Ok(lines)
    }
}
