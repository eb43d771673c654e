// src/db/ticket_repo.rs

use rust_decimal::Decimal;
use sqlx::{Postgres, Executor};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::orders::{Ticket, TicketStatus},
};

// Existe no máximo uma linha de ingresso por (sessão, assento). A linha é
// reaproveitada quando o assento volta a ser reservado depois de cancelado.
// Sem pool própria: toda operação roda dentro da transação de quem chama.
#[derive(Clone, Default)]
pub struct TicketRepository;

impl TicketRepository {
    pub fn new() -> Self {
        Self
    }

    // Cria o ingresso RESERVED se o assento ainda não tem linha nesta sessão.
    // Retorna None quando a linha já existia (nada foi inserido).
    pub async fn insert_if_absent<'e, E>(
        &self,
        executor: E,
        showtime_id: Uuid,
        seat_id: Uuid,
        customer_id: Uuid,
        price: Decimal,
    ) -> Result<Option<Ticket>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ticket = sqlx::query_as!(
            Ticket,
            r#"
            INSERT INTO tickets (showtime_id, seat_id, customer_id, status, price)
            VALUES ($1, $2, $3, 'RESERVED', $4)
            ON CONFLICT (showtime_id, seat_id) DO NOTHING
            RETURNING
                id, showtime_id, seat_id, customer_id,
                status as "status: TicketStatus",
                price, created_at, updated_at
            "#,
            showtime_id,
            seat_id,
            customer_id,
            price
        )
            .fetch_optional(executor)
            .await?;

        Ok(ticket)
    }

    // Trava a linha até o fim da transação
    pub async fn lock<'e, E>(
        &self,
        executor: E,
        showtime_id: Uuid,
        seat_id: Uuid,
    ) -> Result<Ticket, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ticket = sqlx::query_as!(
            Ticket,
            r#"
            SELECT
                id, showtime_id, seat_id, customer_id,
                status as "status: TicketStatus",
                price, created_at, updated_at
            FROM tickets
            WHERE showtime_id = $1 AND seat_id = $2
            FOR UPDATE
            "#,
            showtime_id,
            seat_id
        )
            .fetch_one(executor)
            .await?;

        Ok(ticket)
    }

    // Reaproveita um ingresso cancelado para um novo cliente
    pub async fn reclaim<'e, E>(
        &self,
        executor: E,
        ticket_id: Uuid,
        customer_id: Uuid,
        price: Decimal,
    ) -> Result<Ticket, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ticket = sqlx::query_as!(
            Ticket,
            r#"
            UPDATE tickets
            SET status = 'RESERVED', customer_id = $2, price = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, showtime_id, seat_id, customer_id,
                status as "status: TicketStatus",
                price, created_at, updated_at
            "#,
            ticket_id,
            customer_id,
            price
        )
            .fetch_one(executor)
            .await?;

        Ok(ticket)
    }

    pub async fn mark_paid_for_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query!(
            r#"
            UPDATE tickets
            SET status = 'PAID', updated_at = NOW()
            WHERE id IN (SELECT ticket_id FROM order_tickets WHERE order_id = $1)
            "#,
            order_id
        )
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    // Libera os assentos do pedido: CANCELED e sem cliente
    pub async fn release_for_order<'e, E>(&self, executor: E, order_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query!(
            r#"
            UPDATE tickets
            SET status = 'CANCELED', customer_id = NULL, updated_at = NOW()
            WHERE id IN (SELECT ticket_id FROM order_tickets WHERE order_id = $1)
            "#,
            order_id
        )
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
