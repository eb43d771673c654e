// src/db/catalog_repo.rs

use sqlx::{PgPool, Postgres, Executor};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::catalog::{Seat, ShowtimeDetail},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SESSÕES
    // =========================================================================

    // Cartelera: somente filmes e cinemas ativos, por horário.
    // Sessão + filme + sala + cinema em uma só consulta.
    pub async fn list_showtimes(&self, limit: i64) -> Result<Vec<ShowtimeDetail>, AppError> {
        let showtimes = sqlx::query_as!(
            ShowtimeDetail,
            r#"
            SELECT
                s.id, s.start_time, s.base_price,
                m.id AS movie_id,
                m.title AS movie_title,
                m.synopsis AS movie_synopsis,
                m.duration_minutes AS movie_duration_minutes,
                m.rating AS movie_rating,
                m.poster_url AS movie_poster_url,
                a.id AS auditorium_id,
                a.name AS auditorium_name,
                c.id AS cinema_id,
                c.name AS cinema_name,
                c.address AS cinema_address
            FROM showtimes s
            JOIN movies m ON m.id = s.movie_id
            JOIN auditoriums a ON a.id = s.auditorium_id
            JOIN cinemas c ON c.id = a.cinema_id
            WHERE m.is_active AND c.is_active
            ORDER BY s.start_time ASC
            LIMIT $1
            "#,
            limit
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(showtimes)
    }

    pub async fn find_showtime<'e, E>(
        &self,
        executor: E,
        showtime_id: Uuid,
    ) -> Result<Option<ShowtimeDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let showtime = sqlx::query_as!(
            ShowtimeDetail,
            r#"
            SELECT
                s.id, s.start_time, s.base_price,
                m.id AS movie_id,
                m.title AS movie_title,
                m.synopsis AS movie_synopsis,
                m.duration_minutes AS movie_duration_minutes,
                m.rating AS movie_rating,
                m.poster_url AS movie_poster_url,
                a.id AS auditorium_id,
                a.name AS auditorium_name,
                c.id AS cinema_id,
                c.name AS cinema_name,
                c.address AS cinema_address
            FROM showtimes s
            JOIN movies m ON m.id = s.movie_id
            JOIN auditoriums a ON a.id = s.auditorium_id
            JOIN cinemas c ON c.id = a.cinema_id
            WHERE s.id = $1
            "#,
            showtime_id
        )
            .fetch_optional(executor)
            .await?;

        Ok(showtime)
    }

    // =========================================================================
    //  ASSENTOS
    // =========================================================================

    pub async fn list_seats<'e, E>(
        &self,
        executor: E,
        auditorium_id: Uuid,
    ) -> Result<Vec<Seat>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seats = sqlx::query_as!(
            Seat,
            r#"
            SELECT id, auditorium_id, row_label, col
            FROM seats
            WHERE auditorium_id = $1
            ORDER BY row_label, col
            "#,
            auditorium_id
        )
            .fetch_all(executor)
            .await?;

        Ok(seats)
    }

    // Busca os assentos pedidos que pertencem à sala. Os que faltarem no
    // resultado não são desta sala (ou não existem).
    pub async fn find_seats_in_auditorium<'e, E>(
        &self,
        executor: E,
        auditorium_id: Uuid,
        seat_ids: &[Uuid],
    ) -> Result<Vec<Seat>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seats = sqlx::query_as!(
            Seat,
            r#"
            SELECT id, auditorium_id, row_label, col
            FROM seats
            WHERE auditorium_id = $1 AND id = ANY($2)
            ORDER BY row_label, col
            "#,
            auditorium_id,
            seat_ids
        )
            .fetch_all(executor)
            .await?;

        Ok(seats)
    }

    // Assentos ocupados (RESERVED ou PAID) na sessão
    pub async fn taken_seat_ids<'e, E>(
        &self,
        executor: E,
        showtime_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar!(
            r#"
            SELECT seat_id
            FROM tickets
            WHERE showtime_id = $1 AND status IN ('RESERVED', 'PAID')
            "#,
            showtime_id
        )
            .fetch_all(executor)
            .await?;

        Ok(ids)
    }
}
