// src/services/reservation_service.rs

use std::collections::HashSet;

use rust_decimal::Decimal;
use sqlx::{Acquire, Postgres};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CustomerRepository, OrderRepository, TicketRepository},
    models::{
        catalog::SeatMap,
        orders::{Order, TicketStatus},
    },
};

// O que fazer com um ingresso que já existe para (sessão, assento)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClaim {
    // Estava cancelado: volta a ser RESERVED para o novo cliente
    Reclaim,
    // RESERVED ou PAID: o assento está ocupado
    Reject,
}

impl SeatClaim {
    pub fn for_existing(status: TicketStatus) -> Self {
        if status.holds_seat() { SeatClaim::Reject } else { SeatClaim::Reclaim }
    }
}

// Remove ids repetidos mantendo a ordem do pedido
pub fn unique_seat_ids(seat_ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    seat_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

pub fn seats_required() -> AppError {
    let mut errors = ValidationErrors::new();
    let mut err = ValidationError::new("length");
    err.message = Some("validation.seats_required".into());
    errors.add("seats", err);
    AppError::ValidationError(errors)
}

#[derive(Clone)]
pub struct ReservationService {
    catalog_repo: CatalogRepository,
    customer_repo: CustomerRepository,
    ticket_repo: TicketRepository,
    order_repo: OrderRepository,
}

impl ReservationService {
    pub fn new(
        catalog_repo: CatalogRepository,
        customer_repo: CustomerRepository,
        ticket_repo: TicketRepository,
        order_repo: OrderRepository,
    ) -> Self {
        Self { catalog_repo, customer_repo, ticket_repo, order_repo }
    }

    pub async fn seat_map<'e, E>(&self, executor: E, showtime_id: Uuid) -> Result<SeatMap, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let showtime = self.catalog_repo
            .find_showtime(&mut *conn, showtime_id)
            .await?
            .ok_or(AppError::ResourceNotFound("showtime"))?;

        let seats = self.catalog_repo.list_seats(&mut *conn, showtime.auditorium_id).await?;
        let taken: HashSet<Uuid> = self.catalog_repo
            .taken_seat_ids(&mut *conn, showtime_id)
            .await?
            .into_iter()
            .collect();

        Ok(SeatMap::build(showtime, seats, &taken))
    }

    // Reserva os assentos e cria um pedido PENDING com eles. Tudo ou nada:
    // um assento ocupado desfaz a transação inteira.
    pub async fn reserve_seats<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        showtime_id: Uuid,
        seat_ids: &[Uuid],
    ) -> Result<Order, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let seat_ids = unique_seat_ids(seat_ids);
        if seat_ids.is_empty() {
            return Err(seats_required());
        }

        let mut tx = executor.begin().await?;

        // 1. Sessão e cliente
        let showtime = self.catalog_repo
            .find_showtime(&mut *tx, showtime_id)
            .await?
            .ok_or(AppError::ResourceNotFound("showtime"))?;

        let customer = self.customer_repo.get_or_create_for_user(&mut *tx, user_id).await?;

        // 2. Todos os assentos precisam ser da sala da sessão
        let seats = self.catalog_repo
            .find_seats_in_auditorium(&mut *tx, showtime.auditorium_id, &seat_ids)
            .await?;

        if seats.len() != seat_ids.len() {
            let found: HashSet<Uuid> = seats.iter().map(|s| s.id).collect();
            let missing = seat_ids.iter().find(|id| !found.contains(id)).copied().unwrap_or_default();
            return Err(AppError::SeatNotInAuditorium(missing.to_string()));
        }

        // 3. get_or_create do ingresso de cada assento
        let mut ticket_ids = Vec::with_capacity(seats.len());
        for seat in &seats {
            let created = self.ticket_repo
                .insert_if_absent(&mut *tx, showtime.id, seat.id, customer.id, showtime.base_price)
                .await?;

            let ticket = match created {
                Some(ticket) => ticket,
                None => {
                    let existing = self.ticket_repo.lock(&mut *tx, showtime.id, seat.id).await?;
                    match SeatClaim::for_existing(existing.status) {
                        SeatClaim::Reclaim => {
                            self.ticket_repo
                                .reclaim(&mut *tx, existing.id, customer.id, showtime.base_price)
                                .await?
                        }
                        SeatClaim::Reject => {
                            tracing::warn!(
                                "💺 Assento {} já ocupado na sessão {} ({:?})",
                                seat.label(), showtime.id, existing.status
                            );
                            return Err(AppError::SeatUnavailable(seat.label()));
                        }
                    }
                }
            };
            ticket_ids.push(ticket.id);
        }

        // 4. Pedido com os ingressos
        let order = self.order_repo.create(&mut *tx, customer.id, Decimal::ZERO).await?;
        for ticket_id in &ticket_ids {
            self.order_repo.link_ticket(&mut *tx, order.id, *ticket_id).await?;
        }
        let order = self.order_repo.recalculate_total(&mut *tx, order.id).await?;

        tx.commit().await?;

        tracing::info!(
            "🎟️ Pedido #{} criado com {} assento(s) para a sessão {}",
            order.display_id, ticket_ids.len(), showtime.id
        );

        Ok(order)
    }
}
