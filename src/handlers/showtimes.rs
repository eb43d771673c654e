// src/handlers/showtimes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        catalog::{SeatMap, ShowtimeDetail},
        orders::Order,
    },
};

// ---
// Payload: ReserveSeats
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReserveSeatsPayload {
    // Ids dos assentos marcados no mapa. Lista vazia é erro de validação.
    #[serde(default)]
    pub seats: Vec<Uuid>,
}

// GET /api/showtimes/{id}
#[utoipa::path(
    get,
    path = "/api/showtimes/{showtime_id}",
    tag = "Catalog",
    responses(
        (status = 200, description = "Sessão com filme, sala e cinema", body = ShowtimeDetail),
        (status = 404, description = "Sessão não encontrada")
    ),
    params(
        ("showtime_id" = Uuid, Path, description = "ID da Sessão")
    )
)]
pub async fn showtime_detail(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(showtime_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let showtime = app_state
        .catalog_service
        .showtime_detail(&app_state.db_pool, showtime_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(showtime))
}

// GET /api/showtimes/{id}/seats
#[utoipa::path(
    get,
    path = "/api/showtimes/{showtime_id}/seats",
    tag = "Reservation",
    responses(
        (status = 200, description = "Mapa de assentos da sessão", body = SeatMap),
        (status = 404, description = "Sessão não encontrada")
    ),
    params(
        ("showtime_id" = Uuid, Path, description = "ID da Sessão")
    ),
    security(("api_jwt" = []))
)]
pub async fn seat_map(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(showtime_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let map = app_state
        .reservation_service
        .seat_map(&app_state.db_pool, showtime_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(map))
}

// POST /api/showtimes/{id}/seats
#[utoipa::path(
    post,
    path = "/api/showtimes/{showtime_id}/seats",
    tag = "Reservation",
    request_body = ReserveSeatsPayload,
    responses(
        (status = 201, description = "Assentos reservados num novo pedido PENDING", body = Order),
        (status = 400, description = "Nenhum assento, ou assento de outra sala"),
        (status = 404, description = "Sessão não encontrada"),
        (status = 409, description = "Assento já ocupado")
    ),
    params(
        ("showtime_id" = Uuid, Path, description = "ID da Sessão")
    ),
    security(("api_jwt" = []))
)]
pub async fn reserve_seats(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(showtime_id): Path<Uuid>,
    Json(payload): Json<ReserveSeatsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .reservation_service
        .reserve_seats(&app_state.db_pool, user.id, showtime_id, &payload.seats)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}
