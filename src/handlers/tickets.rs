// src/handlers/tickets.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

// GET /api/orders/{id}/ticket.pdf
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/ticket.pdf",
    tag = "Tickets",
    responses(
        (status = 200, description = "Ingresso em PDF com QR code", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Pedido não encontrado ou sem ingressos")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn ticket_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let ticket = app_state
        .document_service
        .generate_ticket_pdf(&app_state.db_pool, &locale.0, user.id, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"ticket_{}.pdf\"", ticket.display_id),
        ),
    ];

    Ok((headers, ticket.bytes).into_response())
}
