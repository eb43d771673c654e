// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
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
    models::orders::{Order, OrderActionResponse, OrderConfirmation, OrderDetail, PaymentMethod},
};

// ---
// Payload: ConfirmOrder
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderPayload {
    pub payment_method: PaymentMethod,
}

// GET /api/orders/{id}/confirm
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/confirm",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido com linhas e formas de pagamento", body = OrderConfirmation),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_view(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .order_service
        .confirmation_view(&app_state.db_pool, &locale.0, user.id, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(view))
}

// POST /api/orders/{id}/confirm
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/confirm",
    tag = "Orders",
    request_body = ConfirmOrderPayload,
    responses(
        (status = 200, description = "Pedido pago; e-mail de confirmação enviado", body = OrderActionResponse),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Pedido não está PENDING")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<ConfirmOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .order_service
        .confirm(&app_state.db_pool, &locale.0, &user, order_id, payload.payment_method)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate_with(
        &locale.0,
        "message.order_paid",
        &[("order", detail.header.display_id.to_string())],
    );

    Ok(Json(OrderActionResponse { message, order: detail.header }))
}

// GET /api/orders/{id}/success
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/success",
    tag = "Orders",
    responses(
        (status = 200, description = "Resumo do pedido com totais", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn success(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .order_service
        .order_detail(&app_state.db_pool, user.id, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(detail))
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedidos do usuário, do mais recente ao mais antigo", body = [Order])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .order_service
        .list_orders(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(orders))
}

// POST /api/orders/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/cancel",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido cancelado e assentos liberados", body = OrderActionResponse),
        (status = 404, description = "Pedido inexistente ou que não está PENDING")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do Pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .cancel(&app_state.db_pool, user.id, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate_with(
        &locale.0,
        "message.order_canceled",
        &[("order", order.display_id.to_string())],
    );

    Ok(Json(OrderActionResponse { message, order }))
}
