// src/handlers/snacks.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        pagination::{Page, PageQuery},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{orders::Order, snacks::SnackItem},
    services::snack_service::MAX_SNACK_QTY,
};

// ---
// Payload: AddSnack
// ---
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct AddSnackPayload {
    // Ausente ou menor que 1 vira 1
    #[validate(range(max = MAX_SNACK_QTY, message = "validation.snack_qty"))]
    #[schema(example = 2, maximum = 99)]
    pub qty: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnackAddedResponse {
    #[schema(example = "Added 2 × Palomitas grandes to your order #1024.")]
    pub message: String,
    pub qty: i32,
    pub snack: SnackItem,
    pub order: Order,
}

// GET /api/snacks?page=N
#[utoipa::path(
    get,
    path = "/api/snacks",
    tag = "Snacks",
    params(PageQuery),
    responses(
        (status = 200, description = "Snacks disponíveis, 12 por página", body = Page<SnackItem>),
        (status = 404, description = "Página inexistente")
    )
)]
pub async fn list_snacks(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page_number = query
        .number()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let page = app_state
        .snack_service
        .list_available(page_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}

// GET /api/snacks/{id}
#[utoipa::path(
    get,
    path = "/api/snacks/{snack_id}",
    tag = "Snacks",
    responses(
        (status = 200, description = "Detalhe do snack", body = SnackItem),
        (status = 404, description = "Snack não encontrado")
    ),
    params(
        ("snack_id" = Uuid, Path, description = "ID do Snack")
    ),
    security(("api_jwt" = []))
)]
pub async fn snack_detail(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    Path(snack_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let snack = app_state
        .snack_service
        .get_snack(&app_state.db_pool, snack_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(snack))
}

// POST /api/snacks/{id}
#[utoipa::path(
    post,
    path = "/api/snacks/{snack_id}",
    tag = "Snacks",
    request_body = AddSnackPayload,
    responses(
        (status = 200, description = "Snack adicionado ao pedido PENDING", body = SnackAddedResponse),
        (status = 400, description = "Quantidade acima do permitido"),
        (status = 404, description = "Snack não encontrado ou indisponível")
    ),
    params(
        ("snack_id" = Uuid, Path, description = "ID do Snack")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_snack(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(snack_id): Path<Uuid>,
    payload: Option<Json<AddSnackPayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.unwrap_or_default();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let added = app_state
        .snack_service
        .add_to_order(&app_state.db_pool, user.id, snack_id, payload.qty)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate_with(
        &locale.0,
        "message.snack_added",
        &[
            ("qty", added.qty.to_string()),
            ("name", added.snack.name.clone()),
            ("order", added.order.display_id.to_string()),
        ],
    );

    Ok(Json(SnackAddedResponse {
        message,
        qty: added.qty,
        snack: added.snack,
        order: added.order,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_snack_payload_rejects_quantities_above_the_ceiling() {
        let ok = AddSnackPayload { qty: Some(MAX_SNACK_QTY) };
        assert!(ok.validate().is_ok());
        assert!(AddSnackPayload::default().validate().is_ok());

        let errors = AddSnackPayload { qty: Some(2_000_000) }.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields["qty"][0].message.as_deref(), Some("validation.snack_qty"));
    }

    #[test]
    fn oversized_quantity_becomes_a_localized_bad_request() {
        let errors = AddSnackPayload { qty: Some(i32::MAX) }.validate().unwrap_err();
        let store = crate::common::i18n::I18nStore::load().unwrap();

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store);

        assert_eq!(api.status, axum::http::StatusCode::BAD_REQUEST);
        let message = api.details.unwrap()["qty"][0].as_str().unwrap().to_string();
        assert!(message.starts_with("You can add at most 99"), "{message}");
    }
}
