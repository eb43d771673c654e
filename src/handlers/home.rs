// src/handlers/home.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    services::catalog_service::HomePage,
};

// GET /api/home
#[utoipa::path(
    get,
    path = "/api/home",
    tag = "Catalog",
    responses(
        (status = 200, description = "Cartelera e snacks em destaque", body = HomePage)
    )
)]
pub async fn home(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let page = app_state
        .catalog_service
        .home()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(page))
}
