// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// O erro de domínio. Os serviços e repositórios só conhecem este tipo;
// a tradução para HTTP acontece em `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    // Chave do recurso no catálogo de traduções ("showtime", "order", ...)
    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(&'static str),

    #[error("Assento indisponível: {0}")]
    SeatUnavailable(String),

    #[error("Assento fora da sala da sessão: {0}")]
    SeatNotInAuditorium(String),

    #[error("Pedido #{0} não está pendente")]
    OrderNotPending(i32),

    #[error("Pedido #{0} sem ingressos")]
    OrderHasNoTickets(i32),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que vai para o cliente: status + mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.message, "details": details }),
            None => json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::SeatNotInAuditorium(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::EmailAlreadyExists
            | AppError::SeatUnavailable(_)
            | AppError::OrderNotPending(_) => StatusCode::CONFLICT,
            AppError::UserNotFound
            | AppError::ResourceNotFound(_)
            | AppError::OrderHasNoTickets(_)
            | AppError::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro de domínio na resposta HTTP, no idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        let message = match &self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            // As mensagens dos payloads são chaves do catálogo;
                            // os parâmetros da regra (max, min) entram no texto
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            let args: Vec<(&str, String)> = e
                                .params
                                .iter()
                                .map(|(name, value)| match value.as_str() {
                                    Some(text) => (name.as_ref(), text.to_string()),
                                    None => (name.as_ref(), value.to_string()),
                                })
                                .collect();
                            store.translate_with(lang, key, &args)
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                return ApiError {
                    status,
                    message: store.translate(lang, "error.validation"),
                    details: Some(json!(details)),
                };
            }
            AppError::EmailAlreadyExists => store.translate(lang, "error.email_exists"),
            AppError::InvalidCredentials => store.translate(lang, "error.invalid_credentials"),
            AppError::InvalidToken => store.translate(lang, "error.invalid_token"),
            AppError::UserNotFound => store.translate(lang, "error.user_not_found"),
            AppError::ResourceNotFound(resource) => not_found(store, lang, resource),
            AppError::DatabaseError(sqlx::Error::RowNotFound) => not_found(store, lang, "record"),
            AppError::SeatUnavailable(seat) => {
                store.translate_with(lang, "error.seat_unavailable", &[("seat", seat.clone())])
            }
            AppError::SeatNotInAuditorium(seat) => {
                store.translate_with(lang, "error.seat_not_in_auditorium", &[("seat", seat.clone())])
            }
            AppError::OrderNotPending(order) => {
                store.translate_with(lang, "error.order_not_pending", &[("order", order.to_string())])
            }
            AppError::OrderHasNoTickets(order) => {
                store.translate_with(lang, "error.order_no_tickets", &[("order", order.to_string())])
            }

            // Todo o resto vira 500. O detalhe fica só no log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                store.translate(lang, "error.internal")
            }
        };

        ApiError { status, message, details: None }
    }
}

// Uma chave por recurso: cada idioma concorda o adjetivo com o substantivo
fn not_found(store: &I18nStore, lang: &str, resource: &str) -> String {
    store.translate(lang, &format!("error.not_found.{resource}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn store() -> I18nStore {
        I18nStore::load().unwrap()
    }

    #[test]
    fn statuses_follow_the_error_kind() {
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ResourceNotFound("order").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::SeatUnavailable("A-1".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::OrderNotPending(3).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::SeatNotInAuditorium("B-2".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::DatabaseError(sqlx::Error::RowNotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_resource_in_the_client_language() {
        let api = AppError::ResourceNotFound("showtime").to_api_error(&Locale("es".into()), &store());
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.message, "Función no encontrada.");
    }

    #[test]
    fn not_found_agrees_with_each_resource_gender() {
        let es = Locale("es".into());
        let pt = Locale("pt".into());
        let msg = |resource, locale: &Locale| AppError::ResourceNotFound(resource).to_api_error(locale, &store()).message;

        assert_eq!(msg("order", &es), "Orden no encontrada.");
        assert_eq!(msg("snack", &es), "Snack no encontrado.");
        assert_eq!(msg("page", &es), "Página no encontrada.");
        assert_eq!(msg("showtime", &pt), "Sessão não encontrada.");
        assert_eq!(msg("order", &pt), "Pedido não encontrado.");
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound)
                .to_api_error(&Locale("en".into()), &store())
                .message,
            "Record not found."
        );
    }

    #[test]
    fn seat_conflict_mentions_the_seat() {
        let api = AppError::SeatUnavailable("C-4".into()).to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.message, "Seat C-4 is no longer available.");
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("senha do banco: hunter2"))
            .to_api_error(&Locale("en".into()), &store());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.message.contains("hunter2"));
    }

    #[test]
    fn validation_details_are_translated_per_field() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("validation.seats_required".into());
        errors.add("seats", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["seats"][0], "Selecione pelo menos um assento.");
    }

    #[test]
    fn validation_details_interpolate_rule_params() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("validation.snack_qty".into());
        err.add_param("max".into(), &99);
        errors.add("qty", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("es".into()), &store());
        let details = api.details.unwrap();
        assert_eq!(details["qty"][0], "Puedes añadir como máximo 99 unidades de un snack a la vez.");
    }
}
