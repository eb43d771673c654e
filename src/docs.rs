// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Catalog ---
        handlers::home::home,
        handlers::showtimes::showtime_detail,

        // --- Snacks ---
        handlers::snacks::list_snacks,
        handlers::snacks::snack_detail,
        handlers::snacks::add_snack,

        // --- Reservation ---
        handlers::showtimes::seat_map,
        handlers::showtimes::reserve_seats,

        // --- Orders ---
        handlers::orders::confirm_view,
        handlers::orders::confirm,
        handlers::orders::success,
        handlers::orders::list_orders,
        handlers::orders::cancel,

        // --- Tickets ---
        handlers::tickets::ticket_pdf,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catalog ---
            models::catalog::Seat,
            models::catalog::ShowtimeDetail,
            models::catalog::SeatCell,
            models::catalog::SeatRow,
            models::catalog::SeatMap,
            services::catalog_service::HomePage,

            // --- Snacks ---
            models::snacks::SnackItem,

            // --- Orders ---
            models::orders::TicketStatus,
            models::orders::OrderStatus,
            models::orders::PaymentMethod,
            models::orders::Order,
            models::orders::OrderTicketLine,
            models::orders::OrderSnackLine,
            models::orders::OrderDetail,
            models::orders::PaymentChoice,
            models::orders::OrderConfirmation,
            models::orders::OrderActionResponse,

            // --- Payloads ---
            handlers::showtimes::ReserveSeatsPayload,
            handlers::snacks::AddSnackPayload,
            handlers::snacks::SnackAddedResponse,
            handlers::orders::ConfirmOrderPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Catalog", description = "Cartelera e Sessões"),
        (name = "Snacks", description = "Dulcería: lista, detalhe e inclusão no pedido"),
        (name = "Reservation", description = "Mapa e Reserva de Assentos"),
        (name = "Orders", description = "Confirmação, Pagamento e Cancelamento de Pedidos"),
        (name = "Tickets", description = "Ingresso em PDF")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
