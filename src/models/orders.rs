// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::catalog::seat_label;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ticket_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Reserved,
    Paid,
    Canceled,
}

impl TicketStatus {
    /// RESERVED e PAID ocupam o assento; CANCELED libera.
    pub fn holds_seat(self) -> bool {
        matches!(self, TicketStatus::Reserved | TicketStatus::Paid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Transfer];

    pub fn code(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
        }
    }
}

// --- Tabelas ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub showtime_id: Uuid,
    pub seat_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub status: TicketStatus,
    #[schema(example = "85.00")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[schema(example = 1024)]
    pub display_id: i32,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    #[schema(example = "235.00")]
    pub total_amount: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha de ingresso do pedido, já com o assento
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderTicketLine {
    pub ticket_id: Uuid,
    pub showtime_id: Uuid,
    pub seat_id: Uuid,
    pub row_label: String,
    pub col: i32,
    pub status: TicketStatus,
    pub price: Decimal,
}

impl OrderTicketLine {
    pub fn seat_label(&self) -> String {
        seat_label(&self.row_label, self.col)
    }
}

// Linha de snack do pedido, com o nome do snack
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnackLine {
    pub id: Uuid,
    pub snack_id: Uuid,
    pub name: String,
    pub qty: i32,
    pub price: Decimal,
}

impl OrderSnackLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}

// --- Totais ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub ticket_total: Decimal,
    pub snack_total: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// O total de um pedido é sempre a soma dos ingressos mais as linhas de snack.
    pub fn compute(tickets: &[OrderTicketLine], snacks: &[OrderSnackLine]) -> Self {
        let ticket_total: Decimal = tickets.iter().map(|t| t.price).sum();
        let snack_total: Decimal = snacks.iter().map(OrderSnackLine::line_total).sum();
        Self { ticket_total, snack_total, total: ticket_total + snack_total }
    }
}

// Pedido completo: cabeçalho, linhas e totais
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub tickets: Vec<OrderTicketLine>,
    pub snacks: Vec<OrderSnackLine>,
    pub has_tickets: bool,
    pub has_snacks: bool,
    pub ticket_total: Decimal,
    pub snack_total: Decimal,
}

impl OrderDetail {
    pub fn new(header: Order, tickets: Vec<OrderTicketLine>, snacks: Vec<OrderSnackLine>) -> Self {
        let totals = OrderTotals::compute(&tickets, &snacks);
        Self {
            header,
            has_tickets: !tickets.is_empty(),
            has_snacks: !snacks.is_empty(),
            ticket_total: totals.ticket_total,
            snack_total: totals.snack_total,
            tickets,
            snacks,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentChoice {
    pub value: PaymentMethod,
    pub label: String,
}

// Tela de confirmação: o pedido e as formas de pagamento
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order: OrderDetail,
    pub payment_choices: Vec<PaymentChoice>,
}

// Resposta das ações que no site viravam uma mensagem "flash"
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderActionResponse {
    #[schema(example = "Order #1024 canceled and seats released.")]
    pub message: String,
    pub order: Order,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn ticket_line(price: Decimal) -> OrderTicketLine {
        OrderTicketLine {
            ticket_id: Uuid::new_v4(),
            showtime_id: Uuid::new_v4(),
            seat_id: Uuid::new_v4(),
            row_label: "D".into(),
            col: 4,
            status: TicketStatus::Reserved,
            price,
        }
    }

    pub fn snack_line(name: &str, qty: i32, price: Decimal) -> OrderSnackLine {
        OrderSnackLine { id: Uuid::new_v4(), snack_id: Uuid::new_v4(), name: name.into(), qty, price }
    }

    pub fn order(status: OrderStatus, total: Decimal) -> Order {
        Order {
            id: Uuid::new_v4(),
            display_id: 42,
            customer_id: Uuid::new_v4(),
            status,
            total_amount: total,
            payment_method: None,
            paid_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}
