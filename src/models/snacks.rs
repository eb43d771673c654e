// src/models/snacks.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnackItem {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    #[schema(example = "Bebidas")]
    pub category_name: Option<String>,
    #[schema(example = "Palomitas grandes")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "65.00")]
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
