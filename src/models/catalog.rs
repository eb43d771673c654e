// src/models/catalog.rs

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Assentos ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: Uuid,
    pub auditorium_id: Uuid,
    #[schema(example = "C")]
    pub row_label: String,
    #[schema(example = 7)]
    pub col: i32,
}

impl Seat {
    /// Rótulo impresso no ingresso: "C-7"
    pub fn label(&self) -> String {
        seat_label(&self.row_label, self.col)
    }
}

pub fn seat_label(row_label: &str, col: i32) -> String {
    format!("{row_label}-{col}")
}

// --- Sessões ---

// Sessão já com filme, sala e cinema (o equivalente a um select_related).
// É usada pela cartelera, pelo detalhe, pelo mapa de assentos e pelo PDF.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShowtimeDetail {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    #[schema(example = "85.00")]
    pub base_price: Decimal,

    pub movie_id: Uuid,
    #[schema(example = "Dune: Part Two")]
    pub movie_title: String,
    pub movie_synopsis: Option<String>,
    pub movie_duration_minutes: Option<i32>,
    #[schema(example = "B")]
    pub movie_rating: Option<String>,
    pub movie_poster_url: Option<String>,

    pub auditorium_id: Uuid,
    #[schema(example = "Sala 3")]
    pub auditorium_name: String,

    pub cinema_id: Uuid,
    #[schema(example = "Cine Apizaco Centro")]
    pub cinema_name: String,
    pub cinema_address: Option<String>,
}

// --- Mapa de assentos ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatCell {
    pub id: Uuid,
    pub col: i32,
    pub label: String,
    pub taken: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatRow {
    pub row: String,
    pub seats: Vec<SeatCell>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub showtime: ShowtimeDetail,
    pub no_seats: bool,
    pub rows: Vec<SeatRow>,
}

impl SeatMap {
    /// Agrupa os assentos por fileira. `seats` deve vir ordenado por (fileira, coluna);
    /// `taken` são os assentos com ingresso RESERVED ou PAID na sessão.
    pub fn build(showtime: ShowtimeDetail, seats: Vec<Seat>, taken: &HashSet<Uuid>) -> Self {
        let mut rows: Vec<SeatRow> = Vec::new();

        for seat in seats {
            let cell = SeatCell {
                id: seat.id,
                col: seat.col,
                label: seat.label(),
                taken: taken.contains(&seat.id),
            };
            match rows.last_mut() {
                Some(current) if current.row == seat.row_label => current.seats.push(cell),
                _ => {
                    rows.push(SeatRow { row: seat.row_label, seats: vec![cell] });
                }
            }
        }

        Self { showtime, no_seats: rows.is_empty(), rows }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{seat, showtime};
    use super::*;

    #[test]
    fn seats_are_grouped_by_row_in_order() {
        let show = showtime();
        let aud = show.auditorium_id;
        let seats = vec![seat(aud, "A", 1), seat(aud, "A", 2), seat(aud, "B", 1)];
        let taken: HashSet<Uuid> = [seats[1].id].into_iter().collect();

        let map = SeatMap::build(show, seats, &taken);

        assert!(!map.no_seats);
        assert_eq!(map.rows.len(), 2);
        assert_eq!(map.rows[0].row, "A");
        assert_eq!(map.rows[0].seats.len(), 2);
        assert!(!map.rows[0].seats[0].taken);
        assert!(map.rows[0].seats[1].taken);
        assert_eq!(map.rows[1].seats[0].label, "B-1");
    }

    #[test]
    fn auditorium_without_seats_is_flagged() {
        let map = SeatMap::build(showtime(), Vec::new(), &HashSet::new());
        assert!(map.no_seats);
        assert!(map.rows.is_empty());
    }
}
