// src/db/seed.rs

// Dados mínimos para os testes que rodam contra o banco: um cinema com uma
// sala de três assentos, uma sessão, um snack e dois usuários.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{db::UserRepository, models::auth::User};

pub struct Seeded {
    pub user: User,
    pub other_user: User,
    pub showtime_id: Uuid,
    pub base_price: Decimal,
    // A-1, A-2, A-3
    pub seats: Vec<Uuid>,
    pub snack_id: Uuid,
    pub snack_price: Decimal,
}

pub async fn cinema(pool: &PgPool) -> Seeded {
    let users = UserRepository::new(pool.clone());
    let user = users.create_user(pool, "cliente@cine.local", "hash").await.unwrap();
    let other_user = users.create_user(pool, "outro@cine.local", "hash").await.unwrap();

    let cinema_id = sqlx::query_scalar!(
        "INSERT INTO cinemas (name, address) VALUES ($1, $2) RETURNING id",
        "Cine Apizaco Centro",
        "Av. Juárez 100"
    )
        .fetch_one(pool)
        .await
        .unwrap();

    let auditorium_id = sqlx::query_scalar!(
        "INSERT INTO auditoriums (cinema_id, name) VALUES ($1, $2) RETURNING id",
        cinema_id,
        "Sala 1"
    )
        .fetch_one(pool)
        .await
        .unwrap();

    let mut seats = Vec::new();
    for col in 1..=3 {
        let seat_id = sqlx::query_scalar!(
            "INSERT INTO seats (auditorium_id, row_label, col) VALUES ($1, $2, $3) RETURNING id",
            auditorium_id,
            "A",
            col
        )
            .fetch_one(pool)
            .await
            .unwrap();
        seats.push(seat_id);
    }

    let movie_id = sqlx::query_scalar!(
        "INSERT INTO movies (title, duration_minutes) VALUES ($1, $2) RETURNING id",
        "Dune: Part Two",
        166
    )
        .fetch_one(pool)
        .await
        .unwrap();

    let base_price = Decimal::new(8500, 2);
    let showtime_id = sqlx::query_scalar!(
        r#"
        INSERT INTO showtimes (movie_id, auditorium_id, start_time, base_price)
        VALUES ($1, $2, NOW() + INTERVAL '1 day', $3)
        RETURNING id
        "#,
        movie_id,
        auditorium_id,
        base_price
    )
        .fetch_one(pool)
        .await
        .unwrap();

    let snack_price = Decimal::new(6500, 2);
    let snack_id = sqlx::query_scalar!(
        "INSERT INTO snack_items (name, price) VALUES ($1, $2) RETURNING id",
        "Palomitas grandes",
        snack_price
    )
        .fetch_one(pool)
        .await
        .unwrap();

    Seeded { user, other_user, showtime_id, base_price, seats, snack_id, snack_price }
}
