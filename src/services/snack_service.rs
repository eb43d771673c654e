// src/services/snack_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageWindow},
    },
    db::{CustomerRepository, OrderRepository, SnackRepository},
    models::{orders::Order, snacks::SnackItem},
};

pub const SNACKS_PER_PAGE: i64 = 12;

// Teto por inclusão e também da linha acumulada no pedido
pub const MAX_SNACK_QTY: i32 = 99;

// Quantidade ausente vale 1; valores fora de 1..=MAX_SNACK_QTY são trazidos para a faixa
pub fn normalize_quantity(qty: Option<i32>) -> i32 {
    qty.unwrap_or(1).clamp(1, MAX_SNACK_QTY)
}

#[derive(Debug)]
pub struct SnackAdded {
    pub order: Order,
    pub snack: SnackItem,
    pub qty: i32,
}

#[derive(Clone)]
pub struct SnackService {
    snack_repo: SnackRepository,
    customer_repo: CustomerRepository,
    order_repo: OrderRepository,
}

impl SnackService {
    pub fn new(snack_repo: SnackRepository, customer_repo: CustomerRepository, order_repo: OrderRepository) -> Self {
        Self { snack_repo, customer_repo, order_repo }
    }

    pub async fn list_available(&self, page: Option<i64>) -> Result<Page<SnackItem>, AppError> {
        let total = self.snack_repo.count_available().await?;
        let window = PageWindow::resolve(page, SNACKS_PER_PAGE, total)?;

        let items = self.snack_repo
            .list_available(window.per_page, window.offset())
            .await?;

        Ok(Page::new(items, window))
    }

    pub async fn get_snack<'e, E>(&self, executor: E, snack_id: Uuid) -> Result<SnackItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.snack_repo
            .find_by_id(executor, snack_id)
            .await?
            .ok_or(AppError::ResourceNotFound("snack"))
    }

    // Adiciona o snack ao pedido PENDING do cliente (ou a um novo) e recalcula o total
    pub async fn add_to_order<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        snack_id: Uuid,
        qty: Option<i32>,
    ) -> Result<SnackAdded, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let qty = normalize_quantity(qty);
        let mut tx = executor.begin().await?;

        // 1. Snack (indisponível conta como inexistente)
        let snack = self.snack_repo
            .find_by_id(&mut *tx, snack_id)
            .await?
            .filter(|s| s.is_available)
            .ok_or(AppError::ResourceNotFound("snack"))?;

        // 2. Perfil de cliente
        let customer = self.customer_repo.get_or_create_for_user(&mut *tx, user_id).await?;

        // 3. Pedido PENDING (ou um novo)
        let order = match self.order_repo.find_latest_pending_for_update(&mut *tx, customer.id).await? {
            Some(order) => order,
            None => self.order_repo.create(&mut *tx, customer.id, Decimal::ZERO).await?,
        };

        // 4. Linha de snack + total
        self.order_repo
            .add_snack_line(&mut *tx, order.id, snack.id, qty, snack.price, MAX_SNACK_QTY)
            .await?;
        let order = self.order_repo.recalculate_total(&mut *tx, order.id).await?;

        tx.commit().await?;

        tracing::info!(
            "🍿 {} × {} adicionado ao pedido #{} (total {})",
            qty, snack.name, order.display_id, order.total_amount
        );

        Ok(SnackAdded { order, snack, qty })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;
    use crate::db::seed;

    fn service(pool: &PgPool) -> SnackService {
        SnackService::new(
            SnackRepository::new(pool.clone()),
            CustomerRepository::new(pool.clone()),
            OrderRepository::new(pool.clone()),
        )
    }

    #[test]
    fn quantity_defaults_to_one() {
        assert_eq!(normalize_quantity(None), 1);
    }

    #[test]
    fn quantity_below_one_is_clamped() {
        assert_eq!(normalize_quantity(Some(0)), 1);
        assert_eq!(normalize_quantity(Some(-5)), 1);
        assert_eq!(normalize_quantity(Some(3)), 3);
    }

    #[test]
    fn quantity_above_the_ceiling_is_clamped() {
        assert_eq!(normalize_quantity(Some(MAX_SNACK_QTY)), MAX_SNACK_QTY);
        assert_eq!(normalize_quantity(Some(2_000_000)), MAX_SNACK_QTY);
        assert_eq!(normalize_quantity(Some(i32::MAX)), MAX_SNACK_QTY);
    }

    #[sqlx::test]
    async fn adding_the_same_snack_twice_accumulates_one_line(pool: PgPool) {
        let seeded = seed::cinema(&pool).await;
        let service = service(&pool);

        let first = service.add_to_order(&pool, seeded.user.id, seeded.snack_id, Some(2)).await.unwrap();
        let second = service.add_to_order(&pool, seeded.user.id, seeded.snack_id, None).await.unwrap();

        assert_eq!(first.order.id, second.order.id);
        assert_eq!(second.order.total_amount, seeded.snack_price * Decimal::from(3));

        let lines = OrderRepository::new(pool.clone())
            .list_snack_lines(&pool, second.order.id)
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].qty, 3);
    }

    #[sqlx::test]
    async fn accumulated_quantity_stops_at_the_ceiling(pool: PgPool) {
        let seeded = seed::cinema(&pool).await;
        let service = service(&pool);

        service.add_to_order(&pool, seeded.user.id, seeded.snack_id, Some(MAX_SNACK_QTY)).await.unwrap();
        let added = service
            .add_to_order(&pool, seeded.user.id, seeded.snack_id, Some(i32::MAX))
            .await
            .unwrap();

        assert_eq!(added.qty, MAX_SNACK_QTY);
        assert_eq!(added.order.total_amount, seeded.snack_price * Decimal::from(MAX_SNACK_QTY));

        let lines = OrderRepository::new(pool.clone())
            .list_snack_lines(&pool, added.order.id)
            .await
            .unwrap();
        assert_eq!(lines[0].qty, MAX_SNACK_QTY);
    }

    #[sqlx::test]
    async fn listing_pages_the_available_snacks(pool: PgPool) {
        seed::cinema(&pool).await;
        let service = service(&pool);

        let page = service.list_available(None).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].name, "Palomitas grandes");

        assert!(matches!(service.list_available(Some(2)).await, Err(AppError::ResourceNotFound("page"))));
    }
}
