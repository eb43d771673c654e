// src/services/order_service.rs

use sqlx::{Acquire, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, i18n::I18nStore},
    db::{CustomerRepository, OrderRepository, TicketRepository},
    models::{
        auth::User,
        orders::{Order, OrderConfirmation, OrderDetail, OrderStatus, PaymentChoice, PaymentMethod},
    },
    services::email_service::EmailService,
};

pub fn payment_choices(store: &I18nStore, lang: &str) -> Vec<PaymentChoice> {
    PaymentMethod::ALL
        .iter()
        .map(|method| PaymentChoice {
            value: *method,
            label: store.translate(lang, &format!("payment.{}", method.code())),
        })
        .collect()
}

// Só pedidos PENDING podem ser pagos
pub fn ensure_payable(order: &Order) -> Result<(), AppError> {
    match order.status {
        OrderStatus::Pending => Ok(()),
        _ => Err(AppError::OrderNotPending(order.display_id)),
    }
}

// Só pedidos PENDING podem ser cancelados; os demais nem "existem" para o cancelamento
pub fn ensure_cancelable(order: &Order) -> Result<(), AppError> {
    match order.status {
        OrderStatus::Pending => Ok(()),
        _ => Err(AppError::ResourceNotFound("order")),
    }
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    ticket_repo: TicketRepository,
    customer_repo: CustomerRepository,
    email_service: EmailService,
    i18n_store: I18nStore,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        ticket_repo: TicketRepository,
        customer_repo: CustomerRepository,
        email_service: EmailService,
        i18n_store: I18nStore,
    ) -> Self {
        Self { order_repo, ticket_repo, customer_repo, email_service, i18n_store }
    }

    // Pedido com linhas e totais. Pedido de outro usuário = 404.
    pub async fn order_detail<'e, E>(&self, executor: E, user_id: Uuid, order_id: Uuid) -> Result<OrderDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let order = self.order_repo
            .find_for_user(&mut *conn, order_id, user_id)
            .await?
            .ok_or(AppError::ResourceNotFound("order"))?;

        let tickets = self.order_repo.list_ticket_lines(&mut *conn, order.id).await?;
        let snacks = self.order_repo.list_snack_lines(&mut *conn, order.id).await?;

        Ok(OrderDetail::new(order, tickets, snacks))
    }

    pub async fn confirmation_view<'e, E>(
        &self,
        executor: E,
        lang: &str,
        user_id: Uuid,
        order_id: Uuid,
    ) -> Result<OrderConfirmation, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let order = self.order_detail(executor, user_id, order_id).await?;

        Ok(OrderConfirmation {
            order,
            payment_choices: payment_choices(&self.i18n_store, lang),
        })
    }

    // Paga o pedido e, depois do commit, dispara o e-mail de confirmação
    pub async fn confirm<'e, E>(
        &self,
        executor: E,
        lang: &str,
        user: &User,
        order_id: Uuid,
        payment_method: PaymentMethod,
    ) -> Result<OrderDetail, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self.order_repo
            .find_for_user_for_update(&mut *tx, order_id, user.id)
            .await?
            .ok_or(AppError::ResourceNotFound("order"))?;

        ensure_payable(&order)?;

        let order = self.order_repo.mark_paid(&mut *tx, order.id, payment_method).await?;
        let paid_tickets = self.ticket_repo.mark_paid_for_order(&mut *tx, order.id).await?;

        let tickets = self.order_repo.list_ticket_lines(&mut *tx, order.id).await?;
        let snacks = self.order_repo.list_snack_lines(&mut *tx, order.id).await?;

        tx.commit().await?;

        tracing::info!(
            "💳 Pedido #{} pago ({:?}), {} ingresso(s) confirmados",
            order.display_id, payment_method, paid_tickets
        );

        let detail = OrderDetail::new(order, tickets, snacks);
        self.email_service.send_order_confirmation(lang, &user.email, &detail);

        Ok(detail)
    }

    pub async fn list_orders(&self, user_id: Uuid) -> Result<Vec<Order>, AppError> {
        let customer = self.customer_repo.ensure_for_user(user_id).await?;
        self.order_repo.list_for_customer(customer.id).await
    }

    // Cancela um pedido PENDING: libera os assentos, desfaz os vínculos e
    // recalcula o total. Tudo numa transação.
    pub async fn cancel<'e, E>(&self, executor: E, user_id: Uuid, order_id: Uuid) -> Result<Order, AppError>
    where
        E: Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self.order_repo
            .find_for_user_for_update(&mut *tx, order_id, user_id)
            .await?
            .ok_or(AppError::ResourceNotFound("order"))?;

        ensure_cancelable(&order)?;

        let released = self.ticket_repo.release_for_order(&mut *tx, order.id).await?;
        self.order_repo.unlink_tickets(&mut *tx, order.id).await?;
        self.order_repo.mark_canceled(&mut *tx, order.id).await?;
        let order = self.order_repo.recalculate_total(&mut *tx, order.id).await?;

        tx.commit().await?;

        tracing::info!("❌ Pedido #{} cancelado, {} assento(s) liberados", order.display_id, released);

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::{seed, CatalogRepository, SnackRepository},
        models::orders::{fixtures::order, TicketStatus},
        services::{
            email_service::LogMailer, reservation_service::ReservationService, snack_service::SnackService,
        },
    };
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    struct Services {
        reservations: ReservationService,
        snacks: SnackService,
        orders: OrderService,
    }

    fn services(pool: &PgPool) -> Services {
        let store = I18nStore::load().unwrap();
        let catalog_repo = CatalogRepository::new(pool.clone());
        let customer_repo = CustomerRepository::new(pool.clone());
        let order_repo = OrderRepository::new(pool.clone());

        Services {
            reservations: ReservationService::new(
                catalog_repo,
                customer_repo.clone(),
                TicketRepository::new(),
                order_repo.clone(),
            ),
            snacks: SnackService::new(SnackRepository::new(pool.clone()), customer_repo.clone(), order_repo.clone()),
            orders: OrderService::new(
                order_repo,
                TicketRepository::new(),
                customer_repo,
                EmailService::new(Arc::new(LogMailer), store.clone()),
                store,
            ),
        }
    }

    #[test]
    fn payment_choices_cover_every_method_with_localized_labels() {
        let store = I18nStore::load().unwrap();
        let choices = payment_choices(&store, "es");

        assert_eq!(choices.len(), PaymentMethod::ALL.len());
        assert_eq!(choices[0].value, PaymentMethod::Cash);
        assert_eq!(choices[0].label, "Efectivo");
        assert!(choices.iter().all(|c| !c.label.starts_with("payment.")));
    }

    #[test]
    fn only_pending_orders_can_be_paid() {
        assert!(ensure_payable(&order(OrderStatus::Pending, Decimal::ZERO)).is_ok());
        assert!(matches!(
            ensure_payable(&order(OrderStatus::Paid, Decimal::ZERO)),
            Err(AppError::OrderNotPending(42))
        ));
        assert!(matches!(
            ensure_payable(&order(OrderStatus::Canceled, Decimal::ZERO)),
            Err(AppError::OrderNotPending(42))
        ));
    }

    #[test]
    fn paid_or_canceled_orders_cannot_be_canceled() {
        assert!(ensure_cancelable(&order(OrderStatus::Pending, Decimal::ONE)).is_ok());
        for status in [OrderStatus::Paid, OrderStatus::Canceled] {
            assert!(matches!(
                ensure_cancelable(&order(status, Decimal::ONE)),
                Err(AppError::ResourceNotFound("order"))
            ));
        }
    }

    #[sqlx::test]
    async fn cancel_releases_seats_and_keeps_only_snacks_in_the_total(pool: PgPool) {
        let seeded = seed::cinema(&pool).await;
        let svc = services(&pool);
        let user = seeded.user.id;

        let reserved = svc.reservations
            .reserve_seats(&pool, user, seeded.showtime_id, &seeded.seats[..2])
            .await
            .unwrap();
        let with_snack = svc.snacks.add_to_order(&pool, user, seeded.snack_id, Some(2)).await.unwrap();
        assert_eq!(with_snack.order.id, reserved.id);
        assert_eq!(
            with_snack.order.total_amount,
            seeded.base_price * Decimal::from(2) + seeded.snack_price * Decimal::from(2)
        );

        let canceled = svc.orders.cancel(&pool, user, reserved.id).await.unwrap();

        assert_eq!(canceled.status, OrderStatus::Canceled);
        assert_eq!(canceled.total_amount, seeded.snack_price * Decimal::from(2));

        let tickets = TicketRepository::new();
        for seat in &seeded.seats[..2] {
            let ticket = tickets.lock(&pool, seeded.showtime_id, *seat).await.unwrap();
            assert_eq!(ticket.status, TicketStatus::Canceled);
            assert_eq!(ticket.customer_id, None);
        }

        let detail = svc.orders.order_detail(&pool, user, reserved.id).await.unwrap();
        assert!(detail.tickets.is_empty());
        assert_eq!(detail.snacks.len(), 1);
    }

    #[sqlx::test]
    async fn canceled_seat_is_reclaimed_by_the_next_reservation(pool: PgPool) {
        let seeded = seed::cinema(&pool).await;
        let svc = services(&pool);
        let seat = seeded.seats[0];
        let tickets = TicketRepository::new();

        let first = svc.reservations
            .reserve_seats(&pool, seeded.user.id, seeded.showtime_id, &[seat])
            .await
            .unwrap();
        let original = tickets.lock(&pool, seeded.showtime_id, seat).await.unwrap();
        svc.orders.cancel(&pool, seeded.user.id, first.id).await.unwrap();

        let second = svc.reservations
            .reserve_seats(&pool, seeded.other_user.id, seeded.showtime_id, &[seat])
            .await
            .unwrap();

        let reclaimed = tickets.lock(&pool, seeded.showtime_id, seat).await.unwrap();
        let other_customer = CustomerRepository::new(pool.clone())
            .ensure_for_user(seeded.other_user.id)
            .await
            .unwrap();
        assert_eq!(reclaimed.id, original.id);
        assert_eq!(reclaimed.status, TicketStatus::Reserved);
        assert_eq!(reclaimed.customer_id, Some(other_customer.id));
        assert_eq!(second.total_amount, seeded.base_price);
    }

    #[sqlx::test]
    async fn confirm_pays_the_order_and_its_tickets_once(pool: PgPool) {
        let seeded = seed::cinema(&pool).await;
        let svc = services(&pool);

        let reserved = svc.reservations
            .reserve_seats(&pool, seeded.user.id, seeded.showtime_id, &[seeded.seats[2]])
            .await
            .unwrap();

        let paid = svc.orders
            .confirm(&pool, "en", &seeded.user, reserved.id, PaymentMethod::Card)
            .await
            .unwrap();

        assert_eq!(paid.header.status, OrderStatus::Paid);
        assert_eq!(paid.header.payment_method, Some(PaymentMethod::Card));
        assert!(paid.header.paid_at.is_some());
        assert!(paid.tickets.iter().all(|t| t.status == TicketStatus::Paid));

        let again = svc.orders
            .confirm(&pool, "en", &seeded.user, reserved.id, PaymentMethod::Cash)
            .await;
        assert!(matches!(again, Err(AppError::OrderNotPending(_))));

        let cancel = svc.orders.cancel(&pool, seeded.user.id, reserved.id).await;
        assert!(matches!(cancel, Err(AppError::ResourceNotFound("order"))));
    }

    #[sqlx::test]
    async fn orders_of_another_user_are_not_found(pool: PgPool) {
        let seeded = seed::cinema(&pool).await;
        let svc = services(&pool);

        let reserved = svc.reservations
            .reserve_seats(&pool, seeded.user.id, seeded.showtime_id, &[seeded.seats[0]])
            .await
            .unwrap();

        let result = svc.orders.order_detail(&pool, seeded.other_user.id, reserved.id).await;
        assert!(matches!(result, Err(AppError::ResourceNotFound("order"))));
        assert!(svc.orders.list_orders(seeded.other_user.id).await.unwrap().is_empty());
    }
}
