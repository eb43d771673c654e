// src/config.rs

pub mod settings;

use std::{sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{CatalogRepository, CustomerRepository, OrderRepository, SnackRepository, TicketRepository, UserRepository},
    services::{
        auth::AuthService,
        catalog_service::CatalogService,
        document_service::DocumentService,
        email_service::{EmailService, LogMailer, Mailer, SmtpMailer},
        order_service::OrderService,
        reservation_service::ReservationService,
        snack_service::SnackService,
    },
};
use self::settings::Settings;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,

    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub snack_service: SnackService,
    pub reservation_service: ReservationService,
    pub order_service: OrderService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let mailer: Arc<dyn Mailer> = match &settings.smtp {
            Some(smtp) => {
                tracing::info!("📧 E-mails via SMTP {}:{}", smtp.host, smtp.port);
                Arc::new(SmtpMailer::new(smtp, &settings.default_from_email)?)
            }
            None => {
                tracing::warn!("📧 SMTP_HOST não definido, e-mails serão apenas registrados no log");
                Arc::new(LogMailer)
            }
        };

        Self::from_pool(db_pool, settings, mailer)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, settings: Settings, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        let i18n_store = I18nStore::load()?;

        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let snack_repo = SnackRepository::new(db_pool.clone());
        let ticket_repo = TicketRepository::new();
        let order_repo = OrderRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            customer_repo.clone(),
            settings.jwt_secret,
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(catalog_repo.clone(), snack_repo.clone());
        let snack_service = SnackService::new(snack_repo, customer_repo.clone(), order_repo.clone());
        let reservation_service = ReservationService::new(
            catalog_repo.clone(),
            customer_repo.clone(),
            ticket_repo.clone(),
            order_repo.clone(),
        );
        let email_service = EmailService::new(mailer, i18n_store.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            ticket_repo,
            customer_repo,
            email_service,
            i18n_store.clone(),
        );
        let document_service = DocumentService::new(
            order_repo,
            catalog_repo,
            i18n_store.clone(),
            settings.fonts_dir,
            settings.cinema_brand,
        );

        Ok(Self {
            db_pool,
            i18n_store,
            auth_service,
            catalog_service,
            snack_service,
            reservation_service,
            order_service,
            document_service,
        })
    }
}
