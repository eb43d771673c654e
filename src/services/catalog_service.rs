// src/services/catalog_service.rs

use serde::Serialize;
use sqlx::{Executor, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, SnackRepository},
    models::{catalog::ShowtimeDetail, snacks::SnackItem},
};

// Quantos itens a home mostra de cada lista
const HOME_SHOWTIMES: i64 = 30;
const HOME_SNACKS: i64 = 6;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub showtimes: Vec<ShowtimeDetail>,
    pub snacks: Vec<SnackItem>,
}

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    snack_repo: SnackRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, snack_repo: SnackRepository) -> Self {
        Self { catalog_repo, snack_repo }
    }

    pub async fn home(&self) -> Result<HomePage, AppError> {
        let (showtimes, snacks) = tokio::try_join!(
            self.catalog_repo.list_showtimes(HOME_SHOWTIMES),
            self.snack_repo.list_featured(HOME_SNACKS),
        )?;

        Ok(HomePage { showtimes, snacks })
    }

    pub async fn showtime_detail<'e, E>(
        &self,
        executor: E,
        showtime_id: Uuid,
    ) -> Result<ShowtimeDetail, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo
            .find_showtime(executor, showtime_id)
            .await?
            .ok_or(AppError::ResourceNotFound("showtime"))
    }
}
