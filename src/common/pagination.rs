// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::error::AppError;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Página começando em 1
    #[param(value_type = Option<i64>)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Lê o número da página. Vazio vale como ausente; texto que não é
    /// número é uma página inexistente (404), igual a uma fora da faixa.
    pub fn number(&self) -> Result<Option<i64>, AppError> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| AppError::ResourceNotFound("page")),
        }
    }
}

// Janela de uma página já validada: o LIMIT/OFFSET que vai para o SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageWindow {
    /// Valida o número da página contra o total de itens.
    /// A página 1 de uma lista vazia é válida; fora disso, página inexistente é 404.
    pub fn resolve(requested: Option<i64>, per_page: i64, total_items: i64) -> Result<Self, AppError> {
        let page = requested.unwrap_or(1);
        let total_pages = ((total_items + per_page - 1) / per_page).max(1);

        if page < 1 || page > total_pages {
            return Err(AppError::ResourceNotFound("page"));
        }

        Ok(Self { page, per_page, total_items, total_pages })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        Self {
            items,
            page: window.page,
            per_page: window.per_page,
            total_items: window.total_items,
            total_pages: window.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>) -> PageQuery {
        PageQuery { page: page.map(str::to_string) }
    }

    #[test]
    fn page_number_is_parsed_from_the_query() {
        assert_eq!(query(None).number().unwrap(), None);
        assert_eq!(query(Some("")).number().unwrap(), None);
        assert_eq!(query(Some("3")).number().unwrap(), Some(3));
    }

    #[test]
    fn non_numeric_page_is_not_found() {
        for raw in ["abc", "1.5", "99999999999999999999"] {
            assert!(
                matches!(query(Some(raw)).number(), Err(AppError::ResourceNotFound("page"))),
                "{raw}"
            );
        }
    }

    #[test]
    fn empty_list_still_has_a_first_page() {
        let window = PageWindow::resolve(None, 12, 0).unwrap();
        assert_eq!(window.page, 1);
        assert_eq!(window.total_pages, 1);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn last_partial_page_is_counted() {
        let window = PageWindow::resolve(Some(3), 12, 25).unwrap();
        assert_eq!(window.total_pages, 3);
        assert_eq!(window.offset(), 24);
    }

    #[test]
    fn out_of_range_pages_are_not_found() {
        assert!(matches!(PageWindow::resolve(Some(0), 12, 30), Err(AppError::ResourceNotFound("page"))));
        assert!(matches!(PageWindow::resolve(Some(4), 12, 30), Err(AppError::ResourceNotFound("page"))));
    }
}
