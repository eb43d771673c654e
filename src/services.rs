pub mod auth;
pub mod catalog_service;
pub mod document_service;
pub mod email_service;
pub mod order_service;
pub mod reservation_service;
pub mod snack_service;
