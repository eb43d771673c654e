pub mod user_repo;
pub use user_repo::UserRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod snack_repo;
pub use snack_repo::SnackRepository;
pub mod ticket_repo;
pub use ticket_repo::TicketRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;

#[cfg(test)]
pub mod seed;
