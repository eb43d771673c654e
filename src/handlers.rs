pub mod auth;
pub mod home;
pub mod orders;
pub mod showtimes;
pub mod snacks;
pub mod tickets;
