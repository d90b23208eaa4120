//! Domain models for the order-taking service.

pub mod menu;
pub mod user;

pub use menu::MenuItem;
pub use user::User;
