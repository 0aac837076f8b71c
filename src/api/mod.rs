pub mod admin;
pub mod auth;
pub mod categories;
pub mod client;
pub mod enquiries;
pub mod news;
pub mod products;

pub use self::client::*;
