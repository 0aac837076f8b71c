pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, EnquiryError};
pub use services::Session;
