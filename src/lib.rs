pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod models;
pub mod schema;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
