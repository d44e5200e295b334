pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod middlewares;
pub mod server;
pub mod sets;
pub mod types;

pub use errors::{ApiError, AppError};
