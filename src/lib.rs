//! Library crate for backlog-tracker, exposing modules for the binary and integration tests.

mod config;
pub mod dao;
mod dto;
mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use error::{AppError, ServiceError};
