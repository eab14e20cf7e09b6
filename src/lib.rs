//! User Service Library
//!
//! Create, list and fetch users over a JSON HTTP API backed by PostgreSQL.
//! Storage, business rules and request handling are separate layers joined
//! through traits, so each can be replaced on its own (tests run the full
//! router over an in-memory repository).

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod repository;
pub mod routes;
pub mod server;
pub mod service;

pub use config::AppConfig;
pub use error::{ApiError, RepositoryError, Result, ServerError};
pub use server::ApiServer;
