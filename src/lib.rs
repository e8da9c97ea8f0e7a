//! Library crate for volley-roster-back, exposing modules for the binary and integration tests.

pub mod config;
pub mod dao;
pub mod dto;
mod error;
pub mod rating;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{AppError, ServiceError};
