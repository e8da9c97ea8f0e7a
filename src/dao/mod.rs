//! Persistence boundary: entity models, the record store contract, and the
//! in-memory reference backend.

pub mod models;
pub mod record_store;
pub mod storage;
