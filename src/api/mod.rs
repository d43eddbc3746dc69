//! API module
//!
//! HTTP API endpoints.

pub mod routes;

pub use routes::{create_router, AppState};
