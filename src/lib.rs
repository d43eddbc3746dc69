//! peerpay Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod authorizer;
pub mod domain;
pub mod handlers;
pub mod notifier;
pub mod repository;

// Private modules (used only by main.rs binary)
pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{Currency, Document, Money, Role, User, HOME_CURRENCY};
