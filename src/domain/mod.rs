//! Domain module
//!
//! Core domain types and business logic.

pub mod document;
pub mod money;
pub mod transfer;
pub mod user;

pub use document::{Document, DocumentError};
pub use money::{Currency, Money, MoneyError, HOME_CURRENCY};
pub use transfer::{NewTransfer, TransferRecord};
pub use user::{NewUser, Role, User};
