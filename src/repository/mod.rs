//! Repository module
//!
//! Storage seams for accounts and transfer records. The handlers depend on
//! the traits only; production wires the PostgreSQL implementations and the
//! test suites wire the in-memory ones.

mod memory;
mod postgres;

pub use memory::{InMemoryTransferRepository, InMemoryUserRepository};
pub use postgres::{PgTransferRepository, PgUserRepository};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Document, Money, NewTransfer, NewUser, TransferRecord, User};

/// Users returned per listing page.
pub const PAGE_SIZE: i64 = 20;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Unique constraint violation on {0}")]
    UniqueViolation(&'static str),

    #[error("Stored row failed validation: {0}")]
    Corrupted(String),
}

/// Account lookup and balance writes.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    async fn find_by_document(&self, document: &Document)
        -> Result<Option<User>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    async fn create(&self, user: NewUser) -> Result<Uuid, RepositoryError>;

    /// Overwrite the stored balance with `balance`. The caller computes the
    /// new absolute value; nothing here re-reads or locks.
    async fn update_balance(&self, id: Uuid, balance: Money) -> Result<(), RepositoryError>;

    /// Page of users, `PAGE_SIZE` per page. Pages start at 1.
    async fn list(&self, page: i64) -> Result<Vec<User>, RepositoryError>;
}

/// Transfer record writes and lookups.
#[async_trait]
pub trait TransferRepository: Send + Sync {
    async fn create(&self, transfer: NewTransfer) -> Result<Uuid, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TransferRecord>, RepositoryError>;
}
