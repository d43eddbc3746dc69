//! In-memory repositories
//!
//! Lock-protected vectors standing in for the database. The test suites wire
//! these into the handlers; nothing production-facing depends on them being
//! fast or durable.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Document, Money, NewTransfer, NewUser, TransferRecord, User};

use super::{RepositoryError, TransferRepository, UserRepository, PAGE_SIZE};

/// In-memory account directory.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a fully-formed user, bypassing uniqueness checks.
    pub async fn insert(&self, user: User) {
        self.users.write().await.push(user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_document(
        &self,
        document: &Document,
    ) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.document == *document).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<Uuid, RepositoryError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.document == user.document) {
            return Err(RepositoryError::UniqueViolation("users.document"));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::UniqueViolation("users.email"));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        users.push(User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            document: user.document,
            email: user.email,
            password_hash: user.password_hash,
            balance: user.balance,
            role: user.role,
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    async fn update_balance(&self, id: Uuid, balance: Money) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;

        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.balance = balance;
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(RepositoryError::UserNotFound(id)),
        }
    }

    async fn list(&self, page: i64) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().await;

        let start = (page.max(1) - 1).saturating_mul(PAGE_SIZE) as usize;
        if start >= users.len() {
            return Ok(Vec::new());
        }

        let end = (start + PAGE_SIZE as usize).min(users.len());
        Ok(users[start..end].to_vec())
    }
}

/// In-memory transfer record store.
#[derive(Debug, Default)]
pub struct InMemoryTransferRepository {
    transfers: RwLock<Vec<TransferRecord>>,
}

impl InMemoryTransferRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records created so far, in creation order.
    pub async fn all(&self) -> Vec<TransferRecord> {
        self.transfers.read().await.clone()
    }
}

#[async_trait]
impl TransferRepository for InMemoryTransferRepository {
    async fn create(&self, transfer: NewTransfer) -> Result<Uuid, RepositoryError> {
        let mut transfers = self.transfers.write().await;

        let id = Uuid::new_v4();
        transfers.push(TransferRecord {
            id,
            amount: transfer.amount,
            payer_id: transfer.payer_id,
            payee_id: transfer.payee_id,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TransferRecord>, RepositoryError> {
        let transfers = self.transfers.read().await;
        Ok(transfers.iter().find(|t| t.id == id).cloned())
    }
}
