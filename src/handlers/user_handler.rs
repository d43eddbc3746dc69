//! User Handler
//!
//! Registration and account queries. Documents are normalized and validated
//! before any storage round trip; passwords are stored as Argon2 hashes.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use uuid::Uuid;

use crate::domain::{Document, DocumentError, NewUser, User};
use crate::repository::{RepositoryError, UserRepository};

use super::RegisterUserCommand;

/// Errors a registration or lookup can surface
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User already exists")]
    AlreadyExists,

    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid document: {0}")]
    Document(#[from] DocumentError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Handler for account registration and queries
pub struct UserHandler {
    users: Arc<dyn UserRepository>,
}

impl UserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Execute the registration command. Returns the new user's id.
    pub async fn register(&self, command: RegisterUserCommand) -> Result<Uuid, UserError> {
        let document = Document::parse(&command.document)?;

        if self.users.find_by_document(&document).await?.is_some() {
            return Err(UserError::AlreadyExists);
        }

        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::AlreadyExists);
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(command.password.as_bytes(), &salt)
            .map_err(|e| UserError::PasswordHash(e.to_string()))?
            .to_string();

        let id = self
            .users
            .create(NewUser {
                first_name: command.first_name,
                last_name: command.last_name,
                document,
                email: command.email,
                password_hash,
                balance: command.initial_balance,
                role: command.role,
            })
            .await?;

        tracing::info!(user_id = %id, "User registered");

        Ok(id)
    }

    /// Look up one account.
    pub async fn find(&self, id: Uuid) -> Result<User, UserError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Page of accounts. Pages below 1 are clamped to the first page.
    pub async fn list(&self, page: i64) -> Result<Vec<User>, UserError> {
        Ok(self.users.list(page.max(1)).await?)
    }
}
