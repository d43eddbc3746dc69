//! PostgreSQL repositories
//!
//! Balances and transfer amounts are stored as BIGINT minor units; no
//! floating point touches money at rest.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::DatabaseError;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    Document, Money, NewTransfer, NewUser, Role, TransferRecord, User, HOME_CURRENCY,
};

use super::{RepositoryError, TransferRepository, UserRepository, PAGE_SIZE};

/// One users row, in column order.
type UserRow = (
    Uuid,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn user_from_row(row: UserRow) -> Result<User, RepositoryError> {
    let (id, first_name, last_name, document, email, password_hash, balance, role, created_at, updated_at) =
        row;

    let document = Document::parse(&document)
        .map_err(|e| RepositoryError::Corrupted(format!("users.document: {e}")))?;

    let role = match role.as_str() {
        "common" => Role::Common,
        "merchant" => Role::Merchant,
        other => {
            return Err(RepositoryError::Corrupted(format!(
                "users.role: unknown role {other:?}"
            )))
        }
    };

    Ok(User {
        id,
        first_name,
        last_name,
        document,
        email,
        password_hash,
        balance: Money::from_minor_units(balance, HOME_CURRENCY),
        role,
        created_at,
        updated_at,
    })
}

/// Inserts that race past the handler's duplicate pre-check end here as
/// constraint failures; report them the way the lookup path would have.
fn map_user_insert_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::UniqueViolation(match db.constraint() {
                Some(c) if c.contains("document") => "users.document",
                Some(c) if c.contains("email") => "users.email",
                _ => "users",
            })
        }
        other => RepositoryError::Database(other),
    }
}

/// PostgreSQL-backed account directory.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, document, email, password_hash,
                   balance, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn find_by_document(
        &self,
        document: &Document,
    ) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, document, email, password_hash,
                   balance, role, created_at, updated_at
            FROM users
            WHERE document = $1
            "#,
        )
        .bind(document.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, document, email, password_hash,
                   balance, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<Uuid, RepositoryError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                first_name, last_name, document, email,
                password_hash, balance, role
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.document.as_str())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.balance.minor_units())
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_insert_error)?;

        Ok(id)
    }

    async fn update_balance(&self, id: Uuid, balance: Money) -> Result<(), RepositoryError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET balance = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(balance.minor_units())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::UserNotFound(id));
        }

        Ok(())
    }

    async fn list(&self, page: i64) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, document, email, password_hash,
                   balance, role, created_at, updated_at
            FROM users
            ORDER BY created_at
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(PAGE_SIZE)
        .bind((page.max(1) - 1).saturating_mul(PAGE_SIZE))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(user_from_row).collect()
    }
}

/// PostgreSQL-backed transfer record store.
#[derive(Debug, Clone)]
pub struct PgTransferRepository {
    pool: PgPool,
}

impl PgTransferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferRepository for PgTransferRepository {
    async fn create(&self, transfer: NewTransfer) -> Result<Uuid, RepositoryError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO transfers (payer, payee, amount)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(transfer.payer_id)
        .bind(transfer.payee_id)
        .bind(transfer.amount.minor_units())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TransferRecord>, RepositoryError> {
        let row: Option<(Uuid, Uuid, Uuid, i64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, payer, payee, amount, created_at
            FROM transfers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, payer_id, payee_id, amount, created_at)| TransferRecord {
            id,
            amount: Money::from_minor_units(amount, HOME_CURRENCY),
            payer_id,
            payee_id,
            created_at,
        }))
    }
}
