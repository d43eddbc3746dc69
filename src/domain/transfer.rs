//! Transfer records
//!
//! A transfer is recorded exactly once, after both balance updates have been
//! persisted. Records are immutable.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Money;

/// A completed transfer, as stored.
#[derive(Debug, Clone)]
pub struct TransferRecord {
    pub id: Uuid,
    pub amount: Money,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a transfer record.
#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub amount: Money,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
}
