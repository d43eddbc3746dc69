//! Command definitions
//!
//! Commands represent intentions to change the system state. Invalid
//! commands are rejected at construction.

use uuid::Uuid;

use crate::domain::{Money, Role};

/// Errors raised while constructing a command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Transfer amount must be positive (got {0})")]
    NonPositiveAmount(Money),

    #[error("Payer and payee must be different accounts")]
    SamePayerPayee,
}

/// Command to move money from one account to another
#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: Money,
}

impl TransferCommand {
    /// The amount must be strictly positive and the accounts distinct; a
    /// self-transfer would fabricate money under the stale-read balance
    /// writes.
    pub fn new(payer_id: Uuid, payee_id: Uuid, amount: Money) -> Result<Self, CommandError> {
        if !amount.is_positive() {
            return Err(CommandError::NonPositiveAmount(amount));
        }
        if payer_id == payee_id {
            return Err(CommandError::SamePayerPayee);
        }

        Ok(Self {
            payer_id,
            payee_id,
            amount,
        })
    }
}

/// Command to register a new account
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub first_name: String,
    pub last_name: String,
    /// Raw document as typed by the user; normalized and validated during
    /// registration.
    pub document: String,
    pub email: String,
    pub password: String,
    pub initial_balance: Money,
    pub role: Role,
}

impl RegisterUserCommand {
    pub fn new(
        first_name: String,
        last_name: String,
        document: String,
        email: String,
        password: String,
        initial_balance: Money,
    ) -> Self {
        Self {
            first_name,
            last_name,
            document,
            email,
            password,
            initial_balance,
            role: Role::default(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
