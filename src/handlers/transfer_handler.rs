//! Transfer Handler
//!
//! Orchestrates one peer-to-peer transfer end to end: resolve both parties,
//! validate business rules, consult the authorization gate, move the money,
//! record the transfer, and dispatch notifications.
//!
//! Ordering is load-bearing: authorization strictly precedes any balance
//! write, the debit precedes the credit, the record follows both, and
//! notifications never block the result.

use std::cmp::Ordering;
use std::sync::Arc;

use uuid::Uuid;

use crate::authorizer::AuthorizationGate;
use crate::domain::{Money, MoneyError, NewTransfer, TransferRecord, User};
use crate::notifier::{Notification, NotificationDispatcher};
use crate::repository::{RepositoryError, TransferRepository, UserRepository};

use super::TransferCommand;

/// Errors a transfer can surface to its caller
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Merchant accounts cannot send transfers: {0}")]
    MerchantNotAllowed(Uuid),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Money, requested: Money },

    #[error("Transfer not authorized")]
    NotAuthorized,

    #[error("Money arithmetic failed: {0}")]
    Money(#[from] MoneyError),

    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Handler for peer-to-peer transfers
pub struct TransferHandler {
    users: Arc<dyn UserRepository>,
    transfers: Arc<dyn TransferRepository>,
    authorizer: Arc<dyn AuthorizationGate>,
    notifier: NotificationDispatcher,
}

impl TransferHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        transfers: Arc<dyn TransferRepository>,
        authorizer: Arc<dyn AuthorizationGate>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            users,
            transfers,
            authorizer,
            notifier,
        }
    }

    /// Execute the transfer command. Returns the id of the recorded
    /// transfer.
    pub async fn execute(&self, command: TransferCommand) -> Result<Uuid, TransferError> {
        let payer = self
            .users
            .find_by_id(command.payer_id)
            .await?
            .ok_or(TransferError::UserNotFound(command.payer_id))?;

        let payee = self
            .users
            .find_by_id(command.payee_id)
            .await?
            .ok_or(TransferError::UserNotFound(command.payee_id))?;

        validate_transfer(&payer, command.amount)?;

        self.authorize().await?;

        // A failure between the two writes, or before the record, leaves the
        // debit in place with nothing to compensate it (known gap).
        self.apply_balance_change(&payer, -command.amount).await?;
        self.apply_balance_change(&payee, command.amount).await?;

        let transfer_id = self
            .transfers
            .create(NewTransfer {
                amount: command.amount,
                payer_id: payer.id,
                payee_id: payee.id,
            })
            .await?;

        tracing::info!(
            transfer_id = %transfer_id,
            payer_id = %payer.id,
            payee_id = %payee.id,
            amount = %command.amount,
            "Transfer completed"
        );

        self.notifier.dispatch(vec![
            Notification::new(payer.email, "Transaction completed successfully"),
            Notification::new(payee.email, "Transaction received successfully"),
        ]);

        Ok(transfer_id)
    }

    /// Look up a recorded transfer.
    pub async fn find(&self, id: Uuid) -> Result<Option<TransferRecord>, TransferError> {
        Ok(self.transfers.find_by_id(id).await?)
    }

    /// Collapse every gate outcome except an explicit grant into
    /// `NotAuthorized`. Denial and gate failure are indistinguishable to the
    /// caller but logged apart.
    async fn authorize(&self) -> Result<(), TransferError> {
        match self.authorizer.authorize().await {
            Ok(decision) if decision.authorized => Ok(()),
            Ok(decision) => {
                tracing::warn!(
                    status = %decision.status,
                    "Transfer denied by authorization gate"
                );
                Err(TransferError::NotAuthorized)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Authorization gate unavailable, treating as denied"
                );
                Err(TransferError::NotAuthorized)
            }
        }
    }

    /// Persist `user.balance + change` as the new absolute balance. The
    /// balance was read when the user was resolved; concurrent transfers
    /// touching the same account can interleave between that read and this
    /// write (known race, kept as-is).
    async fn apply_balance_change(&self, user: &User, change: Money) -> Result<(), TransferError> {
        let new_balance = user.balance.checked_add(change)?;
        self.users.update_balance(user.id, new_balance).await?;
        Ok(())
    }
}

/// Business rules checked before the gate is consulted. The merchant rule
/// outranks the funds rule.
fn validate_transfer(payer: &User, amount: Money) -> Result<(), TransferError> {
    if payer.is_merchant() {
        return Err(TransferError::MerchantNotAllowed(payer.id));
    }

    if payer.balance.checked_cmp(amount)? == Ordering::Less {
        return Err(TransferError::InsufficientFunds {
            balance: payer.balance,
            requested: amount,
        });
    }

    Ok(())
}
