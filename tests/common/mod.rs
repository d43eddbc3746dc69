//! Common test utilities
//!
//! Builds the full router wired against in-memory repositories and scripted
//! gate/sink doubles, so the HTTP suite runs without Postgres or network.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use peerpay::api::{self, AppState};
use peerpay::authorizer::{AuthorizationDecision, AuthorizationGate, AuthorizerError};
use peerpay::handlers::{TransferHandler, UserHandler};
use peerpay::notifier::{Notification, NotificationDispatcher, NotificationError, NotificationSink};
use peerpay::repository::{InMemoryTransferRepository, InMemoryUserRepository};

/// Gate double with a fixed verdict.
pub struct StaticGate {
    pub authorized: bool,
}

#[async_trait]
impl AuthorizationGate for StaticGate {
    async fn authorize(&self) -> Result<AuthorizationDecision, AuthorizerError> {
        Ok(AuthorizationDecision {
            authorized: self.authorized,
            status: if self.authorized { "success" } else { "fail" }.to_string(),
        })
    }
}

/// Sink double that swallows every notification.
pub struct NullSink;

#[async_trait]
impl NotificationSink for NullSink {
    async fn send(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub transfers: Arc<InMemoryTransferRepository>,
}

/// Wire the API router against in-memory infrastructure.
pub fn spawn_app(gate_allows: bool) -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let transfers = Arc::new(InMemoryTransferRepository::new());

    let state = AppState {
        user_handler: Arc::new(UserHandler::new(users.clone())),
        transfer_handler: Arc::new(TransferHandler::new(
            users.clone(),
            transfers.clone(),
            Arc::new(StaticGate {
                authorized: gate_allows,
            }),
            NotificationDispatcher::new(Arc::new(NullSink)),
        )),
    };

    TestApp {
        router: api::create_router().with_state(state),
        users,
        transfers,
    }
}
