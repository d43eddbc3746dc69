//! Authorization gate
//!
//! Every transfer consults an external authorization service before any
//! balance is touched. One outbound call per transfer, no retry here; what
//! callers do with a failed call is their policy.

mod client;

pub use client::HttpAuthorizer;

use async_trait::async_trait;

/// Outcome of a single gate consultation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub authorized: bool,
    /// Raw status string reported by the gate, kept for logging.
    pub status: String,
}

/// Errors raised before a decision could be read
#[derive(Debug, thiserror::Error)]
pub enum AuthorizerError {
    #[error("Authorization request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Authorization service returned status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

/// External oracle deciding whether a transfer may proceed.
#[async_trait]
pub trait AuthorizationGate: Send + Sync {
    async fn authorize(&self) -> Result<AuthorizationDecision, AuthorizerError>;
}
