//! HTTP authorization client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{AuthorizationDecision, AuthorizationGate, AuthorizerError};

/// Wire shape of the gate's response body.
#[derive(Debug, Deserialize)]
struct GateResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: GateData,
}

#[derive(Debug, Default, Deserialize)]
struct GateData {
    #[serde(default)]
    authorization: bool,
}

impl GateResponse {
    /// Authorized only when the gate reports success AND grants authorization.
    fn into_decision(self) -> AuthorizationDecision {
        AuthorizationDecision {
            authorized: self.status == "success" && self.data.authorization,
            status: self.status,
        }
    }
}

/// Gate implementation backed by the external authorization endpoint.
pub struct HttpAuthorizer {
    client: Client,
    url: String,
}

impl HttpAuthorizer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AuthorizerError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AuthorizationGate for HttpAuthorizer {
    async fn authorize(&self) -> Result<AuthorizationDecision, AuthorizerError> {
        let response = self.client.get(&self.url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(AuthorizerError::UnexpectedStatus(response.status()));
        }

        let body: GateResponse = response.json().await?;
        Ok(body.into_decision())
    }
}
