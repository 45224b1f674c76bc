//! Delegated-identity token channel.
//!
//! Queries the node-level identity broker on behalf of a workload. The
//! broker is reachable only inside the node network namespace and does the
//! actual exchange with the identity provider; this channel forwards the pod
//! identity and hands back the token material the broker returns. Refresh is
//! the broker's responsibility.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{AccessToken, TokenCredential};
use super::TokenChannel;
use crate::config::IdentityContext;
use crate::errors::{AuthError, Result};

/// Fixed local broker address; overridable for tests and non-default setups.
pub const DEFAULT_BROKER_ENDPOINT: &str = "http://localhost:2579/host/token/";

const POD_NAME_HEADER: &str = "podname";
const POD_NAMESPACE_HEADER: &str = "podns";

/// Default request deadline. The broker is node-local and low-latency; a
/// caller-supplied client replaces this wholesale.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Token channel backed by the node identity broker.
pub struct DelegatedIdentityChannel {
    client: reqwest::Client,
    endpoint: String,
    identity: IdentityContext,
}

/// Broker response: token material plus the client the token was minted for.
#[derive(Debug, Deserialize)]
struct BrokerTokenResponse {
    #[serde(default)]
    token: AccessToken,

    #[serde(rename = "clientid", default)]
    client_id: String,
}

impl DelegatedIdentityChannel {
    /// Channel against the default node-local broker endpoint.
    pub fn new(identity: IdentityContext) -> Self {
        Self::with_endpoint(identity, DEFAULT_BROKER_ENDPOINT)
    }

    /// Channel against a specific broker endpoint.
    pub fn with_endpoint(identity: IdentityContext, endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, endpoint: endpoint.into(), identity }
    }

    /// Replace the HTTP client, e.g. to attach a caller-chosen deadline.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl TokenChannel for DelegatedIdentityChannel {
    async fn acquire_token(&self, resource: &str) -> Result<TokenCredential> {
        debug!(
            endpoint = %self.endpoint,
            resource,
            pod_name = %self.identity.pod_name,
            pod_namespace = %self.identity.pod_namespace,
            "requesting token from node identity broker"
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("resource", resource)])
            .header(POD_NAME_HEADER, &self.identity.pod_name)
            .header(POD_NAMESPACE_HEADER, &self.identity.pod_namespace)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    AuthError::broker_unreachable(e.to_string())
                } else {
                    AuthError::broker_transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), resource, "identity broker rejected token request");
            return Err(AuthError::broker_response(status.as_u16()));
        }

        let body =
            response.bytes().await.map_err(|e| AuthError::broker_transport(e.to_string()))?;
        let parsed: BrokerTokenResponse =
            serde_json::from_slice(&body).map_err(|e| AuthError::broker_decode(e.to_string()))?;

        if parsed.client_id.is_empty() {
            return Err(AuthError::broker_incomplete("empty client id"));
        }
        if parsed.token.is_empty() {
            return Err(AuthError::broker_incomplete("empty access token"));
        }

        info!(client_id = %parsed.client_id, resource, "acquired delegated-identity token");
        Ok(TokenCredential::delegated(parsed.token, parsed.client_id, resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_response_deserialization() {
        let json = r#"{
            "token": {"access_token": "tok", "token_type": "Bearer"},
            "clientid": "abc"
        }"#;

        let parsed: BrokerTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.client_id, "abc");
        assert_eq!(parsed.token.access_token.expose_secret(), "tok");
    }

    #[test]
    fn test_broker_response_defaults() {
        // A bare object decodes; completeness is checked after decoding.
        let parsed: BrokerTokenResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.client_id.is_empty());
        assert!(parsed.token.is_empty());
    }
}
