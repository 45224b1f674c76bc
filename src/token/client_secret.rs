//! Client-secret token channel.
//!
//! Performs the OAuth2 client-credentials grant directly against the
//! identity provider: `POST <authority><tenant>/oauth2/token` with the
//! client id, secret, and target resource as form fields. The resulting
//! credential retains the exchange parameters and can re-acquire itself via
//! [`TokenCredential::refresh`].

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::types::{AccessToken, ExchangeParameters, SecretString, TokenCredential};
use super::TokenChannel;
use crate::errors::{AuthError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Token channel performing the client-credentials grant with a held secret.
pub struct ClientSecretChannel {
    client: reqwest::Client,
    authority_endpoint: String,
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
}

impl ClientSecretChannel {
    pub fn new(
        authority_endpoint: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            authority_endpoint: authority_endpoint.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret,
        }
    }

    /// Replace the HTTP client, e.g. to attach a caller-chosen deadline.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Token endpoint for the configured authority and tenant.
    fn token_endpoint(&self) -> String {
        format!("{}/{}/oauth2/token", self.authority_endpoint.trim_end_matches('/'), self.tenant_id)
    }
}

#[async_trait]
impl TokenChannel for ClientSecretChannel {
    async fn acquire_token(&self, resource: &str) -> Result<TokenCredential> {
        // Precondition before any network traffic.
        if self.client_secret.is_empty() {
            return Err(AuthError::missing_credential(self.client_id.clone()));
        }

        let endpoint = self.token_endpoint();
        debug!(client_id = %self.client_id, resource, "exchanging client credentials for token");

        let credential = exchange_client_credentials(
            &self.client,
            &endpoint,
            &self.client_id,
            &self.client_secret,
            resource,
        )
        .await?;

        info!(client_id = %self.client_id, resource, "acquired token via client-credentials grant");
        Ok(credential)
    }
}

impl TokenCredential {
    /// Re-run the client-credentials grant this credential was produced by.
    ///
    /// Returns a fresh credential for the same client and resource. Fails
    /// with [`AuthError::ProviderExchange`] for delegated credentials, whose
    /// refresh belongs to the node identity broker.
    pub async fn refresh(&self, client: &reqwest::Client) -> Result<TokenCredential> {
        let exchange = self.exchange().ok_or_else(|| {
            AuthError::provider_exchange(None, "credential does not carry exchange parameters")
        })?;

        exchange_client_credentials(
            client,
            &exchange.token_endpoint,
            &exchange.client_id,
            &exchange.client_secret,
            self.resource(),
        )
        .await
    }
}

/// One client-credentials exchange round trip.
async fn exchange_client_credentials(
    client: &reqwest::Client,
    token_endpoint: &str,
    client_id: &str,
    client_secret: &SecretString,
    resource: &str,
) -> Result<TokenCredential> {
    let response = client
        .post(token_endpoint)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
            ("resource", resource),
        ])
        .send()
        .await
        .map_err(|e| AuthError::provider_exchange(None, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        // Surface the provider's OAuth error code when present; drop the
        // rest of the body so nothing sensitive can round-trip into errors.
        let code = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_owned))
            .unwrap_or_else(|| "provider returned an error response".to_string());

        warn!(status = status.as_u16(), client_id, resource, error = %code, "token exchange failed");
        return Err(AuthError::provider_exchange(Some(status.as_u16()), code));
    }

    let token: AccessToken = response
        .json()
        .await
        .map_err(|e| AuthError::provider_exchange(Some(status.as_u16()), e.to_string()))?;

    if token.is_empty() {
        return Err(AuthError::provider_exchange(
            Some(status.as_u16()),
            "response contained no access token",
        ));
    }

    Ok(TokenCredential::refreshable(
        token,
        client_id,
        resource,
        ExchangeParameters {
            token_endpoint: token_endpoint.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.clone(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_endpoint_formatting() {
        let channel = ClientSecretChannel::new(
            "https://login.microsoftonline.com/",
            "tenant-1",
            "client-1",
            "s3cret".into(),
        );
        assert_eq!(
            channel.token_endpoint(),
            "https://login.microsoftonline.com/tenant-1/oauth2/token"
        );
    }

    #[test]
    fn test_token_endpoint_without_trailing_slash() {
        let channel = ClientSecretChannel::new(
            "https://login.microsoftonline.us",
            "tenant-1",
            "client-1",
            "s3cret".into(),
        );
        assert_eq!(
            channel.token_endpoint(),
            "https://login.microsoftonline.us/tenant-1/oauth2/token"
        );
    }

    #[tokio::test]
    async fn test_empty_secret_fails_before_any_request() {
        let channel = ClientSecretChannel::new(
            "https://login.microsoftonline.com/",
            "tenant-1",
            "client-1",
            SecretString::default(),
        );

        let error = channel.acquire_token("https://management.azure.com/").await.unwrap_err();
        match error {
            AuthError::MissingCredential { client_id } => assert_eq!(client_id, "client-1"),
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }
}
