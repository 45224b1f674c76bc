//! Token acquisition orchestration.
//!
//! Ties the pieces together: resolve the cloud environment, pick the
//! resource URI for the requested API, select a token channel from the
//! configuration, and wrap the resulting credential in a
//! [`BearerAuthorizer`]. The two public entry points differ only in which
//! endpoint becomes the token resource; channel selection happens once, in
//! one place.
//!
//! Nothing is cached and no state is shared between acquisitions, so
//! concurrent calls need no coordination.

use tracing::debug;

use crate::authorizer::BearerAuthorizer;
use crate::config::{AuthConfig, IdentityContext};
use crate::environment::{self, CloudEnvironment};
use crate::errors::{AuthError, Result};
use crate::token::{
    ClientSecretChannel, DelegatedIdentityChannel, TokenChannel, DEFAULT_BROKER_ENDPOINT,
};

/// Which API the acquired token should authorize.
#[derive(Debug, Clone, Copy)]
enum TargetResource {
    Management,
    SecretsStore,
}

/// Orchestrates credential acquisition for one configuration.
///
/// Built per caller session; each acquisition call resolves its own
/// environment and constructs its own channel and credential.
pub struct TokenAcquirer {
    config: AuthConfig,
    identity: IdentityContext,
    environment: Option<CloudEnvironment>,
    broker_endpoint: String,
    http_client: Option<reqwest::Client>,
}

impl TokenAcquirer {
    pub fn new(config: AuthConfig, identity: IdentityContext) -> Self {
        Self {
            config,
            identity,
            environment: None,
            broker_endpoint: DEFAULT_BROKER_ENDPOINT.to_string(),
            http_client: None,
        }
    }

    /// Use a fixed endpoint set instead of resolving the configured cloud
    /// name, e.g. for a private or stack deployment.
    pub fn with_environment(mut self, environment: CloudEnvironment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Point the delegated-identity channel at a non-default broker.
    pub fn with_broker_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.broker_endpoint = endpoint.into();
        self
    }

    /// Supply the HTTP client used for all outbound calls. This is where a
    /// caller attaches its own timeout/deadline policy.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Acquire an authorizer for the cloud management API.
    pub async fn management_authorizer(&self) -> Result<BearerAuthorizer> {
        self.acquire(TargetResource::Management).await
    }

    /// Acquire an authorizer for the secrets-store API.
    pub async fn secrets_store_authorizer(&self) -> Result<BearerAuthorizer> {
        self.acquire(TargetResource::SecretsStore).await
    }

    async fn acquire(&self, target: TargetResource) -> Result<BearerAuthorizer> {
        let environment = match &self.environment {
            Some(environment) => environment.clone(),
            None => environment::resolve(&self.config.cloud)?,
        };

        let resource = match target {
            TargetResource::Management => environment.management_endpoint.clone(),
            TargetResource::SecretsStore => {
                strip_trailing_separator(&environment.secrets_store_endpoint).to_string()
            }
        };

        debug!(
            environment = %environment.name,
            resource = %resource,
            delegated = self.config.use_delegated_identity,
            "acquiring credential"
        );

        let channel = self.channel(&environment)?;
        let credential = channel.acquire_token(&resource).await?;
        Ok(BearerAuthorizer::new(credential))
    }

    /// Select the token channel once, from the configuration.
    fn channel(&self, environment: &CloudEnvironment) -> Result<Box<dyn TokenChannel>> {
        if self.config.use_delegated_identity {
            let mut channel = DelegatedIdentityChannel::with_endpoint(
                self.identity.clone(),
                self.broker_endpoint.as_str(),
            );
            if let Some(client) = &self.http_client {
                channel = channel.with_client(client.clone());
            }
            return Ok(Box::new(channel));
        }

        // Certificate-only configurations are declared but not implemented;
        // reject them by name instead of reporting a missing credential.
        if self.config.client_secret.is_empty() && !self.config.client_cert_path.is_empty() {
            return Err(AuthError::certificate_unsupported(self.config.client_id.clone()));
        }

        let mut channel = ClientSecretChannel::new(
            environment.authority_endpoint.clone(),
            self.config.tenant_id.clone(),
            self.config.client_id.clone(),
            self.config.client_secret.clone(),
        );
        if let Some(client) = &self.http_client {
            channel = channel.with_client(client.clone());
        }
        Ok(Box::new(channel))
    }
}

/// Strip exactly one trailing path separator. Idempotent for endpoints with
/// a single trailing slash, which is what the environment table carries.
fn strip_trailing_separator(endpoint: &str) -> &str {
    endpoint.strip_suffix('/').unwrap_or(endpoint)
}
