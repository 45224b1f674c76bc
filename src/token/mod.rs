//! # Token Channels
//!
//! The polymorphic acquisition capability: given a target resource URI,
//! produce a bearer credential. Two channels exist — the node identity
//! broker for delegated (managed) identities, and the direct OAuth2
//! client-credentials grant for a held client secret. The orchestrator
//! selects one per acquisition; each channel owns its own wire protocol and
//! failure mapping, and neither retries.

pub mod client_secret;
pub mod delegated;
pub mod types;

pub use client_secret::ClientSecretChannel;
pub use delegated::{DelegatedIdentityChannel, DEFAULT_BROKER_ENDPOINT};
pub use types::{AccessToken, ExchangeParameters, SecretString, TokenCredential};

use async_trait::async_trait;

use crate::errors::Result;

/// Capability of exchanging a resource URI for a bearer credential.
#[async_trait]
pub trait TokenChannel: Send + Sync {
    /// Acquire a token scoped to `resource`.
    ///
    /// One network round trip, no retries; every failure is a typed
    /// [`AuthError`](crate::errors::AuthError) for the caller to handle.
    async fn acquire_token(&self, resource: &str) -> Result<TokenCredential>;
}
