//! # Keylease
//!
//! Keylease is the credential-acquisition engine for workloads that read
//! from a cloud secrets store: it turns a declared identity configuration
//! (tenant + client credentials, or a delegated managed-identity channel)
//! into a short-lived bearer authorizer for the cloud management API or the
//! Key Vault API.
//!
//! ## Architecture
//!
//! ```text
//! AuthConfig ──▶ EnvironmentResolver ──▶ resource URI
//!                                            │
//!                      ┌─────────────────────┴────────┐
//!                      ▼                              ▼
//!          DelegatedIdentityChannel         ClientSecretChannel
//!           (node identity broker)        (client-credentials grant)
//!                      └─────────────┬────────────────┘
//!                                    ▼
//!                            TokenCredential ──▶ BearerAuthorizer
//! ```
//!
//! Each acquisition is one synchronous chain: environment lookup, one
//! network round trip, authorizer construction. Nothing is cached or shared;
//! failures come back as typed [`AuthError`] values and are never retried
//! here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use keylease::{AuthConfig, IdentityContext, Result, TokenAcquirer};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AuthConfig::from_file("/etc/kubernetes/azure.json")?;
//!     config.validate()?;
//!
//!     let acquirer = TokenAcquirer::new(config, IdentityContext::from_env());
//!     let authorizer = acquirer.secrets_store_authorizer().await?;
//!
//!     let client = reqwest::Client::new();
//!     let request = authorizer.apply(
//!         client.get("https://demo.vault.azure.net/secrets/db-password?api-version=7.4"),
//!     );
//!     let _response = request.send().await;
//!     Ok(())
//! }
//! ```

pub mod acquire;
pub mod authorizer;
pub mod config;
pub mod environment;
pub mod errors;
pub mod observability;
pub mod token;

// Re-export commonly used types
pub use acquire::TokenAcquirer;
pub use authorizer::BearerAuthorizer;
pub use config::{AuthConfig, IdentityContext};
pub use environment::{resolve, CloudEnvironment};
pub use errors::{AuthError, Result};
pub use observability::init_logging;
pub use token::{AccessToken, SecretString, TokenChannel, TokenCredential};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
