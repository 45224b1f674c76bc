//! # Configuration Settings
//!
//! Defines the identity configuration record and its loaders.
//!
//! Field names on the wire match the cloud-config JSON consumed by the
//! volume driver (`tenantId`, `clientId`, `useDelegatedIdentity`, ...).
//! All fields default, so a partial config file parses; `validate` decides
//! whether a usable credential path exists.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::errors::{AuthError, Result};
use crate::token::SecretString;

/// Environment variable prefix for [`AuthConfig::from_env`].
const ENV_PREFIX: &str = "KEYLEASE_";

/// Auth-related part of the cloud configuration.
///
/// Secrets are held in [`SecretString`], so the whole record can be logged
/// with `{:?}` without leaking credential material.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthConfig {
    /// Cloud environment identifier; empty means the public cloud
    pub cloud: String,

    /// Tenant the workload's subscription lives in
    pub tenant_id: String,

    /// Client with RBAC access to the management and secrets-store APIs
    pub client_id: String,

    /// Client secret for the client-credentials grant
    pub client_secret: SecretString,

    /// Path of a client certificate. Carried for config compatibility;
    /// certificate exchange is not implemented and is rejected explicitly.
    pub client_cert_path: String,

    /// Password of the client certificate
    pub client_cert_password: SecretString,

    /// Obtain tokens from the node identity broker instead of a held secret
    pub use_delegated_identity: bool,

    /// Subscription the workload is deployed in
    pub subscription_id: String,

    /// Resource group of the workload
    pub resource_group: String,

    /// Vault the consumer will read from
    pub vault_name: String,

    /// Object (secret/key) name within the vault
    pub vault_object_name: String,

    /// Object version, empty for latest
    pub vault_object_version: String,
}

impl AuthConfig {
    /// Load the configuration from a cloud-config JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AuthError::config_with_source(
                format!("failed to read cloud config '{}'", path.display()),
                Box::new(e),
            )
        })?;

        let config: AuthConfig = serde_json::from_str(&contents).map_err(|e| {
            AuthError::config_with_source(
                format!("failed to parse cloud config '{}'", path.display()),
                Box::new(e),
            )
        })?;

        debug!(path = %path.display(), cloud = %config.cloud, "loaded cloud configuration");
        Ok(config)
    }

    /// Load the configuration from `KEYLEASE_*` environment variables.
    ///
    /// Unset variables fall back to their defaults; `validate` catches
    /// configurations with no satisfiable credential path.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup. Split out
    /// so tests can supply values without mutating the process environment.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}")).unwrap_or_default();

        let use_delegated_identity = matches!(
            var("USE_DELEGATED_IDENTITY").to_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        Self {
            cloud: var("CLOUD"),
            tenant_id: var("TENANT_ID"),
            client_id: var("CLIENT_ID"),
            client_secret: var("CLIENT_SECRET").into(),
            client_cert_path: var("CLIENT_CERT_PATH"),
            client_cert_password: var("CLIENT_CERT_PASSWORD").into(),
            use_delegated_identity,
            subscription_id: var("SUBSCRIPTION_ID"),
            resource_group: var("RESOURCE_GROUP"),
            vault_name: var("VAULT_NAME"),
            vault_object_name: var("VAULT_OBJECT_NAME"),
            vault_object_version: var("VAULT_OBJECT_VERSION"),
        }
    }

    /// Check that exactly one credential path is satisfiable.
    ///
    /// Either delegated identity is enabled, or a client secret is present.
    /// A configured certificate without a secret is rejected as unsupported
    /// rather than reported as a missing credential.
    pub fn validate(&self) -> Result<()> {
        if self.use_delegated_identity {
            return Ok(());
        }

        if !self.client_secret.is_empty() {
            if self.tenant_id.is_empty() {
                return Err(AuthError::config("client secret set but tenantId is empty"));
            }
            if self.client_id.is_empty() {
                return Err(AuthError::config("client secret set but clientId is empty"));
            }
            return Ok(());
        }

        if !self.client_cert_path.is_empty() {
            return Err(AuthError::certificate_unsupported(self.client_id.clone()));
        }

        Err(AuthError::missing_credential(self.client_id.clone()))
    }
}

/// Caller identity forwarded to the node identity broker.
///
/// Required only when [`AuthConfig::use_delegated_identity`] is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityContext {
    pub pod_name: String,
    pub pod_namespace: String,
}

impl IdentityContext {
    pub fn new(pod_name: impl Into<String>, pod_namespace: impl Into<String>) -> Self {
        Self { pod_name: pod_name.into(), pod_namespace: pod_namespace.into() }
    }

    /// Read the pod identity from the downward-API variables `POD_NAME` and
    /// `POD_NAMESPACE`.
    pub fn from_env() -> Self {
        Self {
            pod_name: std::env::var("POD_NAME").unwrap_or_default(),
            pod_namespace: std::env::var("POD_NAMESPACE").unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_config() -> AuthConfig {
        AuthConfig {
            tenant_id: "tenant-1".into(),
            client_id: "client-1".into(),
            client_secret: "s3cret".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_parse_cloud_config_json() {
        let json = r#"{
            "cloud": "AzurePublicCloud",
            "tenantId": "tenant-1",
            "clientId": "client-1",
            "clientSecret": "s3cret",
            "useDelegatedIdentity": false,
            "subscriptionId": "sub-1",
            "resourceGroup": "rg-1",
            "vaultName": "vault-1",
            "vaultObjectName": "db-password"
        }"#;

        let config: AuthConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.tenant_id, "tenant-1");
        assert_eq!(config.client_secret.expose_secret(), "s3cret");
        assert!(!config.use_delegated_identity);
        assert_eq!(config.vault_object_version, "");
        config.validate().unwrap();
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = secret_config();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tenantId": "t", "clientId": "c", "clientSecret": "s"}}"#).unwrap();

        let config = AuthConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tenant_id, "t");
        assert_eq!(config.client_secret.expose_secret(), "s");
    }

    #[test]
    fn test_from_file_missing() {
        let error = AuthConfig::from_file("/nonexistent/cloud.json").unwrap_err();
        assert!(matches!(error, AuthError::Config { .. }));
    }

    #[test]
    fn test_validate_delegated_identity_needs_no_secret() {
        let config = AuthConfig { use_delegated_identity: true, ..AuthConfig::default() };
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_missing_credential() {
        let config = AuthConfig { client_id: "client-1".into(), ..AuthConfig::default() };
        let error = config.validate().unwrap_err();
        match error {
            AuthError::MissingCredential { client_id } => assert_eq!(client_id, "client-1"),
            other => panic!("expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_certificate_is_rejected_explicitly() {
        let config = AuthConfig {
            client_id: "client-1".into(),
            client_cert_path: "/etc/certs/client.pem".into(),
            ..AuthConfig::default()
        };
        assert!(matches!(config.validate().unwrap_err(), AuthError::CertificateUnsupported { .. }));
    }

    #[test]
    fn test_from_lookup_delegated_flag() {
        let vars = std::collections::HashMap::from([
            ("KEYLEASE_USE_DELEGATED_IDENTITY".to_string(), "true".to_string()),
            ("KEYLEASE_CLOUD".to_string(), "AzureChinaCloud".to_string()),
        ]);

        let config = AuthConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(config.use_delegated_identity);
        assert_eq!(config.cloud, "AzureChinaCloud");
        config.validate().unwrap();
    }

    #[test]
    fn test_from_lookup_unset_variables_default() {
        let config = AuthConfig::from_lookup(|_| None);
        assert!(!config.use_delegated_identity);
        assert!(config.client_secret.is_empty());
        assert!(matches!(config.validate().unwrap_err(), AuthError::MissingCredential { .. }));
    }

    #[test]
    fn test_validate_secret_requires_tenant_and_client() {
        let config = AuthConfig { client_secret: "s".into(), ..AuthConfig::default() };
        assert!(matches!(config.validate().unwrap_err(), AuthError::Config { .. }));
    }
}
