//! Cloud environment resolution.
//!
//! Maps a cloud name to the endpoint set identifying that deployment: the
//! identity-provider authority, the management API, and the secrets-store
//! (Key Vault) API. Resolution is a pure lookup against a fixed table; the
//! empty name means the public cloud.

use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, Result};

/// Endpoint set for a cloud deployment. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudEnvironment {
    /// Canonical environment name
    pub name: String,

    /// Identity-provider authority base URL
    pub authority_endpoint: String,

    /// Management API endpoint, also the management token resource URI
    pub management_endpoint: String,

    /// Secrets-store endpoint; normalized before use as a resource URI
    pub secrets_store_endpoint: String,
}

impl CloudEnvironment {
    /// The default public cloud.
    pub fn public_cloud() -> Self {
        Self {
            name: "AzurePublicCloud".to_string(),
            authority_endpoint: "https://login.microsoftonline.com/".to_string(),
            management_endpoint: "https://management.azure.com/".to_string(),
            secrets_store_endpoint: "https://vault.azure.net/".to_string(),
        }
    }

    pub fn china_cloud() -> Self {
        Self {
            name: "AzureChinaCloud".to_string(),
            authority_endpoint: "https://login.chinacloudapi.cn/".to_string(),
            management_endpoint: "https://management.chinacloudapi.cn/".to_string(),
            secrets_store_endpoint: "https://vault.azure.cn/".to_string(),
        }
    }

    pub fn german_cloud() -> Self {
        Self {
            name: "AzureGermanCloud".to_string(),
            authority_endpoint: "https://login.microsoftonline.de/".to_string(),
            management_endpoint: "https://management.microsoftazure.de/".to_string(),
            secrets_store_endpoint: "https://vault.microsoftazure.de/".to_string(),
        }
    }

    pub fn us_government_cloud() -> Self {
        Self {
            name: "AzureUSGovernmentCloud".to_string(),
            authority_endpoint: "https://login.microsoftonline.us/".to_string(),
            management_endpoint: "https://management.usgovcloudapi.net/".to_string(),
            secrets_store_endpoint: "https://vault.usgovcloudapi.net/".to_string(),
        }
    }
}

/// Resolve a cloud name to its environment.
///
/// An empty name resolves to the public cloud. Matching is case-insensitive.
/// Unrecognized names fail with [`AuthError::UnknownEnvironment`].
pub fn resolve(cloud_name: &str) -> Result<CloudEnvironment> {
    if cloud_name.is_empty() {
        return Ok(CloudEnvironment::public_cloud());
    }

    match cloud_name.to_uppercase().as_str() {
        "AZUREPUBLICCLOUD" => Ok(CloudEnvironment::public_cloud()),
        "AZURECHINACLOUD" => Ok(CloudEnvironment::china_cloud()),
        "AZUREGERMANCLOUD" => Ok(CloudEnvironment::german_cloud()),
        "AZUREUSGOVERNMENTCLOUD" => Ok(CloudEnvironment::us_government_cloud()),
        _ => Err(AuthError::unknown_environment(cloud_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_resolves_to_public_cloud() {
        let env = resolve("").unwrap();
        assert_eq!(env, CloudEnvironment::public_cloud());
        assert_eq!(env.authority_endpoint, "https://login.microsoftonline.com/");
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        let env = resolve("azurechinacloud").unwrap();
        assert_eq!(env.name, "AzureChinaCloud");
        assert_eq!(resolve("AzureUSGovernmentCloud").unwrap().name, "AzureUSGovernmentCloud");
    }

    #[test]
    fn test_unknown_name_fails() {
        let error = resolve("unknown-xyz").unwrap_err();
        match error {
            AuthError::UnknownEnvironment { name } => assert_eq!(name, "unknown-xyz"),
            other => panic!("expected UnknownEnvironment, got {other:?}"),
        }
    }

    #[test]
    fn test_resolution_has_no_side_effects() {
        let first = resolve("AzureGermanCloud").unwrap();
        let second = resolve("AzureGermanCloud").unwrap();
        assert_eq!(first, second);
    }
}
