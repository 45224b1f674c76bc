//! # Error Types
//!
//! Error types for credential acquisition using `thiserror`.
//!
//! Token material and client secrets are carried in [`SecretString`] values
//! throughout the crate, so none of the messages below can render a secret
//! even when an error wraps a transport failure verbatim.
//!
//! [`SecretString`]: crate::token::SecretString

/// Custom result type for acquisition operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Main error type for the credential-acquisition engine
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// Cloud name not present in the known-environment table
    #[error("unknown cloud environment: '{name}'")]
    UnknownEnvironment { name: String },

    /// Client-secret path selected but no secret supplied
    #[error("no credential available for client '{client_id}': delegated identity is disabled and no client secret is configured")]
    MissingCredential { client_id: String },

    /// A client certificate was configured; certificate exchange is not implemented
    #[error("client certificate authentication is not supported for client '{client_id}'")]
    CertificateUnsupported { client_id: String },

    /// Could not open a connection to the node identity broker
    #[error("identity broker unreachable: {message}")]
    BrokerUnreachable { message: String },

    /// Transport failure talking to the node identity broker
    #[error("identity broker transport failure: {message}")]
    BrokerTransport { message: String },

    /// Broker answered with a non-200 status
    #[error("identity broker responded with status {status}")]
    BrokerResponse { status: u16 },

    /// Broker body was not the expected JSON shape
    #[error("failed to decode identity broker response: {message}")]
    BrokerDecode { message: String },

    /// Broker answered 200 but the payload is unusable
    #[error("identity broker returned an incomplete response: {message}")]
    BrokerIncompleteResponse { message: String },

    /// OAuth exchange with the identity provider failed
    #[error("token exchange with identity provider failed: {message}")]
    ProviderExchange { status: Option<u16>, message: String },

    /// Configuration loading or validation failure
    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AuthError {
    /// Create an unknown-environment error
    pub fn unknown_environment<S: Into<String>>(name: S) -> Self {
        Self::UnknownEnvironment { name: name.into() }
    }

    /// Create a missing-credential error naming the client
    pub fn missing_credential<S: Into<String>>(client_id: S) -> Self {
        Self::MissingCredential { client_id: client_id.into() }
    }

    /// Create a certificate-unsupported error naming the client
    pub fn certificate_unsupported<S: Into<String>>(client_id: S) -> Self {
        Self::CertificateUnsupported { client_id: client_id.into() }
    }

    /// Create a broker-unreachable error
    pub fn broker_unreachable<S: Into<String>>(message: S) -> Self {
        Self::BrokerUnreachable { message: message.into() }
    }

    /// Create a broker transport error
    pub fn broker_transport<S: Into<String>>(message: S) -> Self {
        Self::BrokerTransport { message: message.into() }
    }

    /// Create a broker response error from a status code
    pub fn broker_response(status: u16) -> Self {
        Self::BrokerResponse { status }
    }

    /// Create a broker decode error
    pub fn broker_decode<S: Into<String>>(message: S) -> Self {
        Self::BrokerDecode { message: message.into() }
    }

    /// Create a broker incomplete-response error
    pub fn broker_incomplete<S: Into<String>>(message: S) -> Self {
        Self::BrokerIncompleteResponse { message: message.into() }
    }

    /// Create a provider exchange error
    pub fn provider_exchange<S: Into<String>>(status: Option<u16>, message: S) -> Self {
        Self::ProviderExchange { status, message: message.into() }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Check if this error is worth retrying by an outer policy.
    ///
    /// The engine itself never retries; this is a hint for callers layering
    /// their own retry/backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::BrokerUnreachable { .. } | AuthError::BrokerTransport { .. } => true,
            AuthError::BrokerResponse { status } => *status >= 500,
            AuthError::ProviderExchange { status, .. } => {
                matches!(status, Some(s) if *s >= 500) || status.is_none()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let error = AuthError::unknown_environment("NOTACLOUD");
        assert!(matches!(error, AuthError::UnknownEnvironment { .. }));
        assert_eq!(error.to_string(), "unknown cloud environment: 'NOTACLOUD'");

        let error = AuthError::missing_credential("client-1");
        assert!(matches!(error, AuthError::MissingCredential { .. }));
        assert!(error.to_string().contains("client-1"));

        let error = AuthError::broker_response(404);
        assert_eq!(error.to_string(), "identity broker responded with status 404");
    }

    #[test]
    fn test_provider_exchange_error() {
        let error = AuthError::provider_exchange(Some(400), "invalid_client");
        if let AuthError::ProviderExchange { status, message } = &error {
            assert_eq!(*status, Some(400));
            assert_eq!(message, "invalid_client");
        } else {
            panic!("expected ProviderExchange");
        }
    }

    #[test]
    fn test_retryable_errors() {
        assert!(AuthError::broker_unreachable("connection refused").is_retryable());
        assert!(AuthError::broker_response(503).is_retryable());
        assert!(!AuthError::broker_response(404).is_retryable());
        assert!(!AuthError::missing_credential("client-1").is_retryable());
        assert!(!AuthError::unknown_environment("x").is_retryable());
        assert!(AuthError::provider_exchange(Some(502), "bad gateway").is_retryable());
        assert!(!AuthError::provider_exchange(Some(401), "invalid_client").is_retryable());
    }

    #[test]
    fn test_config_error_with_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = AuthError::config_with_source("cloud config unreadable", Box::new(io_error));
        assert!(matches!(error, AuthError::Config { source: Some(_), .. }));
        assert_eq!(error.to_string(), "configuration error: cloud config unreadable");
    }
}
