//! Secret-safe token material.
//!
//! Everything that can carry a bearer token or client secret lives behind
//! [`SecretString`], which redacts itself in Debug, Display, and
//! serialization and zeroes its memory on drop. The rest of the crate can
//! derive `Debug` freely without risking a token in a log line.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string wrapper that redacts its contents in Debug, Display, and serialization.
///
/// # Security
///
/// - Debug output shows `SecretString([REDACTED])` instead of the actual value
/// - Display output shows `[REDACTED]`
/// - Serialization outputs `"[REDACTED]"` (NEVER the actual value)
/// - Deserialization works normally (accepts actual secret values)
/// - Memory is securely zeroed when dropped (via `zeroize` crate)
/// - To read the actual value you must call `expose_secret()` explicitly
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accepts actual secret values (e.g. from a cloud-config file)
        let value = String::deserialize(deserializer)?;
        Ok(SecretString(value))
    }
}

impl SecretString {
    /// Creates a new SecretString from a string value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying secret value.
    ///
    /// Only use this where the raw value is genuinely needed (form fields,
    /// authorization headers). Never log or print the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns the length of the secret without exposing the value.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Default for SecretString {
    fn default() -> Self {
        Self::new("")
    }
}

/// Token payload as issued by the identity provider or relayed by the node
/// identity broker.
///
/// The numeric bookkeeping fields (`expires_in`, `expires_on`, `not_before`)
/// arrive as strings on the wire and are kept as such; [`AccessToken::expires_on`]
/// parses on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessToken {
    #[serde(default)]
    pub access_token: SecretString,

    #[serde(default)]
    pub refresh_token: SecretString,

    /// Seconds of validity, as issued
    #[serde(default)]
    pub expires_in: String,

    /// Unix timestamp of expiry
    #[serde(default)]
    pub expires_on: String,

    /// Unix timestamp before which the token is not valid
    #[serde(default)]
    pub not_before: String,

    /// Resource URI the token was issued for
    #[serde(default)]
    pub resource: String,

    /// Token type, normally "Bearer"
    #[serde(default)]
    pub token_type: String,
}

impl AccessToken {
    /// Returns true if no access token material is present.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_empty()
    }

    /// Expiry instant, if the wire value parses as a Unix timestamp.
    pub fn expires_on(&self) -> Option<DateTime<Utc>> {
        let seconds: i64 = self.expires_on.parse().ok()?;
        Utc.timestamp_opt(seconds, 0).single()
    }

    /// Whether the token is past its expiry. Unknown expiry counts as valid;
    /// the issuing side owns refresh in that case.
    pub fn is_expired(&self) -> bool {
        match self.expires_on() {
            Some(expiry) => expiry <= Utc::now(),
            None => false,
        }
    }
}

/// Parameters retained from a client-credentials grant so the credential can
/// be re-acquired when it expires.
#[derive(Debug, Clone)]
pub struct ExchangeParameters {
    pub token_endpoint: String,
    pub client_id: String,
    pub client_secret: SecretString,
}

/// A bearer credential produced by one of the token channels.
///
/// Delegated credentials carry the broker-issued token as-is; the broker owns
/// refresh. Client-secret credentials retain their [`ExchangeParameters`] and
/// can be re-acquired via [`TokenCredential::refresh`].
#[derive(Debug, Clone)]
pub struct TokenCredential {
    token: AccessToken,
    client_id: String,
    resource: String,
    exchange: Option<ExchangeParameters>,
}

impl TokenCredential {
    /// Credential built from broker-supplied token material.
    pub fn delegated(
        token: AccessToken,
        client_id: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self { token, client_id: client_id.into(), resource: resource.into(), exchange: None }
    }

    /// Credential from a client-credentials grant, keeping the exchange
    /// parameters for self-refresh.
    pub fn refreshable(
        token: AccessToken,
        client_id: impl Into<String>,
        resource: impl Into<String>,
        exchange: ExchangeParameters,
    ) -> Self {
        Self {
            token,
            client_id: client_id.into(),
            resource: resource.into(),
            exchange: Some(exchange),
        }
    }

    /// The token material backing this credential.
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Identifier of the client the token was issued to.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Resource URI the credential is scoped to.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The raw bearer token.
    pub fn bearer(&self) -> &SecretString {
        &self.token.access_token
    }

    /// Whether this credential can re-acquire itself.
    pub fn can_refresh(&self) -> bool {
        self.exchange.is_some()
    }

    pub(crate) fn exchange(&self) -> Option<&ExchangeParameters> {
        self.exchange.as_ref()
    }
}
