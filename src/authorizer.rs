//! Bearer authorizer.
//!
//! Wraps a produced credential into a reusable object that attaches the
//! `Authorization: Bearer ...` header to outbound requests. Construction is
//! pure and infallible; the wrapped credential is read-only afterwards, so
//! one authorizer can back any number of calls.

use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::token::TokenCredential;

/// Request-authorizing capability built from a [`TokenCredential`].
#[derive(Debug, Clone)]
pub struct BearerAuthorizer {
    credential: TokenCredential,
}

impl BearerAuthorizer {
    /// Wrap a credential. No validation, no network activity; the channel
    /// that produced the credential already vouched for it.
    pub fn new(credential: TokenCredential) -> Self {
        Self { credential }
    }

    /// The wrapped credential.
    pub fn credential(&self) -> &TokenCredential {
        &self.credential
    }

    /// Identifier of the client the underlying token was issued to.
    pub fn client_id(&self) -> &str {
        self.credential.client_id()
    }

    /// Attach the bearer header to an outbound request.
    ///
    /// The header value is marked sensitive so HTTP-layer diagnostics redact
    /// it.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let bearer = format!("Bearer {}", self.credential.bearer().expose_secret());
        match HeaderValue::from_str(&bearer) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.header(AUTHORIZATION, value)
            }
            // Token contains bytes reqwest cannot carry in a header; let the
            // builder record the error and surface it at send time.
            Err(_) => request.bearer_auth(self.credential.bearer().expose_secret()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{AccessToken, TokenCredential};

    fn authorizer() -> BearerAuthorizer {
        let token = AccessToken { access_token: "tok-123".into(), ..AccessToken::default() };
        BearerAuthorizer::new(TokenCredential::delegated(
            token,
            "client-1",
            "https://vault.azure.net",
        ))
    }

    #[test]
    fn test_apply_sets_sensitive_bearer_header() {
        let client = reqwest::Client::new();
        let request = authorizer()
            .apply(client.get("https://vault.azure.net/secrets/db-password"))
            .build()
            .unwrap();

        let header = request.headers().get(AUTHORIZATION).unwrap();
        assert!(header.is_sensitive());
        assert_eq!(header.to_str().unwrap(), "Bearer tok-123");
    }

    #[test]
    fn test_authorizer_debug_never_leaks_token() {
        let rendered = format!("{:?}", authorizer());
        assert!(!rendered.contains("tok-123"));
    }

    #[test]
    fn test_client_id_passthrough() {
        assert_eq!(authorizer().client_id(), "client-1");
    }
}
