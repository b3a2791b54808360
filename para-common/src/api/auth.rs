//! Shared-secret validation for the integration boundary
//!
//! Every integration call (except the health check) must carry the
//! configured secret. When no secret is configured the boundary runs in
//! open mode: requests pass without a key. Startup logs a warning when
//! that happens, but calls are never rejected for a missing secret.
//!
//! This module contains only pure functions; header extraction and
//! response mapping are the service crate's job.

/// Authentication failure kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No key supplied while a secret is configured (401)
    MissingKey,
    /// Supplied key does not match the configured secret (403)
    InvalidKey,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingKey => write!(f, "API key required"),
            AuthError::InvalidKey => write!(f, "Invalid API key"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Outcome of a successful validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Secret configured and matched
    Authenticated,
    /// No secret configured; request allowed through unauthenticated
    Open,
}

/// Validate a supplied key against the configured secret.
pub fn validate_api_key(
    configured: Option<&str>,
    provided: Option<&str>,
) -> Result<AuthMode, AuthError> {
    let Some(secret) = configured else {
        return Ok(AuthMode::Open);
    };

    match provided {
        None => Err(AuthError::MissingKey),
        Some(key) if key == secret => Ok(AuthMode::Authenticated),
        Some(_) => Err(AuthError::InvalidKey),
    }
}

/// Caller identity attached to integration requests for telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub id: String,
    pub version: String,
}

impl ClientIdentity {
    /// Build from the optional `x-client-id` / `x-client-version` header
    /// values. Absent headers fall back to `web` / `unknown`.
    pub fn from_headers(id: Option<&str>, version: Option<&str>) -> Self {
        Self {
            id: id.unwrap_or("web").to_string(),
            version: version.unwrap_or("unknown").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_mode_when_no_secret_configured() {
        assert_eq!(validate_api_key(None, None), Ok(AuthMode::Open));
        assert_eq!(validate_api_key(None, Some("anything")), Ok(AuthMode::Open));
    }

    #[test]
    fn test_missing_key_rejected_when_secret_configured() {
        assert_eq!(
            validate_api_key(Some("secret"), None),
            Err(AuthError::MissingKey)
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        assert_eq!(
            validate_api_key(Some("secret"), Some("wrong")),
            Err(AuthError::InvalidKey)
        );
    }

    #[test]
    fn test_matching_key_accepted() {
        assert_eq!(
            validate_api_key(Some("secret"), Some("secret")),
            Ok(AuthMode::Authenticated)
        );
    }

    #[test]
    fn test_client_identity_defaults() {
        let identity = ClientIdentity::from_headers(None, None);
        assert_eq!(identity.id, "web");
        assert_eq!(identity.version, "unknown");

        let identity = ClientIdentity::from_headers(Some("telegram-bot"), Some("2.1"));
        assert_eq!(identity.id, "telegram-bot");
        assert_eq!(identity.version, "2.1");
    }
}
