//! Authorization header handling.
//!
//! None of this is a security boundary. [`parse_authorization`] never
//! rejects a caller; it only records the bearer token, if any, against a
//! fixed stub identity. [`authorize_debug`] gates the debug routes behind a
//! shared token.

use log::{debug, warn};
use thiserror::Error;

/// Identity every caller is attributed to.
pub const STUB_USER_ID: &str = "stub-user";

/// Token accepted by debug routes unless configured otherwise.
pub const DEFAULT_DEBUG_TOKEN: &str = "debug-token-stub";

pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_FORBIDDEN: u16 = 403;

/// Who made the request, as far as the stub can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: String,
    /// Bearer token, when the header was well formed
    pub token: Option<String>,
}

impl AuthContext {
    fn stub(token: Option<String>) -> Self {
        Self {
            user_id: STUB_USER_ID.to_string(),
            token,
        }
    }
}

/// A refused debug request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthRejection {
    pub status_code: u16,
    pub message: String,
}

impl AuthRejection {
    fn new(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            message: message.to_string(),
        }
    }
}

/// Splits `Bearer <token>`, matching the scheme case-insensitively.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

/// Reads the `Authorization` header into an [`AuthContext`].
///
/// A missing or malformed header is logged and yields no token.
pub fn parse_authorization(header: Option<&str>) -> AuthContext {
    let Some(header) = header.filter(|h| !h.is_empty()) else {
        warn!(reason = "missing"; "auth_header_missing");
        return AuthContext::stub(None);
    };

    match bearer_token(header) {
        Some(token) => {
            debug!(token_length = token.len(); "auth_token_received");
            AuthContext::stub(Some(token.to_string()))
        }
        None => {
            warn!(reason = "invalid_format"; "auth_header_invalid_format");
            AuthContext::stub(None)
        }
    }
}

/// Checks the `Authorization` header of a debug request.
///
/// # Errors
///
/// 401 when the header is missing or not a bearer token, 403 when the token
/// does not match `expected_token`.
pub fn authorize_debug(header: Option<&str>, expected_token: &str) -> Result<(), AuthRejection> {
    let Some(header) = header.filter(|h| !h.is_empty()) else {
        return Err(AuthRejection::new(
            STATUS_UNAUTHORIZED,
            "Authorization header required",
        ));
    };

    let Some(token) = bearer_token(header) else {
        return Err(AuthRejection::new(
            STATUS_UNAUTHORIZED,
            "Invalid authorization format",
        ));
    };

    if token != expected_token {
        warn!(reason = "token_mismatch"; "debug_auth_rejected");
        return Err(AuthRejection::new(STATUS_FORBIDDEN, "Invalid token"));
    }

    Ok(())
}
