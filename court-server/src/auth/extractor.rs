//! Request extractors
//!
//! - [`AdminAuth`] validates the `x-admin-pin` header
//! - [`Owner`] resolves the opaque `x-user-id`, falling back to `guest`

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};

use crate::AppError;
use crate::core::ServerState;
use crate::security_log;

pub const ADMIN_PIN_HEADER: &str = "x-admin-pin";
pub const USER_ID_HEADER: &str = "x-user-id";
pub const GUEST_OWNER: &str = "guest";

const MAX_OWNER_ID_LEN: usize = 128;

/// Admin credential presented on the request, if any
pub fn admin_pin(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_PIN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Check a presented admin credential
pub fn authorize_admin(state: &ServerState, pin: Option<&str>, path: &str) -> Result<(), AppError> {
    let Some(pin) = pin else {
        security_log!(WARN, "admin_pin_missing", path = %path);
        return Err(AppError::admin_pin_required());
    };
    if !state.admin.verify(pin)? {
        security_log!(WARN, "admin_pin_rejected", path = %path);
        return Err(AppError::admin_pin_invalid());
    }
    Ok(())
}

/// Proof that the request carried a valid admin credential
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl FromRequestParts<ServerState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        authorize_admin(state, admin_pin(&parts.headers), parts.uri.path())?;
        Ok(AdminAuth)
    }
}

/// Reservation owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_OWNER_ID_LEN)
            .unwrap_or(GUEST_OWNER);
        Owner(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Owner::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_owner_falls_back_to_guest() {
        let mut headers = HeaderMap::new();
        assert_eq!(Owner::from_headers(&headers).as_str(), GUEST_OWNER);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        assert_eq!(Owner::from_headers(&headers).as_str(), GUEST_OWNER);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static(" u-42 "));
        assert_eq!(Owner::from_headers(&headers).as_str(), "u-42");
    }

    #[test]
    fn test_admin_pin_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(admin_pin(&headers), None);
        headers.insert(ADMIN_PIN_HEADER, HeaderValue::from_static(" 1234 "));
        assert_eq!(admin_pin(&headers), Some("1234"));
    }
}
