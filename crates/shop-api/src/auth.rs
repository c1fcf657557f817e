//! # Auth Gate
//!
//! Middleware for requiring a bearer token on protected routes. On success
//! the verified [`Identity`] is stored in the request extensions for the
//! handler; on failure the request ends here with a 401 envelope.

use crate::envelope::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use shop_core::{Identity, ShopError};
use tracing::warn;

/// Read the token from `Authorization`.
///
/// Accepts `Bearer <token>` with the prefix in any case, or the bare token.
/// An absent or empty header is `token_missing`; a header that is present
/// but not visible ASCII is `token_invalid`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, ShopError> {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Err(ShopError::token_missing());
    };
    let value = raw
        .to_str()
        .map_err(|_| ShopError::token_invalid())?
        .trim();

    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("bearer") => "",
        _ => value,
    };

    if token.is_empty() {
        Err(ShopError::token_missing())
    } else {
        Ok(token.to_string())
    }
}

/// Middleware that requires a valid bearer token
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers()).map_err(|err| {
        warn!("Rejected {} {}: {}", req.method(), req.uri().path(), err);
        err
    })?;

    let identity: Identity = state.tokens.verify(&token).map_err(|reason| {
        warn!(
            "Rejected {} {}: {}",
            req.method(),
            req.uri().path(),
            reason
        );
        ShopError::token_invalid()
    })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_prefix_any_case() {
        assert_eq!(extract_bearer(&headers("Bearer abc")), Ok("abc".into()));
        assert_eq!(extract_bearer(&headers("bearer abc")), Ok("abc".into()));
        assert_eq!(extract_bearer(&headers("BEARER   abc==")), Ok("abc==".into()));
    }

    #[test]
    fn test_bare_token_is_accepted() {
        assert_eq!(extract_bearer(&headers("eyJ1c2VyX2lkIjox")), Ok("eyJ1c2VyX2lkIjox".into()));
    }

    #[test]
    fn test_missing_or_empty() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(ShopError::token_missing()));
        assert_eq!(extract_bearer(&headers("")), Err(ShopError::token_missing()));
        assert_eq!(extract_bearer(&headers("Bearer ")), Err(ShopError::token_missing()));
        assert_eq!(extract_bearer(&headers("Bearer")), Err(ShopError::token_missing()));
    }

    #[test]
    fn test_non_ascii_header_is_invalid_not_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xc3\xb1").unwrap());
        assert_eq!(extract_bearer(&headers), Err(ShopError::token_invalid()));
    }
}
