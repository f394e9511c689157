//! Bearer token checking.
//!
//! The CMS has a single shared access token, configured at startup. Requests present it as
//! `Authorization: Bearer <token>`.

use subtle::ConstantTimeEq;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid bearer token")]
    InvalidToken,
}

/// Validate an `Authorization` header value against the expected token.
pub fn validate_bearer(header: Option<&str>, expected: &str) -> Result<(), AuthError> {
    let token = header
        .and_then(extract_bearer_token)
        .ok_or(AuthError::MissingToken)?;

    if token_eq(token, expected) {
        Ok(())
    } else {
        Err(AuthError::InvalidToken)
    }
}

/// The token part of `Bearer <token>`; the scheme is case-insensitive.
pub fn extract_bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}

/// Compare tokens in constant time. A length mismatch still runs one comparison.
fn token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_token() {
        assert_eq!(validate_bearer(Some("Bearer s3cret"), "s3cret"), Ok(()));
        assert_eq!(validate_bearer(Some("bearer s3cret"), "s3cret"), Ok(()));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(validate_bearer(None, "s3cret"), Err(AuthError::MissingToken));
        assert_eq!(
            validate_bearer(Some("Basic s3cret"), "s3cret"),
            Err(AuthError::MissingToken)
        );
        assert_eq!(
            validate_bearer(Some("Bearer "), "s3cret"),
            Err(AuthError::MissingToken)
        );
    }

    #[test]
    fn rejects_wrong_token() {
        assert_eq!(
            validate_bearer(Some("Bearer nope"), "s3cret"),
            Err(AuthError::InvalidToken)
        );
        assert_eq!(
            validate_bearer(Some("Bearer s3cret2"), "s3cret"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn token_eq_needs_same_bytes_and_length() {
        assert!(token_eq("s3cret", "s3cret"));
        assert!(!token_eq("s3creT", "s3cret"));
        assert!(!token_eq("s3c", "s3cret"));
        assert!(!token_eq("", "s3cret"));
    }
}
