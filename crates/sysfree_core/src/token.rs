//! crates/sysfree_core/src/token.rs
//!
//! Reads the expiry claim of an access token. The signature is never checked
//! here; the backend is the authority on validity.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::ports::{PortError, PortResult};

/// Decodes the `exp` claim of a JWT.
pub fn decode_expiry(token: &str) -> PortResult<DateTime<Utc>> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| PortError::Decode("token has no payload segment".to_string()))?;

    let raw = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| PortError::Decode(format!("token payload is not base64url: {e}")))?;
    let claims: Value = serde_json::from_slice(&raw)
        .map_err(|e| PortError::Decode(format!("token payload is not JSON: {e}")))?;

    let exp = claims
        .get("exp")
        .and_then(|exp| exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64)))
        .ok_or_else(|| PortError::Decode("token has no numeric exp claim".to_string()))?;

    DateTime::<Utc>::from_timestamp(exp, 0)
        .ok_or_else(|| PortError::Decode(format!("exp claim {exp} is out of range")))
}

/// True when the token's expiry lies strictly before `now`.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> PortResult<bool> {
    Ok(decode_expiry(token)? < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn token_with(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn reads_exp_claim() {
        let token = token_with(json!({"exp": 1_700_000_000, "user_id": 3}));
        assert_eq!(decode_expiry(&token).unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        let stale = token_with(json!({"exp": (now - Duration::minutes(5)).timestamp()}));
        let fresh = token_with(json!({"exp": (now + Duration::minutes(5)).timestamp()}));
        assert!(is_expired(&stale, now).unwrap());
        assert!(!is_expired(&fresh, now).unwrap());
    }

    #[test]
    fn malformed_tokens_are_decode_errors() {
        assert!(matches!(decode_expiry("opaque"), Err(PortError::Decode(_))));
        assert!(matches!(decode_expiry("a.!!!.c"), Err(PortError::Decode(_))));
        let no_exp = token_with(json!({"sub": "x"}));
        assert!(matches!(decode_expiry(&no_exp), Err(PortError::Decode(_))));
    }
}
