use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub exp: usize,
}

pub fn issue_token(user_id: i64, secret: &str) -> Result<String, AuthError> {
    let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Issue)
}

/// Verifies signature and expiry, returning the user id.
pub fn verify_token(token: &str, secret: &str) -> Result<i64, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(AuthError::InvalidToken)?;

    data.claims.sub.parse::<i64>().map_err(|_| {
        AuthError::InvalidToken(jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_verifies() {
        let token = issue_token(42, "secret").unwrap();
        assert_eq!(verify_token(&token, "secret").unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(42, "secret").unwrap();
        assert!(matches!(
            verify_token(&token, "other"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: "1".into(),
            exp: (Utc::now() - Duration::days(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(verify_token(&token, "secret").is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(verify_token("not-a-jwt", "secret").is_err());
    }
}
