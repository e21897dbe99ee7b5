//! Session tokens
//!
//! Stateless HS256 JWTs. A token is valid until `exp`; there is no
//! revocation and no refresh.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::errors::{Result, UrlVaultError};

const ACCESS_TOKEN_TYPE: &str = "access";

/// Access Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// JWT Service for issuing and verifying session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_minutes: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: i64) -> Self {
        // 过期即失效，不留时钟偏差余量
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_minutes,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.access_token_minutes)
    }

    pub fn issue_session(&self, user_id: &str) -> Result<SessionToken> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_token_minutes)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| UrlVaultError::token_issue(format!("Failed to sign token: {}", e)))?;

        Ok(SessionToken {
            access_token,
            expires_in: self.access_token_minutes * 60,
        })
    }

    /// Returns the user id the token was issued for.
    ///
    /// `TokenExpired` past expiry, `TokenInvalid` for a bad signature,
    /// malformed claims or a non-access token.
    pub fn verify_session(&self, token: &str) -> Result<String> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(UrlVaultError::token_invalid(
                "Could not validate credentials: wrong token type",
            ));
        }
        if token_data.claims.sub.is_empty() {
            return Err(UrlVaultError::token_invalid(
                "Could not validate credentials: missing subject",
            ));
        }

        Ok(token_data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn create_test_service() -> JwtService {
        JwtService::new(SECRET, 30)
    }

    fn sign(claims: &AccessClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let token = service.issue_session("alice123").unwrap();

        assert_eq!(token.expires_in, 1800);
        assert_eq!(service.verify_session(&token.access_token).unwrap(), "alice123");
    }

    #[test]
    fn test_tokens_are_unique() {
        let service = create_test_service();
        let a = service.issue_session("alice123").unwrap();
        let b = service.issue_session("alice123").unwrap();
        assert_ne!(a.access_token, b.access_token);
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let service = create_test_service();
        let err = service.verify_session("invalid.token.here").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = create_test_service().issue_session("alice123").unwrap();
        let other = JwtService::new("different_secret_key_32_bytes!!", 30);

        let err = other.verify_session(&token.access_token).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "alice123".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        let err = create_test_service()
            .verify_session(&sign(&claims, SECRET))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenExpired);
    }

    #[test]
    fn test_token_expired_seconds_ago() {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "alice123".to_string(),
            iat: (now - Duration::minutes(30)).timestamp(),
            exp: (now - Duration::seconds(5)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        let err = create_test_service()
            .verify_session(&sign(&claims, SECRET))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenExpired);
    }

    #[test]
    fn test_wrong_token_type() {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "alice123".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        };

        let err = create_test_service()
            .verify_session(&sign(&claims, SECRET))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenInvalid);
    }
}
