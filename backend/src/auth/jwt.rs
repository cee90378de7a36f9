//! Access and refresh tokens (HS256)

use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Which of the two token flavours a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: TokenKind,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| anyhow!("Invalid user ID in token"))
    }
}

/// Encoding and decoding keys derived once from the shared secret
#[derive(Clone)]
pub struct JwtService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    access_expiry_secs: i64,
    refresh_expiry_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expiry_secs: i64, refresh_expiry_secs: i64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            access_expiry_secs,
            refresh_expiry_secs,
        }
    }

    #[inline]
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String> {
        self.generate(user_id, TokenKind::Access)
    }

    #[inline]
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<String> {
        self.generate(user_id, TokenKind::Refresh)
    }

    fn generate(&self, user_id: Uuid, kind: TokenKind) -> Result<String> {
        let now = Utc::now();
        let expiry = match kind {
            TokenKind::Access => self.access_expiry_secs,
            TokenKind::Refresh => self.refresh_expiry_secs,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            iat: now.timestamp(),
            token_type: kind,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to generate {} token: {}", kind, e))
    }

    /// Decode, check expiry and signature, then require the expected kind
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| anyhow!("Invalid token: {}", e))?
            .claims;

        if claims.token_type != expected {
            return Err(anyhow!("Not an {} token", expected));
        }
        Ok(claims)
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret", 3600, 604800)
    }

    #[test]
    fn test_access_token_round_trip() {
        let jwt = service();
        let user_id = Uuid::new_v4();
        let token = jwt.generate_access_token(user_id).unwrap();
        let claims = jwt.validate(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let jwt = service();
        let user_id = Uuid::new_v4();
        let access = jwt.generate_access_token(user_id).unwrap();
        let refresh = jwt.generate_refresh_token(user_id).unwrap();
        assert!(jwt.validate(&access, TokenKind::Refresh).is_err());
        assert!(jwt.validate(&refresh, TokenKind::Access).is_err());
        assert!(jwt.validate(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = JwtService::new("other-secret", 3600, 3600)
            .generate_access_token(Uuid::new_v4())
            .unwrap();
        assert!(service().validate(&token, TokenKind::Access).is_err());
        assert!(service().validate("invalid.token.here", TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // beyond the default 60s leeway
        let jwt = JwtService::new("test-secret", -120, 3600);
        let token = jwt.generate_access_token(Uuid::new_v4()).unwrap();
        assert!(jwt.validate(&token, TokenKind::Access).is_err());
    }
}
