use super::config::JwtConfig;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Access level carried in tokens and stored on users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id, as a decimal string
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    /// Unique token id
    pub jti: String,
}

impl JwtClaims {
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub.parse().map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("token subject is not a user id: {0}")]
    InvalidSubject(String),
}

/// A freshly signed token and its lifetime in seconds.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Issues and verifies HS256 tokens. Holds no per-token state.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuth")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        tracing::info!(ttl_secs = config.ttl.as_secs(), "JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl_secs: config.ttl.as_secs(),
        }
    }

    /// Sign a token for `user_id` valid for the configured lifetime.
    pub fn issue(&self, user_id: i64, email: &str, role: Role) -> Result<IssuedToken, JwtError> {
        let iat = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: iat + self.ttl_secs as i64,
            iat,
            jti: Uuid::new_v4().to_string(),
        };

        Ok(IssuedToken {
            token: self.sign(&claims)?,
            expires_in: self.ttl_secs,
        })
    }

    pub(crate) fn sign(&self, claims: &JwtClaims) -> Result<String, JwtError> {
        let header = Header::new(Algorithm::HS256);
        Ok(encode(&header, claims, &self.encoding)?)
    }

    /// Check signature and expiry, returning the decoded claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn auth(secret: &str) -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(secret))
    }

    const SECRET: &str = "unit-test-secret-that-is-long-enough!!";

    #[test]
    fn test_issue_then_verify_keeps_identity() {
        let auth = auth(SECRET);
        let issued = auth.issue(7, "ada@example.com", Role::Admin).unwrap();
        assert_eq!(issued.expires_in, 86_400);

        let claims = auth.verify(&issued.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let issued = auth(SECRET).issue(1, "a@example.com", Role::User).unwrap();
        let other = auth("another-secret-that-is-also-long-enough");
        assert!(other.verify(&issued.token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let auth = auth(SECRET);
        let past = Utc::now().timestamp() - 3_600;
        let claims = JwtClaims {
            sub: "1".into(),
            email: "a@example.com".into(),
            role: Role::User,
            exp: past,
            iat: past - 60,
            jti: Uuid::new_v4().to_string(),
        };
        let token = auth.sign(&claims).unwrap();
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(auth(SECRET).verify("not.a.token").is_err());
    }

    #[test]
    fn test_role_string_forms() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert!(Role::from_str("root").is_err());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let claims = JwtClaims {
            sub: "abc".into(),
            email: String::new(),
            role: Role::User,
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidSubject(_))));
    }
}
