use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::policy::Role;
use crate::error::{ReportError, Result};

/// Session lifetime, shared by the token expiry and the cookie Max-Age.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub login: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification keys derived from `AUTH_SECRET`.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, login: &str, role: Role) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            login: login.to_string(),
            role,
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };
        self.encode_claims(&claims)
    }

    fn encode_claims(&self, claims: &SessionClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| ReportError::Config(format!("cannot sign session token: {}", e)))
    }

    /// Checks signature and expiry. Any failure is reported as unauthorized.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| ReportError::Unauthorized(format!("invalid session: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = SessionKeys::new("secret-one");
        let token = keys.issue("anna", Role::Manager).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.login, "anna");
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECS);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = SessionKeys::new("secret-one").issue("anna", Role::Admin).unwrap();
        let err = SessionKeys::new("secret-two").verify(&token).unwrap_err();
        assert!(matches!(err, ReportError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = SessionKeys::new("secret-one");
        let now = Utc::now().timestamp();
        let token = keys
            .encode_claims(&SessionClaims {
                login: "anna".into(),
                role: Role::Viewer,
                iat: now - 2 * SESSION_TTL_SECS,
                exp: now - SESSION_TTL_SECS,
            })
            .unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(SessionKeys::new("s").verify("not-a-jwt").is_err());
    }
}
