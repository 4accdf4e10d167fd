use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried by the identity provider's session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user_id: impl Into<String>, email_verified: bool, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.into(),
            sid: Some(format!("sess_{}", uuid::Uuid::new_v4().simple())),
            email_verified,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Claims of the short-lived bearer token forwarded to the external API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    #[serde(default)]
    pub sid: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated caller, extracted from a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub session_id: Option<String>,
    pub email_verified: bool,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            session_id: claims.sid,
            email_verified: claims.email_verified,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing session token")]
    MissingSession,

    #[error("invalid session token: {0}")]
    InvalidSession(String),

    #[error("signing secret not configured")]
    SecretNotConfigured,

    #[error("token generation error: {0}")]
    TokenGeneration(String),
}

/// Verifies HS256 session tokens issued by the identity provider.
#[derive(Clone)]
pub struct SessionVerifier {
    secret: String,
}

impl SessionVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn verify(&self, token: &str) -> Result<Session, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::SecretNotConfigured);
        }

        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let data = decode::<SessionClaims>(token, &key, &Validation::default())
            .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidSession("empty subject".to_string()));
        }

        Ok(Session::from(data.claims))
    }
}

/// Upper bound for `ACCESS_TOKEN_TTL_SECS`: one day.
pub const MAX_ACCESS_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Mints short-lived access tokens for a verified session.
#[derive(Clone)]
pub struct AccessTokenIssuer {
    secret: String,
    ttl: Duration,
}

impl AccessTokenIssuer {
    /// `ttl_secs` is clamped to [`MAX_ACCESS_TOKEN_TTL_SECS`].
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        if ttl_secs > MAX_ACCESS_TOKEN_TTL_SECS {
            tracing::warn!(
                "access token TTL of {}s exceeds the maximum, using {}s",
                ttl_secs,
                MAX_ACCESS_TOKEN_TTL_SECS
            );
        }
        let secs = i64::try_from(ttl_secs.min(MAX_ACCESS_TOKEN_TTL_SECS)).unwrap_or(0);
        Self {
            secret: secret.into(),
            ttl: Duration::try_seconds(secs).unwrap_or_else(Duration::zero),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, session: &Session) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::SecretNotConfigured);
        }

        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenGeneration("token expiry out of range".to_string()))?;
        let claims = AccessClaims {
            sub: session.user_id.clone(),
            sid: session.session_id.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }
}

/// Sign a session token the way the identity provider does. Used by tooling and tests.
pub fn sign_session(secret: &str, claims: &SessionClaims) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::SecretNotConfigured);
    }
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "session-secret";

    #[test]
    fn verifies_a_signed_session() {
        let claims = SessionClaims::new("user_1", true, Duration::minutes(5));
        let token = sign_session(SECRET, &claims).unwrap();

        let session = SessionVerifier::new(SECRET).verify(&token).unwrap();
        assert_eq!(session.user_id, "user_1");
        assert!(session.email_verified);
        assert_eq!(session.session_id, claims.sid);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let claims = SessionClaims::new("user_1", true, Duration::minutes(5));
        let token = sign_session("other-secret", &claims).unwrap();
        assert!(matches!(
            SessionVerifier::new(SECRET).verify(&token),
            Err(AuthError::InvalidSession(_))
        ));

        let expired = SessionClaims::new("user_1", true, Duration::hours(-2));
        let token = sign_session(SECRET, &expired).unwrap();
        assert!(SessionVerifier::new(SECRET).verify(&token).is_err());
    }

    #[test]
    fn unconfigured_secret_never_verifies() {
        assert!(matches!(
            SessionVerifier::new("").verify("anything"),
            Err(AuthError::SecretNotConfigured)
        ));
    }

    #[test]
    fn issued_access_token_carries_session_subject() {
        let session = Session {
            user_id: "user_7".into(),
            session_id: Some("sess_1".into()),
            email_verified: true,
        };
        let token = AccessTokenIssuer::new("access-secret", 60).issue(&session).unwrap();

        let data = decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(b"access-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, "user_7");
        assert_eq!(data.claims.sid.as_deref(), Some("sess_1"));
        assert_eq!(data.claims.exp - data.claims.iat, 60);
    }

    #[test]
    fn oversized_ttl_is_clamped_not_wrapped() {
        let issuer = AccessTokenIssuer::new("access-secret", u64::MAX);
        assert_eq!(issuer.ttl(), Duration::seconds(MAX_ACCESS_TOKEN_TTL_SECS as i64));

        let session = Session {
            user_id: "user_7".into(),
            session_id: None,
            email_verified: true,
        };
        let token = issuer.issue(&session).unwrap();
        let claims = decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(b"access-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;
        assert_eq!(claims.exp - claims.iat, MAX_ACCESS_TOKEN_TTL_SECS as i64);

        let near_limit = AccessTokenIssuer::new("access-secret", i64::MAX as u64 / 10);
        assert!(near_limit.issue(&session).is_ok());
    }
}
