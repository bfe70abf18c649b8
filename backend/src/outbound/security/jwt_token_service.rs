//! HS256 JSON Web Token implementation of the `TokenService` port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! so tests can move time explicitly.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{Identity, IssuedToken, Role, TokenClaims, UserId};

/// Default token lifetime: seven days.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 tokens with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service signing with `secret`, issuing tokens valid for `ttl`.
    ///
    /// # Errors
    /// Returns [`TokenServiceError::Signing`] when the secret is empty or the
    /// lifetime does not fit a timestamp.
    pub fn new(
        secret: &[u8],
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TokenServiceError> {
        if secret.is_empty() {
            return Err(TokenServiceError::signing("signing secret must not be empty"));
        }
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|err| TokenServiceError::signing(format!("token lifetime: {err}")))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<IssuedToken, TokenServiceError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            sub: identity.id().to_string(),
            email: identity.email().to_string(),
            role: identity.role().as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(IssuedToken::new)
            .map_err(|err| TokenServiceError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenServiceError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenServiceError::invalid(err.to_string()))?
            .claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenServiceError::invalid("token expired"));
        }

        let user_id =
            UserId::new(&claims.sub).map_err(|err| TokenServiceError::invalid(err.to_string()))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|err| TokenServiceError::invalid(err.to_string()))?;
        let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenServiceError::invalid("expiry out of range"))?;

        Ok(TokenClaims {
            user_id,
            email: claims.email,
            role,
            expires_at,
        })
    }
}
