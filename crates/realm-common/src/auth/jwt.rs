//! Bearer token verification
//!
//! Accounts live with an external identity provider that signs HS256 tokens
//! with a shared secret. The services here only verify; minting exists for
//! seeding and tests.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use realm_core::Snowflake;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Access token payload. `sub` is the user's snowflake as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Snowflake,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// Seconds; may be negative in tests to mint already-expired tokens
    ttl_secs: i64,
}

impl JwtService {
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Mint a token for `user_id`
    ///
    /// # Errors
    /// Fails only if the claims cannot be encoded
    pub fn issue_access_token(&self, user_id: Snowflake) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat,
            exp: iat + self.ttl_secs,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign token: {e}")))
    }

    /// Verify signature and expiry
    ///
    /// # Errors
    /// `TokenExpired` past `exp`; `InvalidToken` for anything else wrong with it,
    /// including a non-numeric subject
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::InvalidToken,
            })
    }

    /// Verify and return the caller's user id
    ///
    /// # Errors
    /// See [`JwtService::verify`]
    pub fn authenticate(&self, token: &str) -> Result<Snowflake, AppError> {
        self.verify(token).map(|claims| claims.sub)
    }
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
