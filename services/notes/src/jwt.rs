//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using a shared secret and carry the user's
//! id, name and email. Nothing is stored server side: a token is valid as
//! long as its signature, issuer, audience and expiry check out.

use std::fmt;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{ConfigError, optional, required};
use crate::models::User;

/// Default token lifetime in minutes
pub const DEFAULT_EXPIRE_MINUTES: u64 = 60;

/// Secrets shorter than this get a startup warning
const MIN_RECOMMENDED_SECRET_LEN: usize = 32;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Expected and issued `iss` claim
    pub issuer: String,
    /// Expected and issued `aud` claim
    pub audience: String,
    /// Token lifetime in minutes (default: 60)
    pub expire_minutes: u64,
    /// Clock skew tolerated when checking `exp`, in seconds (default: 0)
    pub leeway_seconds: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expire_minutes", &self.expire_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: HMAC signing secret (required)
    /// - `JWT_ISSUER`: token issuer (required)
    /// - `JWT_AUDIENCE`: token audience (required)
    /// - `JWT_EXPIRE_MINUTES`: token lifetime in minutes (default: 60)
    /// - `JWT_LEEWAY_SECONDS`: tolerated clock skew in seconds (default: 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = required("JWT_SECRET")?;
        let issuer = required("JWT_ISSUER")?;
        let audience = required("JWT_AUDIENCE")?;

        let expire_minutes = optional("JWT_EXPIRE_MINUTES", DEFAULT_EXPIRE_MINUTES)?;
        let leeway_seconds = optional("JWT_LEEWAY_SECONDS", 0)?;

        let config = JwtConfig {
            secret,
            issuer,
            audience,
            expire_minutes,
            leeway_seconds,
        };
        config.lifetime_seconds()?;

        Ok(config)
    }

    /// Token lifetime in seconds
    ///
    /// Zero is rejected, as is any lifetime whose expiry, counted from now,
    /// would not fit in a unix timestamp.
    pub fn lifetime_seconds(&self) -> Result<u64, ConfigError> {
        self.expire_minutes
            .checked_mul(60)
            .filter(|&seconds| seconds > 0)
            .filter(|&seconds| get_current_timestamp().checked_add(seconds).is_some())
            .ok_or_else(|| ConfigError::Invalid {
                var: "JWT_EXPIRE_MINUTES",
                value: self.expire_minutes.to_string(),
            })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Display name
    pub name: String,
    pub email: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    pub iss: String,
    pub aud: String,
}

impl Claims {
    /// The user id carried in `sub`, if it is numeric
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
    token_lifetime: u64,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self, ConfigError> {
        if config.secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if config.issuer.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_ISSUER"));
        }
        if config.audience.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_AUDIENCE"));
        }
        if config.secret.len() < MIN_RECOMMENDED_SECRET_LEN {
            warn!(
                "JWT_SECRET is shorter than {} bytes; use a longer random secret",
                MIN_RECOMMENDED_SECRET_LEN
            );
        }
        let token_lifetime = config.lifetime_seconds()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
            token_lifetime,
        })
    }

    /// Generate a token for a user, issued now
    pub fn issue(&self, user: &User) -> Result<IssuedToken, Error> {
        self.issue_at(user, get_current_timestamp())
    }

    /// Generate a token for a user as if issued at `issued_at` (unix seconds)
    pub fn issue_at(&self, user: &User, issued_at: u64) -> Result<IssuedToken, Error> {
        let expires_in = self.token_lifetime();

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(expires_in),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        Ok(IssuedToken { token, expires_in })
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Token lifetime in seconds
    pub fn token_lifetime(&self) -> u64 {
        self.token_lifetime
    }
}
