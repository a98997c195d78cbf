use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub mod firebase;

pub use firebase::FirebaseVerifier;

/// Verified caller identity, attached to the request for the lifetime of one
/// request and discarded afterwards. Never persisted.
#[derive(Clone, Debug)]
pub struct Identity {
    pub email: String,
}

/// Claims carried by the self-issued HS256 token variant.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(email: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            email,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingCredential,
    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Identity provider unreachable: {0}")]
    ProviderUnavailable(String),
    #[error("Token verification is not configured")]
    NotConfigured,
}

/// Seam between the HTTP gate and whichever identity provider is in play.
/// The gate only needs a verified email back.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Self-issued token variant: HS256 with a shared secret from the
/// environment. Tokens are minted by POST /jwt and verified locally.
pub struct LocalJwtVerifier {
    secret: String,
}

impl LocalJwtVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for LocalJwtVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::NotConfigured);
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(Identity {
            email: token_data.claims.email,
        })
    }
}

/// Mint a token for the self-issued variant (POST /jwt).
pub fn generate_token(email: String, secret: &str, expiry_hours: u64) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::NotConfigured);
    }

    let claims = Claims::new(email, expiry_hours);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}
