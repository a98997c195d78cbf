use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{AuthError, Identity, TokenVerifier};

/// Google publishes the RSA keys used to sign Firebase ID tokens here,
/// rotated on the order of hours.
const JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Deserialize)]
struct ServiceAccount {
    project_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    email: Option<String>,
}

struct KeyCache {
    keys: HashMap<String, Jwk>,
    fetched_at: Option<Instant>,
}

/// Firebase variant of the gate: verifies RS256 ID tokens against Google's
/// JWKs, with audience and issuer pinned to the configured project.
pub struct FirebaseVerifier {
    project_id: String,
    client: reqwest::Client,
    cache: RwLock<KeyCache>,
}

impl FirebaseVerifier {
    /// Build a verifier from the base64-encoded service account JSON blob
    /// taken from the environment. Only the project id is needed; token
    /// signatures come from the public JWKS endpoint.
    pub fn from_service_account_b64(blob: &str) -> Result<Self, AuthError> {
        let raw = base64::engine::general_purpose::STANDARD
            .decode(blob.trim())
            .map_err(|e| {
                tracing::error!("service account blob is not valid base64: {}", e);
                AuthError::NotConfigured
            })?;
        let account: ServiceAccount = serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!("service account blob is not valid JSON: {}", e);
            AuthError::NotConfigured
        })?;

        Ok(Self {
            project_id: account.project_id,
            client: reqwest::Client::new(),
            cache: RwLock::new(KeyCache {
                keys: HashMap::new(),
                fetched_at: None,
            }),
        })
    }

    async fn signing_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        {
            let cache = self.cache.read().await;
            let fresh = cache
                .fetched_at
                .map(|t| t.elapsed() < KEY_CACHE_TTL)
                .unwrap_or(false);
            if fresh {
                if let Some(jwk) = cache.keys.get(kid) {
                    return Ok(jwk.clone());
                }
            }
        }

        // Stale cache or unknown kid (key rotation): refetch once.
        let jwks: JwkSet = self
            .client
            .get(JWKS_URL)
            .send()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?;

        let mut cache = self.cache.write().await;
        cache.keys = jwks.keys.into_iter().map(|k| (k.kid.clone(), k)).collect();
        cache.fetched_at = Some(Instant::now());

        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown signing key id: {}", kid)))
    }
}

#[async_trait]
impl TokenVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let header =
            decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token header missing kid".to_string()))?;

        let jwk = self.signing_key(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);

        let token_data = decode::<FirebaseClaims>(token, &decoding_key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let email = token_data
            .claims
            .email
            .ok_or_else(|| AuthError::InvalidToken("token carries no email claim".to_string()))?;

        Ok(Identity { email })
    }
}
