use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::{GlobalPermission, StationPermission};

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_token_expiry_minutes: i64,
}

/// Claims for access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (account ID)
    pub sub: String,
    pub email: String,
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub jti: String,
    #[serde(default)]
    pub global_permissions: Vec<GlobalPermission>,
    /// Station id to permissions held on that station.
    #[serde(default)]
    pub station_permissions: BTreeMap<i64, Vec<StationPermission>>,
}

/// What a token grants; turned into claims by [`JwtService::generate_access_token`].
#[derive(Debug, Clone, Default)]
pub struct TokenGrant {
    pub global_permissions: Vec<GlobalPermission>,
    pub station_permissions: BTreeMap<i64, Vec<StationPermission>>,
}

impl TokenGrant {
    pub fn global(permissions: impl IntoIterator<Item = GlobalPermission>) -> Self {
        Self {
            global_permissions: permissions.into_iter().collect(),
            station_permissions: BTreeMap::new(),
        }
    }

    pub fn station(
        mut self,
        station_id: i64,
        permissions: impl IntoIterator<Item = StationPermission>,
    ) -> Self {
        self.station_permissions
            .entry(station_id)
            .or_default()
            .extend(permissions);
        self
    }
}

impl JwtService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        let secret = config.secret.expose_secret();
        if secret.is_empty() {
            return Err(anyhow::anyhow!("JWT secret must not be empty"));
        }

        tracing::info!(issuer = %config.issuer, "JWT service initialized with HS256 key");

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        })
    }

    pub fn generate_access_token(
        &self,
        account_id: &str,
        email: &str,
        grant: TokenGrant,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            global_permissions: grant.global_permissions,
            station_permissions: grant.station_permissions,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))
    }

    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn config(secret: &str, issuer: &str, expiry: i64) -> JwtConfig {
        JwtConfig {
            secret: Secret::new(secret.to_string()),
            issuer: issuer.to_string(),
            access_token_expiry_minutes: expiry,
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(JwtService::new(&config("", "stations", 15)).is_err());
    }

    #[test]
    fn test_token_carries_permissions() {
        let jwt = JwtService::new(&config("test-secret", "stations", 15)).unwrap();
        let grant = TokenGrant::global([GlobalPermission::Stations])
            .station(4, [StationPermission::Profile, StationPermission::Media]);

        let token = jwt
            .generate_access_token("acct-1", "dj@example.com", grant)
            .unwrap();
        let claims = jwt.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "acct-1");
        assert_eq!(claims.iss, "stations");
        assert_eq!(claims.global_permissions, vec![GlobalPermission::Stations]);
        assert_eq!(
            claims.station_permissions.get(&4),
            Some(&vec![StationPermission::Profile, StationPermission::Media])
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtService::new(&config("secret-a", "stations", 15)).unwrap();
        let verifier = JwtService::new(&config("secret-b", "stations", 15)).unwrap();

        let token = issuer
            .generate_access_token("acct-1", "dj@example.com", TokenGrant::default())
            .unwrap();
        assert!(verifier.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issuer = JwtService::new(&config("secret", "elsewhere", 15)).unwrap();
        let verifier = JwtService::new(&config("secret", "stations", 15)).unwrap();

        let token = issuer
            .generate_access_token("acct-1", "dj@example.com", TokenGrant::default())
            .unwrap();
        assert!(verifier.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtService::new(&config("secret", "stations", -10)).unwrap();
        let token = jwt
            .generate_access_token("acct-1", "dj@example.com", TokenGrant::default())
            .unwrap();
        assert!(jwt.validate_access_token(&token).is_err());
    }
}
