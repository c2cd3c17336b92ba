#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use station_service::{
    build_router,
    config::{
        Environment, JwtConfig, SecurityConfig, StationConfig, StorageBackend, StorageConfig,
        SwaggerConfig,
    },
    models::{Account, GlobalPermission, Station, StationPermission},
    services::{JwtService, MemoryStore, TokenGrant},
    AppState,
};
use std::sync::Arc;
use tower::util::ServiceExt;

pub const STATION_ID: i64 = 1;
pub const OTHER_STATION_ID: i64 = 2;
pub const MANAGER_ID: &str = "acct-manager";
pub const ADMIN_ID: &str = "acct-admin";

pub fn test_config() -> StationConfig {
    StationConfig {
        common: CoreConfig::default(),
        environment: Environment::Dev,
        service_name: "station-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            seed_path: None,
            mongodb: None,
        },
        jwt: JwtConfig {
            secret: Secret::new("test-secret".to_string()),
            issuer: "station-service".to_string(),
            access_token_expiry_minutes: 15,
        },
        swagger: SwaggerConfig { enabled: true },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

pub fn seeded_station() -> Station {
    let mut station = Station::new(STATION_ID, "Night Owl Radio");
    station.description = Some("Late night jazz".to_string());
    station.max_bitrate = 192;
    station.max_mounts = 2;
    station.adapter_api_key = Some("adapter-secret".to_string());
    station
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub jwt: JwtService,
}

impl TestApp {
    pub fn spawn() -> Self {
        let config = test_config();
        let jwt = JwtService::new(&config.jwt).expect("Failed to create JWT service");

        let store = Arc::new(MemoryStore::new());
        store.insert_station(seeded_station());
        store.insert_station(Station::new(OTHER_STATION_ID, "Early Bird FM"));
        store.insert_account(
            Account::new(MANAGER_ID, "manager@example.com").with_two_factor_secret("JBSWY3DPEHPK3PXP"),
        );
        store.insert_account(Account::new(ADMIN_ID, "admin@example.com"));

        let state = AppState {
            config,
            jwt: jwt.clone(),
            stations: store.clone(),
            accounts: store.clone(),
        };

        TestApp {
            router: build_router(state),
            store,
            jwt,
        }
    }

    pub fn token(&self, account_id: &str, grant: TokenGrant) -> String {
        self.jwt
            .generate_access_token(account_id, &format!("{}@example.com", account_id), grant)
            .expect("Failed to create token")
    }

    /// Holds only the profile permission on [`STATION_ID`].
    pub fn manager_token(&self) -> String {
        self.token(
            MANAGER_ID,
            TokenGrant::default().station(STATION_ID, [StationPermission::Profile]),
        )
    }

    pub fn admin_token(&self) -> String {
        self.token(ADMIN_ID, TokenGrant::global([GlobalPermission::Stations]))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// PUT with a raw body and no `Content-Type`.
    pub async fn put_raw(&self, uri: &str, token: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::PUT).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }
}
