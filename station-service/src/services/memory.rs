use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use service_core::error::AppError;
use std::path::Path;

use super::repository::{AccountRepository, StationRepository};
use crate::models::{Account, Station, StationRef};

/// Process-local store used for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    stations: DashMap<i64, Station>,
    accounts: DashMap<String, Account>,
}

/// Layout of a seed file: `{"stations": [...], "accounts": [...]}`.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        let store = Self::new();
        for station in seed.stations {
            store.insert_station(station);
        }
        for account in seed.accounts {
            store.insert_account(account);
        }
        store
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let seed: Seed = serde_json::from_str(&raw).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid seed file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %path.display(),
            stations = seed.stations.len(),
            accounts = seed.accounts.len(),
            "Loaded storage seed"
        );

        Ok(Self::from_seed(seed))
    }

    pub fn insert_station(&self, station: Station) {
        self.stations.insert(station.id, station);
    }

    pub fn insert_account(&self, account: Account) {
        self.accounts.insert(account.id.clone(), account);
    }
}

#[async_trait]
impl StationRepository for MemoryStore {
    async fn find_station(&self, station: &StationRef) -> Result<Option<Station>, AppError> {
        let found = match station {
            StationRef::Id(id) => self.stations.get(id).map(|entry| entry.value().clone()),
            StationRef::ShortName(_) => self
                .stations
                .iter()
                .find(|entry| station.matches(entry.value()))
                .map(|entry| entry.value().clone()),
        };
        Ok(found)
    }

    async fn save_station(&self, station: &Station) -> Result<(), AppError> {
        self.stations.insert(station.id, station.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_account(&self, account_id: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .get(account_id)
            .map(|entry| entry.value().clone()))
    }
}
