use async_trait::async_trait;
use service_core::error::AppError;

use crate::models::{Account, Station, StationRef};

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn find_station(&self, station: &StationRef) -> Result<Option<Station>, AppError>;

    /// Inserts or replaces the station with the same id.
    async fn save_station(&self, station: &Station) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_account(&self, account_id: &str) -> Result<Option<Account>, AppError>;
}
