use async_trait::async_trait;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use super::repository::{AccountRepository, StationRepository};
use crate::models::{Account, Station, StationRef};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for station-service");

        for (collection, field) in [("stations", "id"), ("stations", "short_name"), ("accounts", "id")] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .name(format!("{}_unique", field))
                        .unique(true)
                        .build(),
                )
                .build();

            self.db
                .collection::<mongodb::bson::Document>(collection)
                .create_index(index, None)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to create {} index on {} collection: {}",
                        field,
                        collection,
                        e
                    );
                    AppError::from(e)
                })?;
            tracing::info!("Created unique index on {}.{}", collection, field);
        }

        Ok(())
    }

    pub fn stations(&self) -> Collection<Station> {
        self.db.collection("stations")
    }

    pub fn accounts(&self) -> Collection<Account> {
        self.db.collection("accounts")
    }
}

#[async_trait]
impl StationRepository for MongoDb {
    async fn find_station(&self, station: &StationRef) -> Result<Option<Station>, AppError> {
        let filter = match station {
            StationRef::Id(id) => doc! { "id": *id },
            StationRef::ShortName(name) => doc! { "short_name": name.as_str() },
        };

        Ok(self.stations().find_one(filter, None).await?)
    }

    async fn save_station(&self, station: &Station) -> Result<(), AppError> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.stations()
            .replace_one(doc! { "id": station.id }, station, options)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::BadRequest(anyhow::anyhow!(
                        "Short name is already used by another station"
                    ))
                } else {
                    AppError::from(e)
                }
            })?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

#[async_trait]
impl AccountRepository for MongoDb {
    async fn find_account(&self, account_id: &str) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts()
            .find_one(doc! { "id": account_id }, None)
            .await?)
    }
}
