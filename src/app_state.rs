use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::{Config, StoreBackend},
    db::{DocumentStore, FirebaseStore, MemoryStore},
    errors::AppResult,
    services::{ProgressService, ThresholdRiskPolicy},
};

#[derive(Clone)]
pub struct AppState {
    pub progress_service: Arc<ProgressService>,
    pub store: Arc<dyn DocumentStore>,
    pub jwt_service: JwtService,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Firebase => Arc::new(FirebaseStore::connect(&config)?),
            StoreBackend::Memory => match &config.store_seed_file {
                Some(path) => Arc::new(MemoryStore::from_json_file(path).await?),
                None => {
                    log::warn!("Memory store started without STORE_SEED_FILE; every read is empty");
                    Arc::new(MemoryStore::new())
                }
            },
        };

        Ok(Self::with_store(store, config))
    }

    pub fn with_store(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        let policy = Arc::new(ThresholdRiskPolicy::new(config.risk_thresholds.clone()));
        let progress_service = Arc::new(ProgressService::new(store.clone(), policy, &config));
        let jwt_service = JwtService::new(&config.jwt_secret);

        Self {
            progress_service,
            store,
            jwt_service,
            config: Arc::new(config),
        }
    }
}
