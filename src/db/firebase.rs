use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::{
    config::Config,
    db::{DocumentStore, StorePath},
    errors::{AppError, AppResult},
};

/// Realtime Database REST client. Every read is a `GET {base}/{path}.json`.
#[derive(Clone)]
pub struct FirebaseStore {
    client: Client,
    base_url: Url,
    auth_secret: Option<SecretString>,
}

impl FirebaseStore {
    pub fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.firebase_db_url).map_err(|e| {
            AppError::ValidationError(format!(
                "FIREBASE_DB_URL '{}' is not a valid URL: {}",
                config.firebase_db_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::ValidationError(format!(
                "FIREBASE_DB_URL '{}' cannot carry a path",
                config.firebase_db_url
            )));
        }

        log::info!("Using Firebase store at {}", base_url);

        Ok(Self {
            client,
            base_url,
            auth_secret: config.firebase_auth_secret.clone(),
        })
    }

    /// Each key becomes one percent-encoded path segment; `.json` is appended to the last.
    pub fn url_for(&self, path: &StorePath) -> Url {
        let mut url = self.base_url.clone();
        let (last, parents) = match path.segments().split_last() {
            Some((last, parents)) => (format!("{}.json", last), parents),
            None => (".json".to_string(), &[][..]),
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(parents).push(&last);
        }
        url
    }

    async fn get(&self, path: &StorePath, shallow: bool) -> AppResult<Option<Value>> {
        let mut request = self.client.get(self.url_for(path));
        if let Some(secret) = &self.auth_secret {
            request = request.query(&[("auth", secret.expose_secret())]);
        }
        if shallow {
            request = request.query(&[("shallow", "true")]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::StoreUnavailable(format!(
                "GET {} returned {}",
                path, status
            )));
        }

        let value: Value = response.json().await?;
        Ok(if value.is_null() { None } else { Some(value) })
    }
}

#[async_trait]
impl DocumentStore for FirebaseStore {
    async fn read(&self, path: &StorePath) -> AppResult<Option<Value>> {
        self.get(path, false).await
    }

    async fn health_check(&self) -> AppResult<()> {
        self.get(&StorePath::root(), true).await.map(|_| ())
    }
}
