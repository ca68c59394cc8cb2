use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{AppraisalError, Result};
use crate::scoring::{BackendClient, BackendScorer, MockScorer, Scorer};
use crate::store::{FileStorage, SectionStore};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOGIN_DELAY_MS: u64 = 800;
const DATA_DIR_NAME: &str = "jiit-appraisal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringMode {
    /// Fixed local point tables.
    #[default]
    Mock,
    /// Submit to the ingestion service.
    Backend,
}

impl ScoringMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "mock" | "" => Ok(ScoringMode::Mock),
            "backend" => Ok(ScoringMode::Backend),
            other => Err(AppraisalError::Config(format!(
                "APPRAISAL_SCORING must be mock or backend, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub scoring: ScoringMode,
    pub login_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: default_data_dir(),
            scoring: ScoringMode::Mock,
            login_delay: Duration::from_millis(DEFAULT_LOGIN_DELAY_MS),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Failed to load .env: {}", e),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset or blank variables take their
    /// defaults.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(url) = get("API_BASE_URL") {
            config.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = get("APPRAISAL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(mode) = get("APPRAISAL_SCORING") {
            config.scoring = ScoringMode::parse(&mode)?;
        }
        if let Some(ms) = get("APPRAISAL_LOGIN_DELAY_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                AppraisalError::Config(format!(
                    "APPRAISAL_LOGIN_DELAY_MS must be a whole number of milliseconds, got {}",
                    ms
                ))
            })?;
            config.login_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Store over the configured data directory.
    pub fn open_store(&self) -> SectionStore {
        SectionStore::new(Arc::new(FileStorage::new(&self.data_dir)))
    }

    /// Scorer for the configured mode.
    pub fn scorer(&self, store: &SectionStore) -> Arc<dyn Scorer> {
        match self.scoring {
            ScoringMode::Mock => Arc::new(MockScorer::new()),
            ScoringMode::Backend => Arc::new(BackendScorer::new(BackendClient::new(
                self.api_base_url.clone(),
                store.clone(),
            ))),
        }
    }
}
