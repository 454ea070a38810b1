use std::sync::Arc;
use std::time::Duration;

use fixio_ai::{CompletionError, CompletionGateway, OpenAiApi};
use fixio_store::{HostedStore, ImageStore, MemoryStore, ProjectStore, StoreError};

use crate::config::{ServerConfig, StoreConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc` or is itself a cheap
/// handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The three assistant call sites.
    pub gateway: CompletionGateway,
    pub projects: Arc<dyn ProjectStore>,
    pub images: Arc<dyn ImageStore>,
}

/// Failure to build the outbound clients at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("completion client: {0}")]
    Completion(#[from] CompletionError),
    #[error("store client: {0}")]
    Store(#[from] StoreError),
}

impl AppState {
    /// Wire up the real clients described by `config`.
    pub fn from_config(config: ServerConfig) -> Result<Self, StartupError> {
        let timeout = Duration::from_secs(config.upstream_timeout_secs);

        let provider = OpenAiApi::with_timeout(
            config.openai.base_url.as_str(),
            config.openai.api_key.as_str(),
            timeout,
        )?;
        let gateway = CompletionGateway::new(Arc::new(provider));

        let (projects, images): (Arc<dyn ProjectStore>, Arc<dyn ImageStore>) = match &config.store
        {
            StoreConfig::Hosted { url, anon_key } => {
                let store = Arc::new(HostedStore::with_timeout(
                    url.as_str(),
                    anon_key.as_str(),
                    timeout,
                )?);
                (store.clone() as Arc<dyn ProjectStore>, store as Arc<dyn ImageStore>)
            }
            StoreConfig::Memory => {
                tracing::warn!("Using the in-memory store; data is lost on restart");
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn ProjectStore>, store as Arc<dyn ImageStore>)
            }
        };

        Ok(Self {
            config: Arc::new(config),
            gateway,
            projects,
            images,
        })
    }
}
