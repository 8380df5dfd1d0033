//! Shared application state for Axum routers.

use std::sync::Arc;
use std::time::Instant;

use nicebrick_core::ContentCatalog;
use nicebrick_render::{BearBrickRenderer, SvgBearBrickRenderer};
use nicebrick_storage::{
    ArtifactCache, Clock, DisabledKvStore, InMemoryKvStore, KvStore, PgKvStore, VoteLedger,
};

use crate::config::{ApiConfig, RendererKind, StoreBackend};
use crate::error::ApiResult;
use crate::metadata::TokenArtifact;

/// Cache of generated token artifacts, keyed by fingerprint.
pub type ArtifactStore = ArtifactCache<Arc<TokenArtifact>>;

/// The installed BearBrick renderer, if any.
pub type SharedRenderer = Option<Arc<dyn BearBrickRenderer>>;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    /// Content list loaded once at startup.
    pub catalog: ContentCatalog,
    pub ledger: VoteLedger,
    /// Process-local; not shared between instances.
    pub artifacts: ArtifactStore,
    pub renderer: SharedRenderer,
    pub start_time: Instant,
}

crate::impl_from_ref!(Arc<ApiConfig>, config);
crate::impl_from_ref!(ContentCatalog, catalog);
crate::impl_from_ref!(VoteLedger, ledger);
crate::impl_from_ref!(ArtifactStore, artifacts);
crate::impl_from_ref!(SharedRenderer, renderer);
crate::impl_from_ref!(Instant, start_time);

impl AppState {
    pub fn new(
        config: ApiConfig,
        catalog: ContentCatalog,
        store: Arc<dyn KvStore>,
        renderer: SharedRenderer,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            ledger: VoteLedger::new(store),
            artifacts: ArtifactCache::new(),
            renderer,
            start_time: Instant::now(),
        }
    }

    /// Replace the artifact cache with an empty one driven by `clock`.
    pub fn with_artifact_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.artifacts = ArtifactCache::with_clock(clock);
        self
    }

    /// Build state from configuration: load the catalog, connect the store,
    /// install the renderer.
    ///
    /// An unreachable PostgreSQL store does not abort startup. Reads degrade
    /// and `/health/ready` reports the outage until it recovers.
    pub async fn from_config(config: ApiConfig) -> ApiResult<Self> {
        let catalog = config.load_catalog()?;
        let store = connect_store(&config).await?;
        let renderer: SharedRenderer = match config.renderer {
            RendererKind::Svg => Some(Arc::new(SvgBearBrickRenderer::new())),
            RendererKind::None => None,
        };

        tracing::info!(
            catalog_size = catalog.len(),
            store = store.backend_name(),
            renderer = renderer.as_ref().map(|r| r.name()).unwrap_or("none"),
            artifact_ttl_secs = config.artifact_cache_ttl.as_secs(),
            "Application state initialized"
        );

        Ok(Self::new(config, catalog, store, renderer))
    }
}

async fn connect_store(config: &ApiConfig) -> ApiResult<Arc<dyn KvStore>> {
    let store: Arc<dyn KvStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory vote store; votes are lost on restart");
            Arc::new(InMemoryKvStore::new())
        }
        StoreBackend::Disabled => {
            tracing::warn!("Vote store disabled; tallies read as zero and votes are rejected");
            Arc::new(DisabledKvStore)
        }
        StoreBackend::Postgres => {
            let pg = PgKvStore::from_config(&config.store.db)?;
            if let Err(e) = pg.ensure_schema().await {
                tracing::error!(
                    error = %e,
                    "Vote store schema setup failed, retrying on first use"
                );
            }
            Arc::new(pg)
        }
    };
    Ok(store)
}
