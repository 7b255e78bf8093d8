use crate::config::{CatalogBackend, Settings};
use crate::domain::intent::SportPreference;
use crate::domain::inventory::InventoryRecord;
use std::fmt;
use std::sync::Arc;

pub mod memory;
pub mod postgres;
pub mod supabase;

pub use memory::InMemoryCandidateSource;
pub use postgres::PgCandidateSource;
pub use supabase::SupabaseCandidateSource;

/// Read access to the sponsorship catalog.
///
/// Both filters are exact string equality (the "prefix" is a full 3-character key, not a
/// prefix scan). No match is `Ok(vec![])`. Records come back in the order the engine should
/// use for tie-breaking.
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn fetch_by_sport_and_location(
        &self,
        sport: SportPreference,
        location_prefix: &str,
    ) -> Result<Vec<InventoryRecord>, SourceUnavailable>;
}

/// The catalog could not be queried. Carries the backend name and a flattened cause chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnavailable {
    pub backend: &'static str,
    pub detail: String,
}

impl SourceUnavailable {
    pub fn new(backend: &'static str, err: &anyhow::Error) -> Self {
        Self {
            backend,
            detail: format!("{err:#}"),
        }
    }
}

impl fmt::Display for SourceUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "candidate source unavailable (backend={}): {}",
            self.backend, self.detail
        )
    }
}

impl std::error::Error for SourceUnavailable {}

/// Builds the backend selected by `CATALOG_BACKEND`.
pub async fn from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn CandidateSource>> {
    let source: Arc<dyn CandidateSource> = match settings.catalog_backend()? {
        CatalogBackend::Postgres => Arc::new(PgCandidateSource::connect(settings).await?),
        CatalogBackend::Supabase => Arc::new(SupabaseCandidateSource::from_settings(settings)?),
        CatalogBackend::File => {
            let path = settings.require_catalog_file()?;
            Arc::new(InMemoryCandidateSource::from_json_file(path)?)
        }
    };

    tracing::info!(backend = source.backend_name(), "catalog backend ready");
    Ok(source)
}
