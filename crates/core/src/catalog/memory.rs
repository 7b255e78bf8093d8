use crate::catalog::{CandidateSource, SourceUnavailable};
use crate::domain::intent::SportPreference;
use crate::domain::inventory::InventoryRecord;
use anyhow::Context;
use std::path::Path;

/// Catalog held in memory, in insertion order. Used for local JSON catalogs and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCandidateSource {
    records: Vec<InventoryRecord>,
}

impl InMemoryCandidateSource {
    pub fn new(records: Vec<InventoryRecord>) -> Self {
        Self { records }
    }

    /// Loads a JSON array of catalog rows.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        let records = serde_json::from_str::<Vec<InventoryRecord>>(&text)
            .with_context(|| format!("catalog file {} is not a JSON array of records", path.display()))?;
        Ok(Self::new(records))
    }
}

#[async_trait::async_trait]
impl CandidateSource for InMemoryCandidateSource {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch_by_sport_and_location(
        &self,
        sport: SportPreference,
        location_prefix: &str,
    ) -> Result<Vec<InventoryRecord>, SourceUnavailable> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.sport_preference == sport && r.location_prefix == location_prefix)
            .cloned()
            .collect())
    }
}
