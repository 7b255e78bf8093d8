use crate::catalog::{CandidateSource, SourceUnavailable};
use crate::config::Settings;
use crate::domain::intent::SportPreference;
use crate::domain::inventory::InventoryRecord;
use anyhow::Context;

const BACKEND: &str = "postgres";

#[derive(Debug, Clone)]
pub struct PgCandidateSource {
    pool: sqlx::PgPool,
    query: String,
}

impl PgCandidateSource {
    pub async fn connect(settings: &Settings) -> anyhow::Result<Self> {
        let db_url = settings.require_database_url()?;
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .connect(db_url)
            .await
            .context("connect DATABASE_URL failed")?;
        Self::new(pool, &settings.catalog_table)
    }

    pub fn new(pool: sqlx::PgPool, table: &str) -> anyhow::Result<Self> {
        Ok(Self {
            pool,
            query: select_query(table)?,
        })
    }

    async fn fetch(
        &self,
        sport: SportPreference,
        location_prefix: &str,
    ) -> anyhow::Result<Vec<InventoryRecord>> {
        let rows = sqlx::query_as::<_, (serde_json::Value,)>(&self.query)
            .persistent(false)
            .bind(sport.as_str())
            .bind(location_prefix)
            .fetch_all(&self.pool)
            .await
            .context("select catalog rows failed")?;

        let mut out = Vec::with_capacity(rows.len());
        for (row,) in rows {
            let record = serde_json::from_value::<InventoryRecord>(row)
                .context("catalog row does not decode into InventoryRecord")?;
            out.push(record);
        }
        Ok(out)
    }
}

#[async_trait::async_trait]
impl CandidateSource for PgCandidateSource {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn fetch_by_sport_and_location(
        &self,
        sport: SportPreference,
        location_prefix: &str,
    ) -> Result<Vec<InventoryRecord>, SourceUnavailable> {
        let records = self
            .fetch(sport, location_prefix)
            .await
            .map_err(|e| SourceUnavailable::new(BACKEND, &e))?;

        tracing::debug!(%sport, location_prefix, rows = records.len(), "catalog rows fetched");
        Ok(records)
    }
}

/// Whole rows as JSON so extra display columns pass through untouched.
/// Ordered by id so ties rank the same way on every request.
fn select_query(table: &str) -> anyhow::Result<String> {
    anyhow::ensure!(
        !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_'),
        "catalog table name must be a plain identifier (got {table:?})"
    );
    Ok(format!(
        "SELECT to_jsonb(p) FROM {table} p \
         WHERE p.sport_preference = $1 AND p.location_prefix = $2 \
         ORDER BY p.id"
    ))
}
