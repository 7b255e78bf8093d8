use crate::catalog::{CandidateSource, SourceUnavailable};
use crate::config::Settings;
use crate::domain::intent::SportPreference;
use crate::domain::inventory::InventoryRecord;
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::time::Duration;

const BACKEND: &str = "supabase";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ATTEMPTS: u32 = 1;

/// Catalog table exposed through Supabase's PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct SupabaseCandidateSource {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    table: String,
    attempts: u32,
}

impl SupabaseCandidateSource {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_supabase_url()?.to_string();
        let api_key = settings.require_supabase_anon_key()?.to_string();

        let timeout_secs = std::env::var("SUPABASE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let attempts = std::env::var("SUPABASE_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_ATTEMPTS);
        anyhow::ensure!(attempts >= 1, "SUPABASE_ATTEMPTS must be >= 1");

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build supabase http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            table: settings.catalog_table.clone(),
            attempts,
        })
    }

    fn url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        Ok(headers)
    }

    async fn fetch_once(
        &self,
        sport: SportPreference,
        location_prefix: &str,
    ) -> Result<Vec<InventoryRecord>> {
        let res = self
            .http
            .get(self.url())
            .headers(self.headers()?)
            .query(&filter_params(sport, location_prefix))
            .send()
            .await
            .context("supabase request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read supabase response")?;

        if !status.is_success() {
            anyhow::bail!("supabase HTTP {status}: {text}");
        }

        serde_json::from_str::<Vec<InventoryRecord>>(&text)
            .with_context(|| format!("supabase response is not a list of catalog rows: {text}"))
    }
}

#[async_trait::async_trait]
impl CandidateSource for SupabaseCandidateSource {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn fetch_by_sport_and_location(
        &self,
        sport: SportPreference,
        location_prefix: &str,
    ) -> Result<Vec<InventoryRecord>, SourceUnavailable> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(sport, location_prefix).await {
                Ok(records) => {
                    tracing::debug!(%sport, location_prefix, rows = records.len(), attempt, "catalog rows fetched");
                    return Ok(records);
                }
                Err(err) => {
                    if attempt >= self.attempts {
                        return Err(SourceUnavailable::new(BACKEND, &err));
                    }
                    let backoff = Duration::from_millis(250 << (attempt - 1).min(4));
                    tracing::warn!(attempt, ?backoff, error = %err, "supabase fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// PostgREST `eq.` filters: exact equality on both keys.
fn filter_params(sport: SportPreference, location_prefix: &str) -> [(&'static str, String); 4] {
    [
        ("select", "*".to_string()),
        ("sport_preference", format!("eq.{sport}")),
        ("location_prefix", format!("eq.{location_prefix}")),
        ("order", "id.asc".to_string()),
    ]
}
