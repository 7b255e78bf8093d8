pub mod catalog;
pub mod domain;
pub mod recommend;
pub mod storage;

pub mod config {
    use anyhow::Context;

    const DEFAULT_CATALOG_TABLE: &str = "products";
    const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum CatalogBackend {
        Postgres,
        Supabase,
        File,
    }

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub database_max_connections: u32,
        pub supabase_url: Option<String>,
        pub supabase_anon_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub catalog_backend: Option<String>,
        pub catalog_file: Option<String>,
        pub catalog_table: String,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);

            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                database_max_connections,
                supabase_url: std::env::var("SUPABASE_URL").ok(),
                supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                catalog_backend: std::env::var("CATALOG_BACKEND").ok(),
                catalog_file: std::env::var("CATALOG_FILE").ok(),
                catalog_table: std::env::var("CATALOG_TABLE")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CATALOG_TABLE.to_string()),
            })
        }

        /// Explicit `CATALOG_BACKEND` wins; otherwise the first configured store is used.
        pub fn catalog_backend(&self) -> anyhow::Result<CatalogBackend> {
            if let Some(name) = self.catalog_backend.as_deref() {
                return match name.trim().to_ascii_lowercase().as_str() {
                    "postgres" => Ok(CatalogBackend::Postgres),
                    "supabase" => Ok(CatalogBackend::Supabase),
                    "file" => Ok(CatalogBackend::File),
                    other => anyhow::bail!(
                        "CATALOG_BACKEND must be postgres, supabase or file (got {other:?})"
                    ),
                };
            }

            if self.database_url.is_some() {
                Ok(CatalogBackend::Postgres)
            } else if self.supabase_url.is_some() {
                Ok(CatalogBackend::Supabase)
            } else if self.catalog_file.is_some() {
                Ok(CatalogBackend::File)
            } else {
                anyhow::bail!("no catalog configured: set DATABASE_URL, SUPABASE_URL or CATALOG_FILE")
            }
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }

        pub fn require_supabase_url(&self) -> anyhow::Result<&str> {
            self.supabase_url
                .as_deref()
                .context("SUPABASE_URL is required")
        }

        pub fn require_supabase_anon_key(&self) -> anyhow::Result<&str> {
            self.supabase_anon_key
                .as_deref()
                .context("SUPABASE_ANON_KEY is required")
        }

        pub fn require_catalog_file(&self) -> anyhow::Result<&str> {
            self.catalog_file
                .as_deref()
                .context("CATALOG_FILE is required")
        }
    }

}
