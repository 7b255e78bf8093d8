use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pitchside_core::catalog::{CandidateSource, InMemoryCandidateSource};
use pitchside_core::domain::intent::RawIntent;
use pitchside_core::recommend::{
    RecommendError, RecommendationService, ScoreWeights, ValidationError,
};

#[derive(Debug, Parser)]
#[command(name = "pitchside_cli")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank catalog products for one campaign intent and print them as JSON.
    Recommend(RecommendArgs),

    /// Create the catalog table in DATABASE_URL.
    Migrate,
}

#[derive(Debug, clap::Args)]
struct RecommendArgs {
    /// Campaign budget, whole currency units.
    #[arg(long)]
    budget: String,

    /// Campaign duration in weeks.
    #[arg(long)]
    duration: String,

    /// First three characters of the UK postcode, e.g. SW1.
    #[arg(long)]
    location: String,

    /// Cricket, Football or Golf.
    #[arg(long)]
    sport: String,

    /// Intended impressions over the campaign.
    #[arg(long)]
    impressions: String,

    /// Read the catalog from a JSON file instead of the configured backend.
    #[arg(long)]
    catalog_file: Option<String>,

    #[arg(long)]
    pretty: bool,
}

impl RecommendArgs {
    fn raw_intent(&self) -> RawIntent {
        RawIntent::from_text(
            &self.budget,
            &self.duration,
            &self.location,
            &self.sport,
            &self.impressions,
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pitchside_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let res = match args.command {
        Command::Recommend(args) => recommend(&settings, &args).await,
        Command::Migrate => migrate(&settings).await,
    };

    if let Err(err) = &res {
        if should_report(err) {
            sentry_anyhow::capture_anyhow(err);
        }
    }
    res
}

/// Bad flags are the caller's problem, not an incident.
fn should_report(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ValidationError>().is_none()
}

async fn recommend(
    settings: &pitchside_core::config::Settings,
    args: &RecommendArgs,
) -> anyhow::Result<()> {
    let source: Arc<dyn CandidateSource> = match args.catalog_file.as_deref() {
        Some(path) => Arc::new(InMemoryCandidateSource::from_json_file(path)?),
        None => pitchside_core::catalog::from_settings(settings).await?,
    };
    let service = RecommendationService::new(source, ScoreWeights::from_env()?);

    let result = match service.recommend(&args.raw_intent()).await {
        Ok(result) => result,
        Err(RecommendError::Validation(err)) => {
            for field in &err.fields {
                tracing::error!(field = %field.field, reason = %field.reason, "invalid campaign intent");
            }
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!(
        backend = service.backend_name(),
        returned = result.len(),
        "recommendations ready"
    );

    let out = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{out}");
    Ok(())
}

async fn migrate(settings: &pitchside_core::config::Settings) -> anyhow::Result<()> {
    let db_url = settings.require_database_url()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(db_url)
        .await
        .context("connect DATABASE_URL failed")?;

    pitchside_core::storage::migrate(&pool).await?;
    tracing::info!("catalog schema is up to date");
    Ok(())
}

fn init_sentry(settings: &pitchside_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
