use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use pitchside_core::domain::intent::RawIntent;
use pitchside_core::domain::inventory::RecommendationResult;
use pitchside_core::recommend::{RecommendError, RecommendationService, ScoreWeights};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = pitchside_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let weights = ScoreWeights::from_env()?;
    let service = match pitchside_core::catalog::from_settings(&settings).await {
        Ok(source) => Some(Arc::new(RecommendationService::new(source, weights))),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "catalog backend unavailable; starting API in degraded mode");
            None
        }
    };

    let app = app(AppState { service });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[derive(Debug, Clone)]
struct AppState {
    service: Option<Arc<RecommendationService>>,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/recommendations", post(post_recommendations))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Recommend(RecommendError),
    Degraded,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Recommend(err @ RecommendError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Recommend(err @ RecommendError::SourceUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            ApiError::Degraded => (
                StatusCode::SERVICE_UNAVAILABLE,
                "catalog backend is not configured".to_string(),
            ),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

async fn post_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RawIntent>, JsonRejection>,
) -> Result<Json<RecommendationResult>, ApiError> {
    let Some(service) = &state.service else {
        return Err(ApiError::Degraded);
    };

    let Json(raw) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let span = tracing::info_span!("recommendations", request_id = %Uuid::new_v4());
    async move {
        tracing::info!(
            campaign_budget = ?raw.campaign_budget,
            campaign_duration = ?raw.campaign_duration,
            location = ?raw.location,
            sports_preference = ?raw.sports_preference,
            intended_impressions = ?raw.intended_impressions,
            "received campaign intent"
        );

        match service.recommend(&raw).await {
            Ok(result) => {
                tracing::info!(returned = result.len(), "recommendations served");
                Ok(Json(result))
            }
            Err(RecommendError::Validation(err)) => {
                tracing::info!(invalid = ?err.invalid_fields(), "rejected campaign intent");
                Err(ApiError::Recommend(RecommendError::Validation(err)))
            }
            Err(RecommendError::SourceUnavailable(err)) => {
                let report = anyhow::Error::new(err.clone());
                sentry_anyhow::capture_anyhow(&report);
                tracing::error!(error = %err, "catalog query failed");
                Err(ApiError::Recommend(RecommendError::SourceUnavailable(err)))
            }
        }
    }
    .instrument(span)
    .await
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
