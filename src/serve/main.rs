//! Level lookup server.
//!
//! Holds the active feature set in memory. Location lookups and feature-set
//! replacement arrive on independent requests; every lookup runs against one
//! whole snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use geolevel::config::Config;
use geolevel::loader::{load_file, parse_feature_collection, LoadOptions};
use geolevel::{Coordinate, FeatureStore};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Level lookup server")]
struct Args {
    /// Listen address
    #[arg(short, long)]
    listen: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GeoJSON FeatureCollection loaded at startup
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Feature property holding the level
    #[arg(long)]
    property: Option<String>,

    /// Skip polygon features without a numeric level instead of failing
    #[arg(long)]
    lenient: bool,
}

/// Application state shared across handlers
struct AppState {
    store: FeatureStore,
    options: LoadOptions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.global.max_level()?)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("GeoLevel Server");

    let mut options = config.loader.to_options();
    if let Some(property) = args.property {
        options.level_property = property;
    }
    if args.lenient {
        options.strict = false;
    }

    let store = FeatureStore::new();
    if let Some(file) = args.file.or(config.loader.data_file) {
        let polygons = load_file(&file, &options)
            .with_context(|| format!("Failed to load features from {}", file.display()))?;
        store.load(polygons);
    } else {
        warn!("No feature file given, starting with an empty set");
    }

    let state = Arc::new(AppState { store, options });
    let listen = args.listen.unwrap_or(config.server.listen);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/level", get(level_handler))
        .route(
            "/v1/features",
            get(features_handler)
                .put(load_handler)
                .delete(clear_handler),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let current = state.store.current();

    Json(HealthResponse {
        status: "ok",
        polygons: current.len(),
        generation: current.generation(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    polygons: usize,
    generation: u64,
}

/// Level at a coordinate
async fn level_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LevelQueryParams>,
) -> Result<Json<LevelResponse>, (StatusCode, String)> {
    let point = Coordinate::new(params.lat, params.lon);
    if !point.is_valid() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("coordinate out of range: {}", point),
        ));
    }

    // One snapshot for both the lookup and the reported generation
    let current = state.store.current();
    let level = current.find_level(point);

    Ok(Json(LevelResponse {
        level,
        found: level.is_some(),
        generation: current.generation(),
    }))
}

/// Summary of the active feature set
async fn features_handler(State(state): State<Arc<AppState>>) -> Json<FeaturesResponse> {
    let current = state.store.current();

    Json(FeaturesResponse {
        polygons: current.len(),
        generation: current.generation(),
    })
}

/// Replace the active feature set with a GeoJSON FeatureCollection body
async fn load_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<FeaturesResponse>, (StatusCode, String)> {
    let polygons = parse_feature_collection(&body, &state.options).map_err(|e| {
        warn!("Rejected feature upload: {}", e);
        (StatusCode::BAD_REQUEST, e.to_string())
    })?;

    let polygons_len = polygons.len();
    let generation = state.store.load(polygons);

    Ok(Json(FeaturesResponse {
        polygons: polygons_len,
        generation,
    }))
}

/// Drop the active feature set
async fn clear_handler(State(state): State<Arc<AppState>>) -> Json<FeaturesResponse> {
    let generation = state.store.clear();

    Json(FeaturesResponse {
        polygons: 0,
        generation,
    })
}

#[derive(Deserialize)]
struct LevelQueryParams {
    /// Point latitude
    lat: f64,
    /// Point longitude
    lon: f64,
}

#[derive(Serialize)]
struct LevelResponse {
    level: Option<f64>,
    found: bool,
    generation: u64,
}

#[derive(Serialize)]
struct FeaturesResponse {
    polygons: usize,
    generation: u64,
}
