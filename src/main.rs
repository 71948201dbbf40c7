// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snap Fitness API Server
//!
//! Serves user accounts, health and nutrition profiles, diet/workout plans,
//! daily tracking and the exercise reference dataset over a JSON API.

use snap_fitness::{
    config::{Config, StoreBackend},
    db::{
        ExerciseCatalog, FirestoreDb, HealthRecordStore, MemoryCatalog, MemoryUserStore,
        MongoCatalog, UserStore,
    },
    services::StaticBaselineGenerator,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CatalogStores = (Arc<dyn ExerciseCatalog>, Arc<dyn HealthRecordStore>);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Snap Fitness API");

    let user_store = build_user_store(&config).await?;
    let (exercises, records) = build_catalog(&config).await?;

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        user_store,
        exercises,
        records,
        Arc::new(StaticBaselineGenerator),
    ));

    // Build router
    let app = snap_fitness::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_user_store(config: &Config) -> snap_fitness::error::Result<Arc<dyn UserStore>> {
    match config.user_store {
        StoreBackend::Remote => Ok(Arc::new(FirestoreDb::new(&config.gcp_project_id).await?)),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; data is lost on restart");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

async fn build_catalog(config: &Config) -> snap_fitness::error::Result<CatalogStores> {
    match config.catalog_store {
        StoreBackend::Remote => {
            let mongo = Arc::new(MongoCatalog::connect(&config.mongo_uri, &config.mongo_db).await?);
            let exercises: Arc<dyn ExerciseCatalog> = mongo.clone();
            let records: Arc<dyn HealthRecordStore> = mongo;
            Ok((exercises, records))
        }
        StoreBackend::Memory => {
            let catalog = match &config.exercise_data_dir {
                Some(dir) => MemoryCatalog::load_dir(dir).await?,
                None => {
                    tracing::warn!("EXERCISE_DATA_DIR not set; exercise dataset is empty");
                    MemoryCatalog::default()
                }
            };
            let catalog = Arc::new(catalog);
            let exercises: Arc<dyn ExerciseCatalog> = catalog.clone();
            let records: Arc<dyn HealthRecordStore> = catalog;
            Ok((exercises, records))
        }
    }
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("snap_fitness=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
