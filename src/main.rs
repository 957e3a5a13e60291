mod api;
mod codec;
mod config;
mod db;
mod error;
mod filter;
mod import;
mod models;
mod service;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use config::AppConfig;
use db::repository::{MySqlSink, MySqlSource, SqlRecord};
use db::{ConnectionProvider, PoolSettings};
use import::{Fetcher, ImportScope, RecordSink, RecordSource, Upserter};
use service::RecordService;
use tracing::{info, warn};

fn build_service<R>(provider: &Arc<ConnectionProvider>, config: &AppConfig) -> Arc<RecordService<R>>
where
    R: SqlRecord + ImportScope,
{
    let source = provider.has_source().then(|| {
        Arc::new(MySqlSource::<R>::new(provider.clone(), config.source_schema))
            as Arc<dyn RecordSource<R>>
    });
    let sink = Arc::new(MySqlSink::<R>::new(provider.clone())) as Arc<dyn RecordSink<R>>;

    Arc::new(RecordService::new(
        Fetcher::new(source, config.fetch_timeout),
        Upserter::new(sink),
        config.filter_utc_offset_hours,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting dtako sync service...");
    info!("Source schema mapping: {}", config.source_schema);

    // Pools open lazily on first use
    let settings = PoolSettings {
        max_connections: config.db_max_connections,
        ..PoolSettings::default()
    };
    let provider = Arc::new(ConnectionProvider::new(
        config.source_db.clone(),
        config.destination_db.clone(),
        settings,
    ));
    if !provider.has_source() {
        warn!("Production database disabled, list and import calls will fail");
    }

    let state = api::AppState {
        rows: build_service(&provider, &config),
        events: build_service(&provider, &config),
        ferry_rows: build_service(&provider, &config),
    };
    let app = api::create_router(state);

    // Start HTTP server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
