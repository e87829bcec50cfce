use media_search::{
    api::{build_router, AppState},
    cache::create_response_cache,
    config::Config,
    search::{DocumentNormalizer, ElasticsearchIndex, SearchIndex, SearchService},
    suggest::SuggestService,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "media_search={},tower_http=info",
            config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, load_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_tracing(&config);

    if let Some(e) = load_error {
        tracing::warn!("Failed to load configuration: {}", e);
        tracing::warn!("Using default configuration");
    }

    tracing::info!("Starting media-search v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Search index: {}/{}", config.index.url, config.index.index);

    let index: Arc<dyn SearchIndex> = Arc::new(ElasticsearchIndex::new(&config.index)?);

    let cache = create_response_cache(&config.cache);
    if cache.is_enabled() {
        tracing::info!("Response cache enabled");
    }

    let search = SearchService::new(
        index.clone(),
        cache.clone(),
        DocumentNormalizer::new(config.media.base_url.clone()),
        config.index.timeout(),
        config.cache.search_ttl(),
    );
    let suggest = SuggestService::new(
        index,
        cache.clone(),
        config.index.timeout(),
        config.cache.suggest_ttl(),
    );

    let app = build_router(AppState::new(search, suggest, cache));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
