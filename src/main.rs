use opera_receipts::{build_router, config::Config, state::AppState, storage::ReceiptStore};
use opera_assets::{AssetResolver, ResolverSettings};
use opera_render::HelveticaMetrics;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting Opera receipt service...");

    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    let resolver = AssetResolver::new(ResolverSettings {
        assets_dir: config.assets.assets_dir.clone(),
        static_dir: config.assets.static_dir.clone(),
        companion_base_url: config.assets.companion_base_url.clone(),
        fetch_timeout: config.fetch_timeout(),
    })?;

    let store = ReceiptStore::new(config.storage.uploads_dir.clone());
    tokio::fs::create_dir_all(store.orders_dir()).await?;
    tracing::info!("Receipt storage ready at {}", store.orders_dir().display());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, resolver, Arc::new(HelveticaMetrics::new()), store);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Opera receipt service listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - POST /orders/pdf       (stream receipt)");
    tracing::info!("  - POST /orders/pdf/save  (persist receipt, return URL)");
    tracing::info!("  - GET  /uploads/...      (persisted receipts)");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,opera_receipts=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
