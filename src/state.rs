use crate::config::Config;
use crate::storage::ReceiptStore;
use opera_assets::AssetResolver;
use opera_render::TextMeasurer;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Fallback-chain resolver for template and subject images.
    pub resolver: Arc<AssetResolver>,

    /// Text measurement backing the layout engine.
    pub measurer: Arc<dyn TextMeasurer>,

    /// Persisted receipt storage under the uploads directory.
    pub store: Arc<ReceiptStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        resolver: AssetResolver,
        measurer: Arc<dyn TextMeasurer>,
        store: ReceiptStore,
    ) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            measurer,
            store: Arc::new(store),
        }
    }
}
