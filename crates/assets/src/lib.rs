//! Image asset resolution for receipt rendering.
//!
//! Both images on a receipt — the background template and the selected cake
//! photo — are looked up through an ordered fallback chain of
//! [`AssetSource`] strategies. Steps run strictly in sequence; the first
//! success wins and short-circuits the rest; every failure is swallowed
//! locally (logged at debug) and simply advances the chain. A fully
//! exhausted chain yields `None`, which callers treat as "skip drawing this
//! element" — resolution itself never errors a render.
//!
//! Nothing is cached across calls; every render re-fetches what it needs.

mod source;

pub use source::{AssetSource, LocalFile, RemoteUrl, StaticRelative};

use std::path::PathBuf;
use std::time::Duration;

/// Fixed file name of the receipt background template.
pub const TEMPLATE_FILE: &str = "PlantillaPedido.jpg";
/// Template location under the static root and the companion service.
pub const TEMPLATE_STATIC_PATH: &str = "imagenes/PlantillaPedido.jpg";

/// Binary content of a successfully resolved reference. Owned by one render
/// call and discarded with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Why a single chain step failed. Never leaves the chain — it only feeds
/// the debug log before the next step runs.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered status {status}")]
    Status { url: String, status: u16 },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("reference {0:?} is not usable as a local path")]
    InvalidReference(String),
}

/// Settings for building an [`AssetResolver`].
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Bundled backend assets (first local fallback for the template).
    pub assets_dir: PathBuf,
    /// Public static root shared with the storefront frontend.
    pub static_dir: PathBuf,
    /// Companion service origin used as the last-resort fetch base.
    pub companion_base_url: String,
    /// Bound on every individual network attempt.
    pub fetch_timeout: Duration,
}

/// Resolves image references for one service instance. Cheap to share; the
/// inner HTTP client is reused across calls.
pub struct AssetResolver {
    client: reqwest::Client,
    settings: ResolverSettings,
}

impl AssetResolver {
    pub fn new(settings: ResolverSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.fetch_timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    /// Background template chain: explicit URL, bundled asset, static dir,
    /// companion service.
    pub async fn resolve_background(&self, explicit_url: Option<&str>) -> Option<ResolvedAsset> {
        let mut chain: Vec<Box<dyn AssetSource>> = Vec::with_capacity(4);
        if let Some(url) = explicit_url.filter(|u| !u.is_empty()) {
            chain.push(Box::new(RemoteUrl::new(self.client.clone(), url)));
        }
        chain.push(Box::new(LocalFile::new(
            self.settings.assets_dir.join(TEMPLATE_FILE),
        )));
        chain.push(Box::new(LocalFile::new(
            self.settings.static_dir.join(TEMPLATE_STATIC_PATH),
        )));
        chain.push(Box::new(RemoteUrl::new(
            self.client.clone(),
            format!(
                "{}/{}",
                self.settings.companion_base_url.trim_end_matches('/'),
                TEMPLATE_STATIC_PATH
            ),
        )));

        resolve_chain("background template", &chain).await
    }

    /// Subject image chain: the reference as an absolute URL, its path under
    /// the static root, then the companion service.
    pub async fn resolve_subject(&self, reference: Option<&str>) -> Option<ResolvedAsset> {
        let reference = reference.filter(|r| !r.is_empty())?;

        let mut chain: Vec<Box<dyn AssetSource>> = Vec::with_capacity(3);
        if is_absolute_url(reference) {
            chain.push(Box::new(RemoteUrl::new(self.client.clone(), reference)));
        }
        chain.push(Box::new(StaticRelative::new(
            &self.settings.static_dir,
            reference,
        )));

        let path = reference_path(reference);
        let companion_url = format!(
            "{}{}{}",
            self.settings.companion_base_url.trim_end_matches('/'),
            if path.starts_with('/') { "" } else { "/" },
            path
        );
        chain.push(Box::new(RemoteUrl::new(self.client.clone(), companion_url)));

        resolve_chain("subject image", &chain).await
    }
}

/// Runs a chain in order; first success wins, failures advance, exhaustion
/// is `None`.
pub async fn resolve_chain(
    what: &str,
    sources: &[Box<dyn AssetSource>],
) -> Option<ResolvedAsset> {
    for source in sources {
        match source.resolve().await {
            Ok(asset) => {
                log::debug!("{}: resolved via {} ({} bytes)", what, source.describe(), asset.bytes.len());
                return Some(asset);
            }
            Err(err) => {
                log::debug!("{}: {} failed: {}", what, source.describe(), err);
            }
        }
    }
    log::warn!("{}: all {} sources exhausted", what, sources.len());
    None
}

/// True when the reference stands on its own as a fetchable URL.
fn is_absolute_url(reference: &str) -> bool {
    match url::Url::parse(reference) {
        Ok(parsed) => parsed.has_host(),
        Err(_) => false,
    }
}

/// The path component of a reference: parsed out of an absolute URL, or the
/// reference itself when it is already a bare path.
pub(crate) fn reference_path(reference: &str) -> String {
    match url::Url::parse(reference) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_string(),
        _ => reference.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Chain probe: records the order it was tried in and answers with a
    /// scripted result.
    struct Scripted {
        name: &'static str,
        succeed: bool,
        calls: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Scripted {
        fn boxed(
            name: &'static str,
            succeed: bool,
            calls: &Arc<Mutex<Vec<&'static str>>>,
        ) -> Box<dyn AssetSource> {
            Box::new(Self {
                name,
                succeed,
                calls: calls.clone(),
            })
        }
    }

    #[async_trait]
    impl AssetSource for Scripted {
        fn describe(&self) -> String {
            self.name.to_string()
        }

        async fn resolve(&self) -> Result<ResolvedAsset, AssetError> {
            self.calls.lock().unwrap().push(self.name);
            if self.succeed {
                Ok(ResolvedAsset {
                    bytes: self.name.as_bytes().to_vec(),
                    content_type: None,
                })
            } else {
                Err(AssetError::InvalidReference(self.name.to_string()))
            }
        }
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            Scripted::boxed("one", true, &calls),
            Scripted::boxed("two", true, &calls),
        ];
        let asset = resolve_chain("test", &chain).await.unwrap();
        assert_eq!(asset.bytes, b"one");
        assert_eq!(*calls.lock().unwrap(), vec!["one"]);
    }

    #[tokio::test]
    async fn failure_advances_to_exactly_the_next_step() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            Scripted::boxed("one", false, &calls),
            Scripted::boxed("two", true, &calls),
            Scripted::boxed("three", true, &calls),
        ];
        let asset = resolve_chain("test", &chain).await.unwrap();
        assert_eq!(asset.bytes, b"two");
        assert_eq!(*calls.lock().unwrap(), vec!["one", "two"]);
    }

    #[tokio::test]
    async fn exhausted_chain_is_absent_not_an_error() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chain = vec![
            Scripted::boxed("one", false, &calls),
            Scripted::boxed("two", false, &calls),
        ];
        assert!(resolve_chain("test", &chain).await.is_none());
        assert_eq!(*calls.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn absolute_url_detection() {
        assert!(is_absolute_url("https://cdn.example/t.jpg"));
        assert!(is_absolute_url("http://localhost:5173/imagenes/t.jpg"));
        assert!(!is_absolute_url("imagenes/t.jpg"));
        assert!(!is_absolute_url("/imagenes/t.jpg"));
    }

    #[test]
    fn reference_path_extraction() {
        assert_eq!(
            reference_path("https://cdn.example/imagenes/t.jpg?s=1"),
            "/imagenes/t.jpg"
        );
        assert_eq!(reference_path("/imagenes/t.jpg"), "/imagenes/t.jpg");
        assert_eq!(reference_path("imagenes/t.jpg"), "imagenes/t.jpg");
    }

    fn test_resolver(dir: &std::path::Path) -> AssetResolver {
        AssetResolver::new(ResolverSettings {
            assets_dir: dir.join("assets"),
            static_dir: dir.join("static"),
            // Closed port: connection refused immediately, no live server.
            companion_base_url: "http://127.0.0.1:9".to_string(),
            fetch_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn background_falls_back_to_bundled_asset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets").join(TEMPLATE_FILE), b"bundled").unwrap();

        let resolver = test_resolver(dir.path());
        let asset = resolver.resolve_background(None).await.unwrap();
        assert_eq!(asset.bytes, b"bundled");
    }

    #[tokio::test]
    async fn background_prefers_static_dir_over_companion() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static/imagenes")).unwrap();
        std::fs::write(
            dir.path().join("static/imagenes").join("PlantillaPedido.jpg"),
            b"static",
        )
        .unwrap();

        let resolver = test_resolver(dir.path());
        let asset = resolver.resolve_background(None).await.unwrap();
        assert_eq!(asset.bytes, b"static");
    }

    #[tokio::test]
    async fn background_absent_when_everything_fails() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = test_resolver(dir.path());
        assert!(resolver
            .resolve_background(Some("http://127.0.0.1:9/plantilla.jpg"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn subject_reads_relative_reference_from_static_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static/imagenes")).unwrap();
        std::fs::write(dir.path().join("static/imagenes/torta.jpg"), b"torta").unwrap();

        let resolver = test_resolver(dir.path());
        let asset = resolver
            .resolve_subject(Some("/imagenes/torta.jpg"))
            .await
            .unwrap();
        assert_eq!(asset.bytes, b"torta");
    }

    #[tokio::test]
    async fn subject_without_reference_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = test_resolver(dir.path());
        assert!(resolver.resolve_subject(None).await.is_none());
        assert!(resolver.resolve_subject(Some("")).await.is_none());
    }
}
