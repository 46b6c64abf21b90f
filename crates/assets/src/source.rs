//! Individual resolution strategies.
//!
//! Each source owns one concrete attempt — a URL to GET or a file to read —
//! and reports failure as an error the chain converts into "try the next
//! one". Sources never mutate the reference they were built from.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::{AssetError, ResolvedAsset};

/// One step of a fallback chain.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Human-readable step description, used for logs and chain tests.
    fn describe(&self) -> String;

    async fn resolve(&self) -> Result<ResolvedAsset, AssetError>;
}

/// GET of a fully-formed URL.
pub struct RemoteUrl {
    client: reqwest::Client,
    url: String,
}

impl RemoteUrl {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl AssetSource for RemoteUrl {
    fn describe(&self) -> String {
        format!("GET {}", self.url)
    }

    async fn resolve(&self) -> Result<ResolvedAsset, AssetError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes().await?;
        Ok(ResolvedAsset {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Read of a fixed path on disk.
pub struct LocalFile {
    path: PathBuf,
}

impl LocalFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AssetSource for LocalFile {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn resolve(&self) -> Result<ResolvedAsset, AssetError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(ResolvedAsset {
            bytes,
            content_type: content_type_for(&self.path),
        })
    }
}

/// Read of a reference's path component under a static root. The path is
/// percent-decoded, stripped of leading slashes and rejected outright if it
/// tries to climb out of the root.
pub struct StaticRelative {
    root: PathBuf,
    reference: String,
}

impl StaticRelative {
    pub fn new(root: impl Into<PathBuf>, reference: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            reference: reference.into(),
        }
    }

    fn relative_path(&self) -> Result<PathBuf, AssetError> {
        let raw = crate::reference_path(&self.reference);
        let decoded = urlencoding::decode(&raw)
            .map_err(|_| AssetError::InvalidReference(self.reference.clone()))?;
        let trimmed = decoded.trim_start_matches('/');

        let relative = Path::new(trimmed);
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
        {
            return Err(AssetError::InvalidReference(self.reference.clone()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetSource for StaticRelative {
    fn describe(&self) -> String {
        format!("static {} :: {}", self.root.display(), self.reference)
    }

    async fn resolve(&self) -> Result<ResolvedAsset, AssetError> {
        let path = self.relative_path()?;
        let bytes = tokio::fs::read(&path).await?;
        Ok(ResolvedAsset {
            bytes,
            content_type: content_type_for(&path),
        })
    }
}

fn content_type_for(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_file_reads_bytes_and_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plantilla.jpg");
        std::fs::write(&path, b"jpegdata").unwrap();

        let asset = LocalFile::new(&path).resolve().await.unwrap();
        assert_eq!(asset.bytes, b"jpegdata");
        assert_eq!(asset.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn local_file_missing_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = LocalFile::new(dir.path().join("nope.jpg")).resolve().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn static_relative_resolves_url_path_component() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("imagenes")).unwrap();
        std::fs::write(dir.path().join("imagenes/torta.png"), b"png").unwrap();

        let source = StaticRelative::new(
            dir.path(),
            "https://cdn.example/imagenes/torta.png?x=1",
        );
        let asset = source.resolve().await.unwrap();
        assert_eq!(asset.bytes, b"png");
        assert_eq!(asset.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn static_relative_decodes_percent_escapes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("torta rosa.jpg"), b"x").unwrap();

        let source = StaticRelative::new(dir.path(), "/torta%20rosa.jpg");
        assert!(source.resolve().await.is_ok());
    }

    #[tokio::test]
    async fn static_relative_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = StaticRelative::new(dir.path(), "/../../etc/passwd");
        assert!(matches!(
            source.resolve().await,
            Err(AssetError::InvalidReference(_))
        ));
    }
}
