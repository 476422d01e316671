//! Widget document loading.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::error::ResourceError;

/// The widget HTML, loaded once and shared read-only by every session.
#[derive(Debug, Clone)]
pub struct WidgetDocument {
    html: Arc<str>,
}

impl WidgetDocument {
    /// Wrap already loaded HTML.
    pub fn new(html: impl Into<Arc<str>>) -> Self {
        Self { html: html.into() }
    }

    /// Read the widget from disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ResourceError> {
        let path = path.as_ref();
        let html = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ResourceError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Loaded widget from {:?} ({} bytes)", path, html.len());
        Ok(Self::new(html))
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}
