//! Saved-page loader for offline analysis of a company page stored on disk.

use crate::scraper::PageFetcher;
use crate::scraper::error::ScrapeError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serves one saved HTML file for every URL it is asked for.
pub struct SavedPageFetcher {
    path: PathBuf,
}

impl SavedPageFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PageFetcher for SavedPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Serving {} from {:?}", url, self.path);
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_saved_page() {
        let path = std::env::temp_dir().join(format!("saved_page_{}.html", std::process::id()));
        std::fs::write(&path, "<h1>Acme</h1>").unwrap();

        let fetcher = SavedPageFetcher::new(&path);
        let html = tokio_test::block_on(fetcher.fetch_page("https://example.com/")).unwrap();
        assert_eq!(html, "<h1>Acme</h1>");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let fetcher = SavedPageFetcher::new("/nonexistent/page.html");
        let err = tokio_test::block_on(fetcher.fetch_page("x")).unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));
    }
}
