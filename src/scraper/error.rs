use thiserror::Error;

/// Structural failures while fetching or reading a company page.
///
/// Cell-level parse failures never show up here; they become `None`.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid company url {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("section `{section}` not found on page")]
    SectionMissing { section: String },

    #[error("no data table in section `{section}`")]
    TableMissing { section: String },

    #[error("missing field: {field}")]
    MissingField { field: &'static str },
}
