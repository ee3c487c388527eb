use thiserror::Error;

pub type Result<T> = std::result::Result<T, DspError>;

/// Boxed underlying cause carried by fetch failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DspError {
    /// Transport failure or non-2xx status for one source page.
    #[error("fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The document could not be treated as HTML at all.
    #[error("extraction failed for {site}: {reason}")]
    Extraction { site: &'static str, reason: String },

    #[error("storage error during {operation}: {reason}")]
    Storage { operation: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/* Constructors so call sites stay one-liners */
impl DspError {
    pub fn fetch_error(url: &str, source: impl Into<BoxError>) -> Self {
        DspError::Fetch {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn extraction_error(site: &'static str, reason: &str) -> Self {
        DspError::Extraction {
            site,
            reason: reason.to_string(),
        }
    }

    pub fn storage_error(operation: &str, reason: impl std::fmt::Display) -> Self {
        DspError::Storage {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }
}
