use crate::error::{DspError, Result};
use crate::services::LocalFsStore;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime settings shared by the CLI commands.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory of the local blob store.
    pub store_dir: PathBuf,
    /// Address the reader endpoint listens on.
    pub bind_addr: SocketAddr,
    /// Explicit tracing directives; `None` defers to `RUST_LOG`.
    pub log_filter: Option<String>,
}

impl Config {
    /// Fill defaults and validate raw values (typically from flags or env).
    pub fn resolve(
        store_dir: Option<PathBuf>,
        bind_addr: Option<&str>,
        log_filter: Option<String>,
    ) -> Result<Self> {
        let store_dir = match store_dir {
            Some(dir) if dir.as_os_str().is_empty() => {
                return Err(DspError::Config("store dir cannot be empty".into()))
            }
            Some(dir) => dir,
            None => LocalFsStore::default_root()?,
        };

        let raw_addr = bind_addr.unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| DspError::Config(format!("invalid bind address {raw_addr:?}: {e}")))?;

        let log_filter = log_filter.filter(|f| !f.trim().is_empty());

        Ok(Self {
            store_dir,
            bind_addr,
            log_filter,
        })
    }

    pub fn open_store(&self) -> Result<LocalFsStore> {
        LocalFsStore::at(&self.store_dir)
    }
}

/// Reject anything that is not an absolute http(s) URL.
pub fn validate_source_url(raw: &str) -> Result<url::Url> {
    let parsed =
        url::Url::parse(raw).map_err(|e| DspError::Config(format!("invalid url {raw:?}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DspError::Config(format!(
            "unsupported url scheme {other:?} in {raw:?}"
        ))),
    }
}
