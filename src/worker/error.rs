/// Errors raised by the asset cache worker and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The request never produced a response.
    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    /// An asset answered with a non-success status during install.
    #[error("asset {url} answered {status}")]
    BadStatus { url: String, status: u16 },

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("invalid cache manifest: {0}")]
    InvalidManifest(String),

    #[error("worker {0} has not finished installing")]
    NotInstalled(String),

    #[error("cache storage error: {0}")]
    Storage(String),

    #[error("cache storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache index error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A navigation failed and no entry point was cached to fall back on.
    #[error("offline and no cached entry point for {0}")]
    Offline(String),
}
