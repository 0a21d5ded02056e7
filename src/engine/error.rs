/// A data-service call that did not produce a usable record.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("{resource} {id} not found (status {status})")]
    NotFound {
        resource: &'static str,
        id: u32,
        status: u16,
    },

    #[error("network error fetching {resource} {id}: {reason}")]
    Network {
        resource: &'static str,
        id: u32,
        reason: String,
    },

    /// The body did not match the expected record schema.
    #[error("malformed {resource} {id}: {reason}")]
    Decode {
        resource: &'static str,
        id: u32,
        reason: String,
    },
}

/// Why one trial of a round was abandoned. The round loop treats every
/// variant the same way: draw another id.
#[derive(Debug, thiserror::Error)]
pub enum TrialError {
    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    #[error("creature {0} has no image")]
    NoImageAvailable(u32),
}
