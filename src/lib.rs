//! Random creature quiz card.
//!
//! A round draws a random creature id, fetches its record and artwork from
//! the data API and keeps the answer hidden until the card is activated.
//! Asset downloads go through a versioned cache worker so the card keeps its
//! artwork offline.

pub mod config;
pub mod engine;
pub mod model;
pub mod store;
pub mod ui;
pub mod worker;

/// Structured logging for the binaries. `RUST_LOG` overrides the default
/// `info` filter.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}
