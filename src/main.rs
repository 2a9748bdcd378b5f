//! framewatch: a frame-rate overlay with running averages and spike log.
//!
//! Run with:  `RUST_LOG=info framewatch`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Structured logging; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("framewatch v{} starting", env!("CARGO_PKG_VERSION"));

    fw_overlay::run().map_err(Into::into)
}
