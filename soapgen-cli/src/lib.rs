//! # soapgen-cli
//!
//! Command-line tool for running soapgen synthesis passes.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `soapgen generate --index <file>` | Run a full pass, write `types.json` and `reflection.json` |
//! | `soapgen inspect --index <file>` | Print wrappers, fields and adapter fingerprints |
//!
//! Command implementations live under [`commands`].

use tracing_subscriber::EnvFilter;

pub mod commands;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
