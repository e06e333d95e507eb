//! Command implementations for the `soapgen` CLI.
//!
//! Each submodule corresponds to a top-level CLI command.

/// Full synthesis pass - `soapgen generate`.
///
/// Loads `soapgen.yaml` (plus profile overrides) from the current directory,
/// synthesizes every `WebService` interface of the index and writes
/// `types.json` and `reflection.json` to the output directory.
pub mod generate;

/// Read-only view - `soapgen inspect`.
pub mod inspect;
