//! soapgen - synthesis of SOAP document/literal wrapper types.
//!
//! This facade crate re-exports the soapgen sub-crates through a single
//! dependency. Import everything you need with:
//!
//! ```ignore
//! use soapgen::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature   | Default | Crate             |
//! |-----------|---------|-------------------|
//! | `runtime` | **yes** | `soapgen-runtime` |

// The proc macros use `proc-macro-crate` to detect whether the user depends
// on `soapgen` (facade) or `soapgen-core`, and generate the correct paths.
pub extern crate soapgen_core;
pub extern crate soapgen_macros;

pub use soapgen_core::*;

pub use soapgen_macros::web_service;

#[cfg(feature = "runtime")]
pub use soapgen_runtime as runtime;

/// Unified prelude - import everything with `use soapgen::prelude::*`.
pub mod prelude {
    pub use soapgen_core::{
        BuildReport, BuildSession, ElementHolder, ElementTag, GeneratorConfig, ManifestEmitter,
        MetadataIndex, MethodInfo, ParamInfo, RecordingRegistrar, SynthConfig, SynthesisError,
        Synthesizer, TypeEmitter, TypeInfo, TypeRef,
    };
    pub use soapgen_macros::web_service;

    #[cfg(feature = "runtime")]
    pub use soapgen_runtime::{AdapterHandle, FactoryHandle, Runtime, RuntimeError, Value};
}
