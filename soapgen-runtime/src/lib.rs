//! Dynamic materialization of soapgen types.
//!
//! [`Runtime`] implements `TypeEmitter`: feed it a build pass and every
//! synthesized wrapper, adapter, factory and fault type becomes an object
//! model you can instantiate and drive.
//!
//! ```ignore
//! let mut runtime = Runtime::new();
//! Synthesizer::new(&index, SynthConfig::default())
//!     .run(&mut BuildSession::new(), &mut runtime, &mut RecordingRegistrar::new())?;
//! let adapter = runtime.adapter("org.acme.jaxws_asm.Ping_Adapter1")?;
//! let request = adapter.construct(vec![Value::str("hello")])?;
//! ```

pub mod error;
pub mod handle;
pub mod runtime;
pub mod value;

pub use error::RuntimeError;
pub use handle::{AdapterHandle, FactoryHandle};
pub use runtime::Runtime;
pub use value::{ElementHolder, Instance, QName, Value};
