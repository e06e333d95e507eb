pub mod adapter;
pub mod config;
pub mod descriptor;
pub mod emit;
pub mod error;
pub mod extract;
pub mod factory;
pub mod fault;
pub mod meta;
pub mod naming;
pub mod pass;
pub mod registry;
pub mod session;
pub mod types;
pub mod wrapper;

pub use adapter::{fingerprint, synthesize_adapter, ConstructStep, DecomposeStep, SynthesizedAdapter};
pub use config::{ConfigError, ConfigValue, FromConfigValue, GeneratorConfig, SynthConfig};
pub use descriptor::{
    Direction, ExceptionDescriptor, OperationDescriptor, ParameterDescriptor, ResultDescriptor,
    ServiceInterfaceDescriptor,
};
pub use emit::{
    CompanionLookup, Constant, FieldDef, ManifestEmitter, MethodDef, MethodKind, MethodRef, Op,
    Operand, RecordingRegistrar, Registrar, TypeDef, TypeEmitter,
};
pub use error::{MetadataError, SynthesisError};
pub use extract::extract_interface;
pub use factory::{synthesize_factory, SynthesizedFactory};
pub use fault::{resolve_fault_name, synthesize_faults, SynthesizedFaultType};
pub use meta::{Classification, ElementTag, MetadataIndex, MethodInfo, ParamInfo, TypeInfo, TypeKind};
pub use pass::{BuildReport, InterfaceOutput, OperationOutput, PackageInfo, Synthesizer, WrapperBundle};
pub use registry::{FaultRegistry, NameRegistry};
pub use session::{BuildSession, WrapperClaim};
pub use types::{ElementHolder, TypeRef};
pub use wrapper::{
    synthesize_request, synthesize_response, SynthesizedField, SynthesizedWrapperType,
    WrapperKind, WrapperScope,
};
