/// Error raised while synthesizing types for a service interface.
///
/// Every variant is fatal for the build pass: nothing synthesized for the
/// failing interface is handed to the emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// A declared parameter, result or fault payload type could not be resolved
    /// against the metadata index.
    UnresolvedType { operation: String, type_name: String },
    /// The operation descriptor is inconsistent (bad direction tag, duplicate
    /// wire names, field count mismatch, ...).
    MalformedOperation { operation: String, reason: String },
    /// The requested service interface is not in the metadata index.
    UnknownInterface(String),
    /// A type could not be classified as list-like or holder-like and strict
    /// classification is enabled.
    UnknownClassification { type_name: String },
    /// The type emitter refused a synthesized type.
    Emit(String),
}

impl SynthesisError {
    pub(crate) fn malformed(operation: &str, reason: impl Into<String>) -> Self {
        SynthesisError::MalformedOperation {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(operation: &str, type_name: impl ToString) -> Self {
        SynthesisError::UnresolvedType {
            operation: operation.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

impl std::fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisError::UnresolvedType {
                operation,
                type_name,
            } => write!(
                f,
                "Unresolved type '{type_name}' in operation '{operation}'"
            ),
            SynthesisError::MalformedOperation { operation, reason } => {
                write!(f, "Malformed operation '{operation}': {reason}")
            }
            SynthesisError::UnknownInterface(name) => {
                write!(f, "Service interface not found in metadata index: {name}")
            }
            SynthesisError::UnknownClassification { type_name } => write!(
                f,
                "Cannot classify type '{type_name}' (strict classification is enabled)"
            ),
            SynthesisError::Emit(msg) => write!(f, "Type emission failed: {msg}"),
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Error raised while loading or querying the metadata index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// An I/O error occurred while reading an index file.
    Io(String),
    /// The index document could not be parsed.
    Parse(String),
    /// The same type name was declared twice.
    DuplicateType(String),
    /// A type expression (e.g. `list<string>`) is malformed.
    InvalidType { input: String, reason: String },
}

impl std::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataError::Io(msg) => write!(f, "Metadata index I/O error: {msg}"),
            MetadataError::Parse(msg) => write!(f, "Metadata index parse error: {msg}"),
            MetadataError::DuplicateType(name) => {
                write!(f, "Type declared more than once in metadata index: {name}")
            }
            MetadataError::InvalidType { input, reason } => {
                write!(f, "Invalid type expression '{input}': {reason}")
            }
        }
    }
}

impl std::error::Error for MetadataError {}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        MetadataError::Io(err.to_string())
    }
}
