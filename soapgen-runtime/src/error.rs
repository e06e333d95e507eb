/// Error raised while instantiating or executing materialized types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    UnknownType(String),
    UnknownField { type_name: String, field: String },
    NoSuchMethod { type_name: String, method: String },
    ArityMismatch {
        method: String,
        expected: usize,
        got: usize,
    },
    /// A method was invoked on, or a field read from, a null value.
    NullTarget { method: String },
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
    IndexOutOfBounds { index: i64, len: usize },
    /// A local slot was read before being written.
    UnsetLocal(usize),
    /// The type exists but does not expose the requested capability.
    MissingCapability { type_name: String, capability: String },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::UnknownType(name) => write!(f, "Unknown type: {name}"),
            RuntimeError::UnknownField { type_name, field } => {
                write!(f, "Type '{type_name}' has no field '{field}'")
            }
            RuntimeError::NoSuchMethod { type_name, method } => {
                write!(f, "Type '{type_name}' has no method '{method}'")
            }
            RuntimeError::ArityMismatch {
                method,
                expected,
                got,
            } => write!(
                f,
                "Method '{method}' takes {expected} argument(s), got {got}"
            ),
            RuntimeError::NullTarget { method } => {
                write!(f, "Null target for '{method}'")
            }
            RuntimeError::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {expected}, got {got}")
            }
            RuntimeError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {index} out of bounds for list of length {len}")
            }
            RuntimeError::UnsetLocal(slot) => write!(f, "Local slot {slot} read before write"),
            RuntimeError::MissingCapability {
                type_name,
                capability,
            } => write!(f, "Type '{type_name}' is not a {capability}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
