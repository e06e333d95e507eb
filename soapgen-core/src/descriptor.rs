use serde::Serialize;

use crate::meta::ElementTag;
use crate::naming;
use crate::types::TypeRef;

/// Wire name of the result field when no `WebResult` name is given.
pub const DEFAULT_RESULT_NAME: &str = "return";

/// Which wrapper(s) a parameter travels in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    In,
    Out,
    InOut,
}

impl Direction {
    /// Parse a `WebParam.mode` value, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            "inout" | "in_out" => Some(Direction::InOut),
            _ => None,
        }
    }

    pub fn in_request(self) -> bool {
        self != Direction::Out
    }

    pub fn in_response(self) -> bool {
        self != Direction::In
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub declared_type: TypeRef,
    pub declared_name: Option<String>,
    pub direction: Direction,
    pub wire_name: Option<String>,
    pub namespace: Option<String>,
    pub header: bool,
    /// Tags of the parameter, carried verbatim.
    pub tags: Vec<ElementTag>,
}

impl ParameterDescriptor {
    pub fn new(declared_type: TypeRef) -> Self {
        ParameterDescriptor {
            declared_type,
            declared_name: None,
            direction: Direction::In,
            wire_name: None,
            namespace: None,
            header: false,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDescriptor {
    pub declared_type: TypeRef,
    pub wire_name: Option<String>,
    pub namespace: Option<String>,
    pub tags: Vec<ElementTag>,
}

impl ResultDescriptor {
    pub fn new(declared_type: TypeRef) -> Self {
        ResultDescriptor {
            declared_type,
            wire_name: None,
            namespace: None,
            tags: Vec::new(),
        }
    }

    pub fn is_void(&self) -> bool {
        self.declared_type.is_void()
    }

    pub fn effective_wire_name(&self) -> String {
        naming::effective_name(self.wire_name.as_deref(), DEFAULT_RESULT_NAME)
    }

    pub fn effective_namespace(&self) -> String {
        naming::effective_namespace(self.namespace.as_deref(), "")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExceptionDescriptor {
    pub declared_type: TypeRef,
    /// Explicit `WebFault.name`.
    pub fault_name: Option<String>,
    pub payload_type: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    pub method_name: String,
    /// Explicit `WebMethod.operationName`.
    pub operation_name: Option<String>,
    pub params: Vec<ParameterDescriptor>,
    pub result: ResultDescriptor,
    /// Unique within the operation.
    pub exceptions: Vec<ExceptionDescriptor>,
}

impl OperationDescriptor {
    pub fn effective_operation_name(&self) -> String {
        naming::effective_name(self.operation_name.as_deref(), &self.method_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceInterfaceDescriptor {
    pub name: String,
    pub target_namespace: Option<String>,
    pub operations: Vec<OperationDescriptor>,
}

impl ServiceInterfaceDescriptor {
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
    }

    /// Explicit target namespace, else the one derived from the package.
    pub fn namespace(&self) -> String {
        match &self.target_namespace {
            Some(ns) => ns.clone(),
            None => naming::derive_namespace(self.package()),
        }
    }
}
