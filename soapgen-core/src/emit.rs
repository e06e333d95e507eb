//! The type emitter contract.
//!
//! Synthesizers describe every generated type as a [`TypeDef`]: a name,
//! optional supertype, fields, tags and methods whose bodies are short
//! straight-line [`Op`] sequences. An emitter materializes them (the dynamic
//! runtime in `soapgen-runtime`, or the JSON [`ManifestEmitter`] here).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;
use crate::meta::ElementTag;
use crate::types::TypeRef;

/// Names of built-in types and methods every emitter must provide.
pub mod intrinsics {
    pub const CONSTRUCTOR: &str = "<init>";

    pub const LIST_TYPE: &str = "list";
    pub const LIST_GET: &str = "get";
    pub const LIST_ADD_ALL: &str = "add_all";
    pub const LIST_PUSH: &str = "push";
    pub const LIST_LEN: &str = "len";

    pub const HOLDER_TYPE: &str = "holder";
    pub const HOLDER_VALUE: &str = "value";

    /// Root exception type; its constructor takes the message.
    pub const EXCEPTION_TYPE: &str = "Exception";
    pub const EXCEPTION_MESSAGE: &str = "message";
}

// ── IR ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supertype: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ElementTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        TypeDef {
            name: name.into(),
            supertype: None,
            capabilities: Vec::new(),
            tags: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constructor(&self) -> Option<&MethodDef> {
        self.methods
            .iter()
            .find(|m| m.kind == MethodKind::Constructor)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub kind: MethodKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<TypeRef>,
    pub returns: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ElementTag>,
    pub body: Vec<Op>,
}

impl MethodDef {
    pub fn constructor(params: Vec<TypeRef>, body: Vec<Op>) -> Self {
        MethodDef {
            name: intrinsics::CONSTRUCTOR.to_string(),
            kind: MethodKind::Constructor,
            params,
            returns: TypeRef::void(),
            tags: Vec::new(),
            body,
        }
    }

    pub fn instance(
        name: impl Into<String>,
        params: Vec<TypeRef>,
        returns: TypeRef,
        body: Vec<Op>,
    ) -> Self {
        MethodDef {
            name: name.into(),
            kind: MethodKind::Instance,
            params,
            returns,
            tags: Vec::new(),
            body,
        }
    }

    pub fn with_tags(mut self, tags: Vec<ElementTag>) -> Self {
        self.tags = tags;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constant {
    Null,
    Int(i64),
    Str(String),
}

/// An input to an op: the receiver, a method parameter, a local slot or a
/// constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    This,
    Param(usize),
    Local(usize),
    Const(Constant),
}

impl Operand {
    pub fn null() -> Self {
        Operand::Const(Constant::Null)
    }

    pub fn int(i: i64) -> Self {
        Operand::Const(Constant::Int(i))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRef {
    pub owner: String,
    pub name: String,
}

impl MethodRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        MethodRef {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Create an instance of `ty`, running its constructor with `args`.
    Allocate {
        dst: usize,
        ty: String,
        args: Vec<Operand>,
    },
    ReadField {
        dst: usize,
        object: Operand,
        field: String,
    },
    WriteField {
        object: Operand,
        field: String,
        value: Operand,
    },
    /// Call `method` on `target`. Invoking another type's constructor on
    /// `This` runs it against the current instance (supertype chaining).
    Invoke {
        dst: Option<usize>,
        target: Operand,
        method: MethodRef,
        args: Vec<Operand>,
    },
    BranchOnNull {
        value: Operand,
        then: Vec<Op>,
        otherwise: Vec<Op>,
    },
    Return {
        value: Option<Operand>,
    },
}

impl Op {
    pub fn invoke(
        dst: Option<usize>,
        target: Operand,
        owner: &str,
        name: &str,
        args: Vec<Operand>,
    ) -> Self {
        Op::Invoke {
            dst,
            target,
            method: MethodRef::new(owner, name),
            args,
        }
    }
}

// ── Collaborator traits ─────────────────────────────────────────────────

/// Materializes synthesized types.
pub trait TypeEmitter {
    fn emit(&mut self, def: TypeDef) -> Result<(), SynthesisError>;
}

/// Notified of every synthesized type name and every processed interface.
pub trait Registrar {
    fn register(&mut self, name: &str);
}

/// Answers whether a companion type (e.g. `<package>.ObjectFactory`) exists.
pub trait CompanionLookup {
    fn has_companion(&self, qualified_name: &str) -> bool;
}

// ── Provided implementations ────────────────────────────────────────────

/// Collects emitted types for serialization.
#[derive(Debug, Default, Serialize)]
pub struct ManifestEmitter {
    types: Vec<TypeDef>,
    #[serde(skip)]
    names: HashSet<String>,
}

impl ManifestEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.types)
    }

    pub fn into_types(self) -> Vec<TypeDef> {
        self.types
    }
}

impl TypeEmitter for ManifestEmitter {
    fn emit(&mut self, def: TypeDef) -> Result<(), SynthesisError> {
        if !self.names.insert(def.name.clone()) {
            return Err(SynthesisError::Emit(format!(
                "type '{}' emitted twice",
                def.name
            )));
        }
        self.types.push(def);
        Ok(())
    }
}

/// Keeps registered names in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct RecordingRegistrar {
    names: Vec<String>,
}

impl RecordingRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Registrar for RecordingRegistrar {
    fn register(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }
}
