use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::emit::CompanionLookup;
use crate::error::MetadataError;
use crate::types::{self, TypeRef};

// ── Well-known tags ─────────────────────────────────────────────────────

pub const WEB_SERVICE: &str = "WebService";
pub const WEB_METHOD: &str = "WebMethod";
pub const WEB_PARAM: &str = "WebParam";
pub const WEB_RESULT: &str = "WebResult";
pub const WEB_FAULT: &str = "WebFault";

pub const XML_ELEMENT: &str = "XmlElement";
pub const XML_ELEMENT_WRAPPER: &str = "XmlElementWrapper";
pub const XML_LIST: &str = "XmlList";
pub const XML_ATTACHMENT_REF: &str = "XmlAttachmentRef";
pub const XML_JAVA_TYPE_ADAPTER: &str = "XmlJavaTypeAdapter";
pub const XML_MIME_TYPE: &str = "XmlMimeType";

/// Schema tags that are carried from a parameter or result onto the
/// synthesized getter instead of the default `XmlElement`.
pub const SCHEMA_TAGS: &[&str] = &[
    XML_LIST,
    XML_ATTACHMENT_REF,
    XML_JAVA_TYPE_ADAPTER,
    XML_MIME_TYPE,
    XML_ELEMENT,
    XML_ELEMENT_WRAPPER,
];

/// A metadata tag (annotation) with string-valued members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementTag {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
}

impl ElementTag {
    pub fn new(name: impl Into<String>) -> Self {
        ElementTag {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// A member value; empty strings count as absent.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

pub fn find_tag<'a>(tags: &'a [ElementTag], name: &str) -> Option<&'a ElementTag> {
    tags.iter().find(|t| t.name == name)
}

// ── Type metadata ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Interface,
    #[default]
    Class,
    Exception,
    /// A collection type, treated as list-like by adapters.
    List,
    /// An element holder type, treated as holder-like by adapters.
    Holder,
    /// A type whose shape is not known to the index.
    Opaque,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ElementTag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodInfo>,
    /// Payload type carried by an exception type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_info: Option<TypeRef>,
}

impl TypeInfo {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        TypeInfo {
            name: name.into(),
            kind,
            tags: Vec::new(),
            methods: Vec::new(),
            fault_info: None,
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn exception(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Exception)
    }

    pub fn with_tag(mut self, tag: ElementTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_fault_info(mut self, payload: TypeRef) -> Self {
        self.fault_info = Some(payload);
        self
    }

    pub fn tag(&self, name: &str) -> Option<&ElementTag> {
        find_tag(&self.tags, name)
    }

    /// Everything before the last `.` of the qualified name.
    pub fn package(&self) -> &str {
        self.name.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamInfo>,
    #[serde(default = "TypeRef::void")]
    pub returns: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub throws: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ElementTag>,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>) -> Self {
        MethodInfo {
            name: name.into(),
            params: Vec::new(),
            returns: TypeRef::void(),
            throws: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamInfo) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.returns = ty;
        self
    }

    pub fn throws(mut self, ty: TypeRef) -> Self {
        self.throws.push(ty);
        self
    }

    pub fn with_tag(mut self, tag: ElementTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn tag(&self, name: &str) -> Option<&ElementTag> {
        find_tag(&self.tags, name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    #[serde(rename = "type")]
    pub declared_type: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ElementTag>,
}

impl ParamInfo {
    pub fn new(declared_type: TypeRef) -> Self {
        ParamInfo {
            declared_type,
            name: None,
            tags: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: ElementTag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn tag(&self, name: &str) -> Option<&ElementTag> {
        find_tag(&self.tags, name)
    }
}

// ── Classification ──────────────────────────────────────────────────────

/// Result of asking whether a type has a given shape (list-like, holder-like).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Yes,
    No,
    /// The index has no shape information for the type.
    Unknown,
}

// ── Index ───────────────────────────────────────────────────────────────

/// Reflected type metadata, keyed by qualified type name.
///
/// Loaded from a YAML or JSON list of [`TypeInfo`] entries. Insertion order
/// is kept so build passes are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    types: Vec<TypeInfo>,
    by_name: HashMap<String, usize>,
}

impl MetadataIndex {
    pub fn new(types: Vec<TypeInfo>) -> Result<Self, MetadataError> {
        let mut by_name = HashMap::with_capacity(types.len());
        for (i, ty) in types.iter().enumerate() {
            if by_name.insert(ty.name.clone(), i).is_some() {
                return Err(MetadataError::DuplicateType(ty.name.clone()));
            }
        }
        Ok(MetadataIndex { types, by_name })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, MetadataError> {
        let types: Vec<TypeInfo> =
            serde_yaml::from_str(content).map_err(|e| MetadataError::Parse(e.to_string()))?;
        Self::new(types)
    }

    pub fn from_json_str(content: &str) -> Result<Self, MetadataError> {
        let types: Vec<TypeInfo> =
            serde_json::from_str(content).map_err(|e| MetadataError::Parse(e.to_string()))?;
        Self::new(types)
    }

    /// Load an index file; `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let index = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        tracing::debug!(path = %path.display(), types = index.len(), "Loaded metadata index");
        Ok(index)
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.by_name.get(name).map(|&i| &self.types[i])
    }

    pub fn types(&self) -> &[TypeInfo] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every type carrying a `WebService` tag, interface or not.
    pub fn web_services(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter().filter(|t| t.tag(WEB_SERVICE).is_some())
    }

    /// Whether a declared type and all of its generic arguments are known.
    pub fn resolve(&self, ty: &TypeRef) -> bool {
        let base_known = match ty.base() {
            types::LIST | types::HOLDER => ty.args().len() == 1,
            _ if ty.is_void() || ty.is_scalar() => true,
            name => self.by_name.contains_key(name),
        };
        base_known && ty.args().iter().all(|arg| self.resolve(arg))
    }

    pub fn classify_list(&self, ty: &TypeRef) -> Classification {
        self.classify(ty, types::LIST, TypeKind::List)
    }

    pub fn classify_holder(&self, ty: &TypeRef) -> Classification {
        self.classify(ty, types::HOLDER, TypeKind::Holder)
    }

    fn classify(&self, ty: &TypeRef, builtin: &str, kind: TypeKind) -> Classification {
        if ty.base() == builtin {
            return Classification::Yes;
        }
        if ty.is_scalar() || ty.is_void() || ty.base() == types::LIST || ty.base() == types::HOLDER
        {
            return Classification::No;
        }
        match self.get(ty.base()) {
            Some(info) if info.kind == kind => Classification::Yes,
            Some(info) if info.kind == TypeKind::Opaque => Classification::Unknown,
            Some(_) => Classification::No,
            None => Classification::Unknown,
        }
    }
}

impl CompanionLookup for MetadataIndex {
    fn has_companion(&self, qualified_name: &str) -> bool {
        self.by_name.contains_key(qualified_name)
    }
}
