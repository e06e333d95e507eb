use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A qualified element name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QName {
    pub namespace: String,
    pub local: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        QName {
            namespace: namespace.into(),
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{{{}}}{}", self.namespace, self.local)
        }
    }
}

/// Element holder: a qualified name boxing a payload value.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementHolder {
    pub name: QName,
    pub value: Value,
}

/// An instance of a materialized type.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub type_name: String,
    pub fields: BTreeMap<String, Value>,
}

/// A runtime value.
///
/// Lists and objects have reference semantics (cloning a `Value` shares the
/// underlying storage); equality is structural.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<Instance>>),
    Holder(Rc<ElementHolder>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn holder(name: QName, value: Value) -> Self {
        Value::Holder(Rc::new(ElementHolder { name, value }))
    }

    pub(crate) fn object(instance: Instance) -> Self {
        Value::Object(Rc::new(RefCell::new(instance)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Snapshot of a list's elements.
    pub fn as_list(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Runtime type name of an object value.
    pub fn type_name(&self) -> Option<String> {
        match self {
            Value::Object(obj) => Some(obj.borrow().type_name.clone()),
            _ => None,
        }
    }

    /// Field of an object value, if both exist.
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Object(obj) => obj.borrow().fields.get(name).cloned(),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Holder(_) => "holder",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
