use soapgen_core::adapter::{CONSTRUCT, DECOMPOSE, FINGERPRINT, POPULATE, WRAPPER_ADAPTER};
use soapgen_core::MethodKind;

use crate::error::RuntimeError;
use crate::runtime::Runtime;
use crate::value::Value;

/// A live adapter instance.
pub struct AdapterHandle<'r> {
    runtime: &'r Runtime,
    name: String,
    instance: Value,
}

impl<'r> AdapterHandle<'r> {
    pub(crate) fn new(runtime: &'r Runtime, name: &str) -> Result<Self, RuntimeError> {
        let def = runtime
            .get_type(name)
            .ok_or_else(|| RuntimeError::UnknownType(name.to_string()))?;
        if !def.has_capability(WRAPPER_ADAPTER) {
            return Err(RuntimeError::MissingCapability {
                type_name: name.to_string(),
                capability: WRAPPER_ADAPTER.to_string(),
            });
        }
        let instance = runtime.instantiate(name, Vec::new())?;
        Ok(AdapterHandle {
            runtime,
            name: name.to_string(),
            instance,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> &Value {
        &self.instance
    }

    pub fn fingerprint(&self) -> Result<String, RuntimeError> {
        match self.runtime.invoke(&self.instance, FINGERPRINT, Vec::new())? {
            Value::Str(s) => Ok(s),
            other => Err(RuntimeError::TypeMismatch {
                expected: "string",
                got: other.kind(),
            }),
        }
    }

    /// New wrapper populated from the ordered values.
    pub fn construct(&self, values: Vec<Value>) -> Result<Value, RuntimeError> {
        self.runtime
            .invoke(&self.instance, CONSTRUCT, vec![Value::list(values)])
    }

    /// Populate an existing wrapper; list fields already holding a list are
    /// appended to rather than replaced.
    pub fn populate(&self, wrapper: &Value, values: Vec<Value>) -> Result<(), RuntimeError> {
        self.runtime.invoke(
            &self.instance,
            POPULATE,
            vec![wrapper.clone(), Value::list(values)],
        )?;
        Ok(())
    }

    pub fn decompose(&self, wrapper: &Value) -> Result<Vec<Value>, RuntimeError> {
        let parts = self
            .runtime
            .invoke(&self.instance, DECOMPOSE, vec![wrapper.clone()])?;
        parts.as_list().ok_or(RuntimeError::TypeMismatch {
            expected: "list",
            got: parts.kind(),
        })
    }
}

/// A live wrapper factory instance.
pub struct FactoryHandle<'r> {
    runtime: &'r Runtime,
    method: String,
    instance: Value,
}

impl<'r> FactoryHandle<'r> {
    pub(crate) fn new(runtime: &'r Runtime, name: &str) -> Result<Self, RuntimeError> {
        let def = runtime
            .get_type(name)
            .ok_or_else(|| RuntimeError::UnknownType(name.to_string()))?;
        let method = def
            .methods
            .iter()
            .find(|m| m.kind == MethodKind::Instance && m.name.starts_with("create"))
            .ok_or_else(|| RuntimeError::NoSuchMethod {
                type_name: name.to_string(),
                method: "create*".to_string(),
            })?
            .name
            .clone();
        let instance = runtime.instantiate(name, Vec::new())?;
        Ok(FactoryHandle {
            runtime,
            method,
            instance,
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn create(&self) -> Result<Value, RuntimeError> {
        self.runtime.invoke(&self.instance, &self.method, Vec::new())
    }
}
