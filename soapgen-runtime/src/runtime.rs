use std::collections::{BTreeMap, HashMap, HashSet};

use soapgen_core::emit::intrinsics;
use soapgen_core::{
    Constant, MethodDef, MethodKind, MethodRef, Op, Operand, SynthesisError, TypeDef, TypeEmitter,
};
use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::handle::{AdapterHandle, FactoryHandle};
use crate::value::{Instance, Value};

/// In-memory materialization of synthesized types.
///
/// Acts as a [`TypeEmitter`]: every emitted [`TypeDef`] becomes loadable, and
/// its method bodies are interpreted over [`Value`]s on demand.
#[derive(Debug, Default)]
pub struct Runtime {
    types: HashMap<String, TypeDef>,
    /// Types that exist outside the synthesized set (companion factories,
    /// payload classes); instantiated as empty objects.
    externals: HashSet<String>,
}

impl TypeEmitter for Runtime {
    fn emit(&mut self, def: TypeDef) -> Result<(), SynthesisError> {
        if self.types.contains_key(&def.name) {
            return Err(SynthesisError::Emit(format!(
                "type '{}' already loaded",
                def.name
            )));
        }
        debug!(type_name = %def.name, methods = def.methods.len(), "Loaded type");
        self.types.insert(def.name.clone(), def);
        Ok(())
    }
}

/// Interpreter state of one method activation.
struct Frame {
    this: Value,
    params: Vec<Value>,
    locals: Vec<Option<Value>>,
}

impl Frame {
    fn set(&mut self, slot: usize, value: Value) {
        if self.locals.len() <= slot {
            self.locals.resize(slot + 1, None);
        }
        self.locals[slot] = Some(value);
    }
}

enum Flow {
    Continue,
    Return(Value),
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_external(&mut self, name: impl Into<String>) {
        self.externals.insert(name.into());
    }

    pub fn with_external(mut self, name: impl Into<String>) -> Self {
        self.declare_external(name);
        self
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Names of loaded types advertising `capability`, sorted.
    pub fn types_with_capability(&self, capability: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .types
            .values()
            .filter(|t| t.has_capability(capability))
            .map(|t| t.name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn adapter(&self, name: &str) -> Result<AdapterHandle<'_>, RuntimeError> {
        AdapterHandle::new(self, name)
    }

    pub fn factory(&self, name: &str) -> Result<FactoryHandle<'_>, RuntimeError> {
        FactoryHandle::new(self, name)
    }

    /// Allocate an instance of `type_name` and run its constructor.
    pub fn instantiate(&self, type_name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if type_name == intrinsics::LIST_TYPE {
            return Ok(Value::list(Vec::new()));
        }
        if self.externals.contains(type_name) && !self.types.contains_key(type_name) {
            return Ok(Value::object(Instance {
                type_name: type_name.to_string(),
                fields: BTreeMap::new(),
            }));
        }

        let def = self.require_type(type_name)?;
        let mut fields = BTreeMap::new();
        self.collect_fields(def, &mut fields);
        let instance = Value::object(Instance {
            type_name: type_name.to_string(),
            fields,
        });

        match def.constructor() {
            Some(ctor) => {
                self.call(ctor, instance.clone(), args)?;
            }
            None if !args.is_empty() => {
                return Err(RuntimeError::ArityMismatch {
                    method: format!("{type_name}.{}", intrinsics::CONSTRUCTOR),
                    expected: 0,
                    got: args.len(),
                })
            }
            None => {}
        }
        trace!(type_name = %type_name, "Instantiated");
        Ok(instance)
    }

    /// Invoke an instance method, dispatching on the target's runtime type.
    pub fn invoke(
        &self,
        target: &Value,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let type_name = match target {
            Value::Object(obj) => obj.borrow().type_name.clone(),
            Value::Null => {
                return Err(RuntimeError::NullTarget {
                    method: method.to_string(),
                })
            }
            other => {
                return Err(RuntimeError::TypeMismatch {
                    expected: "object",
                    got: other.kind(),
                })
            }
        };

        let mut current = Some(type_name.as_str());
        while let Some(name) = current {
            if name == intrinsics::EXCEPTION_TYPE {
                if method == "getMessage" {
                    return Ok(target
                        .field(intrinsics::EXCEPTION_MESSAGE)
                        .unwrap_or(Value::Null));
                }
                break;
            }
            let Some(def) = self.types.get(name) else {
                break;
            };
            if let Some(m) = def
                .methods
                .iter()
                .find(|m| m.name == method && m.kind == MethodKind::Instance)
            {
                return self.call(m, target.clone(), args);
            }
            current = def.supertype.as_deref();
        }

        Err(RuntimeError::NoSuchMethod {
            type_name,
            method: method.to_string(),
        })
    }

    fn require_type(&self, name: &str) -> Result<&TypeDef, RuntimeError> {
        self.types
            .get(name)
            .ok_or_else(|| RuntimeError::UnknownType(name.to_string()))
    }

    fn collect_fields(&self, def: &TypeDef, out: &mut BTreeMap<String, Value>) {
        match def.supertype.as_deref() {
            Some(intrinsics::EXCEPTION_TYPE) => {
                out.insert(intrinsics::EXCEPTION_MESSAGE.to_string(), Value::Null);
            }
            Some(parent) => {
                if let Some(parent_def) = self.types.get(parent) {
                    self.collect_fields(parent_def, out);
                }
            }
            None => {}
        }
        for field in &def.fields {
            out.insert(field.name.clone(), Value::Null);
        }
    }

    fn call(&self, method: &MethodDef, this: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if args.len() != method.params.len() {
            return Err(RuntimeError::ArityMismatch {
                method: method.name.clone(),
                expected: method.params.len(),
                got: args.len(),
            });
        }
        let mut frame = Frame {
            this,
            params: args,
            locals: Vec::new(),
        };
        match self.exec(&method.body, &mut frame)? {
            Flow::Return(value) => Ok(value),
            Flow::Continue => Ok(Value::Null),
        }
    }

    fn exec(&self, ops: &[Op], frame: &mut Frame) -> Result<Flow, RuntimeError> {
        for op in ops {
            match op {
                Op::Allocate { dst, ty, args } => {
                    let args = self.eval_all(args, frame)?;
                    let value = self.instantiate(ty, args)?;
                    frame.set(*dst, value);
                }
                Op::ReadField { dst, object, field } => {
                    let object = self.eval(object, frame)?;
                    let value = read_field(&object, field)?;
                    frame.set(*dst, value);
                }
                Op::WriteField {
                    object,
                    field,
                    value,
                } => {
                    let object = self.eval(object, frame)?;
                    let value = self.eval(value, frame)?;
                    write_field(&object, field, value)?;
                }
                Op::Invoke {
                    dst,
                    target,
                    method,
                    args,
                } => {
                    let target = self.eval(target, frame)?;
                    let args = self.eval_all(args, frame)?;
                    let result = self.dispatch(&target, method, args)?;
                    if let Some(dst) = dst {
                        frame.set(*dst, result);
                    }
                }
                Op::BranchOnNull {
                    value,
                    then,
                    otherwise,
                } => {
                    let branch = if self.eval(value, frame)?.is_null() {
                        then
                    } else {
                        otherwise
                    };
                    if let Flow::Return(v) = self.exec(branch, frame)? {
                        return Ok(Flow::Return(v));
                    }
                }
                Op::Return { value } => {
                    let value = match value {
                        Some(operand) => self.eval(operand, frame)?,
                        None => Value::Null,
                    };
                    return Ok(Flow::Return(value));
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn eval(&self, operand: &Operand, frame: &Frame) -> Result<Value, RuntimeError> {
        match operand {
            Operand::This => Ok(frame.this.clone()),
            Operand::Param(i) => {
                frame
                    .params
                    .get(*i)
                    .cloned()
                    .ok_or_else(|| RuntimeError::ArityMismatch {
                        method: "<param>".to_string(),
                        expected: i + 1,
                        got: frame.params.len(),
                    })
            }
            Operand::Local(slot) => frame
                .locals
                .get(*slot)
                .cloned()
                .flatten()
                .ok_or(RuntimeError::UnsetLocal(*slot)),
            Operand::Const(c) => Ok(match c {
                Constant::Null => Value::Null,
                Constant::Int(i) => Value::Int(*i),
                Constant::Str(s) => Value::Str(s.clone()),
            }),
        }
    }

    fn eval_all(&self, operands: &[Operand], frame: &Frame) -> Result<Vec<Value>, RuntimeError> {
        operands.iter().map(|o| self.eval(o, frame)).collect()
    }

    fn dispatch(
        &self,
        target: &Value,
        method: &MethodRef,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match method.owner.as_str() {
            intrinsics::LIST_TYPE => return list_intrinsic(target, &method.name, args),
            intrinsics::HOLDER_TYPE => return holder_intrinsic(target, &method.name),
            _ => {}
        }

        if method.name == intrinsics::CONSTRUCTOR {
            // constructor chaining against the current instance
            if method.owner == intrinsics::EXCEPTION_TYPE {
                let message = args.into_iter().next().unwrap_or(Value::Null);
                write_field(target, intrinsics::EXCEPTION_MESSAGE, message)?;
                return Ok(Value::Null);
            }
            let def = self.require_type(&method.owner)?;
            return match def.constructor() {
                Some(ctor) => self.call(ctor, target.clone(), args),
                None => Ok(Value::Null),
            };
        }

        self.invoke(target, &method.name, args)
    }
}

fn read_field(object: &Value, field: &str) -> Result<Value, RuntimeError> {
    match object {
        Value::Object(obj) => {
            let obj = obj.borrow();
            obj.fields
                .get(field)
                .cloned()
                .ok_or_else(|| RuntimeError::UnknownField {
                    type_name: obj.type_name.clone(),
                    field: field.to_string(),
                })
        }
        Value::Null => Err(RuntimeError::NullTarget {
            method: field.to_string(),
        }),
        other => Err(RuntimeError::TypeMismatch {
            expected: "object",
            got: other.kind(),
        }),
    }
}

fn write_field(object: &Value, field: &str, value: Value) -> Result<(), RuntimeError> {
    match object {
        Value::Object(obj) => {
            let mut obj = obj.borrow_mut();
            match obj.fields.get_mut(field) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(RuntimeError::UnknownField {
                    type_name: obj.type_name.clone(),
                    field: field.to_string(),
                }),
            }
        }
        Value::Null => Err(RuntimeError::NullTarget {
            method: field.to_string(),
        }),
        other => Err(RuntimeError::TypeMismatch {
            expected: "object",
            got: other.kind(),
        }),
    }
}

fn list_intrinsic(target: &Value, method: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let items = match target {
        Value::List(items) => items,
        Value::Null => {
            return Err(RuntimeError::NullTarget {
                method: method.to_string(),
            })
        }
        other => {
            return Err(RuntimeError::TypeMismatch {
                expected: "list",
                got: other.kind(),
            })
        }
    };
    let mut args = args.into_iter();

    match method {
        intrinsics::LIST_GET => {
            let index = match args.next() {
                Some(Value::Int(i)) => i,
                Some(other) => {
                    return Err(RuntimeError::TypeMismatch {
                        expected: "int",
                        got: other.kind(),
                    })
                }
                None => {
                    return Err(RuntimeError::ArityMismatch {
                        method: method.to_string(),
                        expected: 1,
                        got: 0,
                    })
                }
            };
            let items = items.borrow();
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i).cloned())
                .ok_or(RuntimeError::IndexOutOfBounds {
                    index,
                    len: items.len(),
                })
        }
        intrinsics::LIST_ADD_ALL => {
            match args.next() {
                // appending nothing
                Some(Value::Null) | None => {}
                Some(Value::List(other)) => {
                    // snapshot first: `other` may alias `items`
                    let extra = other.borrow().clone();
                    items.borrow_mut().extend(extra);
                }
                Some(other) => {
                    return Err(RuntimeError::TypeMismatch {
                        expected: "list",
                        got: other.kind(),
                    })
                }
            }
            Ok(Value::Null)
        }
        intrinsics::LIST_PUSH => {
            items.borrow_mut().push(args.next().unwrap_or(Value::Null));
            Ok(Value::Null)
        }
        intrinsics::LIST_LEN => Ok(Value::Int(items.borrow().len() as i64)),
        other => Err(RuntimeError::NoSuchMethod {
            type_name: intrinsics::LIST_TYPE.to_string(),
            method: other.to_string(),
        }),
    }
}

fn holder_intrinsic(target: &Value, method: &str) -> Result<Value, RuntimeError> {
    match (target, method) {
        (Value::Holder(holder), intrinsics::HOLDER_VALUE) => Ok(holder.value.clone()),
        (Value::Null, _) => Err(RuntimeError::NullTarget {
            method: method.to_string(),
        }),
        (Value::Holder(_), other) => Err(RuntimeError::NoSuchMethod {
            type_name: intrinsics::HOLDER_TYPE.to_string(),
            method: other.to_string(),
        }),
        (other, _) => Err(RuntimeError::TypeMismatch {
            expected: "holder",
            got: other.kind(),
        }),
    }
}
