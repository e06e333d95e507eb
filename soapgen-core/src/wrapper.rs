use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::config::SynthConfig;
use crate::descriptor::{OperationDescriptor, ParameterDescriptor};
use crate::emit::{FieldDef, MethodDef, Op, Operand, TypeDef};
use crate::error::SynthesisError;
use crate::meta::{ElementTag, MetadataIndex, SCHEMA_TAGS, XML_ELEMENT};
use crate::naming;
use crate::types::TypeRef;

/// Suffix of the response wrapper's root element; part of the wire contract,
/// unlike the configurable class-name suffix.
pub const RESPONSE_ELEMENT_SUFFIX: &str = "Response";

pub const XML_ROOT_ELEMENT: &str = "XmlRootElement";
pub const XML_TYPE: &str = "XmlType";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WrapperKind {
    Request,
    Response,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedField {
    /// Field identifier derived from the wire name.
    pub name: String,
    pub wire_name: String,
    pub namespace: String,
    pub declared_type: TypeRef,
    pub getter: String,
    pub setter: String,
    pub getter_tags: Vec<ElementTag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedWrapperType {
    /// Simple class name, e.g. `Ping` or `PingResponse`.
    pub name: String,
    pub package: String,
    pub namespace: String,
    pub element_name: String,
    pub kind: WrapperKind,
    pub fields: Vec<SynthesizedField>,
}

impl SynthesizedWrapperType {
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn getters(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.getter.as_str()).collect()
    }

    pub fn setters(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.setter.as_str()).collect()
    }

    pub fn field(&self, name: &str) -> Option<&SynthesizedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Plain data carrier: nullary constructor, one field per element with
    /// a getter and a setter.
    pub fn type_def(&self) -> TypeDef {
        let element_tag = |tag: &str| {
            ElementTag::new(tag)
                .with("name", &self.element_name)
                .with("namespace", &self.namespace)
        };

        let mut def = TypeDef::new(self.qualified_name());
        def.tags = vec![element_tag(XML_ROOT_ELEMENT), element_tag(XML_TYPE)];
        def.methods
            .push(MethodDef::constructor(Vec::new(), vec![Op::Return { value: None }]));

        for field in &self.fields {
            def.fields.push(FieldDef {
                name: field.name.clone(),
                ty: field.declared_type.clone(),
            });
            def.methods.push(
                MethodDef::instance(
                    &field.getter,
                    Vec::new(),
                    field.declared_type.clone(),
                    vec![
                        Op::ReadField {
                            dst: 0,
                            object: Operand::This,
                            field: field.name.clone(),
                        },
                        Op::Return {
                            value: Some(Operand::Local(0)),
                        },
                    ],
                )
                .with_tags(field.getter_tags.clone()),
            );
            def.methods.push(MethodDef::instance(
                &field.setter,
                vec![field.declared_type.clone()],
                TypeRef::void(),
                vec![
                    Op::WriteField {
                        object: Operand::This,
                        field: field.name.clone(),
                        value: Operand::Param(0),
                    },
                    Op::Return { value: None },
                ],
            ));
        }
        def
    }
}

/// Where wrappers for one interface are generated.
#[derive(Debug, Clone, Copy)]
pub struct WrapperScope<'a> {
    pub index: &'a MetadataIndex,
    /// Generated package, e.g. `org.acme.jaxws_asm`.
    pub package: &'a str,
    /// Interface namespace used for the wrapper type-level tags.
    pub namespace: &'a str,
    pub config: &'a SynthConfig,
}

impl WrapperScope<'_> {
    pub fn wrapper_name(&self, op: &OperationDescriptor, kind: WrapperKind) -> String {
        let suffix = match kind {
            WrapperKind::Request => &self.config.request_suffix,
            WrapperKind::Response => &self.config.response_suffix,
        };
        format!("{}{suffix}", naming::capitalize(&op.method_name))
    }
}

/// Request wrapper: every parameter whose direction is not `OUT`.
pub fn synthesize_request(
    scope: &WrapperScope<'_>,
    op: &OperationDescriptor,
) -> Result<SynthesizedWrapperType, SynthesisError> {
    let name = scope.wrapper_name(op, WrapperKind::Request);
    let included: Vec<&ParameterDescriptor> =
        op.params.iter().filter(|p| p.direction.in_request()).collect();

    let mut fields = Vec::with_capacity(included.len());
    push_param_fields(scope, op, &included, &mut fields)?;

    build(scope, op, name, WrapperKind::Request, included.len(), fields)
}

/// Response wrapper: the result first (unless void), then every parameter
/// whose direction is not `IN`.
pub fn synthesize_response(
    scope: &WrapperScope<'_>,
    op: &OperationDescriptor,
) -> Result<SynthesizedWrapperType, SynthesisError> {
    let name = scope.wrapper_name(op, WrapperKind::Response);
    let included: Vec<&ParameterDescriptor> =
        op.params.iter().filter(|p| p.direction.in_response()).collect();

    let mut fields = Vec::with_capacity(included.len() + 1);
    let has_result = !op.result.is_void();
    if has_result {
        let result = &op.result;
        resolve(scope, op, &result.declared_type)?;
        fields.push(make_field(
            result.effective_wire_name(),
            result.effective_namespace(),
            result.declared_type.clone(),
            &result.tags,
        ));
    }
    push_param_fields(scope, op, &included, &mut fields)?;

    let expected = included.len() + usize::from(has_result);
    build(scope, op, name, WrapperKind::Response, expected, fields)
}

fn push_param_fields(
    scope: &WrapperScope<'_>,
    op: &OperationDescriptor,
    included: &[&ParameterDescriptor],
    fields: &mut Vec<SynthesizedField>,
) -> Result<(), SynthesisError> {
    // `i` counts only the parameters of this wrapper.
    for (i, param) in included.iter().enumerate() {
        resolve(scope, op, &param.declared_type)?;
        let wire_name = param
            .wire_name
            .clone()
            .or_else(|| param.declared_name.clone())
            .unwrap_or_else(|| format!("arg{i}"));
        let namespace = naming::effective_namespace(param.namespace.as_deref(), "");
        fields.push(make_field(
            wire_name,
            namespace,
            param.declared_type.clone(),
            &param.tags,
        ));
    }
    Ok(())
}

fn resolve(
    scope: &WrapperScope<'_>,
    op: &OperationDescriptor,
    ty: &TypeRef,
) -> Result<(), SynthesisError> {
    if scope.index.resolve(ty) {
        Ok(())
    } else {
        Err(SynthesisError::unresolved(&op.method_name, ty))
    }
}

fn make_field(
    wire_name: String,
    namespace: String,
    declared_type: TypeRef,
    source_tags: &[ElementTag],
) -> SynthesizedField {
    let carried: Vec<ElementTag> = source_tags
        .iter()
        .filter(|t| SCHEMA_TAGS.contains(&t.name.as_str()))
        .cloned()
        .collect();
    let getter_tags = if carried.is_empty() {
        vec![ElementTag::new(XML_ELEMENT)
            .with("name", &wire_name)
            .with("namespace", &namespace)]
    } else {
        carried
    };

    SynthesizedField {
        name: naming::to_field_identifier(&wire_name),
        getter: naming::getter_identifier(&wire_name),
        setter: naming::setter_identifier(&wire_name),
        wire_name,
        namespace,
        declared_type,
        getter_tags,
    }
}

fn build(
    scope: &WrapperScope<'_>,
    op: &OperationDescriptor,
    name: String,
    kind: WrapperKind,
    expected: usize,
    fields: Vec<SynthesizedField>,
) -> Result<SynthesizedWrapperType, SynthesisError> {
    if fields.len() != expected {
        return Err(SynthesisError::malformed(
            &op.method_name,
            format!("{name} has {} fields, expected {expected}", fields.len()),
        ));
    }

    let mut names = HashSet::new();
    let mut getters = HashSet::new();
    for field in &fields {
        if !names.insert(field.name.as_str()) || !getters.insert(field.getter.as_str()) {
            return Err(SynthesisError::malformed(
                &op.method_name,
                format!("{name} declares field '{}' twice", field.name),
            ));
        }
    }

    let element_name = match kind {
        WrapperKind::Request => op.effective_operation_name(),
        WrapperKind::Response => {
            format!("{}{RESPONSE_ELEMENT_SUFFIX}", op.effective_operation_name())
        }
    };

    debug!(
        operation = %op.method_name,
        wrapper = %name,
        kind = ?kind,
        fields = fields.len(),
        "Synthesized wrapper type"
    );

    Ok(SynthesizedWrapperType {
        name,
        package: scope.package.to_string(),
        namespace: scope.namespace.to_string(),
        element_name,
        kind,
        fields,
    })
}
