use serde::Serialize;
use tracing::debug;

use crate::config::SynthConfig;
use crate::descriptor::ExceptionDescriptor;
use crate::emit::{intrinsics, FieldDef, MethodDef, Op, Operand, TypeDef};
use crate::registry::FaultRegistry;
use crate::types::TypeRef;

pub const FAULT_INFO_FIELD: &str = "faultInfo";
pub const FAULT_INFO_GETTER: &str = "getFaultInfo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedFaultType {
    /// Qualified name in the generated package.
    pub name: String,
    pub fault_name: String,
    pub payload_type: TypeRef,
    pub declared_type: TypeRef,
}

/// Explicit `WebFault.name`, else `<SimpleName><fault suffix>`.
pub fn resolve_fault_name(exc: &ExceptionDescriptor, config: &SynthConfig) -> String {
    match &exc.fault_name {
        Some(name) => name.clone(),
        None => format!("{}{}", exc.declared_type.simple_name(), config.fault_suffix),
    }
}

/// Fault types for one operation's exceptions. Names already claimed in
/// this pass are skipped.
pub fn synthesize_faults(
    exceptions: &[ExceptionDescriptor],
    package: &str,
    config: &SynthConfig,
    faults: &mut FaultRegistry,
) -> Vec<SynthesizedFaultType> {
    let mut out = Vec::new();
    for exc in exceptions {
        let fault_name = resolve_fault_name(exc, config);
        if !faults.claim(&fault_name) {
            debug!(fault = %fault_name, "Fault type already synthesized");
            continue;
        }
        let name = if package.is_empty() {
            fault_name.clone()
        } else {
            format!("{package}.{fault_name}")
        };
        debug!(fault = %name, payload = %exc.payload_type, "Synthesized fault type");
        out.push(SynthesizedFaultType {
            name,
            fault_name,
            payload_type: exc.payload_type.clone(),
            declared_type: exc.declared_type.clone(),
        });
    }
    out
}

impl SynthesizedFaultType {
    pub fn type_def(&self) -> TypeDef {
        let mut def = TypeDef::new(&self.name);
        def.supertype = Some(intrinsics::EXCEPTION_TYPE.to_string());
        def.fields.push(FieldDef {
            name: FAULT_INFO_FIELD.to_string(),
            ty: self.payload_type.clone(),
        });
        def.methods.push(MethodDef::constructor(
            vec![TypeRef::named("string"), self.payload_type.clone()],
            vec![
                Op::invoke(
                    None,
                    Operand::This,
                    intrinsics::EXCEPTION_TYPE,
                    intrinsics::CONSTRUCTOR,
                    vec![Operand::Param(0)],
                ),
                Op::WriteField {
                    object: Operand::This,
                    field: FAULT_INFO_FIELD.to_string(),
                    value: Operand::Param(1),
                },
                Op::Return { value: None },
            ],
        ));
        def.methods.push(MethodDef::instance(
            FAULT_INFO_GETTER,
            Vec::new(),
            self.payload_type.clone(),
            vec![
                Op::ReadField {
                    dst: 0,
                    object: Operand::This,
                    field: FAULT_INFO_FIELD.to_string(),
                },
                Op::Return {
                    value: Some(Operand::Local(0)),
                },
            ],
        ));
        def
    }
}
