use tracing::debug;

use crate::descriptor::{
    Direction, ExceptionDescriptor, OperationDescriptor, ParameterDescriptor, ResultDescriptor,
    ServiceInterfaceDescriptor,
};
use crate::error::SynthesisError;
use crate::meta::{
    MetadataIndex, MethodInfo, ParamInfo, WEB_FAULT, WEB_METHOD, WEB_PARAM, WEB_RESULT,
    WEB_SERVICE,
};

/// Walk a service interface in the index and normalize its operations.
///
/// Parameter types are not resolved here (the wrapper synthesizer does that);
/// declared exceptions are, since their payload type is needed up front.
pub fn extract_interface(
    index: &MetadataIndex,
    name: &str,
) -> Result<ServiceInterfaceDescriptor, SynthesisError> {
    let info = index
        .get(name)
        .ok_or_else(|| SynthesisError::UnknownInterface(name.to_string()))?;

    let target_namespace = info
        .tag(WEB_SERVICE)
        .and_then(|t| t.value("targetNamespace"))
        .map(str::to_string);

    let operations = info
        .methods
        .iter()
        .map(|m| extract_operation(index, m))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        interface = %name,
        operations = operations.len(),
        "Extracted service interface"
    );

    Ok(ServiceInterfaceDescriptor {
        name: name.to_string(),
        target_namespace,
        operations,
    })
}

fn extract_operation(
    index: &MetadataIndex,
    method: &MethodInfo,
) -> Result<OperationDescriptor, SynthesisError> {
    let op = method.name.as_str();

    let params = method
        .params
        .iter()
        .map(|p| extract_param(op, p))
        .collect::<Result<Vec<_>, _>>()?;

    let web_result = method.tag(WEB_RESULT);
    let result = ResultDescriptor {
        declared_type: method.returns.clone(),
        wire_name: web_result.and_then(|t| t.value("name")).map(str::to_string),
        namespace: web_result
            .and_then(|t| t.value("targetNamespace"))
            .map(str::to_string),
        tags: method.tags.clone(),
    };

    let mut exceptions: Vec<ExceptionDescriptor> = Vec::new();
    for thrown in &method.throws {
        if exceptions.iter().any(|e| &e.declared_type == thrown) {
            continue;
        }
        let exc = index
            .get(thrown.base())
            .ok_or_else(|| SynthesisError::unresolved(op, thrown))?;
        let payload_type = exc.fault_info.clone().unwrap_or_else(|| thrown.clone());
        if !index.resolve(&payload_type) {
            return Err(SynthesisError::unresolved(op, &payload_type));
        }
        exceptions.push(ExceptionDescriptor {
            declared_type: thrown.clone(),
            fault_name: exc
                .tag(WEB_FAULT)
                .and_then(|t| t.value("name"))
                .map(str::to_string),
            payload_type,
        });
    }

    Ok(OperationDescriptor {
        method_name: method.name.clone(),
        operation_name: method
            .tag(WEB_METHOD)
            .and_then(|t| t.value("operationName"))
            .map(str::to_string),
        params,
        result,
        exceptions,
    })
}

fn extract_param(op: &str, param: &ParamInfo) -> Result<ParameterDescriptor, SynthesisError> {
    let web_param = param.tag(WEB_PARAM);
    let value = |key: &str| web_param.and_then(|t| t.value(key));

    let direction = match value("mode") {
        Some(mode) => Direction::parse(mode).ok_or_else(|| {
            SynthesisError::malformed(op, format!("unknown parameter mode '{mode}'"))
        })?,
        None => Direction::In,
    };

    Ok(ParameterDescriptor {
        declared_type: param.declared_type.clone(),
        declared_name: param.name.clone(),
        direction,
        wire_name: value("name").map(str::to_string),
        namespace: value("targetNamespace").map(str::to_string),
        header: value("header").is_some_and(|h| h.eq_ignore_ascii_case("true")),
        tags: param.tags.clone(),
    })
}
