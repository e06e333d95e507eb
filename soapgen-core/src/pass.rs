use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapter::{synthesize_adapter, SynthesizedAdapter};
use crate::config::SynthConfig;
use crate::descriptor::OperationDescriptor;
use crate::emit::{CompanionLookup, Registrar, TypeDef, TypeEmitter};
use crate::error::SynthesisError;
use crate::extract::extract_interface;
use crate::factory::{synthesize_factory, SynthesizedFactory};
use crate::fault::{synthesize_faults, SynthesizedFaultType};
use crate::meta::{ElementTag, MetadataIndex, TypeKind};
use crate::session::{BuildSession, WrapperClaim};
use crate::wrapper::{
    synthesize_request, synthesize_response, SynthesizedWrapperType, WrapperKind, WrapperScope,
};

pub const XML_SCHEMA: &str = "XmlSchema";
pub const PACKAGE_INFO: &str = "package-info";

// ── Outputs ─────────────────────────────────────────────────────────────

/// Package-level schema marker, emitted once per generated package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub package: String,
    pub namespace: String,
}

impl PackageInfo {
    pub fn type_def(&self) -> TypeDef {
        let mut def = TypeDef::new(&self.name);
        def.tags.push(
            ElementTag::new(XML_SCHEMA)
                .with("namespace", &self.namespace)
                .with("elementFormDefault", "QUALIFIED"),
        );
        def
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrapperBundle {
    pub wrapper: SynthesizedWrapperType,
    pub adapter: SynthesizedAdapter,
    pub factory: SynthesizedFactory,
}

impl WrapperBundle {
    fn type_defs(&self) -> [TypeDef; 3] {
        [
            self.wrapper.type_def(),
            self.adapter.type_def(),
            self.factory.type_def(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationOutput {
    pub operation: String,
    pub request: WrapperBundle,
    pub response: WrapperBundle,
}

/// Everything synthesized for one service interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceOutput {
    pub interface: String,
    /// Generated package.
    pub package: String,
    pub namespace: String,
    pub package_info: Option<PackageInfo>,
    pub operations: Vec<OperationOutput>,
    pub faults: Vec<SynthesizedFaultType>,
    /// Methods skipped because their wrapper was already generated.
    pub skipped: Vec<String>,
}

impl InterfaceOutput {
    pub fn operation(&self, name: &str) -> Option<&OperationOutput> {
        self.operations.iter().find(|o| o.operation == name)
    }

    /// All type definitions in emission order.
    pub fn type_defs(&self) -> Vec<TypeDef> {
        let mut defs = Vec::new();
        if let Some(info) = &self.package_info {
            defs.push(info.type_def());
        }
        for op in &self.operations {
            defs.extend(op.request.type_defs());
            defs.extend(op.response.type_defs());
        }
        defs.extend(self.faults.iter().map(SynthesizedFaultType::type_def));
        defs
    }

    /// Companion factory types referenced by adapters, deduplicated.
    pub fn companions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for op in &self.operations {
            for bundle in [&op.request, &op.response] {
                if let Some(factory) = bundle.adapter.object_factory.as_deref() {
                    if !out.contains(&factory) {
                        out.push(factory);
                    }
                }
            }
        }
        out
    }
}

/// Counters for one `Synthesizer::run`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub interfaces: usize,
    pub operations: usize,
    pub wrappers: usize,
    pub faults: usize,
    pub types_emitted: usize,
    /// `WebService` types that are not interfaces.
    pub skipped_services: Vec<String>,
    /// `Interface.method` pairs skipped as overloads.
    pub skipped_operations: Vec<String>,
}

// ── Synthesizer ─────────────────────────────────────────────────────────

/// Drives one build pass: every `WebService` interface in the index, every
/// operation of each, against the registries of a [`BuildSession`].
pub struct Synthesizer<'a> {
    index: &'a MetadataIndex,
    config: SynthConfig,
    companions: &'a dyn CompanionLookup,
}

impl<'a> Synthesizer<'a> {
    pub fn new(index: &'a MetadataIndex, config: SynthConfig) -> Self {
        Synthesizer {
            index,
            config,
            companions: index,
        }
    }

    /// Use a different companion lookup than the metadata index.
    pub fn with_companions(mut self, companions: &'a dyn CompanionLookup) -> Self {
        self.companions = companions;
        self
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Synthesize every type for one interface without emitting anything.
    pub fn synthesize_interface(
        &self,
        session: &mut BuildSession,
        name: &str,
    ) -> Result<InterfaceOutput, SynthesisError> {
        let iface = extract_interface(self.index, name)?;
        let package = self.config.generated_package(iface.package());
        let namespace = iface.namespace();

        let package_info = if session.packages.insert(package.clone()) {
            Some(PackageInfo {
                name: format!("{package}.{PACKAGE_INFO}"),
                package: package.clone(),
                namespace: namespace.clone(),
            })
        } else {
            None
        };

        let scope = WrapperScope {
            index: self.index,
            package: &package,
            namespace: &namespace,
            config: &self.config,
        };

        let mut operations = Vec::new();
        let mut faults = Vec::new();
        let mut skipped = Vec::new();

        for op in &iface.operations {
            faults.extend(synthesize_faults(
                &op.exceptions,
                &package,
                &self.config,
                &mut session.faults,
            ));

            let request_name = format!(
                "{package}.{}",
                scope.wrapper_name(op, WrapperKind::Request)
            );
            let response_name = format!(
                "{package}.{}",
                scope.wrapper_name(op, WrapperKind::Response)
            );
            if let Some(claim) = session.wrappers.get(&request_name) {
                if claim.kind == WrapperKind::Request {
                    debug!(
                        interface = %name,
                        operation = %op.method_name,
                        "Wrapper already generated, skipping overload"
                    );
                    skipped.push(op.method_name.clone());
                    continue;
                }
            }
            for (wrapper_name, kind) in [
                (&request_name, WrapperKind::Request),
                (&response_name, WrapperKind::Response),
            ] {
                if let Some(claim) = session.wrappers.get(wrapper_name) {
                    return Err(SynthesisError::malformed(
                        &op.method_name,
                        format!(
                            "wrapper '{wrapper_name}' collides with the {:?} wrapper of operation '{}'",
                            claim.kind, claim.operation
                        ),
                    ));
                }
                session.wrappers.insert(
                    wrapper_name.clone(),
                    WrapperClaim {
                        operation: op.method_name.clone(),
                        kind,
                    },
                );
            }

            operations.push(self.synthesize_operation(session, &scope, op)?);
        }

        info!(
            interface = %name,
            package = %package,
            operations = operations.len(),
            faults = faults.len(),
            "Synthesized service interface"
        );

        Ok(InterfaceOutput {
            interface: name.to_string(),
            package,
            namespace,
            package_info,
            operations,
            faults,
            skipped,
        })
    }

    fn synthesize_operation(
        &self,
        session: &mut BuildSession,
        scope: &WrapperScope<'_>,
        op: &OperationDescriptor,
    ) -> Result<OperationOutput, SynthesisError> {
        let request = synthesize_request(scope, op)?;
        let response = synthesize_response(scope, op)?;
        Ok(OperationOutput {
            operation: op.method_name.clone(),
            request: self.bundle(session, request)?,
            response: self.bundle(session, response)?,
        })
    }

    fn bundle(
        &self,
        session: &mut BuildSession,
        wrapper: SynthesizedWrapperType,
    ) -> Result<WrapperBundle, SynthesisError> {
        let adapter = synthesize_adapter(
            &wrapper,
            self.index,
            self.companions,
            &self.config,
            &mut session.names,
        )?;
        let factory = synthesize_factory(&wrapper, &self.config);
        Ok(WrapperBundle {
            wrapper,
            adapter,
            factory,
        })
    }

    /// Run a full pass: reset the session, synthesize every service
    /// interface and hand the results to `emitter` and `registrar`.
    ///
    /// Each interface is fully synthesized before any of its types is
    /// emitted, so a failing interface contributes nothing.
    pub fn run(
        &self,
        session: &mut BuildSession,
        emitter: &mut dyn TypeEmitter,
        registrar: &mut dyn Registrar,
    ) -> Result<BuildReport, SynthesisError> {
        session.reset();
        let mut report = BuildReport::default();
        let mut emitted = HashSet::new();

        for service in self.index.web_services() {
            registrar.register(&service.name);
            if service.kind != TypeKind::Interface {
                warn!(
                    service = %service.name,
                    kind = ?service.kind,
                    "WebService type is not an interface, no wrappers generated"
                );
                report.skipped_services.push(service.name.clone());
                continue;
            }

            let output = self.synthesize_interface(session, &service.name)?;
            let defs = output.type_defs();
            for def in &defs {
                if !emitted.insert(def.name.clone()) {
                    return Err(SynthesisError::Emit(format!(
                        "type '{}' synthesized twice",
                        def.name
                    )));
                }
            }

            for def in defs {
                let type_name = def.name.clone();
                emitter.emit(def)?;
                registrar.register(&type_name);
                report.types_emitted += 1;
            }
            for companion in output.companions() {
                registrar.register(companion);
            }

            report.interfaces += 1;
            report.operations += output.operations.len();
            report.wrappers += output.operations.len() * 2;
            report.faults += output.faults.len();
            report.skipped_operations.extend(
                output
                    .skipped
                    .iter()
                    .map(|m| format!("{}.{m}", output.interface)),
            );
        }

        info!(
            interfaces = report.interfaces,
            wrappers = report.wrappers,
            faults = report.faults,
            types = report.types_emitted,
            "Build pass complete"
        );
        Ok(report)
    }
}
