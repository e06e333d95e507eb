use serde::Serialize;
use tracing::debug;

use crate::config::SynthConfig;
use crate::emit::{intrinsics, CompanionLookup, Constant, FieldDef, MethodDef, Op, Operand, TypeDef};
use crate::error::SynthesisError;
use crate::meta::{Classification, MetadataIndex};
use crate::registry::NameRegistry;
use crate::types::{self, TypeRef};
use crate::wrapper::SynthesizedWrapperType;

/// Capability advertised by every adapter type.
pub const WRAPPER_ADAPTER: &str = "WrapperAdapter";

pub const FINGERPRINT: &str = "fingerprint";
pub const CONSTRUCT: &str = "construct";
pub const POPULATE: &str = "populate";
pub const DECOMPOSE: &str = "decompose";
pub const FACTORY_FIELD: &str = "factory";

/// How one ordered value is stored into the wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConstructStep {
    /// Read the current list; assign when null, otherwise append all.
    MergeList { getter: String, setter: String },
    /// Holder-typed field: the value arrives already unwrapped and is
    /// assigned as-is.
    PassHolder { setter: String },
    Assign { setter: String },
}

/// How one field is read back into the ordered value sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DecomposeStep {
    Read { getter: String },
    /// Holder-typed getter: non-null holders contribute their payload.
    UnwrapHolder { getter: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedAdapter {
    pub name: String,
    /// Qualified name of the wrapper this adapter is bound to.
    pub wrapper: String,
    pub fingerprint: String,
    /// Companion factory allocated by the adapter's constructor, if present.
    pub object_factory: Option<String>,
    pub construct: Vec<ConstructStep>,
    pub decompose: Vec<DecomposeStep>,
}

/// `"<setterCount>:"` followed by `"<getter>/<returnType>,"` per index.
pub fn fingerprint(wrapper: &SynthesizedWrapperType) -> String {
    let mut out = format!("{}:", wrapper.setters().len());
    for field in &wrapper.fields {
        out.push_str(&field.getter);
        out.push('/');
        out.push_str(&field.declared_type.to_string());
        out.push(',');
    }
    out
}

/// Turn a classification into a decision, honouring strictness.
fn decide(
    classification: Classification,
    ty: &TypeRef,
    config: &SynthConfig,
) -> Result<bool, SynthesisError> {
    match classification {
        Classification::Yes => Ok(true),
        Classification::No => Ok(false),
        Classification::Unknown if config.strict_classification => {
            Err(SynthesisError::UnknownClassification {
                type_name: ty.to_string(),
            })
        }
        Classification::Unknown => {
            debug!(type_name = %ty, "Unclassifiable type, using direct assignment");
            Ok(false)
        }
    }
}

pub fn synthesize_adapter(
    wrapper: &SynthesizedWrapperType,
    index: &MetadataIndex,
    companions: &dyn CompanionLookup,
    config: &SynthConfig,
    names: &mut NameRegistry,
) -> Result<SynthesizedAdapter, SynthesisError> {
    let mut construct = Vec::with_capacity(wrapper.fields.len());
    let mut decompose = Vec::with_capacity(wrapper.fields.len());

    for field in &wrapper.fields {
        let ty = &field.declared_type;
        let is_list = decide(index.classify_list(ty), ty, config)?;
        let is_holder = !is_list && decide(index.classify_holder(ty), ty, config)?;

        construct.push(if is_list {
            ConstructStep::MergeList {
                getter: field.getter.clone(),
                setter: field.setter.clone(),
            }
        } else if is_holder {
            ConstructStep::PassHolder {
                setter: field.setter.clone(),
            }
        } else {
            ConstructStep::Assign {
                setter: field.setter.clone(),
            }
        });
        decompose.push(if is_holder {
            DecomposeStep::UnwrapHolder {
                getter: field.getter.clone(),
            }
        } else {
            DecomposeStep::Read {
                getter: field.getter.clone(),
            }
        });
    }

    let companion = config.companion_for(&wrapper.package);
    let object_factory = if companions.has_companion(&companion) {
        Some(companion)
    } else {
        debug!(companion = %companion, "No companion factory");
        None
    };

    let qualified = wrapper.qualified_name();
    let name = names.allocate(&qualified, &config.adapter_suffix);
    let fingerprint = fingerprint(wrapper);

    debug!(adapter = %name, fingerprint = %fingerprint, "Synthesized adapter");

    Ok(SynthesizedAdapter {
        name,
        wrapper: qualified,
        fingerprint,
        object_factory,
        construct,
        decompose,
    })
}

impl SynthesizedAdapter {
    pub fn type_def(&self) -> TypeDef {
        let wrapper_ty = TypeRef::named(&self.wrapper);
        let list_ty = TypeRef::generic(types::LIST, vec![TypeRef::named("any")]);

        let mut def = TypeDef::new(&self.name);
        def.capabilities.push(WRAPPER_ADAPTER.to_string());

        let mut ctor = Vec::new();
        if let Some(factory) = &self.object_factory {
            def.fields.push(FieldDef {
                name: FACTORY_FIELD.to_string(),
                ty: TypeRef::named(factory),
            });
            ctor.push(Op::Allocate {
                dst: 0,
                ty: factory.clone(),
                args: Vec::new(),
            });
            ctor.push(Op::WriteField {
                object: Operand::This,
                field: FACTORY_FIELD.to_string(),
                value: Operand::Local(0),
            });
        }
        ctor.push(Op::Return { value: None });
        def.methods.push(MethodDef::constructor(Vec::new(), ctor));

        def.methods.push(MethodDef::instance(
            FINGERPRINT,
            Vec::new(),
            TypeRef::named("string"),
            vec![Op::Return {
                value: Some(Operand::Const(Constant::Str(self.fingerprint.clone()))),
            }],
        ));

        def.methods.push(MethodDef::instance(
            CONSTRUCT,
            vec![list_ty.clone()],
            wrapper_ty.clone(),
            vec![
                Op::Allocate {
                    dst: 0,
                    ty: self.wrapper.clone(),
                    args: Vec::new(),
                },
                Op::invoke(
                    None,
                    Operand::This,
                    &self.name,
                    POPULATE,
                    vec![Operand::Local(0), Operand::Param(0)],
                ),
                Op::Return {
                    value: Some(Operand::Local(0)),
                },
            ],
        ));

        def.methods.push(MethodDef::instance(
            POPULATE,
            vec![wrapper_ty.clone(), list_ty.clone()],
            TypeRef::void(),
            self.populate_body(),
        ));

        def.methods.push(MethodDef::instance(
            DECOMPOSE,
            vec![wrapper_ty],
            list_ty,
            self.decompose_body(),
        ));

        def
    }

    // Param(0) is the wrapper, Param(1) the ordered values.
    fn populate_body(&self) -> Vec<Op> {
        let mut body = Vec::new();
        let mut slot = 0usize;
        for (i, step) in self.construct.iter().enumerate() {
            let value = slot;
            slot += 1;
            body.push(Op::invoke(
                Some(value),
                Operand::Param(1),
                intrinsics::LIST_TYPE,
                intrinsics::LIST_GET,
                vec![Operand::int(i as i64)],
            ));
            let assign = |setter: &str| {
                Op::invoke(
                    None,
                    Operand::Param(0),
                    &self.wrapper,
                    setter,
                    vec![Operand::Local(value)],
                )
            };
            match step {
                ConstructStep::MergeList { getter, setter } => {
                    let current = slot;
                    slot += 1;
                    body.push(Op::invoke(
                        Some(current),
                        Operand::Param(0),
                        &self.wrapper,
                        getter,
                        Vec::new(),
                    ));
                    body.push(Op::BranchOnNull {
                        value: Operand::Local(current),
                        then: vec![assign(setter.as_str())],
                        otherwise: vec![Op::invoke(
                            None,
                            Operand::Local(current),
                            intrinsics::LIST_TYPE,
                            intrinsics::LIST_ADD_ALL,
                            vec![Operand::Local(value)],
                        )],
                    });
                }
                ConstructStep::PassHolder { setter } | ConstructStep::Assign { setter } => {
                    body.push(assign(setter.as_str()));
                }
            }
        }
        body.push(Op::Return { value: None });
        body
    }

    // Param(0) is the wrapper; Local(0) the result list.
    fn decompose_body(&self) -> Vec<Op> {
        let push = |value: usize| {
            Op::invoke(
                None,
                Operand::Local(0),
                intrinsics::LIST_TYPE,
                intrinsics::LIST_PUSH,
                vec![Operand::Local(value)],
            )
        };

        let mut body = vec![Op::Allocate {
            dst: 0,
            ty: intrinsics::LIST_TYPE.to_string(),
            args: vec![Operand::int(self.decompose.len() as i64)],
        }];
        let mut slot = 1usize;
        for step in &self.decompose {
            let value = slot;
            slot += 1;
            let getter = match step {
                DecomposeStep::Read { getter } | DecomposeStep::UnwrapHolder { getter } => getter,
            };
            body.push(Op::invoke(
                Some(value),
                Operand::Param(0),
                &self.wrapper,
                getter,
                Vec::new(),
            ));
            match step {
                DecomposeStep::Read { .. } => body.push(push(value)),
                DecomposeStep::UnwrapHolder { .. } => {
                    let payload = slot;
                    slot += 1;
                    body.push(Op::BranchOnNull {
                        value: Operand::Local(value),
                        then: vec![push(value)],
                        otherwise: vec![
                            Op::invoke(
                                Some(payload),
                                Operand::Local(value),
                                intrinsics::HOLDER_TYPE,
                                intrinsics::HOLDER_VALUE,
                                Vec::new(),
                            ),
                            push(payload),
                        ],
                    });
                }
            }
        }
        body.push(Op::Return {
            value: Some(Operand::Local(0)),
        });
        body
    }
}
