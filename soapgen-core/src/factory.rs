use serde::Serialize;

use crate::config::SynthConfig;
use crate::emit::{MethodDef, Op, Operand, TypeDef};
use crate::types::TypeRef;
use crate::wrapper::SynthesizedWrapperType;

/// `<Wrapper>Factory` with a single `create<Wrapper>()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedFactory {
    pub name: String,
    pub wrapper: String,
    pub method: String,
    /// Number of null arguments passed to the wrapper constructor.
    pub ctor_arity: usize,
}

pub fn synthesize_factory(
    wrapper: &SynthesizedWrapperType,
    config: &SynthConfig,
) -> SynthesizedFactory {
    let qualified = wrapper.qualified_name();
    SynthesizedFactory {
        name: format!("{qualified}{}", config.factory_suffix),
        method: format!("create{}", wrapper.name),
        wrapper: qualified,
        // wrappers only have the nullary constructor
        ctor_arity: 0,
    }
}

impl SynthesizedFactory {
    pub fn type_def(&self) -> TypeDef {
        let mut def = TypeDef::new(&self.name);
        def.methods
            .push(MethodDef::constructor(Vec::new(), vec![Op::Return { value: None }]));
        def.methods.push(MethodDef::instance(
            &self.method,
            Vec::new(),
            TypeRef::named(&self.wrapper),
            vec![
                Op::Allocate {
                    dst: 0,
                    ty: self.wrapper.clone(),
                    args: vec![Operand::null(); self.ctor_arity],
                },
                Op::Return {
                    value: Some(Operand::Local(0)),
                },
            ],
        ));
        def
    }
}
