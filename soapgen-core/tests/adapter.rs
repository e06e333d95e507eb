use soapgen_core::adapter::{CONSTRUCT, DECOMPOSE, FACTORY_FIELD, POPULATE, WRAPPER_ADAPTER};
use soapgen_core::meta::{MetadataIndex, TypeInfo, TypeKind};
use soapgen_core::wrapper::SynthesizedField;
use soapgen_core::{
    fingerprint, synthesize_adapter, synthesize_factory, ConstructStep, DecomposeStep,
    NameRegistry, Op, SynthConfig, SynthesisError, SynthesizedWrapperType, TypeRef, WrapperKind,
};

fn ty(s: &str) -> TypeRef {
    TypeRef::parse(s).unwrap()
}

fn field(wire: &str, t: &str) -> SynthesizedField {
    let ident = soapgen_core::naming::to_field_identifier(wire);
    SynthesizedField {
        name: ident,
        wire_name: wire.to_string(),
        namespace: String::new(),
        declared_type: ty(t),
        getter: soapgen_core::naming::getter_identifier(wire),
        setter: soapgen_core::naming::setter_identifier(wire),
        getter_tags: Vec::new(),
    }
}

fn wrapper(name: &str, fields: Vec<SynthesizedField>) -> SynthesizedWrapperType {
    SynthesizedWrapperType {
        name: name.to_string(),
        package: "org.acme.jaxws_asm".to_string(),
        namespace: "http://acme.org/".to_string(),
        element_name: name.to_string(),
        kind: WrapperKind::Request,
        fields,
    }
}

fn index() -> MetadataIndex {
    MetadataIndex::new(vec![
        TypeInfo::class("org.acme.Fruit"),
        TypeInfo::new("org.acme.Basket", TypeKind::List),
        TypeInfo::new("org.acme.Blob", TypeKind::Opaque),
    ])
    .unwrap()
}

#[test]
fn test_fingerprint_format() {
    let w = wrapper("Ping", vec![field("text", "string"), field("count", "int")]);
    assert_eq!(fingerprint(&w), "2:getText/string,getCount/int,");
}

#[test]
fn test_fingerprint_equal_for_same_shape() {
    let a = wrapper("Ping", vec![field("text", "string")]);
    let b = wrapper("Echo", vec![field("text", "string")]);
    assert_eq!(fingerprint(&a), fingerprint(&b));

    let c = wrapper("Echo", vec![field("text", "int")]);
    assert_ne!(fingerprint(&a), fingerprint(&c));
    let d = wrapper("Echo", vec![field("body", "string")]);
    assert_ne!(fingerprint(&a), fingerprint(&d));

    let ordered = wrapper("Ping", vec![field("text", "string"), field("count", "int")]);
    let swapped = wrapper("Ping", vec![field("count", "int"), field("text", "string")]);
    assert_ne!(fingerprint(&ordered), fingerprint(&swapped));
}

#[test]
fn test_steps_follow_classification() {
    let index = index();
    let w = wrapper(
        "Pack",
        vec![
            field("items", "list<org.acme.Fruit>"),
            field("basket", "org.acme.Basket"),
            field("label", "holder<string>"),
            field("fruit", "org.acme.Fruit"),
        ],
    );
    let mut names = NameRegistry::new();
    let adapter =
        synthesize_adapter(&w, &index, &index, &SynthConfig::default(), &mut names).unwrap();

    assert_eq!(
        adapter.construct,
        vec![
            ConstructStep::MergeList {
                getter: "getItems".into(),
                setter: "setItems".into()
            },
            ConstructStep::MergeList {
                getter: "getBasket".into(),
                setter: "setBasket".into()
            },
            ConstructStep::PassHolder {
                setter: "setLabel".into()
            },
            ConstructStep::Assign {
                setter: "setFruit".into()
            },
        ]
    );
    assert_eq!(
        adapter.decompose,
        vec![
            DecomposeStep::Read {
                getter: "getItems".into()
            },
            DecomposeStep::Read {
                getter: "getBasket".into()
            },
            DecomposeStep::UnwrapHolder {
                getter: "getLabel".into()
            },
            DecomposeStep::Read {
                getter: "getFruit".into()
            },
        ]
    );
}

#[test]
fn test_unknown_classification_degrades_by_default() {
    let index = index();
    let w = wrapper("Store", vec![field("blob", "org.acme.Blob")]);
    let mut names = NameRegistry::new();
    let adapter =
        synthesize_adapter(&w, &index, &index, &SynthConfig::default(), &mut names).unwrap();
    assert_eq!(
        adapter.construct,
        vec![ConstructStep::Assign {
            setter: "setBlob".into()
        }]
    );
}

#[test]
fn test_unknown_classification_is_fatal_when_strict() {
    let index = index();
    let w = wrapper("Store", vec![field("blob", "org.acme.Blob")]);
    let config = SynthConfig {
        strict_classification: true,
        ..SynthConfig::default()
    };
    let err = synthesize_adapter(&w, &index, &index, &config, &mut NameRegistry::new())
        .unwrap_err();
    assert_eq!(
        err,
        SynthesisError::UnknownClassification {
            type_name: "org.acme.Blob".into()
        }
    );
}

#[test]
fn test_adapter_names_count_up() {
    let index = index();
    let w = wrapper("Ping", vec![field("text", "string")]);
    let mut names = NameRegistry::new();
    let config = SynthConfig::default();

    let first = synthesize_adapter(&w, &index, &index, &config, &mut names).unwrap();
    let second = synthesize_adapter(&w, &index, &index, &config, &mut names).unwrap();
    assert_eq!(first.name, "org.acme.jaxws_asm.Ping_Adapter1");
    assert_eq!(second.name, "org.acme.jaxws_asm.Ping_Adapter2");
}

#[test]
fn test_companion_factory_is_allocated_when_present() {
    let index = MetadataIndex::new(vec![TypeInfo::class("org.acme.jaxws_asm.ObjectFactory")])
        .unwrap();
    let w = wrapper("Ping", vec![field("text", "string")]);
    let adapter = synthesize_adapter(
        &w,
        &index,
        &index,
        &SynthConfig::default(),
        &mut NameRegistry::new(),
    )
    .unwrap();
    assert_eq!(
        adapter.object_factory.as_deref(),
        Some("org.acme.jaxws_asm.ObjectFactory")
    );

    let def = adapter.type_def();
    assert!(def.field(FACTORY_FIELD).is_some());
    let ctor = def.constructor().unwrap();
    assert!(matches!(&ctor.body[0], Op::Allocate { ty, .. } if ty == "org.acme.jaxws_asm.ObjectFactory"));
}

#[test]
fn test_companion_absence_is_silent() {
    let index = index();
    let w = wrapper("Ping", vec![field("text", "string")]);
    let adapter = synthesize_adapter(
        &w,
        &index,
        &index,
        &SynthConfig::default(),
        &mut NameRegistry::new(),
    )
    .unwrap();
    assert!(adapter.object_factory.is_none());
    assert!(adapter.type_def().fields.is_empty());
}

#[test]
fn test_adapter_type_def_shape() {
    let index = index();
    let w = wrapper("Ping", vec![field("text", "string")]);
    let adapter = synthesize_adapter(
        &w,
        &index,
        &index,
        &SynthConfig::default(),
        &mut NameRegistry::new(),
    )
    .unwrap();
    let def = adapter.type_def();

    assert!(def.has_capability(WRAPPER_ADAPTER));
    for method in [CONSTRUCT, POPULATE, DECOMPOSE, "fingerprint"] {
        assert!(def.method(method).is_some(), "missing {method}");
    }
    assert_eq!(def.method(POPULATE).unwrap().params.len(), 2);
}

#[test]
fn test_factory_creates_through_nullary_constructor() {
    let w = wrapper("PingResponse", vec![field("return", "string")]);
    let factory = synthesize_factory(&w, &SynthConfig::default());
    assert_eq!(factory.name, "org.acme.jaxws_asm.PingResponseFactory");
    assert_eq!(factory.method, "createPingResponse");

    let def = factory.type_def();
    let create = def.method("createPingResponse").unwrap();
    assert!(matches!(
        &create.body[0],
        Op::Allocate { ty, args, .. } if ty == "org.acme.jaxws_asm.PingResponse" && args.is_empty()
    ));
}
