use soapgen_core::meta::{
    ElementTag, MetadataIndex, MethodInfo, ParamInfo, TypeInfo, WEB_FAULT, WEB_SERVICE,
};
use soapgen_core::{
    BuildSession, ManifestEmitter, RecordingRegistrar, SynthConfig, SynthesisError, Synthesizer,
    TypeRef,
};

fn ty(s: &str) -> TypeRef {
    TypeRef::parse(s).unwrap()
}

fn web_service() -> ElementTag {
    ElementTag::new(WEB_SERVICE)
}

fn greeter() -> TypeInfo {
    TypeInfo::interface("org.acme.Greeter")
        .with_tag(web_service())
        .with_method(
            MethodInfo::new("ping")
                .param(ParamInfo::new(ty("string")).named("text"))
                .returns(ty("string")),
        )
}

fn run(
    index: &MetadataIndex,
    config: SynthConfig,
) -> (
    Result<soapgen_core::BuildReport, SynthesisError>,
    ManifestEmitter,
    RecordingRegistrar,
) {
    let mut session = BuildSession::new();
    let mut emitter = ManifestEmitter::new();
    let mut registrar = RecordingRegistrar::new();
    let result = Synthesizer::new(index, config).run(&mut session, &mut emitter, &mut registrar);
    (result, emitter, registrar)
}

#[test]
fn test_ping_end_to_end() {
    let index = MetadataIndex::new(vec![greeter()]).unwrap();
    let config = SynthConfig {
        request_suffix: "Request".into(),
        ..SynthConfig::default()
    };
    let (report, emitter, registrar) = run(&index, config);
    let report = report.unwrap();

    assert_eq!(report.interfaces, 1);
    assert_eq!(report.wrappers, 2);
    // package-info + (wrapper, adapter, factory) x 2
    assert_eq!(report.types_emitted, 7);

    let request = emitter.get("org.acme.jaxws_asm.PingRequest").unwrap();
    assert_eq!(request.fields.len(), 1);
    assert_eq!(request.fields[0].name, "text");
    assert_eq!(request.fields[0].ty, ty("string"));
    let tag = &request.method("getText").unwrap().tags[0];
    assert_eq!(tag.name, "XmlElement");
    assert_eq!(tag.values["name"], "text");
    assert_eq!(tag.values["namespace"], "");

    let response = emitter.get("org.acme.jaxws_asm.PingResponse").unwrap();
    assert_eq!(response.fields.len(), 1);
    assert_eq!(response.fields[0].name, "_return");
    assert!(response.method("getReturn").is_some());

    assert!(emitter.get("org.acme.jaxws_asm.PingRequest_Adapter1").is_some());
    assert!(emitter.get("org.acme.jaxws_asm.PingResponse_Adapter1").is_some());
    assert!(emitter.get("org.acme.jaxws_asm.PingRequestFactory").is_some());

    let info = emitter.get("org.acme.jaxws_asm.package-info").unwrap();
    assert_eq!(info.tags[0].name, "XmlSchema");
    assert_eq!(info.tags[0].values["namespace"], "http://acme.org/");
    assert_eq!(info.tags[0].values["elementFormDefault"], "QUALIFIED");

    assert_eq!(registrar.names()[0], "org.acme.Greeter");
    assert_eq!(registrar.names().len(), 8);
}

#[test]
fn test_inspect_interface_without_emitting() {
    let index = MetadataIndex::new(vec![greeter()]).unwrap();
    let synth = Synthesizer::new(&index, SynthConfig::default());
    let output = synth
        .synthesize_interface(&mut BuildSession::new(), "org.acme.Greeter")
        .unwrap();

    let ping = output.operation("ping").unwrap();
    assert_eq!(ping.request.wrapper.name, "Ping");
    assert_eq!(ping.request.adapter.fingerprint, "1:getText/string,");
    assert_eq!(ping.response.adapter.fingerprint, "1:getReturn/string,");
    assert_eq!(output.namespace, "http://acme.org/");
}

#[test]
fn test_target_namespace_overrides_package() {
    let service = TypeInfo::interface("org.acme.Greeter")
        .with_tag(web_service().with("targetNamespace", "urn:greeter"))
        .with_method(MethodInfo::new("hello"));
    let index = MetadataIndex::new(vec![service]).unwrap();
    let (_, emitter, _) = run(&index, SynthConfig::default());

    let wrapper = emitter.get("org.acme.jaxws_asm.Hello").unwrap();
    let root = wrapper.tags.iter().find(|t| t.name == "XmlRootElement").unwrap();
    assert_eq!(root.values["namespace"], "urn:greeter");
    assert_eq!(root.values["name"], "hello");
}

#[test]
fn test_fault_types_are_deduplicated() {
    let boom = TypeInfo::exception("org.acme.BoomException").with_fault_info(ty("org.acme.Detail"));
    let renamed = TypeInfo::exception("org.acme.other.BoomException")
        .with_tag(ElementTag::new(WEB_FAULT).with("name", "BoomException_Exception"));
    let service = TypeInfo::interface("org.acme.Blaster")
        .with_tag(web_service())
        .with_method(MethodInfo::new("fire").throws(ty("org.acme.BoomException")))
        .with_method(
            MethodInfo::new("reload")
                .throws(ty("org.acme.BoomException"))
                .throws(ty("org.acme.BoomException")),
        )
        .with_method(MethodInfo::new("aim").throws(ty("org.acme.other.BoomException")));
    let index = MetadataIndex::new(vec![
        service,
        boom,
        renamed,
        TypeInfo::class("org.acme.Detail"),
    ])
    .unwrap();

    let (report, emitter, _) = run(&index, SynthConfig::default());
    assert_eq!(report.unwrap().faults, 1);

    let fault = emitter
        .get("org.acme.jaxws_asm.BoomException_Exception")
        .unwrap();
    assert_eq!(fault.supertype.as_deref(), Some("Exception"));
    assert_eq!(fault.fields[0].name, "faultInfo");
    assert_eq!(fault.fields[0].ty, ty("org.acme.Detail"));
    assert_eq!(fault.constructor().unwrap().params.len(), 2);
    assert!(fault.method("getFaultInfo").is_some());
}

#[test]
fn test_web_fault_name_overrides_default() {
    let service = TypeInfo::interface("org.acme.Blaster")
        .with_tag(web_service())
        .with_method(MethodInfo::new("fire").throws(ty("org.acme.Misfire")));
    let misfire = TypeInfo::exception("org.acme.Misfire")
        .with_tag(ElementTag::new(WEB_FAULT).with("name", "MisfireFault"));
    let index = MetadataIndex::new(vec![service, misfire]).unwrap();

    let (_, emitter, _) = run(&index, SynthConfig::default());
    let fault = emitter.get("org.acme.jaxws_asm.MisfireFault").unwrap();
    // no fault info declared: the exception type itself is the payload
    assert_eq!(fault.fields[0].ty, ty("org.acme.Misfire"));
}

#[test]
fn test_overloads_are_skipped() {
    let service = TypeInfo::interface("org.acme.Greeter")
        .with_tag(web_service())
        .with_method(MethodInfo::new("greet").param(ParamInfo::new(ty("string"))))
        .with_method(MethodInfo::new("greet").param(ParamInfo::new(ty("int"))));
    let index = MetadataIndex::new(vec![service]).unwrap();

    let (report, emitter, _) = run(&index, SynthConfig::default());
    let report = report.unwrap();
    assert_eq!(report.operations, 1);
    assert_eq!(report.skipped_operations, vec!["org.acme.Greeter.greet"]);

    let greet = emitter.get("org.acme.jaxws_asm.Greet").unwrap();
    assert_eq!(greet.fields[0].ty, ty("string"));
}

#[test]
fn test_non_interface_service_is_registered_only() {
    let service = TypeInfo::class("org.acme.GreeterImpl")
        .with_tag(web_service())
        .with_method(MethodInfo::new("ping"));
    let index = MetadataIndex::new(vec![service]).unwrap();

    let (report, emitter, registrar) = run(&index, SynthConfig::default());
    assert_eq!(report.unwrap().skipped_services, vec!["org.acme.GreeterImpl"]);
    assert!(emitter.types().is_empty());
    assert!(registrar.contains("org.acme.GreeterImpl"));
}

#[test]
fn test_failing_interface_emits_nothing() {
    let broken = TypeInfo::interface("org.acme.Broken")
        .with_tag(web_service())
        .with_method(MethodInfo::new("ok"))
        .with_method(MethodInfo::new("bad").param(ParamInfo::new(ty("org.acme.Missing"))));
    let index = MetadataIndex::new(vec![greeter(), broken]).unwrap();

    let (result, emitter, _) = run(&index, SynthConfig::default());
    assert!(matches!(
        result,
        Err(SynthesisError::UnresolvedType { ref operation, .. }) if operation == "bad"
    ));
    assert!(emitter.get("org.acme.jaxws_asm.Ping").is_some());
    assert!(emitter.get("org.acme.jaxws_asm.Ok").is_none());
}

#[test]
fn test_response_wrapper_name_clash_fails_before_emitting() {
    let clash = TypeInfo::interface("org.acme.Lookup")
        .with_tag(web_service())
        .with_method(MethodInfo::new("get").param(ParamInfo::new(ty("string")).named("key")))
        .with_method(
            MethodInfo::new("getResponse").param(ParamInfo::new(ty("int")).named("code")),
        );
    let index = MetadataIndex::new(vec![greeter(), clash]).unwrap();

    let (result, emitter, _) = run(&index, SynthConfig::default());
    match result {
        Err(SynthesisError::MalformedOperation { operation, reason }) => {
            assert_eq!(operation, "getResponse");
            assert!(reason.contains("org.acme.jaxws_asm.GetResponse"));
            assert!(reason.contains("'get'"));
        }
        other => panic!("expected MalformedOperation, got {other:?}"),
    }
    assert!(emitter.get("org.acme.jaxws_asm.Ping").is_some());
    assert!(emitter.get("org.acme.jaxws_asm.Get").is_none());
    assert!(emitter.get("org.acme.jaxws_asm.GetResponse").is_none());
    assert!(emitter.get("org.acme.jaxws_asm.Get_Adapter1").is_none());
}

#[test]
fn test_response_name_taken_by_earlier_request_fails() {
    let clash = TypeInfo::interface("org.acme.Lookup")
        .with_tag(web_service())
        .with_method(MethodInfo::new("getResponse"))
        .with_method(MethodInfo::new("get"));
    let index = MetadataIndex::new(vec![clash]).unwrap();

    let (result, emitter, _) = run(&index, SynthConfig::default());
    assert!(matches!(
        result,
        Err(SynthesisError::MalformedOperation { ref operation, .. }) if operation == "get"
    ));
    assert!(emitter.types().is_empty());
}

#[test]
fn test_fault_named_like_a_wrapper_fails_before_emitting() {
    let service = TypeInfo::interface("org.acme.Lookup")
        .with_tag(web_service())
        .with_method(MethodInfo::new("get").throws(ty("org.acme.Gone")));
    let gone = TypeInfo::exception("org.acme.Gone")
        .with_tag(ElementTag::new(WEB_FAULT).with("name", "Get"));
    let index = MetadataIndex::new(vec![service, gone]).unwrap();

    let (result, emitter, _) = run(&index, SynthConfig::default());
    assert!(matches!(
        result,
        Err(SynthesisError::Emit(ref msg)) if msg.contains("org.acme.jaxws_asm.Get")
    ));
    assert!(emitter.types().is_empty());
}

#[test]
fn test_package_info_emitted_once_per_package() {
    let other = TypeInfo::interface("org.acme.Farewell")
        .with_tag(web_service())
        .with_method(MethodInfo::new("bye"));
    let index = MetadataIndex::new(vec![greeter(), other]).unwrap();

    let (_, emitter, _) = run(&index, SynthConfig::default());
    let infos = emitter
        .types()
        .iter()
        .filter(|t| t.name.ends_with("package-info"))
        .count();
    assert_eq!(infos, 1);
}

#[test]
fn test_session_is_reset_between_runs() {
    let index = MetadataIndex::new(vec![greeter()]).unwrap();
    let synth = Synthesizer::new(&index, SynthConfig::default());
    let mut session = BuildSession::new();

    for _ in 0..2 {
        let mut emitter = ManifestEmitter::new();
        synth
            .run(&mut session, &mut emitter, &mut RecordingRegistrar::new())
            .unwrap();
        assert!(emitter.get("org.acme.jaxws_asm.Ping_Adapter1").is_some());
        assert!(emitter.get("org.acme.jaxws_asm.Ping_Adapter2").is_none());
    }
}

#[test]
fn test_companion_registered_for_reflection() {
    let index = MetadataIndex::new(vec![
        greeter(),
        TypeInfo::class("org.acme.jaxws_asm.ObjectFactory"),
    ])
    .unwrap();
    let (_, _, registrar) = run(&index, SynthConfig::default());
    assert!(registrar.contains("org.acme.jaxws_asm.ObjectFactory"));
}

#[test]
fn test_manifest_serializes() {
    let index = MetadataIndex::new(vec![greeter()]).unwrap();
    let (_, emitter, _) = run(&index, SynthConfig::default());
    let json = emitter.to_json().unwrap();
    let parsed: Vec<soapgen_core::TypeDef> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), emitter.types().len());
}
