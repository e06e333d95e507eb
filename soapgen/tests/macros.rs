use soapgen::meta::{WEB_METHOD, WEB_PARAM, WEB_RESULT, WEB_SERVICE};
use soapgen::prelude::*;
use soapgen::{extract_interface, Direction, TypeKind};

pub struct Order;
pub struct Rejected;

#[web_service(target_namespace = "urn:orders", name = "OrderDesk")]
pub trait Orders {
    #[web_method(operation_name = "PlaceOrder")]
    #[web_result(name = "id")]
    fn place(&self, #[web_param(name = "sku")] item: String, qty: i32) -> Result<i64, Rejected>;

    fn lookup(&self, id: i64) -> Option<Order>;

    fn annotate(
        &self,
        names: Vec<String>,
        #[web_param(mode = InOut, header)] note: ElementHolder<String>,
        #[tag(XmlElement, name = "when", nillable = true)] _stamp: &str,
    );
}

#[web_service]
pub trait Pinger {
    fn ping(&self, text: String) -> String;
}

struct Desk;

impl Orders for Desk {
    fn place(&self, _item: String, qty: i32) -> Result<i64, Rejected> {
        if qty > 0 {
            Ok(qty as i64)
        } else {
            Err(Rejected)
        }
    }

    fn lookup(&self, _id: i64) -> Option<Order> {
        None
    }

    fn annotate(&self, _names: Vec<String>, _note: ElementHolder<String>, _stamp: &str) {}
}

#[test]
fn test_trait_is_still_usable() {
    let desk = Desk;
    assert_eq!(desk.place("x".into(), 3).ok(), Some(3));
    assert!(desk.place("x".into(), 0).is_err());
    assert!(desk.lookup(1).is_none());
}

#[test]
fn test_interface_is_named_after_module_path() {
    let info = orders_info();
    assert_eq!(info.name, "macros.Orders");
    assert_eq!(info.kind, TypeKind::Interface);

    let service = info.tag(WEB_SERVICE).unwrap();
    assert_eq!(service.value("targetNamespace"), Some("urn:orders"));
    assert_eq!(service.value("name"), Some("OrderDesk"));

    assert!(pinger_info().tag(WEB_SERVICE).unwrap().values.is_empty());
}

#[test]
fn test_method_signatures_are_mapped() {
    let info = orders_info();
    let place = &info.methods[0];
    assert_eq!(place.name, "place");
    assert_eq!(place.params[0].declared_type.to_string(), "string");
    assert_eq!(place.params[0].name.as_deref(), Some("item"));
    assert_eq!(place.params[1].declared_type.to_string(), "int");
    assert_eq!(place.returns.to_string(), "long");
    assert_eq!(place.throws[0].to_string(), "macros.Rejected");
    assert_eq!(
        place.tag(WEB_METHOD).unwrap().value("operationName"),
        Some("PlaceOrder")
    );
    assert_eq!(place.tag(WEB_RESULT).unwrap().value("name"), Some("id"));
    assert_eq!(place.params[0].tag(WEB_PARAM).unwrap().value("name"), Some("sku"));

    let lookup = &info.methods[1];
    assert_eq!(lookup.returns.to_string(), "macros.Order");

    let annotate = &info.methods[2];
    assert!(annotate.returns.is_void());
    assert_eq!(annotate.params[0].declared_type.to_string(), "list<string>");
    assert_eq!(annotate.params[1].declared_type.to_string(), "holder<string>");
    let note = annotate.params[1].tag(WEB_PARAM).unwrap();
    assert_eq!(note.value("mode"), Some("InOut"));
    assert_eq!(note.value("header"), Some("true"));
    // leading underscore is dropped from the declared name
    assert_eq!(annotate.params[2].name.as_deref(), Some("stamp"));
    let element = annotate.params[2].tag("XmlElement").unwrap();
    assert_eq!(element.value("nillable"), Some("true"));
}

#[test]
fn test_metadata_lists_referenced_types() {
    let types = orders_metadata();
    let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["macros.Orders", "macros.Rejected", "macros.Order"]);
    assert_eq!(types[1].kind, TypeKind::Exception);
    assert_eq!(types[2].kind, TypeKind::Class);
}

#[test]
fn test_extracted_descriptor() {
    let index = MetadataIndex::new(orders_metadata()).unwrap();
    let iface = extract_interface(&index, "macros.Orders").unwrap();
    assert_eq!(iface.namespace(), "urn:orders");

    let place = &iface.operations[0];
    assert_eq!(place.effective_operation_name(), "PlaceOrder");
    assert_eq!(place.params[0].wire_name.as_deref(), Some("sku"));
    assert_eq!(place.result.effective_wire_name(), "id");
    assert_eq!(place.exceptions.len(), 1);

    let annotate = &iface.operations[2];
    assert_eq!(annotate.params[1].direction, Direction::InOut);
    assert!(annotate.params[1].header);
}

#[test]
fn test_full_pass_from_annotated_trait() {
    let index = MetadataIndex::new(orders_metadata()).unwrap();
    let mut emitter = ManifestEmitter::new();
    let mut registrar = RecordingRegistrar::new();
    let report = Synthesizer::new(&index, SynthConfig::default())
        .run(&mut BuildSession::new(), &mut emitter, &mut registrar)
        .unwrap();

    assert_eq!(report.interfaces, 1);
    assert_eq!(report.operations, 3);
    assert_eq!(report.faults, 1);
    assert!(emitter.get("macros.jaxws_asm.Place").is_some());
    assert!(emitter.get("macros.jaxws_asm.PlaceResponse_Adapter1").is_some());
    assert!(emitter.get("macros.jaxws_asm.Rejected_Exception").is_some());

    let json: serde_json::Value = serde_json::from_str(&emitter.to_json().unwrap()).unwrap();
    assert!(json.is_array());
}

#[test]
fn test_runtime_drives_macro_generated_service() {
    let index = MetadataIndex::new(pinger_metadata()).unwrap();
    let mut runtime = Runtime::new();
    Synthesizer::new(&index, SynthConfig::default())
        .run(
            &mut BuildSession::new(),
            &mut runtime,
            &mut RecordingRegistrar::new(),
        )
        .unwrap();

    let adapter = runtime.adapter("macros.jaxws_asm.Ping_Adapter1").unwrap();
    let wrapper = adapter.construct(vec![Value::str("hi")]).unwrap();
    assert_eq!(adapter.decompose(&wrapper).unwrap(), vec![Value::str("hi")]);
}
