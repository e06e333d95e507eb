use colored::Colorize;
use std::path::Path;

use soapgen_core::{
    fingerprint, BuildSession, InterfaceOutput, MetadataIndex, SynthConfig, Synthesizer,
    TypeKind, WrapperBundle,
};

/// Print the synthesized wrappers for every interface, or only `interface`.
///
/// Uses the default synthesis configuration and writes nothing.
pub fn run(index: &Path, interface: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = MetadataIndex::load(index)?;

    let names: Vec<String> = match interface {
        Some(name) => vec![name.to_string()],
        None => metadata
            .web_services()
            .filter(|t| t.kind == TypeKind::Interface)
            .map(|t| t.name.clone())
            .collect(),
    };
    if names.is_empty() {
        println!("{}", "No service interfaces found.".dimmed());
        return Ok(());
    }

    let synth = Synthesizer::new(&metadata, SynthConfig::default());
    let mut session = BuildSession::new();
    for name in &names {
        let output = synth.synthesize_interface(&mut session, name)?;
        print_interface(&output);
    }
    Ok(())
}

fn print_interface(output: &InterfaceOutput) {
    println!(
        "{} {} {}",
        "Interface".bold(),
        output.interface.cyan(),
        format!("({})", output.namespace).dimmed()
    );
    println!("  {} {}", "package".dimmed(), output.package);

    for op in &output.operations {
        println!();
        println!("  {}", op.operation.green().bold());
        print_bundle("request", &op.request);
        print_bundle("response", &op.response);
    }

    if !output.faults.is_empty() {
        println!();
        for fault in &output.faults {
            println!(
                "  {} {} {}",
                "fault".red(),
                fault.name,
                format!("<{}>", fault.payload_type).dimmed()
            );
        }
    }
    for skipped in &output.skipped {
        println!("  {} {} skipped (overload)", "!".yellow(), skipped.yellow());
    }
    println!();
}

fn print_bundle(label: &str, bundle: &WrapperBundle) {
    let wrapper = &bundle.wrapper;
    println!(
        "    {:<9} {} {}",
        label.dimmed(),
        wrapper.qualified_name(),
        format!("<{}>", wrapper.element_name).dimmed()
    );
    for field in &wrapper.fields {
        println!(
            "      {:<20} {:<24} {}",
            field.name,
            field.declared_type.to_string(),
            field.wire_name.dimmed()
        );
    }
    println!(
        "      {} {}  {}",
        "adapter".dimmed(),
        bundle.adapter.name,
        fingerprint(wrapper).dimmed()
    );
}
