use colored::Colorize;
use std::fs;
use std::path::Path;

use soapgen_core::{
    BuildReport, BuildSession, GeneratorConfig, ManifestEmitter, MetadataIndex,
    RecordingRegistrar, SynthConfig, Synthesizer,
};
use tracing::info;

pub const TYPES_FILE: &str = "types.json";
pub const REFLECTION_FILE: &str = "reflection.json";

/// Run a full pass over `index` and write the manifests into `out`.
///
/// `--strict` wins over `soapgen.classification.strict`.
pub fn run(
    index: &Path,
    out: &Path,
    profile: Option<&str>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = GeneratorConfig::load(profile)?;
    let mut synth = SynthConfig::from_config(&config)?;
    if strict {
        synth.strict_classification = true;
    }

    let metadata = MetadataIndex::load(index)?;
    info!(
        index = %index.display(),
        types = metadata.len(),
        profile = config.profile(),
        "Loaded metadata index"
    );

    let mut emitter = ManifestEmitter::new();
    let mut registrar = RecordingRegistrar::new();
    let report = Synthesizer::new(&metadata, synth).run(
        &mut BuildSession::new(),
        &mut emitter,
        &mut registrar,
    )?;

    fs::create_dir_all(out)?;
    let types_path = out.join(TYPES_FILE);
    fs::write(&types_path, emitter.to_json()?)?;

    let reflection = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "profile": config.profile(),
        "types": registrar.names(),
    });
    let reflection_path = out.join(REFLECTION_FILE);
    fs::write(&reflection_path, serde_json::to_string_pretty(&reflection)?)?;

    print_summary(&report);
    println!(
        "{} Wrote {}",
        "✓".green(),
        types_path.display().to_string().cyan()
    );
    println!(
        "{} Wrote {}",
        "✓".green(),
        reflection_path.display().to_string().cyan()
    );
    Ok(())
}

fn print_summary(report: &BuildReport) {
    println!(
        "{} {}",
        "soapgen".bold(),
        chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!("  {:<14} {}", "interfaces".dimmed(), report.interfaces);
    println!("  {:<14} {}", "operations".dimmed(), report.operations);
    println!("  {:<14} {}", "wrappers".dimmed(), report.wrappers);
    println!("  {:<14} {}", "faults".dimmed(), report.faults);
    println!("  {:<14} {}", "types".dimmed(), report.types_emitted);

    for service in &report.skipped_services {
        println!(
            "  {} {} is not an interface, skipped",
            "!".yellow(),
            service.yellow()
        );
    }
    for op in &report.skipped_operations {
        println!("  {} overload {} skipped", "!".yellow(), op.yellow());
    }
}
