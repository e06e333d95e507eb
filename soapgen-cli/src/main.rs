use std::path::PathBuf;

use clap::{Parser, Subcommand};
use soapgen_cli::commands::{generate, inspect};

#[derive(Parser)]
#[command(name = "soapgen", version, about = "soapgen - SOAP wrapper and adapter synthesis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a synthesis pass and write the type manifest
    Generate {
        /// Metadata index (YAML, or JSON with a .json extension)
        #[arg(long)]
        index: PathBuf,
        /// Output directory
        #[arg(long, default_value = "target/soapgen")]
        out: PathBuf,
        /// Configuration profile (overridden by SOAPGEN_PROFILE)
        #[arg(long)]
        profile: Option<String>,
        /// Fail when a declared type cannot be classified
        #[arg(long)]
        strict: bool,
    },
    /// Print the synthesized wrappers without writing anything
    Inspect {
        /// Metadata index (YAML, or JSON with a .json extension)
        #[arg(long)]
        index: PathBuf,
        /// Only this interface
        #[arg(long)]
        interface: Option<String>,
    },
}

fn main() {
    soapgen_cli::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            index,
            out,
            profile,
            strict,
        } => generate::run(&index, &out, profile.as_deref(), strict),
        Commands::Inspect { index, interface } => inspect::run(&index, interface.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{}", colored::Colorize::red(format!("Error: {e}").as_str()));
        std::process::exit(1);
    }
}
