//! idlgen CLI
//!
//! Parses a Matter IDL file and runs one code generator over it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use idlgen_codegen::{
    GenerationReport, GenerationRequest, GeneratorKind, GeneratorRegistry, LogLevel, Orchestrator,
};

mod logging;

/// Generate source code from a Matter IDL file
#[derive(Parser)]
#[command(name = "idlgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log verbosity
    #[arg(
        long,
        env = "IDLGEN_LOG_LEVEL",
        default_value = "info",
        ignore_case = true,
        value_parser = PossibleValuesParser::new(LogLevel::NAMES)
            .try_map(|s| s.parse::<LogLevel>())
    )]
    log_level: LogLevel,

    /// Which code generator to run
    #[arg(
        short,
        long,
        env = "IDLGEN_GENERATOR",
        default_value = GeneratorKind::PRIMARY.name(),
        ignore_case = true,
        value_parser = PossibleValuesParser::new(GeneratorRegistry::builtin().names())
    )]
    generator: String,

    /// Where to place the generated files
    #[arg(short, long, env = "IDLGEN_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Only show what would be generated, do not write files
    #[arg(long)]
    dry_run: bool,

    /// Create the output directory if it does not exist
    #[arg(long)]
    create_output_dir: bool,

    /// Emit log events as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Matter IDL file to parse
    #[arg(value_parser = existing_path)]
    idl_path: PathBuf,
}

impl Cli {
    fn request(&self) -> GenerationRequest {
        GenerationRequest::new(&self.idl_path)
            .with_output_dir(&self.output_dir)
            .with_generator(&self.generator)
            .with_dry_run(self.dry_run)
            .with_log_level(self.log_level)
            .with_create_output_dir(self.create_output_dir)
    }
}

fn existing_path(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("path '{value}' does not exist"))
    }
}

fn print_intents(report: &GenerationReport) {
    for intent in &report.intents {
        println!(
            "{}  {} bytes  sha256:{}",
            intent.relative_path.display(),
            intent.size,
            &intent.sha256[..12]
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let request = cli.request();

    logging::init(logging::LoggingConfig {
        level: request.log_level,
        json: cli.log_json,
    });

    let report = Orchestrator::default()
        .run(&request)
        .with_context(|| format!("Failed to generate code from {}", request.idl_path.display()))?;

    if report.dry_run {
        print_intents(&report);
        tracing::info!(files = report.intents.len(), "Dry run complete, nothing written");
    } else {
        tracing::info!(
            written = report.written,
            unchanged = report.unchanged,
            "Code generation completed successfully"
        );
    }

    Ok(())
}
