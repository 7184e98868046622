//! Generation pipeline
//!
//! Runs one [`GenerationRequest`] through four phases, strictly in order:
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌───────────┐     ┌─────────┐
//! │  Parse  │────▶│ Resolve │────▶│ Construct │────▶│  Emit   │
//! │  (IDL)  │     │(registry│     │ (storage, │     │ (files) │
//! │         │     │ lookup) │     │ generator)│     │         │
//! └─────────┘     └─────────┘     └───────────┘     └─────────┘
//! ```
//!
//! The first failing phase ends the run. Nothing is retried and nothing
//! written before a live-mode failure is rolled back.

use std::fmt;
use std::path::PathBuf;

use idlgen_core::{Idl, Parser};
use thiserror::Error;

use crate::error::Error;
use crate::registry::GeneratorRegistry;
use crate::request::GenerationRequest;
use crate::storage::{
    CommitOutcome, CommitRecord, DryRunStorage, FileSystemStorage, GeneratorStorage, WriteIntent,
};

/// Pipeline phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Read and parse the IDL file
    Parse,
    /// Look up the backend
    Resolve,
    /// Build storage and generator
    Construct,
    /// Run the backend
    Emit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Parse => "parse",
            Phase::Resolve => "resolve",
            Phase::Construct => "construct",
            Phase::Emit => "emit",
        })
    }
}

/// A failed run: which phase failed, on what input, and why
#[derive(Error, Debug)]
#[error("{phase} phase failed for '{}' (generator '{generator}'): {source}", .idl_path.display())]
pub struct PipelineError {
    /// Phase that failed
    pub phase: Phase,
    /// Input file of the request
    pub idl_path: PathBuf,
    /// Requested backend name
    pub generator: String,
    /// Underlying error
    pub source: Error,
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Backend that ran
    pub generator: &'static str,
    /// Whether writes were only recorded
    pub dry_run: bool,
    /// Every committed write, in order
    pub intents: Vec<WriteIntent>,
    /// Files created or overwritten
    pub written: usize,
    /// Files already up to date
    pub unchanged: usize,
}

/// Drives requests through the pipeline
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: GeneratorRegistry,
    parser: Parser,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(GeneratorRegistry::builtin())
    }
}

impl Orchestrator {
    /// Create an orchestrator dispatching through `registry`
    pub fn new(registry: GeneratorRegistry) -> Self {
        Self {
            registry,
            parser: Parser::new(),
        }
    }

    /// The registry backends are resolved from
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Run `request` through every phase
    pub fn run(&self, request: &GenerationRequest) -> Result<GenerationReport, PipelineError> {
        let span = tracing::info_span!(
            "generate",
            idl = %request.idl_path.display(),
            generator = %request.generator_name,
            dry_run = request.dry_run,
        );
        let _enter = span.enter();

        let fail = |phase: Phase, source: Error| {
            tracing::error!(
                phase = %phase,
                idl = %request.idl_path.display(),
                generator = %request.generator_name,
                error = %source,
                "Generation failed"
            );
            PipelineError {
                phase,
                idl_path: request.idl_path.clone(),
                generator: request.generator_name.clone(),
                source,
            }
        };

        tracing::info!(phase = %Phase::Parse, "Parsing idl from {}", request.idl_path.display());
        let idl = self.parse(request).map_err(|e| fail(Phase::Parse, e))?;
        tracing::info!(
            phase = %Phase::Parse,
            clusters = idl.clusters.len(),
            "Parse complete"
        );

        let entry = self
            .registry
            .resolve(&request.generator_name)
            .map_err(|e| fail(Phase::Resolve, e))?;
        tracing::info!(phase = %Phase::Resolve, "Running code generator {}", entry.name);

        let mut storage = Self::storage_for(request).map_err(|e| fail(Phase::Construct, e))?;
        {
            let mut generator = entry.create(&mut *storage, &idl);
            tracing::info!(
                phase = %Phase::Construct,
                output_dir = %request.output_dir.display(),
                "Generator ready"
            );

            generator
                .emit(request.dry_run)
                .map_err(|e| fail(Phase::Emit, e))?;
        }

        let report = Self::report(entry.name, request.dry_run, storage.records());
        tracing::info!(
            phase = %Phase::Emit,
            files = report.intents.len(),
            written = report.written,
            unchanged = report.unchanged,
            "Done"
        );
        Ok(report)
    }

    fn parse(&self, request: &GenerationRequest) -> Result<Idl, Error> {
        let text = std::fs::read_to_string(&request.idl_path)
            .map_err(|e| Error::io(&request.idl_path, e))?;
        Ok(self.parser.parse(&text)?)
    }

    fn storage_for(request: &GenerationRequest) -> Result<Box<dyn GeneratorStorage>, Error> {
        Ok(if request.dry_run {
            Box::new(DryRunStorage::new(
                &request.output_dir,
                request.create_output_dir,
            )?)
        } else {
            Box::new(FileSystemStorage::new(
                &request.output_dir,
                request.create_output_dir,
            )?)
        })
    }

    fn report(generator: &'static str, dry_run: bool, records: &[CommitRecord]) -> GenerationReport {
        let count = |outcome: CommitOutcome| {
            records.iter().filter(|r| r.outcome == outcome).count()
        };
        GenerationReport {
            generator,
            dry_run,
            intents: records.iter().map(|r| r.intent.clone()).collect(),
            written: count(CommitOutcome::Written),
            unchanged: count(CommitOutcome::Unchanged),
        }
    }
}
