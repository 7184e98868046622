//! idlgen Code Generation
//!
//! This crate turns a parsed Matter IDL into generated source files.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌───────────┐     ┌─────────┐
//! │ .matter │────▶│   Idl   │────▶│ Generator │────▶│ Storage │
//! │  file   │     │ (Parse) │     │ (Registry)│     │live/dry │
//! └─────────┘     └─────────┘     └───────────┘     └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use idlgen_codegen::{GenerationRequest, Orchestrator};
//!
//! let request = GenerationRequest::new("controller-clusters.matter")
//!     .with_output_dir("out")
//!     .with_dry_run(true);
//! let report = Orchestrator::default().run(&request)?;
//! for intent in &report.intents {
//!     println!("{}", intent.relative_path.display());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod generator;
pub mod generators;
pub mod orchestrator;
pub mod registry;
pub mod request;
pub mod storage;

pub use error::{Error, Result};
pub use generator::CodeGenerator;
pub use orchestrator::{GenerationReport, Orchestrator, Phase, PipelineError};
pub use registry::{GeneratorFactory, GeneratorKind, GeneratorRegistry};
pub use request::{GenerationRequest, LogLevel};
pub use storage::{DryRunStorage, FileSystemStorage, GeneratorStorage, WriteIntent};
