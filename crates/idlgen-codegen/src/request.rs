//! Generation request
//!
//! Everything one invocation needs, fixed before the pipeline starts.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

use crate::registry::GeneratorKind;

/// Verbosity requested for an invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything, including per-token parser diagnostics
    Debug,
    /// Phase progress and files written
    #[default]
    Info,
    /// Warnings and errors only
    Warn,
    /// Errors only
    Fatal,
}

impl LogLevel {
    /// Accepted spellings, lowercase
    pub const NAMES: [&'static str; 4] = ["debug", "info", "warn", "fatal"];

    /// Level name as accepted on the command line
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Fatal => "fatal",
        }
    }

    /// Corresponding `tracing` filter. `fatal` maps to `ERROR`.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Fatal => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "fatal" => Ok(LogLevel::Fatal),
            other => Err(format!(
                "unknown log level '{other}' (expected one of: {})",
                LogLevel::NAMES.join(", ")
            )),
        }
    }
}

/// One invocation of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// IDL file to parse
    pub idl_path: PathBuf,

    /// Root for generated files
    pub output_dir: PathBuf,

    /// Record writes instead of performing them
    pub dry_run: bool,

    /// Registry name of the backend
    pub generator_name: String,

    /// Requested verbosity
    pub log_level: LogLevel,

    /// Create `output_dir` if it does not exist
    pub create_output_dir: bool,
}

impl GenerationRequest {
    /// Request with defaults: primary backend, current directory, live mode
    pub fn new(idl_path: impl Into<PathBuf>) -> Self {
        Self {
            idl_path: idl_path.into(),
            output_dir: PathBuf::from("."),
            dry_run: false,
            generator_name: GeneratorKind::PRIMARY.name().to_string(),
            log_level: LogLevel::default(),
            create_output_dir: false,
        }
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Set the backend
    pub fn with_generator(mut self, name: impl Into<String>) -> Self {
        self.generator_name = name.into();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Allow the output directory to be created
    pub fn with_create_output_dir(mut self, create: bool) -> Self {
        self.create_output_dir = create;
        self
    }
}
