//! Subscriber setup

use idlgen_codegen::LogLevel;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How the process logs
#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub json: bool,
}

impl LoggingConfig {
    /// `RUST_LOG` wins over the requested level when it is set
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.level_filter().to_string()))
    }
}

/// Install the global subscriber. Logs go to stderr.
pub fn init(config: LoggingConfig) {
    let registry = tracing_subscriber::registry().with(config.filter());

    if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
