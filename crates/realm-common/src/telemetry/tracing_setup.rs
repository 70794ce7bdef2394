//! Log subscriber installation
//!
//! `RUST_LOG` always wins; otherwise the per-environment default directive
//! applies. Production logs one JSON object per line.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::Environment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, with source locations and span lifecycle
    Pretty,
    /// Single line per event
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset, e.g. `info,realm_gateway=debug`
    pub default_directive: String,
}

impl TracingConfig {
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        let (format, default_directive) = match env {
            Environment::Development => (LogFormat::Pretty, "debug,sqlx=warn,hyper=info"),
            Environment::Staging => (LogFormat::Compact, "info"),
            Environment::Production => (LogFormat::Json, "info"),
        };
        Self {
            format,
            default_directive: default_directive.to_owned(),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_directive))
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        match self.format {
            LogFormat::Pretty => fmt::layer()
                .pretty()
                .with_thread_names(true)
                .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
                .boxed(),
            LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .boxed(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Staging)
    }
}

/// Install the global subscriber
///
/// # Errors
/// `TracingError::AlreadyInitialized` if a global subscriber exists
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.layer())
        .with(config.filter())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
