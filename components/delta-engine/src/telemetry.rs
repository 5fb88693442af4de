//! Tracing subscriber setup for hosts embedding the engine.

use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::EngineConfig;
use crate::error::{DiffError, Result};

/// Builder for the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
#[derive(Debug, Clone)]
pub struct TelemetryBuilder {
    log_level: String,
    json: bool,
    span_events: bool,
}

impl Default for TelemetryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryBuilder {
    /// Plain text output at `info`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            span_events: false,
        }
    }

    /// Takes the level from the engine configuration.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new().with_log_level(config.log_level.clone())
    }

    /// Sets the default level or filter directive.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Emits one JSON object per event.
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Also logs when instrumented operations finish, with their timing.
    #[must_use]
    pub const fn with_span_events(mut self) -> Self {
        self.span_events = true;
        self
    }

    /// Returns the configured default level.
    #[must_use]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Installs the subscriber globally.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::Telemetry` if the level does not parse or a global
    /// subscriber is already installed.
    pub fn init(self) -> Result<()> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.log_level)
                .map_err(|e| DiffError::Telemetry(format!("Invalid log level: {e}")))?,
        };

        let span_events = if self.span_events {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let fmt_layer = if self.json {
            fmt::layer().json().with_span_events(span_events).boxed()
        } else {
            fmt::layer().with_span_events(span_events).boxed()
        };

        Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| DiffError::Telemetry(format!("Failed to init subscriber: {e}")))
    }
}
