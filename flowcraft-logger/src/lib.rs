//! # FlowCraft Logger
//!
//! Logging and tracing support for FlowCraft flows

use flowcraft_core::{FlowVisitor, LogSink, LoggingFlowVisitor};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

/// Level at which flow messages are forwarded to `tracing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Configuration for a [`Logger`]
#[derive(Debug, Clone, Default)]
pub struct LoggerConfig {
    /// Level used for flow messages
    pub level: LogLevel,
    /// Fixed trace ID (a fresh UUID when None)
    pub trace_id: Option<String>,
}

impl LoggerConfig {
    /// Create a config with the given level
    pub fn with_level(level: LogLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Set the level
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set a fixed trace ID
    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// Logger for FlowCraft flows
#[derive(Debug, Clone)]
pub struct Logger {
    pub trace_id: String,
    level: LogLevel,
}

impl Logger {
    /// Create a new logger
    pub fn new() -> Self {
        Self::with_config(LoggerConfig::default())
    }

    /// Create a logger with a specific trace ID
    pub fn with_trace_id(trace_id: String) -> Self {
        Self::with_config(LoggerConfig::default().trace_id(trace_id))
    }

    pub fn with_config(config: LoggerConfig) -> Self {
        Self {
            trace_id: config
                .trace_id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            level: config.level,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Initialize tracing subscriber
    pub fn init_tracing() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    /// Log an info message
    pub fn info(&self, message: &str) {
        info!(trace_id = %self.trace_id, "{}", message);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str) {
        warn!(trace_id = %self.trace_id, "{}", message);
    }

    /// Log an error message
    pub fn error(&self, message: &str) {
        error!(trace_id = %self.trace_id, "{}", message);
    }

    /// Log a debug message
    pub fn debug(&self, message: &str) {
        debug!(trace_id = %self.trace_id, "{}", message);
    }

    /// Log a trace message
    pub fn trace(&self, message: &str) {
        trace!(trace_id = %self.trace_id, "{}", message);
    }

    /// A sink forwarding every message to `tracing` at the configured level.
    pub fn sink(&self) -> LogSink {
        let logger = self.clone();
        Arc::new(move |message: &str| logger.log(message))
    }

    /// Log a message at the configured level.
    pub fn log(&self, message: &str) {
        match self.level {
            LogLevel::Trace => self.trace(message),
            LogLevel::Debug => self.debug(message),
            LogLevel::Info => self.info(message),
            LogLevel::Warn => self.warn(message),
            LogLevel::Error => self.error(message),
        }
    }

    /// Decorate `inner` so that every action and condition it produces is
    /// logged through this logger.
    pub fn visitor<V: FlowVisitor>(&self, inner: V) -> LoggingFlowVisitor<V> {
        LoggingFlowVisitor::with_sink(inner, self.sink())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
