//! Structured logging & tracing.
//!
//! Provides structured logging via the `tracing` crate with level-based
//! filtering, spans for stage timing, and idempotent initialization so the
//! CLI binary and test harness can both call it freely.

use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Log level for the floor-plan core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn from_id(id: u32) -> Self {
        match id {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn all_levels() -> Vec<LogLevel> {
        vec![
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ]
    }
}

/// Configuration for tracing initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_timestamps: bool,
    pub show_thread_ids: bool,
    pub show_targets: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("floorplan_core::pack".to_string(), LogLevel::Info),
                ("floorplan_core::refine".to_string(), LogLevel::Debug),
                ("floorplan_core::repair".to_string(), LogLevel::Debug),
                ("floorplan_core::rules".to_string(), LogLevel::Info),
            ],
            show_timestamps: true,
            show_thread_ids: false,
            show_targets: true,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing with default settings (idempotent — safe to call multiple times).
pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Initialize tracing with custom config (idempotent — first call wins).
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact();

        let _ = subscriber.try_init();
    });
}

/// Log a structured message at INFO level.
pub fn log_info(target: &str, message: &str) {
    tracing::info!(target: "floorplan_core", system = target, "{}", message);
}

/// Log a structured message at WARN level.
pub fn log_warn(target: &str, message: &str) {
    tracing::warn!(target: "floorplan_core", system = target, "{}", message);
}

/// Log a structured message at ERROR level.
pub fn log_error(target: &str, message: &str) {
    tracing::error!(target: "floorplan_core", system = target, "{}", message);
}

/// Log a structured message at DEBUG level.
pub fn log_debug(target: &str, message: &str) {
    tracing::debug!(target: "floorplan_core", system = target, "{}", message);
}

/// Guard that logs a span duration for timing a pipeline stage.
pub struct TimingSpan {
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &str) -> Self {
        let span = tracing::info_span!("stage", name = name);
        Self {
            _span: span.entered(),
        }
    }
}

/// Snapshot of current logging configuration, for inclusion in diagnostics.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingSnapshot {
    pub default_level: String,
    pub available_levels: Vec<String>,
    pub module_filter_count: usize,
    pub config: TracingConfig,
}

impl LoggingSnapshot {
    pub fn capture(config: &TracingConfig) -> Self {
        Self {
            default_level: config.default_level.as_str().to_string(),
            available_levels: LogLevel::all_levels()
                .iter()
                .map(|l| l.as_str().to_string())
                .collect(),
            module_filter_count: config.module_filters.len(),
            config: config.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
