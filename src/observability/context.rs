//! Per-call context handed to encoders and decoders

use crate::config::EncoderConfig;

use super::diagnostics::{DiagnosticReporter, LogReporter};
use super::metrics::MetricsRegistry;

static DEFAULT_REPORTER: LogReporter = LogReporter;

/// Caller-owned observability hooks and configuration.
///
/// The context only borrows; metrics and diagnostics live as long as the
/// caller wants them to.
#[derive(Clone, Copy)]
pub struct EncodeContext<'a> {
    pub metrics: &'a MetricsRegistry,
    pub reporter: &'a dyn DiagnosticReporter,
    pub config: &'a EncoderConfig,
}

impl<'a> EncodeContext<'a> {
    pub fn new(
        metrics: &'a MetricsRegistry,
        reporter: &'a dyn DiagnosticReporter,
        config: &'a EncoderConfig,
    ) -> Self {
        Self {
            metrics,
            reporter,
            config,
        }
    }

    /// Context that reports failures as log lines.
    pub fn with_log_reporter(metrics: &'a MetricsRegistry, config: &'a EncoderConfig) -> Self {
        Self::new(metrics, &DEFAULT_REPORTER, config)
    }
}
