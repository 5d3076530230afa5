//! Observability subsystem
//!
//! This module provides:
//! - Structured logging (JSON lines on stderr)
//! - Caller-owned metrics counters
//! - Failure diagnostics through a pluggable reporter
//!
//! # Principles
//!
//! 1. Observability is read-only: it never changes an operation's outcome
//! 2. No global mutable state; counters live in a registry the caller owns
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use meshfield::observability::{EncodeContext, MemoryReporter, MetricsRegistry};
//!
//! let metrics = MetricsRegistry::new();
//! let reporter = MemoryReporter::new();
//! let config = EncoderConfig::default();
//! let ctx = EncodeContext::new(&metrics, &reporter, &config);
//! ```

mod context;
mod diagnostics;
mod events;
mod logger;
mod metrics;

pub use context::EncodeContext;
pub use diagnostics::{Diagnostic, DiagnosticReporter, LogReporter, MemoryReporter};
pub use events::Event;
pub use logger::{capture_log, Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

fn event_severity(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_events_log_as_fatal() {
        assert_eq!(event_severity(Event::StoreCorruption), Severity::Fatal);
        assert_eq!(event_severity(Event::StoreOpened), Severity::Info);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[]);
        log_event_with_fields(Event::StoreOpened, &[("path", "/tmp/mesh.attr")]);
    }
}
