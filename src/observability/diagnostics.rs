//! Diagnostic reporting
//!
//! Every failed encode call is reported exactly once, with the store
//! location, the operation name, a message and a status code. Reporting is
//! diagnostic only and never changes the outcome of the call.

use std::sync::{Arc, Mutex};

use super::logger::Logger;

/// One reported failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Store the failing call was made against
    pub location: String,
    /// Operation name, e.g. `encode`
    pub operation: String,
    pub message: String,
    /// Status code string (field or store code)
    pub code: String,
}

/// Sink for failure diagnostics.
pub trait DiagnosticReporter: Send + Sync {
    fn report(&self, location: &str, operation: &str, message: &str, code: &str);
}

/// Reports as an ERROR log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl DiagnosticReporter for LogReporter {
    fn report(&self, location: &str, operation: &str, message: &str, code: &str) {
        Logger::error(
            "FIELD_DIAGNOSTIC",
            &[
                ("code", code),
                ("location", location),
                ("message", message),
                ("operation", operation),
            ],
        );
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    diagnostics: Arc<Mutex<Vec<Diagnostic>>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics reported so far, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticReporter for MemoryReporter {
    fn report(&self, location: &str, operation: &str, message: &str, code: &str) {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Diagnostic {
                location: location.to_string(),
                operation: operation.to_string(),
                message: message.to_string(),
                code: code.to_string(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_reporter_collects_in_order() {
        let reporter = MemoryReporter::new();
        assert!(reporter.is_empty());

        reporter.report("memory", "encode", "first", "FIELD_INVALID_NESTING");
        reporter.report("memory", "encode_suffix_list", "second", "FIELD_WRONG_TYPE");

        let all = reporter.diagnostics();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].message, "first");
        assert_eq!(all[1].operation, "encode_suffix_list");
    }

    #[test]
    fn test_clones_share_storage() {
        let reporter = MemoryReporter::new();
        let clone = reporter.clone();
        clone.report("memory", "encode", "m", "c");
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_log_reporter_does_not_panic() {
        LogReporter.report("memory", "encode", "message", "FIELD_EMPTY_TYPE");
    }
}
