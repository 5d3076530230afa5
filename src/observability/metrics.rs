//! Metrics registry for field metadata encoding
//!
//! - Counters only, monotonic
//! - Owned by the caller and handed to encoders through `EncodeContext`;
//!   there is no process-wide counter
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Encoder counters
///
/// All counters use relaxed atomics; one registry may be shared between
/// threads that each drive their own store handle.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful `encode` calls
    fields_encoded: AtomicU64,
    /// Successful `encode_suffix_list` calls
    suffix_lists_encoded: AtomicU64,
    /// Individual attribute writes that succeeded
    attributes_written: AtomicU64,
    /// Calls rejected before any write
    validation_failures: AtomicU64,
    /// Calls aborted by a store failure
    backend_failures: AtomicU64,
    /// Calls to reserved operations
    not_implemented_calls: AtomicU64,
    /// Successful decodes
    fields_decoded: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_fields_encoded(&self) {
        self.fields_encoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_suffix_lists_encoded(&self) {
        self.suffix_lists_encoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_attributes_written(&self) {
        self.attributes_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_validation_failures(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_backend_failures(&self) {
        self.backend_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_not_implemented_calls(&self) {
        self.not_implemented_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_fields_decoded(&self) {
        self.fields_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of encode-side calls seen, successful or not
    pub fn encode_calls(&self) -> u64 {
        let s = self.snapshot();
        s.fields_encoded
            + s.suffix_lists_encoded
            + s.validation_failures
            + s.backend_failures
            + s.not_implemented_calls
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fields_encoded: self.fields_encoded.load(Ordering::Relaxed),
            suffix_lists_encoded: self.suffix_lists_encoded.load(Ordering::Relaxed),
            attributes_written: self.attributes_written.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            backend_failures: self.backend_failures.load(Ordering::Relaxed),
            not_implemented_calls: self.not_implemented_calls.load(Ordering::Relaxed),
            fields_decoded: self.fields_decoded.load(Ordering::Relaxed),
        }
    }

    /// Current snapshot as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub fields_encoded: u64,
    pub suffix_lists_encoded: u64,
    pub attributes_written: u64,
    pub validation_failures: u64,
    pub backend_failures: u64,
    pub not_implemented_calls: u64,
    pub fields_decoded: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let registry = MetricsRegistry::new();
        assert_eq!(registry.snapshot(), MetricsSnapshot::default());
        assert_eq!(registry.encode_calls(), 0);
    }

    #[test]
    fn test_increment_counters() {
        let registry = MetricsRegistry::new();

        registry.increment_fields_encoded();
        registry.increment_attributes_written();
        registry.increment_attributes_written();
        registry.increment_validation_failures();
        registry.increment_not_implemented_calls();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.fields_encoded, 1);
        assert_eq!(snapshot.attributes_written, 2);
        assert_eq!(snapshot.validation_failures, 1);
        assert_eq!(snapshot.not_implemented_calls, 1);
        assert_eq!(registry.encode_calls(), 3);
    }

    #[test]
    fn test_to_json() {
        let registry = MetricsRegistry::new();
        registry.increment_suffix_lists_encoded();

        let parsed: serde_json::Value = serde_json::from_str(&registry.to_json()).unwrap();
        assert_eq!(parsed["suffix_lists_encoded"], 1);
        assert_eq!(parsed["backend_failures"], 0);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.increment_fields_encoded();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().fields_encoded, 800);
    }
}
