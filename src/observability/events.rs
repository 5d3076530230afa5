//! Observable events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` key of a log line.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Encoder configuration loaded from file
    ConfigLoaded,

    // Encoding
    /// Field metadata encode started
    FieldEncodeBegin,
    /// Field metadata attributes written
    FieldEncodeComplete,
    /// Field metadata encode failed
    FieldEncodeFailed,
    /// User-defined suffix list written
    FieldSufficesWritten,

    // Decoding
    /// Field metadata read back from a store
    FieldDecoded,

    // Store
    /// Attribute store opened and replayed
    StoreOpened,
    /// Attribute store record failed verification (FATAL)
    StoreCorruption,
    /// Failed append truncated back to the last good record
    StoreWriteRolledBack,
    /// Failed append could not be truncated; the handle refuses writes (FATAL)
    StoreRollbackFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::FieldEncodeBegin => "FIELD_ENCODE_BEGIN",
            Event::FieldEncodeComplete => "FIELD_ENCODE_COMPLETE",
            Event::FieldEncodeFailed => "FIELD_ENCODE_FAILED",
            Event::FieldSufficesWritten => "FIELD_SUFFICES_WRITTEN",
            Event::FieldDecoded => "FIELD_DECODED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreCorruption => "STORE_CORRUPTION",
            Event::StoreWriteRolledBack => "STORE_WRITE_ROLLED_BACK",
            Event::StoreRollbackFailed => "STORE_ROLLBACK_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StoreCorruption | Event::StoreRollbackFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
