//! Attribute store subsystem
//!
//! Field metadata is persisted through the `AttributeStore` trait: named
//! integer-sequence and text values scoped to `(entity type, entity id)`.
//!
//! Two stores ship with the crate:
//! - `MemoryAttributeStore` for tests and transient use
//! - `FileAttributeStore`, an append-only record file with CRC32 checksums on
//!   every record and latest-record-wins semantics

mod checksum;
mod errors;
mod file;
mod memory;
mod record;
mod store;
mod value;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use file::FileAttributeStore;
pub use memory::MemoryAttributeStore;
pub use record::AttributeRecord;
pub use store::AttributeStore;
pub use value::AttributeValue;
