//! meshfield - field metadata encoding for mesh attribute stores
//!
//! A field (a named, possibly nested, multi-component quantity such as a
//! velocity vector or a stress tensor per integration point) is registered on
//! a mesh entity as a small set of flat `Field@<name>@<suffix>` attributes.

pub mod attribute;
pub mod cli;
pub mod config;
pub mod field;
pub mod observability;

pub use attribute::{AttributeStore, AttributeValue, FileAttributeStore, MemoryAttributeStore};
pub use config::EncoderConfig;
pub use field::{
    EncodeError, EntityType, FieldDecoder, FieldDescriptor, FieldEncoder, FieldMetadata, FieldType,
};
pub use observability::{EncodeContext, MetricsRegistry};
