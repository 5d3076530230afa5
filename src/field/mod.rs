//! Field metadata
//!
//! A field descriptor is persisted as a handful of `Field@<name>@<suffix>`
//! attributes on its owning mesh entity. `FieldEncoder` writes them,
//! `FieldDecoder` reads them back and expands component names.

mod components;
mod decoder;
mod encoder;
mod errors;
pub mod key;
mod types;

pub use components::{expand, sequence_labels, MAX_COMPONENTS};
pub use decoder::{FieldDecoder, FieldMetadata};
pub use encoder::FieldEncoder;
pub use errors::{DecodeError, DecodeResult, EncodeError, EncodeErrorKind, EncodeResult};
pub use key::AttributeSuffix;
pub use types::{EntityType, FieldDescriptor, FieldType, DEFAULT_SEPARATOR};
