//! Field metadata encoder
//!
//! Writes a field descriptor as flat attributes on its owning entity:
//!
//! | attribute                  | value                                     |
//! |----------------------------|-------------------------------------------|
//! | `Field@<name>@type`        | integer tag of every nesting level        |
//! | `Field@<name>@separator`   | separator characters as supplied          |
//! | `Field@<name>@cardinality` | only if some level is user-defined/sequence |
//! | `Field@<name>@suffices`    | user-defined fields, via `encode_suffix_list` |
//!
//! Validation happens before the first write. A store failure aborts the
//! remaining writes of the call; attributes already written are left in place.

use crate::attribute::AttributeStore;
use crate::observability::{EncodeContext, Event, Logger};

use super::errors::{EncodeError, EncodeErrorKind, EncodeResult};
use super::key::{self, AttributeSuffix};
use super::types::{FieldDescriptor, FieldType};

/// Encodes field descriptors into an attribute store.
///
/// The encoder borrows the store handle for its lifetime and owns no state of
/// its own; counters and diagnostics go to the caller's `EncodeContext`.
pub struct FieldEncoder<'s, 'c, S: AttributeStore + ?Sized> {
    store: &'s mut S,
    ctx: EncodeContext<'c>,
}

impl<'s, 'c, S: AttributeStore + ?Sized> FieldEncoder<'s, 'c, S> {
    pub fn new(store: &'s mut S, ctx: EncodeContext<'c>) -> Self {
        Self { store, ctx }
    }

    /// Writes the `type`, `separator` and, when needed, `cardinality`
    /// attributes of `field`.
    ///
    /// # Errors
    ///
    /// - `InvalidNesting` if a user-defined level appears in a nested type
    /// - `EmptyType`, `InvalidFieldName`, `InvalidSeparatorCount`,
    ///   `InvalidCardinalityLength` for the remaining descriptor checks
    /// - `Backend` naming the sub-attribute whose write failed
    pub fn encode(&mut self, field: &FieldDescriptor) -> EncodeResult<()> {
        let result = self.try_encode(field);
        self.observe("encode", result)
    }

    /// Writes the comma-separated suffix list of a user-defined field.
    ///
    /// The text is stored verbatim; only the number of entries is checked
    /// against `cardinality[0]`.
    pub fn encode_suffix_list(&mut self, field: &FieldDescriptor, suffices: &str) -> EncodeResult<()> {
        let result = self.try_encode_suffix_list(field, suffices);
        self.observe("encode_suffix_list", result)
    }

    /// Reserved. Always fails with `NotImplemented`.
    pub fn encode_basis_metadata(&mut self, field: &FieldDescriptor) -> EncodeResult<()> {
        let result = Err(EncodeError::NotImplemented {
            operation: "encode_basis_metadata",
            field: field.name.clone(),
        });
        self.observe("encode_basis_metadata", result)
    }

    /// Reserved. Always fails with `NotImplemented`.
    pub fn encode_quadrature_metadata(&mut self, field: &FieldDescriptor) -> EncodeResult<()> {
        let result = Err(EncodeError::NotImplemented {
            operation: "encode_quadrature_metadata",
            field: field.name.clone(),
        });
        self.observe("encode_quadrature_metadata", result)
    }

    fn try_encode(&mut self, field: &FieldDescriptor) -> EncodeResult<()> {
        self.validate(field)?;

        let separator = field.separator_text();
        if self.ctx.config.trace_registrations {
            let entity_id = field.entity_id.to_string();
            Logger::trace(
                Event::FieldEncodeBegin.as_str(),
                &[
                    ("entity_id", entity_id.as_str()),
                    ("entity_type", field.entity_type.name()),
                    ("field", field.name.as_str()),
                    ("separator", separator.as_str()),
                    ("type", field.types[0].as_str()),
                ],
            );
        }

        self.put_integers(field, AttributeSuffix::Type, &field.type_tags())?;
        self.put_text(field, AttributeSuffix::Separator, &separator)?;

        if field.needs_cardinality() {
            self.put_integers(field, AttributeSuffix::Cardinality, &field.cardinality)?;
        }

        self.ctx.metrics.increment_fields_encoded();
        if self.ctx.config.trace_registrations {
            Logger::trace(
                Event::FieldEncodeComplete.as_str(),
                &[("field", field.name.as_str())],
            );
        }
        Ok(())
    }

    fn try_encode_suffix_list(&mut self, field: &FieldDescriptor, suffices: &str) -> EncodeResult<()> {
        let first = field.types.first().copied().unwrap_or(FieldType::Invalid);
        if first != FieldType::UserDefined {
            return Err(EncodeError::WrongFieldType {
                field: field.name.clone(),
                actual: first,
            });
        }
        self.validate_name(field)?;

        let expected = field.cardinality.first().copied().ok_or_else(|| {
            EncodeError::InvalidCardinalityLength {
                field: field.name.clone(),
                expected: field.nesting(),
                actual: 0,
            }
        })?;

        let actual = suffices.matches(',').count() as i64 + 1;
        if actual != expected {
            return Err(EncodeError::CardinalityMismatch {
                field: field.name.clone(),
                expected,
                actual,
            });
        }

        self.put_text(field, AttributeSuffix::Suffices, suffices)?;

        self.ctx.metrics.increment_suffix_lists_encoded();
        if self.ctx.config.trace_registrations {
            let count = actual.to_string();
            Logger::trace(
                Event::FieldSufficesWritten.as_str(),
                &[("count", count.as_str()), ("field", field.name.as_str())],
            );
        }
        Ok(())
    }

    fn validate(&self, field: &FieldDescriptor) -> EncodeResult<()> {
        if field.types.is_empty() {
            return Err(EncodeError::EmptyType {
                field: field.name.clone(),
            });
        }

        let nesting = field.nesting();
        if nesting > 1 && field.types.contains(&FieldType::UserDefined) {
            return Err(EncodeError::InvalidNesting {
                field: field.name.clone(),
                nesting,
            });
        }

        self.validate_name(field)?;

        if self.ctx.config.validate_separators && !field.has_valid_separator_count() {
            return Err(EncodeError::InvalidSeparatorCount {
                field: field.name.clone(),
                count: field.component_separator.len(),
                nesting,
            });
        }

        if field.needs_cardinality() && field.cardinality.len() != nesting {
            return Err(EncodeError::InvalidCardinalityLength {
                field: field.name.clone(),
                expected: nesting,
                actual: field.cardinality.len(),
            });
        }

        Ok(())
    }

    fn validate_name(&self, field: &FieldDescriptor) -> EncodeResult<()> {
        if self.ctx.config.reject_delimiter_in_names && !key::is_valid_field_name(&field.name) {
            return Err(EncodeError::InvalidFieldName {
                field: field.name.clone(),
            });
        }
        Ok(())
    }

    fn put_integers(
        &mut self,
        field: &FieldDescriptor,
        suffix: AttributeSuffix,
        values: &[i64],
    ) -> EncodeResult<()> {
        let name = key::build(&field.name, suffix);
        self.store
            .put_integer_attribute(field.entity_type, field.entity_id, &name, values)
            .map_err(|source| backend_error(field, suffix, source))?;
        self.ctx.metrics.increment_attributes_written();
        Ok(())
    }

    fn put_text(&mut self, field: &FieldDescriptor, suffix: AttributeSuffix, value: &str) -> EncodeResult<()> {
        let name = key::build(&field.name, suffix);
        self.store
            .put_text_attribute(field.entity_type, field.entity_id, &name, value)
            .map_err(|source| backend_error(field, suffix, source))?;
        self.ctx.metrics.increment_attributes_written();
        Ok(())
    }

    /// Counts and reports a failed call; the result passes through unchanged.
    fn observe(&self, operation: &str, result: EncodeResult<()>) -> EncodeResult<()> {
        if let Err(ref err) = result {
            match err.kind() {
                EncodeErrorKind::Validation => self.ctx.metrics.increment_validation_failures(),
                EncodeErrorKind::Backend => self.ctx.metrics.increment_backend_failures(),
                EncodeErrorKind::NotImplemented => self.ctx.metrics.increment_not_implemented_calls(),
            }

            if self.ctx.config.trace_registrations {
                Logger::trace(
                    Event::FieldEncodeFailed.as_str(),
                    &[("code", err.code()), ("field", err.field()), ("operation", operation)],
                );
            }

            self.ctx.reporter.report(
                &self.store.location(),
                operation,
                &err.to_string(),
                err.status_code(),
            );
        }
        result
    }
}

fn backend_error(
    field: &FieldDescriptor,
    attribute: AttributeSuffix,
    source: crate::attribute::StoreError,
) -> EncodeError {
    EncodeError::Backend {
        field: field.name.clone(),
        attribute,
        entity_type: field.entity_type,
        entity_id: field.entity_id,
        source,
    }
}
