//! Field metadata decoder
//!
//! Reads the attributes written by `FieldEncoder` back into a `FieldMetadata`.
//! `type` and `separator` are required; `cardinality` and `suffices` are only
//! present for fields that need them.

use crate::attribute::{AttributeStore, AttributeValue};
use crate::observability::{Event, Logger, MetricsRegistry};

use super::components::{expand, sequence_labels, MAX_COMPONENTS};
use super::errors::{DecodeError, DecodeResult};
use super::key::{self, AttributeSuffix};
use super::types::{EntityType, FieldDescriptor, FieldType};

/// A field as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    pub name: String,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub types: Vec<FieldType>,
    pub separators: Vec<char>,
    /// Zeros when the store has no `cardinality` attribute
    pub cardinality: Vec<i64>,
    /// Split on `,`; `None` when the store has no `suffices` attribute
    pub suffices: Option<Vec<String>>,
}

impl FieldMetadata {
    pub fn nesting(&self) -> usize {
        self.types.len()
    }

    /// Rebuilds the descriptor this metadata was encoded from.
    pub fn to_descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name.clone(),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            types: self.types.clone(),
            cardinality: self.cardinality.clone(),
            component_separator: self.separators.clone(),
        }
    }

    /// Full component names, e.g. `velocity_x`, `velocity_y`, `velocity_z`.
    ///
    /// Level 0 sits next to the base name and varies fastest. Fails with
    /// `TooManyComponents` when the expansion would exceed `MAX_COMPONENTS`.
    pub fn component_names(&self) -> DecodeResult<Vec<String>> {
        let counts = (0..self.nesting())
            .map(|level| self.level_count(level))
            .collect::<DecodeResult<Vec<_>>>()?;

        counts
            .iter()
            .try_fold(1usize, |total, &count| total.checked_mul(count))
            .filter(|&total| total <= MAX_COMPONENTS)
            .ok_or_else(|| self.too_many_components())?;

        let levels: Vec<Vec<String>> = counts
            .iter()
            .enumerate()
            .map(|(level, &count)| self.level_labels(level, count))
            .collect();
        Ok(expand(&self.name, &levels, &self.separators))
    }

    /// Number of labels at `level`, checked against the stored metadata.
    fn level_count(&self, level: usize) -> DecodeResult<usize> {
        let field_type = self.types[level];
        let cardinality = self.cardinality.get(level).copied().unwrap_or(0);

        match field_type {
            FieldType::UserDefined => {
                let available = self.suffices.as_ref().map_or(0, Vec::len);
                if cardinality < 0 || available as u64 != cardinality as u64 {
                    return Err(DecodeError::ComponentCountMismatch {
                        field: self.name.clone(),
                        level,
                        expected: cardinality,
                        actual: available,
                    });
                }
                Ok(available)
            }
            FieldType::Sequence => {
                let count = usize::try_from(cardinality).map_err(|_| {
                    DecodeError::ComponentCountMismatch {
                        field: self.name.clone(),
                        level,
                        expected: cardinality,
                        actual: 0,
                    }
                })?;
                // A sequence level alone must fit, even when another level is empty.
                if count > MAX_COMPONENTS {
                    return Err(self.too_many_components());
                }
                Ok(count)
            }
            other => other.component_count().ok_or_else(|| {
                DecodeError::UnsupportedComponentType {
                    field: self.name.clone(),
                    level,
                    field_type: other,
                }
            }),
        }
    }

    fn level_labels(&self, level: usize, count: usize) -> Vec<String> {
        match self.types[level] {
            FieldType::UserDefined => self.suffices.clone().unwrap_or_default(),
            FieldType::Sequence => sequence_labels(count),
            other => (0..count)
                .filter_map(|i| other.component_suffix(i))
                .map(str::to_string)
                .collect(),
        }
    }

    fn too_many_components(&self) -> DecodeError {
        DecodeError::TooManyComponents {
            field: self.name.clone(),
            limit: MAX_COMPONENTS,
        }
    }
}

/// Reads field metadata from an attribute store.
pub struct FieldDecoder<'s, 'm, S: AttributeStore + ?Sized> {
    store: &'s S,
    metrics: &'m MetricsRegistry,
}

impl<'s, 'm, S: AttributeStore + ?Sized> FieldDecoder<'s, 'm, S> {
    pub fn new(store: &'s S, metrics: &'m MetricsRegistry) -> Self {
        Self { store, metrics }
    }

    /// Decodes the field `name` on the given entity.
    pub fn decode(&self, entity_type: EntityType, entity_id: i64, name: &str) -> DecodeResult<FieldMetadata> {
        let tags = self
            .read(entity_type, entity_id, name, AttributeSuffix::Type)?
            .ok_or_else(|| missing(entity_type, entity_id, name, AttributeSuffix::Type))
            .and_then(|value| integers(name, AttributeSuffix::Type, value))?;
        let types: Vec<FieldType> = tags.into_iter().map(FieldType::from_tag).collect();

        let separators: Vec<char> = self
            .read(entity_type, entity_id, name, AttributeSuffix::Separator)?
            .ok_or_else(|| missing(entity_type, entity_id, name, AttributeSuffix::Separator))
            .and_then(|value| text(name, AttributeSuffix::Separator, value))?
            .chars()
            .collect();

        let cardinality = match self.read(entity_type, entity_id, name, AttributeSuffix::Cardinality)? {
            Some(value) => integers(name, AttributeSuffix::Cardinality, value)?,
            None => vec![0; types.len()],
        };

        let suffices: Option<Vec<String>> = self
            .read(entity_type, entity_id, name, AttributeSuffix::Suffices)?
            .map(|value| text(name, AttributeSuffix::Suffices, value))
            .transpose()?
            .map(|csv| csv.split(',').map(str::to_string).collect());

        self.metrics.increment_fields_decoded();
        let id = entity_id.to_string();
        Logger::trace(
            Event::FieldDecoded.as_str(),
            &[
                ("entity_id", id.as_str()),
                ("entity_type", entity_type.name()),
                ("field", name),
            ],
        );

        Ok(FieldMetadata {
            name: name.to_string(),
            entity_type,
            entity_id,
            types,
            separators,
            cardinality,
            suffices,
        })
    }

    /// Decodes straight to a descriptor; the inverse of `FieldEncoder::encode`.
    pub fn decode_descriptor(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
    ) -> DecodeResult<FieldDescriptor> {
        Ok(self.decode(entity_type, entity_id, name)?.to_descriptor())
    }

    /// Names of every field with a `type` attribute on the entity, sorted.
    pub fn field_names(&self, entity_type: EntityType, entity_id: i64) -> DecodeResult<Vec<String>> {
        let names = self.store.attribute_names(entity_type, entity_id)?;
        let mut fields: Vec<String> = names
            .iter()
            .filter_map(|attribute| key::parse(attribute))
            .filter(|(_, suffix)| *suffix == AttributeSuffix::Type)
            .map(|(field, _)| field.to_string())
            .collect();
        fields.sort();
        Ok(fields)
    }

    /// Decodes every field on the entity.
    pub fn decode_all(&self, entity_type: EntityType, entity_id: i64) -> DecodeResult<Vec<FieldMetadata>> {
        self.field_names(entity_type, entity_id)?
            .iter()
            .map(|name| self.decode(entity_type, entity_id, name))
            .collect()
    }

    fn read(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        suffix: AttributeSuffix,
    ) -> DecodeResult<Option<AttributeValue>> {
        Ok(self
            .store
            .get_attribute(entity_type, entity_id, &key::build(name, suffix))?)
    }
}

fn missing(entity_type: EntityType, entity_id: i64, name: &str, attribute: AttributeSuffix) -> DecodeError {
    DecodeError::MissingAttribute {
        field: name.to_string(),
        attribute,
        entity_type,
        entity_id,
    }
}

fn integers(name: &str, attribute: AttributeSuffix, value: AttributeValue) -> DecodeResult<Vec<i64>> {
    match value {
        AttributeValue::Integer(values) => Ok(values),
        other => Err(DecodeError::UnexpectedValueKind {
            field: name.to_string(),
            attribute,
            expected: "integer",
            found: other.kind_name(),
        }),
    }
}

fn text(name: &str, attribute: AttributeSuffix, value: AttributeValue) -> DecodeResult<String> {
    match value {
        AttributeValue::Text(text) => Ok(text),
        other => Err(DecodeError::UnexpectedValueKind {
            field: name.to_string(),
            attribute,
            expected: "text",
            found: other.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::MemoryAttributeStore;

    fn store_with_velocity() -> MemoryAttributeStore {
        let mut store = MemoryAttributeStore::new();
        store
            .put_integer_attribute(EntityType::NodeBlock, 1, "Field@velocity@type", &[8])
            .unwrap();
        store
            .put_text_attribute(EntityType::NodeBlock, 1, "Field@velocity@separator", "")
            .unwrap();
        store
    }

    #[test]
    fn test_decode_fixed_type() {
        let store = store_with_velocity();
        let metrics = MetricsRegistry::new();
        let decoder = FieldDecoder::new(&store, &metrics);

        let field = decoder.decode(EntityType::NodeBlock, 1, "velocity").unwrap();
        assert_eq!(field.types, vec![FieldType::Vector3D]);
        assert!(field.separators.is_empty());
        assert_eq!(field.cardinality, vec![0]);
        assert_eq!(field.suffices, None);
        assert_eq!(
            field.component_names().unwrap(),
            vec!["velocity_x", "velocity_y", "velocity_z"]
        );
        assert_eq!(metrics.snapshot().fields_decoded, 1);
    }

    #[test]
    fn test_missing_type_attribute() {
        let store = MemoryAttributeStore::new();
        let metrics = MetricsRegistry::new();
        let err = FieldDecoder::new(&store, &metrics)
            .decode(EntityType::NodeBlock, 1, "velocity")
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingAttribute {
                attribute: AttributeSuffix::Type,
                ..
            }
        ));
        assert_eq!(metrics.snapshot().fields_decoded, 0);
    }

    #[test]
    fn test_wrong_value_kind() {
        let mut store = MemoryAttributeStore::new();
        store
            .put_text_attribute(EntityType::NodeBlock, 1, "Field@f@type", "vector_3d")
            .unwrap();
        let metrics = MetricsRegistry::new();
        let err = FieldDecoder::new(&store, &metrics)
            .decode(EntityType::NodeBlock, 1, "f")
            .unwrap_err();
        assert_eq!(err.code(), "FIELD_UNEXPECTED_VALUE_KIND");
    }

    #[test]
    fn test_user_defined_components_from_suffices() {
        let field = FieldMetadata {
            name: "Species".into(),
            entity_type: EntityType::EdgeBlock,
            entity_id: 100,
            types: vec![FieldType::UserDefined],
            separators: vec!['.'],
            cardinality: vec![2],
            suffices: Some(vec!["h2o".into(), "gas".into()]),
        };
        assert_eq!(field.component_names().unwrap(), vec!["Species.h2o", "Species.gas"]);
    }

    #[test]
    fn test_user_defined_without_suffices() {
        let field = FieldMetadata {
            name: "Species".into(),
            entity_type: EntityType::EdgeBlock,
            entity_id: 100,
            types: vec![FieldType::UserDefined],
            separators: Vec::new(),
            cardinality: vec![2],
            suffices: None,
        };
        assert!(matches!(
            field.component_names().unwrap_err(),
            DecodeError::ComponentCountMismatch {
                expected: 2,
                actual: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_reserved_type_has_no_components() {
        let field = FieldMetadata {
            name: "u".into(),
            entity_type: EntityType::ElementBlock,
            entity_id: 1,
            types: vec![FieldType::Basis],
            separators: Vec::new(),
            cardinality: vec![0],
            suffices: None,
        };
        assert!(matches!(
            field.component_names().unwrap_err(),
            DecodeError::UnsupportedComponentType {
                field_type: FieldType::Basis,
                ..
            }
        ));
    }

    #[test]
    fn test_field_names_only_lists_type_keys() {
        let mut store = store_with_velocity();
        store
            .put_text_attribute(EntityType::NodeBlock, 1, "title", "unrelated")
            .unwrap();
        store
            .put_integer_attribute(EntityType::NodeBlock, 1, "Field@accel@type", &[5])
            .unwrap();
        store
            .put_integer_attribute(EntityType::NodeBlock, 2, "Field@other@type", &[5])
            .unwrap();

        let metrics = MetricsRegistry::new();
        let names = FieldDecoder::new(&store, &metrics)
            .field_names(EntityType::NodeBlock, 1)
            .unwrap();
        assert_eq!(names, vec!["accel", "velocity"]);
    }

    fn sequence_field(cardinality: Vec<i64>) -> FieldMetadata {
        FieldMetadata {
            name: "history".into(),
            entity_type: EntityType::ElementBlock,
            entity_id: 1,
            types: vec![FieldType::Sequence; cardinality.len()],
            separators: Vec::new(),
            cardinality,
            suffices: None,
        }
    }

    #[test]
    fn test_huge_sequence_cardinality_rejected() {
        let err = sequence_field(vec![i64::MAX]).component_names().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TooManyComponents {
                limit: MAX_COMPONENTS,
                ..
            }
        ));
        assert_eq!(err.code(), "FIELD_TOO_MANY_COMPONENTS");
    }

    #[test]
    fn test_nested_product_over_limit_rejected() {
        // Each level fits on its own; the product does not.
        let err = sequence_field(vec![100_000, 100_000])
            .component_names()
            .unwrap_err();
        assert!(matches!(err, DecodeError::TooManyComponents { .. }));
    }

    #[test]
    fn test_empty_level_does_not_mask_huge_level() {
        let err = sequence_field(vec![0, i64::MAX]).component_names().unwrap_err();
        assert!(matches!(err, DecodeError::TooManyComponents { .. }));
    }

    #[test]
    fn test_sequence_at_limit_expands() {
        let names = sequence_field(vec![MAX_COMPONENTS as i64])
            .component_names()
            .unwrap();
        assert_eq!(names.len(), MAX_COMPONENTS);
        assert_eq!(names[0], "history_0000001");
    }
}
