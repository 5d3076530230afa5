//! In-memory attribute store

use std::collections::BTreeMap;

use crate::field::EntityType;

use super::errors::{StoreError, StoreResult};
use super::store::AttributeStore;
use super::value::AttributeValue;

type AttributeKey = (EntityType, i64, String);

/// Attribute store backed by an ordered map. Latest write wins.
#[derive(Debug, Default, Clone)]
pub struct MemoryAttributeStore {
    attributes: BTreeMap<AttributeKey, AttributeValue>,
}

impl MemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of attributes across all entities.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn put(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        value: AttributeValue,
    ) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::bad_param(format!(
                "attribute name must not be empty ({} {})",
                entity_type, entity_id
            )));
        }
        self.attributes
            .insert((entity_type, entity_id, name.to_string()), value);
        Ok(())
    }
}

impl AttributeStore for MemoryAttributeStore {
    fn put_integer_attribute(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        values: &[i64],
    ) -> StoreResult<()> {
        self.put(entity_type, entity_id, name, AttributeValue::Integer(values.to_vec()))
    }

    fn put_text_attribute(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        value: &str,
    ) -> StoreResult<()> {
        self.put(entity_type, entity_id, name, AttributeValue::Text(value.to_string()))
    }

    fn get_attribute(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
    ) -> StoreResult<Option<AttributeValue>> {
        Ok(self
            .attributes
            .get(&(entity_type, entity_id, name.to_string()))
            .cloned())
    }

    fn attribute_names(&self, entity_type: EntityType, entity_id: i64) -> StoreResult<Vec<String>> {
        Ok(self
            .attributes
            .keys()
            .filter(|(t, id, _)| *t == entity_type && *id == entity_id)
            .map(|(_, _, name)| name.clone())
            .collect())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
