//! # Attribute Store Trait

use crate::field::EntityType;

use super::errors::StoreResult;
use super::value::AttributeValue;

/// Key/value persistence for named attributes scoped to a mesh entity.
///
/// Writers take `&mut self`; concurrent writes to one handle must be
/// serialized by the owner of the handle.
pub trait AttributeStore {
    /// Store an integer sequence under `name`.
    fn put_integer_attribute(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        values: &[i64],
    ) -> StoreResult<()>;

    /// Store a text value under `name`.
    fn put_text_attribute(
        &mut self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
        value: &str,
    ) -> StoreResult<()>;

    /// Fetch the value stored under `name`, if any.
    fn get_attribute(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        name: &str,
    ) -> StoreResult<Option<AttributeValue>>;

    /// Names of every attribute on the entity, sorted.
    fn attribute_names(&self, entity_type: EntityType, entity_id: i64) -> StoreResult<Vec<String>>;

    /// Identifies the handle in diagnostics.
    fn location(&self) -> String;
}
