//! Component Naming Tests
//!
//! Encode a field, read it back, and expand its component names.

use meshfield::attribute::MemoryAttributeStore;
use meshfield::config::EncoderConfig;
use meshfield::field::{
    DecodeError, EntityType, FieldDecoder, FieldDescriptor, FieldEncoder, FieldType,
};
use meshfield::observability::{EncodeContext, MetricsRegistry};

fn components_of(field: &FieldDescriptor, suffices: Option<&str>) -> Result<Vec<String>, DecodeError> {
    let metrics = MetricsRegistry::new();
    let config = EncoderConfig::default();
    let mut store = MemoryAttributeStore::new();

    {
        let ctx = EncodeContext::with_log_reporter(&metrics, &config);
        let mut encoder = FieldEncoder::new(&mut store, ctx);
        encoder.encode(field).unwrap();
        if let Some(csv) = suffices {
            encoder.encode_suffix_list(field, csv).unwrap();
        }
    }

    FieldDecoder::new(&store, &metrics)
        .decode(field.entity_type, field.entity_id, &field.name)?
        .component_names()
}

#[test]
fn test_vector_3d_velocity() {
    let field = FieldDescriptor::new("velocity", EntityType::NodeBlock, 1, vec![FieldType::Vector3D]);
    assert_eq!(
        components_of(&field, None).unwrap(),
        vec!["velocity_x", "velocity_y", "velocity_z"]
    );
}

#[test]
fn test_scalar_is_base_name() {
    let field = FieldDescriptor::new("pressure", EntityType::ElementBlock, 1, vec![FieldType::Scalar]);
    assert_eq!(components_of(&field, None).unwrap(), vec!["pressure"]);
}

#[test]
fn test_single_separator_used_at_every_level() {
    let field = FieldDescriptor::new(
        "grad",
        EntityType::ElementBlock,
        1,
        vec![FieldType::Vector2D, FieldType::Vector2D],
    )
    .with_separators(['.']);

    assert_eq!(
        components_of(&field, None).unwrap(),
        vec!["grad.x.x", "grad.y.x", "grad.x.y", "grad.y.y"]
    );
}

#[test]
fn test_tensor_per_integration_point() {
    let field = FieldDescriptor::new(
        "stress",
        EntityType::ElementBlock,
        1,
        vec![FieldType::SymTensor33, FieldType::Sequence],
    )
    .with_cardinality(vec![0, 2]);

    let names = components_of(&field, None).unwrap();
    assert_eq!(names.len(), 12);
    assert_eq!(names[0], "stress_xx_1");
    assert_eq!(names[5], "stress_zx_1");
    assert_eq!(names[6], "stress_xx_2");
    assert_eq!(names[11], "stress_zx_2");
}

#[test]
fn test_user_defined_species() {
    let field = FieldDescriptor::user_defined("Species", EntityType::EdgeBlock, 100, 4)
        .with_separators(['%']);
    assert_eq!(
        components_of(&field, Some("h2o,gas,ch4,methane")).unwrap(),
        vec!["Species%h2o", "Species%gas", "Species%ch4", "Species%methane"]
    );
}

#[test]
fn test_user_defined_without_suffix_list() {
    let field = FieldDescriptor::user_defined("Species", EntityType::EdgeBlock, 100, 2);
    assert!(matches!(
        components_of(&field, None),
        Err(DecodeError::ComponentCountMismatch { .. })
    ));
}

#[test]
fn test_matrix_suffixes() {
    let field = FieldDescriptor::new("m", EntityType::FaceBlock, 3, vec![FieldType::Matrix2x2]);
    assert_eq!(
        components_of(&field, None).unwrap(),
        vec!["m_11", "m_12", "m_21", "m_22"]
    );
}

#[test]
fn test_huge_sequence_is_refused_not_allocated() {
    let field = FieldDescriptor::new("history", EntityType::ElementBlock, 1, vec![FieldType::Sequence])
        .with_cardinality(vec![i64::MAX]);
    assert!(matches!(
        components_of(&field, None),
        Err(DecodeError::TooManyComponents { .. })
    ));
}
