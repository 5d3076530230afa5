//! Field descriptor type definitions
//!
//! Two enumerations are persisted by numeric tag and therefore form a stable
//! on-disk contract:
//! - `FieldType`: the per-level type classification written into the
//!   `Field@<name>@type` attribute
//! - `EntityType`: the category of mesh entity an attribute is attached to
//!
//! New tags may only be appended. Existing values are never reordered or reused.

use std::fmt;
use std::str::FromStr;

/// Default separator placed between a field's base name and a component suffix.
pub const DEFAULT_SEPARATOR: char = '_';

/// Per-level field type classification.
///
/// The discriminants are the persisted tags. Tags written by a newer version
/// that this build does not know decode to `Unknown(tag)` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Invalid,
    /// Components are named by a caller-supplied suffix list
    UserDefined,
    /// Components are numbered `1..=cardinality`
    Sequence,
    /// Reserved; basis metadata is not supported yet
    Basis,
    /// Reserved; quadrature metadata is not supported yet
    Quadrature,
    Scalar,
    Vector1D,
    Vector2D,
    Vector3D,
    Quaternion2D,
    Quaternion3D,
    FullTensor36,
    FullTensor32,
    FullTensor22,
    FullTensor16,
    FullTensor12,
    SymTensor33,
    SymTensor31,
    SymTensor21,
    SymTensor13,
    SymTensor11,
    SymTensor10,
    AsymTensor03,
    AsymTensor02,
    AsymTensor01,
    Matrix2x2,
    Matrix3x3,
    /// Tag not known to this version
    Unknown(i64),
}

/// Every known variant in tag order. Index == tag.
const KNOWN_TYPES: [FieldType; 27] = [
    FieldType::Invalid,
    FieldType::UserDefined,
    FieldType::Sequence,
    FieldType::Basis,
    FieldType::Quadrature,
    FieldType::Scalar,
    FieldType::Vector1D,
    FieldType::Vector2D,
    FieldType::Vector3D,
    FieldType::Quaternion2D,
    FieldType::Quaternion3D,
    FieldType::FullTensor36,
    FieldType::FullTensor32,
    FieldType::FullTensor22,
    FieldType::FullTensor16,
    FieldType::FullTensor12,
    FieldType::SymTensor33,
    FieldType::SymTensor31,
    FieldType::SymTensor21,
    FieldType::SymTensor13,
    FieldType::SymTensor11,
    FieldType::SymTensor10,
    FieldType::AsymTensor03,
    FieldType::AsymTensor02,
    FieldType::AsymTensor01,
    FieldType::Matrix2x2,
    FieldType::Matrix3x3,
];

impl FieldType {
    /// Returns the persisted numeric tag.
    pub fn tag(&self) -> i64 {
        match self {
            FieldType::Invalid => 0,
            FieldType::UserDefined => 1,
            FieldType::Sequence => 2,
            FieldType::Basis => 3,
            FieldType::Quadrature => 4,
            FieldType::Scalar => 5,
            FieldType::Vector1D => 6,
            FieldType::Vector2D => 7,
            FieldType::Vector3D => 8,
            FieldType::Quaternion2D => 9,
            FieldType::Quaternion3D => 10,
            FieldType::FullTensor36 => 11,
            FieldType::FullTensor32 => 12,
            FieldType::FullTensor22 => 13,
            FieldType::FullTensor16 => 14,
            FieldType::FullTensor12 => 15,
            FieldType::SymTensor33 => 16,
            FieldType::SymTensor31 => 17,
            FieldType::SymTensor21 => 18,
            FieldType::SymTensor13 => 19,
            FieldType::SymTensor11 => 20,
            FieldType::SymTensor10 => 21,
            FieldType::AsymTensor03 => 22,
            FieldType::AsymTensor02 => 23,
            FieldType::AsymTensor01 => 24,
            FieldType::Matrix2x2 => 25,
            FieldType::Matrix3x3 => 26,
            FieldType::Unknown(tag) => *tag,
        }
    }

    /// Maps a persisted tag back to a type, falling back to `Unknown`.
    pub fn from_tag(tag: i64) -> Self {
        usize::try_from(tag)
            .ok()
            .and_then(|idx| KNOWN_TYPES.get(idx).copied())
            .unwrap_or(FieldType::Unknown(tag))
    }

    /// All types known to this version, in tag order.
    pub fn known() -> &'static [FieldType] {
        &KNOWN_TYPES
    }

    /// Returns the lowercase name used in logs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Invalid => "invalid",
            FieldType::UserDefined => "user_defined",
            FieldType::Sequence => "sequence",
            FieldType::Basis => "basis",
            FieldType::Quadrature => "quadrature",
            FieldType::Scalar => "scalar",
            FieldType::Vector1D => "vector_1d",
            FieldType::Vector2D => "vector_2d",
            FieldType::Vector3D => "vector_3d",
            FieldType::Quaternion2D => "quaternion_2d",
            FieldType::Quaternion3D => "quaternion_3d",
            FieldType::FullTensor36 => "full_tensor_36",
            FieldType::FullTensor32 => "full_tensor_32",
            FieldType::FullTensor22 => "full_tensor_22",
            FieldType::FullTensor16 => "full_tensor_16",
            FieldType::FullTensor12 => "full_tensor_12",
            FieldType::SymTensor33 => "sym_tensor_33",
            FieldType::SymTensor31 => "sym_tensor_31",
            FieldType::SymTensor21 => "sym_tensor_21",
            FieldType::SymTensor13 => "sym_tensor_13",
            FieldType::SymTensor11 => "sym_tensor_11",
            FieldType::SymTensor10 => "sym_tensor_10",
            FieldType::AsymTensor03 => "asym_tensor_03",
            FieldType::AsymTensor02 => "asym_tensor_02",
            FieldType::AsymTensor01 => "asym_tensor_01",
            FieldType::Matrix2x2 => "matrix_2x2",
            FieldType::Matrix3x3 => "matrix_3x3",
            FieldType::Unknown(_) => "unknown",
        }
    }

    /// Whether the component count of this level comes from the descriptor's
    /// cardinality rather than from the type itself.
    pub fn needs_cardinality(&self) -> bool {
        matches!(self, FieldType::UserDefined | FieldType::Sequence)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Unknown(tag) => write!(f, "unknown({})", tag),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        KNOWN_TYPES
            .iter()
            .find(|t| t.as_str() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown field type '{}'", s))
    }
}

/// Category of mesh entity that attributes attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityType {
    ElementBlock,
    NodeSet,
    SideSet,
    ElementMap,
    NodeMap,
    EdgeBlock,
    EdgeSet,
    FaceBlock,
    FaceSet,
    ElementSet,
    EdgeMap,
    FaceMap,
    Global,
    NodeBlock,
    Assembly,
    Blob,
}

const ENTITY_TYPES: [EntityType; 16] = [
    EntityType::ElementBlock,
    EntityType::NodeSet,
    EntityType::SideSet,
    EntityType::ElementMap,
    EntityType::NodeMap,
    EntityType::EdgeBlock,
    EntityType::EdgeSet,
    EntityType::FaceBlock,
    EntityType::FaceSet,
    EntityType::ElementSet,
    EntityType::EdgeMap,
    EntityType::FaceMap,
    EntityType::Global,
    EntityType::NodeBlock,
    EntityType::Assembly,
    EntityType::Blob,
];

impl EntityType {
    /// Returns the persisted numeric tag.
    pub fn tag(&self) -> u32 {
        match self {
            EntityType::ElementBlock => 1,
            EntityType::NodeSet => 2,
            EntityType::SideSet => 3,
            EntityType::ElementMap => 4,
            EntityType::NodeMap => 5,
            EntityType::EdgeBlock => 6,
            EntityType::EdgeSet => 7,
            EntityType::FaceBlock => 8,
            EntityType::FaceSet => 9,
            EntityType::ElementSet => 10,
            EntityType::EdgeMap => 11,
            EntityType::FaceMap => 12,
            EntityType::Global => 13,
            EntityType::NodeBlock => 14,
            EntityType::Assembly => 16,
            EntityType::Blob => 17,
        }
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        ENTITY_TYPES.iter().find(|e| e.tag() == tag).copied()
    }

    /// Human readable name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            EntityType::ElementBlock => "element block",
            EntityType::NodeSet => "node set",
            EntityType::SideSet => "side set",
            EntityType::ElementMap => "element map",
            EntityType::NodeMap => "node map",
            EntityType::EdgeBlock => "edge block",
            EntityType::EdgeSet => "edge set",
            EntityType::FaceBlock => "face block",
            EntityType::FaceSet => "face set",
            EntityType::ElementSet => "element set",
            EntityType::EdgeMap => "edge map",
            EntityType::FaceMap => "face map",
            EntityType::Global => "global",
            EntityType::NodeBlock => "nodal",
            EntityType::Assembly => "assembly",
            EntityType::Blob => "blob",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EntityType {
    type Err = String;

    /// Accepts the diagnostic name with spaces, dashes or underscores
    /// (`edge block`, `edge-block`, `edge_block`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        ENTITY_TYPES
            .iter()
            .find(|e| e.name() == wanted)
            .copied()
            .ok_or_else(|| format!("unknown entity type '{}'", s))
    }
}

/// Description of one named field attached to a mesh entity.
///
/// The descriptor is a plain value. Encoders borrow it and never mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, unique per (entity_type, entity_id)
    pub name: String,
    /// Category of the owning entity
    pub entity_type: EntityType,
    /// Identifier of the owning entity
    pub entity_id: i64,
    /// One type per nesting level
    pub types: Vec<FieldType>,
    /// Parallel to `types`; only read for user-defined and sequence levels
    pub cardinality: Vec<i64>,
    /// Empty, a single separator, or one separator per level
    pub component_separator: Vec<char>,
}

impl FieldDescriptor {
    /// Create a descriptor with zero cardinality and the default separator.
    pub fn new(
        name: impl Into<String>,
        entity_type: EntityType,
        entity_id: i64,
        types: Vec<FieldType>,
    ) -> Self {
        let cardinality = vec![0; types.len()];
        Self {
            name: name.into(),
            entity_type,
            entity_id,
            types,
            cardinality,
            component_separator: Vec::new(),
        }
    }

    /// Create a single-level user-defined field with `cardinality` components.
    pub fn user_defined(
        name: impl Into<String>,
        entity_type: EntityType,
        entity_id: i64,
        cardinality: i64,
    ) -> Self {
        Self::new(name, entity_type, entity_id, vec![FieldType::UserDefined])
            .with_cardinality(vec![cardinality])
    }

    pub fn with_cardinality(mut self, cardinality: Vec<i64>) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn with_separators(mut self, separators: impl IntoIterator<Item = char>) -> Self {
        self.component_separator = separators.into_iter().collect();
        self
    }

    /// Number of type levels.
    pub fn nesting(&self) -> usize {
        self.types.len()
    }

    /// True if any level is user-defined or a sequence.
    pub fn needs_cardinality(&self) -> bool {
        self.types.iter().any(FieldType::needs_cardinality)
    }

    /// The separator text exactly as persisted.
    pub fn separator_text(&self) -> String {
        self.component_separator.iter().collect()
    }

    /// Whether the separator count is one of the three legal forms.
    pub fn has_valid_separator_count(&self) -> bool {
        let count = self.component_separator.len();
        count == 0 || count == 1 || count == self.nesting()
    }

    /// The numeric tags of every level, as written to the `type` attribute.
    pub fn type_tags(&self) -> Vec<i64> {
        self.types.iter().map(FieldType::tag).collect()
    }

    /// Separator used in front of the component suffix of `level`.
    pub fn separator_for_level(&self, level: usize) -> char {
        resolve_separator(&self.component_separator, level)
    }
}

/// Applies the 0 / 1 / per-level separator convention.
pub(crate) fn resolve_separator(separators: &[char], level: usize) -> char {
    match separators.len() {
        0 => DEFAULT_SEPARATOR,
        1 => separators[0],
        _ => separators
            .get(level)
            .copied()
            .unwrap_or(DEFAULT_SEPARATOR),
    }
}
