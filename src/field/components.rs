//! Component naming for fixed field types
//!
//! A fixed type carries its own component labels. `UserDefined` and
//! `Sequence` levels take their count from the descriptor's cardinality, and
//! `Basis`, `Quadrature`, `Invalid` and unknown tags have no naming at all.

use super::types::{resolve_separator, FieldType};

/// Upper bound on the number of names a single field may expand to.
///
/// Cardinalities come straight from the store, so expansion is refused above
/// this rather than attempting the allocation.
pub const MAX_COMPONENTS: usize = 1 << 20;

const SCALAR: &[&str] = &[""];
const VECTOR_1D: &[&str] = &["x"];
const VECTOR_2D: &[&str] = &["x", "y"];
const VECTOR_3D: &[&str] = &["x", "y", "z"];
const QUATERNION_2D: &[&str] = &["s", "q"];
const QUATERNION_3D: &[&str] = &["x", "y", "z", "q"];
const FULL_TENSOR_36: &[&str] = &["xx", "yy", "zz", "xy", "yz", "zx", "yx", "zy", "xz"];
const FULL_TENSOR_32: &[&str] = &["xx", "yy", "zz", "xy", "yx"];
const FULL_TENSOR_22: &[&str] = &["xx", "yy", "xy", "yx"];
const FULL_TENSOR_16: &[&str] = &["xx", "xy", "yz", "zx", "yx", "zy", "xz"];
const FULL_TENSOR_12: &[&str] = &["xx", "xy", "yx"];
const SYM_TENSOR_33: &[&str] = &["xx", "yy", "zz", "xy", "yz", "zx"];
const SYM_TENSOR_31: &[&str] = &["xx", "yy", "zz", "xy"];
const SYM_TENSOR_21: &[&str] = &["xx", "yy", "xy"];
const SYM_TENSOR_13: &[&str] = &["xx", "xy", "yz", "zx"];
const SYM_TENSOR_11: &[&str] = &["xx", "xy"];
const SYM_TENSOR_10: &[&str] = &["xx"];
const ASYM_TENSOR_03: &[&str] = &["xy", "yz", "zx"];
const ASYM_TENSOR_02: &[&str] = &["xy", "yz"];
const ASYM_TENSOR_01: &[&str] = &["xy"];
const MATRIX_2X2: &[&str] = &["11", "12", "21", "22"];
const MATRIX_3X3: &[&str] = &["11", "12", "13", "21", "22", "23", "31", "32", "33"];

impl FieldType {
    fn fixed_suffixes(&self) -> Option<&'static [&'static str]> {
        let suffixes = match self {
            FieldType::Scalar => SCALAR,
            FieldType::Vector1D => VECTOR_1D,
            FieldType::Vector2D => VECTOR_2D,
            FieldType::Vector3D => VECTOR_3D,
            FieldType::Quaternion2D => QUATERNION_2D,
            FieldType::Quaternion3D => QUATERNION_3D,
            FieldType::FullTensor36 => FULL_TENSOR_36,
            FieldType::FullTensor32 => FULL_TENSOR_32,
            FieldType::FullTensor22 => FULL_TENSOR_22,
            FieldType::FullTensor16 => FULL_TENSOR_16,
            FieldType::FullTensor12 => FULL_TENSOR_12,
            FieldType::SymTensor33 => SYM_TENSOR_33,
            FieldType::SymTensor31 => SYM_TENSOR_31,
            FieldType::SymTensor21 => SYM_TENSOR_21,
            FieldType::SymTensor13 => SYM_TENSOR_13,
            FieldType::SymTensor11 => SYM_TENSOR_11,
            FieldType::SymTensor10 => SYM_TENSOR_10,
            FieldType::AsymTensor03 => ASYM_TENSOR_03,
            FieldType::AsymTensor02 => ASYM_TENSOR_02,
            FieldType::AsymTensor01 => ASYM_TENSOR_01,
            FieldType::Matrix2x2 => MATRIX_2X2,
            FieldType::Matrix3x3 => MATRIX_3X3,
            FieldType::Invalid
            | FieldType::UserDefined
            | FieldType::Sequence
            | FieldType::Basis
            | FieldType::Quadrature
            | FieldType::Unknown(_) => return None,
        };
        Some(suffixes)
    }

    /// Number of components a fixed type always has.
    pub fn component_count(&self) -> Option<usize> {
        self.fixed_suffixes().map(|suffixes| suffixes.len())
    }

    /// Suffix of the `index`-th component (0-based) of a fixed type.
    ///
    /// `Scalar` has one component with an empty suffix.
    pub fn component_suffix(&self, index: usize) -> Option<&'static str> {
        self.fixed_suffixes()
            .and_then(|suffixes| suffixes.get(index).copied())
    }
}

/// Labels for a `Sequence` level: `1..=count`, zero-padded to the width of
/// `count`.
pub fn sequence_labels(count: usize) -> Vec<String> {
    let width = count.to_string().len();
    (1..=count).map(|i| format!("{:0width$}", i, width = width)).collect()
}

/// Cartesian expansion of `base` over per-level label lists.
///
/// Level 0 is written next to the base name and varies fastest. A level whose
/// only label is empty contributes nothing, separator included. The caller
/// bounds the product of the level sizes.
pub fn expand(base: &str, levels: &[Vec<String>], separators: &[char]) -> Vec<String> {
    let mut names = vec![base.to_string()];

    // Build outward from level 0 so the outermost level ends up varying slowest.
    for (level, labels) in levels.iter().enumerate() {
        if labels.len() == 1 && labels[0].is_empty() {
            continue;
        }
        let separator = resolve_separator(separators, level);
        let mut next = Vec::with_capacity(names.len() * labels.len());
        for label in labels {
            for name in &names {
                next.push(format!("{}{}{}", name, separator, label));
            }
        }
        names = next;
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_component_counts() {
        assert_eq!(FieldType::Scalar.component_count(), Some(1));
        assert_eq!(FieldType::Vector3D.component_count(), Some(3));
        assert_eq!(FieldType::SymTensor33.component_count(), Some(6));
        assert_eq!(FieldType::FullTensor36.component_count(), Some(9));
        assert_eq!(FieldType::Matrix3x3.component_count(), Some(9));
        assert_eq!(FieldType::UserDefined.component_count(), None);
        assert_eq!(FieldType::Sequence.component_count(), None);
        assert_eq!(FieldType::Basis.component_count(), None);
        assert_eq!(FieldType::Unknown(40).component_count(), None);
    }

    #[test]
    fn test_every_fixed_type_has_distinct_suffixes() {
        for t in FieldType::known() {
            if let Some(count) = t.component_count() {
                let mut all: Vec<_> = (0..count).filter_map(|i| t.component_suffix(i)).collect();
                assert_eq!(all.len(), count, "{}", t);
                all.sort();
                all.dedup();
                assert_eq!(all.len(), count, "{}", t);
                assert_eq!(t.component_suffix(count), None);
            }
        }
    }

    #[test]
    fn test_named_suffixes() {
        assert_eq!(FieldType::Vector3D.component_suffix(2), Some("z"));
        assert_eq!(FieldType::SymTensor33.component_suffix(5), Some("zx"));
        assert_eq!(FieldType::Matrix2x2.component_suffix(2), Some("21"));
        assert_eq!(FieldType::Quaternion2D.component_suffix(0), Some("s"));
        assert_eq!(FieldType::Scalar.component_suffix(0), Some(""));
    }

    #[test]
    fn test_sequence_labels_padded() {
        assert_eq!(sequence_labels(3), owned(&["1", "2", "3"]));
        let ten = sequence_labels(10);
        assert_eq!(ten[0], "01");
        assert_eq!(ten[9], "10");
        assert!(sequence_labels(0).is_empty());
    }

    #[test]
    fn test_expand_single_level() {
        let names = expand("velocity", &[owned(&["x", "y", "z"])], &[]);
        assert_eq!(names, owned(&["velocity_x", "velocity_y", "velocity_z"]));
    }

    #[test]
    fn test_expand_scalar_contributes_nothing() {
        assert_eq!(expand("p", &[owned(&[""])], &[]), owned(&["p"]));
    }

    #[test]
    fn test_expand_level_zero_varies_fastest() {
        let names = expand(
            "stress",
            &[owned(&["xx", "yy"]), owned(&["1", "2"])],
            &['.', ':'],
        );
        assert_eq!(
            names,
            owned(&["stress.xx:1", "stress.yy:1", "stress.xx:2", "stress.yy:2"])
        );
    }
}
