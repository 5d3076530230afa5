//! Attribute key construction
//!
//! Field metadata is persisted under flat names of the form
//! `Field@<field name>@<suffix>`. The format is bit-exact and shared with every
//! reader of the store.

use std::fmt;

/// Prefix shared by every field metadata attribute.
pub const FIELD_KEY_PREFIX: &str = "Field";

/// Delimiter between the prefix, the field name and the suffix.
pub const KEY_DELIMITER: char = '@';

/// The sub-attribute a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeSuffix {
    Type,
    Separator,
    Cardinality,
    Suffices,
}

impl AttributeSuffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeSuffix::Type => "type",
            AttributeSuffix::Separator => "separator",
            AttributeSuffix::Cardinality => "cardinality",
            AttributeSuffix::Suffices => "suffices",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "type" => Some(AttributeSuffix::Type),
            "separator" => Some(AttributeSuffix::Separator),
            "cardinality" => Some(AttributeSuffix::Cardinality),
            "suffices" => Some(AttributeSuffix::Suffices),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Builds `Field@<field_name>@<suffix>`.
///
/// The field name is not inspected; see [`is_valid_field_name`].
pub fn build(field_name: &str, suffix: AttributeSuffix) -> String {
    format!(
        "{prefix}{d}{name}{d}{suffix}",
        prefix = FIELD_KEY_PREFIX,
        d = KEY_DELIMITER,
        name = field_name,
        suffix = suffix.as_str()
    )
}

/// Splits a key produced by [`build`] back into field name and suffix.
///
/// The suffix is taken after the last delimiter, so a field name that itself
/// contains `@` still round-trips.
pub fn parse(key: &str) -> Option<(&str, AttributeSuffix)> {
    let rest = key
        .strip_prefix(FIELD_KEY_PREFIX)?
        .strip_prefix(KEY_DELIMITER)?;
    let (name, suffix) = rest.rsplit_once(KEY_DELIMITER)?;
    if name.is_empty() {
        return None;
    }
    Some((name, AttributeSuffix::parse(suffix)?))
}

/// True if the name can be embedded in a key without ambiguity.
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(KEY_DELIMITER)
}
