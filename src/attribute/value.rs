//! Attribute values

use std::fmt;

/// A value stored against an entity attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Sequence of 64-bit integers
    Integer(Vec<i64>),
    /// Single text value
    Text(String),
}

impl AttributeValue {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Text(_) => "text",
        }
    }

    pub fn as_integers(&self) -> Option<&[i64]> {
        match self {
            AttributeValue::Integer(values) => Some(values),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => Some(value),
            AttributeValue::Integer(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AttributeValue::Text(value) => write!(f, "\"{}\"", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_match_kind() {
        let ints = AttributeValue::Integer(vec![16, 2]);
        assert_eq!(ints.as_integers(), Some(&[16, 2][..]));
        assert_eq!(ints.as_text(), None);
        assert_eq!(ints.kind_name(), "integer");

        let text = AttributeValue::Text(".:".into());
        assert_eq!(text.as_text(), Some(".:"));
        assert_eq!(text.as_integers(), None);
        assert_eq!(text.kind_name(), "text");
    }

    #[test]
    fn test_display() {
        assert_eq!(AttributeValue::Integer(vec![1, 4]).to_string(), "[1, 4]");
        assert_eq!(AttributeValue::Text("_".into()).to_string(), "\"_\"");
    }
}
