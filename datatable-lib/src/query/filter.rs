//! Filter values.

use serde::Deserialize;
use serde::Serialize;

/// The value of a named list filter.
///
/// Filter vocabularies are defined per table; the core only needs to encode
/// the value into a query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Boolean flag, encoded as `true` / `false`.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Free text, encoded verbatim.
    Text(String),
}

impl FilterValue {
    /// Parses a command-line style value: `true`/`false`, an integer, or text.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => raw
                .parse::<i64>()
                .map(Self::Int)
                .unwrap_or_else(|_| Self::Text(raw.to_string())),
        }
    }

    /// Returns the boolean value, if this is a flag.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(FilterValue::parse("true"), FilterValue::Bool(true));
        assert_eq!(FilterValue::parse("false"), FilterValue::Bool(false));
        assert_eq!(FilterValue::parse("-4"), FilterValue::Int(-4));
        assert_eq!(FilterValue::parse("null"), FilterValue::Text("null".into()));
    }

    #[test]
    fn test_display() {
        assert_eq!(FilterValue::from(true).to_string(), "true");
        assert_eq!(FilterValue::from(12).to_string(), "12");
        assert_eq!(FilterValue::from("a b").to_string(), "a b");
    }
}
