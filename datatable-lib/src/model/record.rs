//! Opaque list records

use std::cmp::Ordering;

use serde_json::Map;
use serde_json::Value;

use crate::error::FetchError;

/// Unique identifier of a record within one list endpoint.
///
/// Endpoints may use string or integer keys; both are normalized to their
/// textual form so they compare and hash uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Creates an id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the textual form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Orders integer ids numerically ahead of text ids, which order by text.
    pub fn cmp_natural(&self, other: &Self) -> Ordering {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }

    /// Reads an id from a JSON string or integer.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

/// A record returned by a list endpoint.
///
/// The schema is defined by the endpoint; fields are kept as raw JSON and
/// accessed by name. The only structural requirement is a unique id.
///
/// # Example
///
/// ```
/// use datatable_lib::model::Record;
///
/// let record = Record::new(7)
///     .set("name", "Resistors")
///     .set("structural", false);
///
/// assert_eq!(record.id().as_str(), "7");
/// assert_eq!(record.get_str("name"), Some("Resistors"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record with the given id.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Decodes a record from a JSON object, reading the id from `id_field`.
    ///
    /// The id field is kept among the fields so it can be displayed.
    pub fn from_json(value: Value, id_field: &str) -> Result<Self, FetchError> {
        let Value::Object(fields) = value else {
            return Err(FetchError::decode(format!(
                "expected record object, found {}",
                json_type(&value)
            )));
        };

        let id = fields
            .get(id_field)
            .and_then(RecordId::from_json)
            .ok_or_else(|| {
                FetchError::decode(format!("record is missing a valid `{}` field", id_field))
            })?;

        Ok(Self { id, fields })
    }

    /// Sets a field value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns the record id.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Resolves a dotted path such as `parent_detail.name`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns a string field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns a boolean field.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Returns an integer field.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// Returns all fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record and returns its fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_with_integer_pk() {
        let record = Record::from_json(
            json!({"pk": 12, "name": "Capacitors", "pathstring": "Electronics/Capacitors"}),
            "pk",
        )
        .unwrap();

        assert_eq!(record.id(), &RecordId::from(12));
        assert_eq!(record.get_str("pathstring"), Some("Electronics/Capacitors"));
        assert_eq!(record.get_i64("pk"), Some(12));
    }

    #[test]
    fn test_from_json_with_string_id() {
        let record = Record::from_json(json!({"id": "abc"}), "id").unwrap();
        assert_eq!(record.id().as_str(), "abc");
    }

    #[test]
    fn test_natural_id_order() {
        let mut ids = vec![
            RecordId::from("b"),
            RecordId::from(10),
            RecordId::from("a"),
            RecordId::from(2),
            RecordId::from(-1),
        ];
        ids.sort_by(RecordId::cmp_natural);

        let ids: Vec<_> = ids.iter().map(RecordId::as_str).collect();
        assert_eq!(ids, vec!["-1", "2", "10", "a", "b"]);
        assert_eq!(RecordId::from("abc").as_i64(), None);
    }

    #[test]
    fn test_from_json_rejects_missing_or_invalid_id() {
        let err = Record::from_json(json!({"name": "x"}), "pk").unwrap_err();
        assert!(err.detail().contains("`pk`"));

        assert!(Record::from_json(json!({"pk": null}), "pk").is_err());
        assert!(Record::from_json(json!({"pk": 1.5}), "pk").is_err());
        assert!(Record::from_json(json!([1, 2]), "pk").is_err());
    }

    #[test]
    fn test_lookup_nested() {
        let record = Record::from_json(
            json!({"id": 1, "parent": {"name": "Root", "tags": ["a", "b"]}}),
            "id",
        )
        .unwrap();

        assert_eq!(record.lookup("parent.name"), Some(&json!("Root")));
        assert_eq!(record.lookup("parent.tags.1"), Some(&json!("b")));
        assert_eq!(record.lookup("parent.missing"), None);
        assert_eq!(record.lookup("id.deeper"), None);
    }
}
