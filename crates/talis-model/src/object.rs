//! External objects surfaced by a connector.
//!
//! An external object is an attribute-name to value-sequence bag, already
//! decoded from the connector wire protocol by the time it reaches this
//! crate. Attribute name lookup is case-sensitive.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single opaque value inside an external attribute's value sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Explicit null placeholder inside a sequence.
    Null,
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
}

impl AttributeValue {
    /// Check if this is the null placeholder.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Get as a string slice if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Textual form of a whole value sequence, e.g. `[active, pending]`.
    ///
    /// Multi-value equality comparisons are performed against this literal
    /// rendering; it is order-sensitive by definition.
    #[must_use]
    pub fn sequence_expression(values: &[AttributeValue]) -> String {
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("[{joined}]")
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::String(s) => write!(f, "{s}"),
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Float(x) => write!(f, "{x}"),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i64::from(i))
    }
}

impl From<f64> for AttributeValue {
    fn from(x: f64) -> Self {
        AttributeValue::Float(x)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<&serde_json::Value> for AttributeValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => AttributeValue::Null,
            serde_json::Value::Bool(b) => AttributeValue::Boolean(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    AttributeValue::Integer(i)
                } else {
                    AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => AttributeValue::String(s.clone()),
            // nested structures are rendered opaquely
            other => AttributeValue::String(other.to_string()),
        }
    }
}

/// A record surfaced by an external identity source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalObject {
    /// The connector-side unique identifier, when already known. Carried
    /// into per-object errors for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Attribute name to ordered value sequence.
    attributes: HashMap<String, Vec<AttributeValue>>,
}

impl ExternalObject {
    /// Create an empty external object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connector-side unique identifier.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Set an attribute using builder pattern.
    pub fn with<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.set(name, values);
        self
    }

    /// Set an attribute's value sequence.
    pub fn set<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Get an attribute's value sequence. Case-sensitive.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[AttributeValue]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Check if an attribute exists under exactly this name.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Get all attribute names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Build an external object from a JSON object, as produced by REST or
    /// script connectors. Scalars become single-element sequences, arrays
    /// keep their order, `null` becomes a single null placeholder.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut object = Self::new();
        for (name, value) in map {
            let values: Vec<AttributeValue> = match value {
                serde_json::Value::Array(items) => items.iter().map(AttributeValue::from).collect(),
                other => vec![AttributeValue::from(other)],
            };
            object.attributes.insert(name.clone(), values);
        }
        Some(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let object = ExternalObject::new()
            .with_uid("cn=jdoe,ou=people,dc=example,dc=com")
            .with("uid", ["jdoe"])
            .with("mail", ["jdoe@example.com"]);

        assert_eq!(object.len(), 2);
        assert_eq!(
            object.get("mail"),
            Some(&[AttributeValue::String("jdoe@example.com".into())][..])
        );
        assert!(object.has("uid"));
        assert!(!object.has("UID"), "lookup must be case-sensitive");
    }

    #[test]
    fn test_empty_sequence_is_distinct_from_absent() {
        let object = ExternalObject::new().with("mail", Vec::<AttributeValue>::new());
        assert!(object.has("mail"));
        assert_eq!(object.get("mail"), Some(&[][..]));
        assert_eq!(object.get("phone"), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(AttributeValue::Null.to_string(), "null");
        assert_eq!(AttributeValue::from("jdoe").to_string(), "jdoe");
        assert_eq!(AttributeValue::from(42i64).to_string(), "42");
        assert_eq!(AttributeValue::from(true).to_string(), "true");
    }

    #[test]
    fn test_sequence_expression() {
        let values = vec![AttributeValue::from("active"), AttributeValue::from("pending")];
        assert_eq!(AttributeValue::sequence_expression(&values), "[active, pending]");
        assert_eq!(AttributeValue::sequence_expression(&[]), "[]");
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "uid": "jdoe",
            "memberOf": ["admins", "users"],
            "manager": null,
            "loginCount": 7
        });
        let object = ExternalObject::from_json(&json).unwrap();

        assert_eq!(object.get("uid"), Some(&[AttributeValue::from("jdoe")][..]));
        assert_eq!(
            object.get("memberOf"),
            Some(&[AttributeValue::from("admins"), AttributeValue::from("users")][..])
        );
        assert_eq!(object.get("manager"), Some(&[AttributeValue::Null][..]));
        assert_eq!(object.get("loginCount"), Some(&[AttributeValue::from(7i64)][..]));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(ExternalObject::from_json(&serde_json::json!("scalar")).is_none());
    }
}
