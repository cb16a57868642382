//! Array schema the row writer validates values against.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Expected type of one array element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Any scalar
    #[default]
    Any,
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON boolean
    Boolean,
}

impl FieldKind {
    /// Whether `value` fits this kind. Null fits every kind.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldKind::Any, v) => !v.is_array() && !v.is_object(),
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

/// One positional field of an array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,
    /// Expected element type
    #[serde(default)]
    pub kind: FieldKind,
}

/// Schema of an array-typed value.
///
/// An empty field list accepts arrays of any length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Schema name
    pub name: String,
    /// Positional fields
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl ArraySchema {
    /// Creates a schema with no declared fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a schema of `count` untyped fields named `f0`, `f1`, ...
    pub fn untyped(name: impl Into<String>, count: usize) -> Self {
        (0..count).fold(Self::new(name), |schema, i| {
            schema.with_field(format!("f{i}"), FieldKind::Any)
        })
    }

    /// Appends a field.
    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSchema {
            name: name.into(),
            kind,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_accepts() {
        assert!(FieldKind::Any.accepts(&json!(1)));
        assert!(FieldKind::Any.accepts(&json!("x")));
        assert!(!FieldKind::Any.accepts(&json!([1])));
        assert!(!FieldKind::Any.accepts(&json!({"a": 1})));
        assert!(FieldKind::Number.accepts(&json!(null)));
        assert!(!FieldKind::Number.accepts(&json!("1")));
        assert!(FieldKind::Boolean.accepts(&json!(false)));
    }

    #[test]
    fn test_schema_from_json() {
        let schema: ArraySchema = serde_json::from_str(
            r#"{"name":"order","fields":[{"name":"id","kind":"number"},{"name":"note"}]}"#,
        )
        .unwrap();
        assert_eq!(schema.fields.len(), 2);
        assert_eq!(schema.fields[0].kind, FieldKind::Number);
        assert_eq!(schema.fields[1].kind, FieldKind::Any);
    }

    #[test]
    fn test_untyped() {
        let schema = ArraySchema::untyped("row", 3);
        let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["f0", "f1", "f2"]);
    }
}
