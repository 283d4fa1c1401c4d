use serde_json::{Map, Value};

/// A schemaless record as it lives in the store.
pub type Document = Map<String, Value>;

/// Primary key field of every document.
pub const ID_FIELD: &str = "_id";

/// Conjunction of equality conditions on top-level fields.
///
/// A condition on a field the document lacks matches only when the expected
/// value is `null`, the same way a document database treats missing fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::all().eq(ID_FIELD, id)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            document.get(field).unwrap_or(&Value::Null) == expected
        })
    }
}

/// Copies only `fields` (plus `_id`) out of `document`.
pub fn project(document: &Document, fields: &[&str]) -> Document {
    document
        .iter()
        .filter(|(key, _)| key.as_str() == ID_FIELD || fields.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Reads `_id` as a string, the only id representation the stores accept.
pub fn document_id(document: &Document) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}
