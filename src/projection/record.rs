use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A flat projected record
///
/// Every mapped field is present; a field whose path did not resolve (or
/// whose transformer rejected the value) holds `None`. Equality ignores field
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputRecord {
    fields: IndexMap<String, Option<Value>>,
}

impl OutputRecord {
    pub fn new() -> Self {
        OutputRecord::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OutputRecord {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<Value>) {
        self.fields.insert(name.into(), value);
    }

    /// The resolved value of a field; `None` if missing or not mapped
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    /// Whether `name` is mapped but could not be resolved
    pub fn is_missing(&self, name: &str) -> bool {
        matches!(self.fields.get(name), Some(None))
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Convert to a JSON object; missing fields become `null`
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    pub fn into_value(self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .into_iter()
            .map(|(name, value)| (name, value.unwrap_or(Value::Null)))
            .collect();
        Value::Object(map)
    }

    fn to_map(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone().unwrap_or(Value::Null)))
            .collect()
    }
}

impl FromIterator<(String, Option<Value>)> for OutputRecord {
    fn from_iter<I: IntoIterator<Item = (String, Option<Value>)>>(iter: I) -> Self {
        OutputRecord {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Option<Value> serializes None as null, same as to_value
        self.fields.serialize(serializer)
    }
}
