//! Key chains and path resolution over nested JSON
//!
//! A [`Path`] is a deterministic chain of object field names and array
//! indices. Resolution walks the chain left to right and yields `None` as soon
//! as a step cannot be taken, so a missing value and a stored `null` remain
//! distinguishable (`None` vs `Some(&Value::Null)`).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One step of a path: an object field name or an array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Field(String),
    /// Negative indices never match (no wrap-around)
    Index(i64),
}

impl Key {
    /// Take one step from `current`, or `None` if the shapes don't line up
    fn step<'a>(&self, current: &'a Value) -> Option<&'a Value> {
        match (self, current) {
            (Key::Field(name), Value::Object(map)) => map.get(name),
            (Key::Index(index), Value::Array(items)) => {
                usize::try_from(*index).ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    fn from_json(field: &str, key: &Value) -> Result<Self, ConfigError> {
        if let Some(name) = key.as_str() {
            return Ok(Key::Field(name.to_string()));
        }
        if let Some(index) = key.as_i64() {
            return Ok(Key::Index(index));
        }
        Err(ConfigError::MalformedKey {
            field: field.to_string(),
            key: key.clone(),
        })
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Field(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Field(name)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(i64::from(index))
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Field(name) => write!(f, "{}", name),
            Key::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// An ordered chain of keys locating a value inside nested data
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Key>);

impl Path {
    pub fn new(keys: Vec<Key>) -> Self {
        Path(keys)
    }

    /// The empty path, which resolves to the record itself
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parse a dotted path such as `laureates.0.knownName.en`
    ///
    /// Segments made only of digits (with an optional leading `-`) become
    /// indices; everything else is a field name. Empty segments are skipped.
    pub fn parse_dotted(raw: &str) -> Self {
        let keys = raw
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.parse::<i64>() {
                Ok(index) => Key::Index(index),
                Err(_) => Key::Field(segment.to_string()),
            })
            .collect();
        Path(keys)
    }

    /// Decode a path from a JSON array of strings and integers
    ///
    /// `field` names the output field the path belongs to, for error reporting.
    pub fn from_json(field: &str, value: &Value) -> Result<Self, ConfigError> {
        let Value::Array(items) = value else {
            return Err(ConfigError::MalformedSpec {
                field: field.to_string(),
                spec: value.clone(),
            });
        };

        items
            .iter()
            .map(|key| Key::from_json(field, key))
            .collect::<Result<Vec<_>, _>>()
            .map(Path)
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Path(keys)
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.0.iter().enumerate() {
            match key {
                Key::Field(_) if i > 0 => write!(f, ".{}", key)?,
                _ => write!(f, "{}", key)?,
            }
        }
        Ok(())
    }
}

/// Build a [`Path`] from a mix of field names and indices
///
/// ```rust
/// use ladle::path;
///
/// let p = path!["a", "b", 0, "c"];
/// assert_eq!(p.to_string(), "a.b[0].c");
/// ```
#[macro_export]
macro_rules! path {
    ($($key:expr),* $(,)?) => {
        $crate::projection::Path::new(vec![$($crate::projection::Key::from($key)),*])
    };
}

/// Resolve `path` against `record`
///
/// Returns `None` when any step hits a missing field, an out-of-range or
/// negative index, or a value of the wrong shape. The empty path returns the
/// record itself.
pub fn resolve<'a>(record: &'a Value, path: &Path) -> Option<&'a Value> {
    path.keys()
        .iter()
        .try_fold(record, |current, key| key.step(current))
}

/// Like [`resolve`], but starting from a root that may itself be missing
pub fn resolve_missing<'a>(record: Option<&'a Value>, path: &Path) -> Option<&'a Value> {
    record.and_then(|record| resolve(record, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({"a": {"b": [{"c": 1}], "d": {"e": "2001-05-01"}, "n": null}})
    }

    #[test]
    fn test_resolve_nested_path() {
        let record = sample();
        assert_eq!(resolve(&record, &path!["a", "b", 0, "c"]), Some(&json!(1)));
        assert_eq!(
            resolve(&record, &path!["a", "d", "e"]),
            Some(&json!("2001-05-01"))
        );
    }

    #[test]
    fn test_empty_path_returns_record() {
        let record = sample();
        assert_eq!(resolve(&record, &Path::root()), Some(&record));

        let scalar = json!(42);
        assert_eq!(resolve(&scalar, &Path::root()), Some(&scalar));
    }

    #[test]
    fn test_missing_key_and_index() {
        let record = sample();
        assert_eq!(resolve(&record, &path!["a", "z"]), None);
        assert_eq!(resolve(&record, &path!["a", "b", 1]), None);
        assert_eq!(resolve(&record, &path!["a", "z", "deeper", 3]), None);
    }

    #[test]
    fn test_negative_index_does_not_wrap() {
        let record = json!({"a": [1, 2, 3]});
        assert_eq!(resolve(&record, &path!["a", -1]), None);
        assert_eq!(resolve(&record, &path!["a", 2]), Some(&json!(3)));
    }

    #[test]
    fn test_key_kind_mismatch() {
        let record = sample();
        // index into an object
        assert_eq!(resolve(&record, &path!["a", 0]), None);
        // field name on an array
        assert_eq!(resolve(&record, &path!["a", "b", "c"]), None);
        // anything on a scalar
        assert_eq!(resolve(&record, &path!["a", "d", "e", "x"]), None);
    }

    #[test]
    fn test_stored_null_is_not_missing() {
        let record = sample();
        assert_eq!(resolve(&record, &path!["a", "n"]), Some(&Value::Null));
        assert_eq!(resolve(&record, &path!["a", "n", "x"]), None);
    }

    #[test]
    fn test_resolve_from_missing_root() {
        assert_eq!(resolve_missing(None, &Path::root()), None);
        let record = sample();
        assert_eq!(
            resolve_missing(Some(&record), &path!["a", "b", 0, "c"]),
            Some(&json!(1))
        );
    }

    #[test]
    fn test_resolve_does_not_mutate() {
        let record = sample();
        let before = record.clone();
        let _ = resolve(&record, &path!["a", "b", 5]);
        let _ = resolve(&record, &path!["a", "b", 0, "c"]);
        assert_eq!(record, before);
    }

    #[test]
    fn test_parse_dotted() {
        let p = Path::parse_dotted("laureates.0.knownName.en");
        assert_eq!(p, path!["laureates", 0, "knownName", "en"]);
        assert_eq!(Path::parse_dotted(""), Path::root());
        assert_eq!(Path::parse_dotted("a.-1"), path!["a", -1]);
    }

    #[test]
    fn test_display() {
        assert_eq!(path!["a", "b", 0, "c"].to_string(), "a.b[0].c");
        assert_eq!(path![0, "x"].to_string(), "[0].x");
    }

    #[test]
    fn test_from_json() {
        let p = Path::from_json("val", &json!(["a", "b", 0, "c"])).unwrap();
        assert_eq!(p, path!["a", "b", 0, "c"]);

        let err = Path::from_json("val", &json!(["a", 1.5])).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedKey { ref field, .. } if field == "val"));

        let err = Path::from_json("val", &json!("a.b")).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedSpec { .. }));
    }

    #[test]
    fn test_serde_roundtrip_shape() {
        let p = path!["a", 0];
        assert_eq!(serde_json::to_value(&p).unwrap(), json!(["a", 0]));
    }
}
