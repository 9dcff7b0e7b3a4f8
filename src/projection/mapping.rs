//! Field mappings: output field name -> extraction instruction

use crate::error::ConfigError;
use crate::projection::path::Path;
use crate::transforms::TransformRegistry;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Signature shared by every transformer
///
/// The input is exactly what resolution produced (`None` when the path did
/// not resolve). Returning `None` marks the output field as missing.
pub type TransformFn = dyn Fn(Option<&Value>) -> Option<Value> + Send + Sync;

/// A named, shareable value transformer
#[derive(Clone)]
pub struct Transformer {
    name: Arc<str>,
    func: Arc<TransformFn>,
}

impl Transformer {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        Transformer {
            name: Arc::from(name.into()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, input: Option<&Value>) -> Option<Value> {
        (self.func)(input)
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transformer").field(&self.name).finish()
    }
}

/// How a single output field is extracted
#[derive(Debug, Clone)]
pub enum FieldSpec {
    /// Copy whatever the path resolves to
    Direct(Path),
    /// Feed the resolution result through a transformer
    Transformed(Path, Transformer),
}

impl FieldSpec {
    pub fn path(&self) -> &Path {
        match self {
            FieldSpec::Direct(path) | FieldSpec::Transformed(path, _) => path,
        }
    }

    pub fn transformer(&self) -> Option<&Transformer> {
        match self {
            FieldSpec::Direct(_) => None,
            FieldSpec::Transformed(_, transformer) => Some(transformer),
        }
    }

    /// Decode one mapping entry from untyped configuration
    ///
    /// Accepted shapes:
    /// - `["a", "b", 0]` - a direct path
    /// - `[["a", "b"], "year"]` - a path paired with a registered transformer
    /// - `{"path": ["a", "b"], "transform": "year"}` - the same pair, spelled out
    /// - `{"path": ["a", "b"]}` - a direct path, spelled out
    pub fn from_json(
        field: &str,
        spec: &Value,
        registry: &TransformRegistry,
    ) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedSpec {
            field: field.to_string(),
            spec: spec.clone(),
        };

        match spec {
            Value::Array(items) if matches!(items.first(), Some(Value::Array(_))) => {
                match items.as_slice() {
                    [path, Value::String(name)] => {
                        Self::transformed_from_json(field, path, name, registry)
                    }
                    _ => Err(malformed()),
                }
            }
            Value::Array(_) => Path::from_json(field, spec).map(FieldSpec::Direct),
            Value::Object(obj) => {
                let path = obj.get("path").ok_or_else(malformed)?;
                if obj.keys().any(|k| k != "path" && k != "transform") {
                    return Err(malformed());
                }
                match obj.get("transform") {
                    None => Path::from_json(field, path).map(FieldSpec::Direct),
                    Some(Value::String(name)) => {
                        Self::transformed_from_json(field, path, name, registry)
                    }
                    Some(_) => Err(malformed()),
                }
            }
            _ => Err(malformed()),
        }
    }

    fn transformed_from_json(
        field: &str,
        path: &Value,
        name: &str,
        registry: &TransformRegistry,
    ) -> Result<Self, ConfigError> {
        let path = Path::from_json(field, path)?;
        let transformer = registry
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTransformer {
                field: field.to_string(),
                name: name.to_string(),
            })?;
        Ok(FieldSpec::Transformed(path, transformer.clone()))
    }
}

/// Ordered table of output fields and how to extract each of them
///
/// Field names are unique; inserting an existing name replaces its spec.
/// Fields never depend on each other, so application order only affects the
/// key order of the output record.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    fields: IndexMap<String, FieldSpec>,
}

impl FieldMapping {
    pub fn new() -> Self {
        FieldMapping::default()
    }

    /// Add a direct field
    pub fn field(mut self, name: impl Into<String>, path: Path) -> Self {
        self.insert(name, FieldSpec::Direct(path));
        self
    }

    /// Add a transformed field
    pub fn transformed(
        mut self,
        name: impl Into<String>,
        path: Path,
        transformer: Transformer,
    ) -> Self {
        self.insert(name, FieldSpec::Transformed(path, transformer));
        self
    }

    /// Insert a spec, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, spec: FieldSpec) -> Option<FieldSpec> {
        self.fields.insert(name.into(), spec)
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode a whole mapping from a JSON object of field entries
    ///
    /// Entries are decoded in document order and the first malformed one
    /// aborts decoding with an error naming that field.
    pub fn from_json(value: &Value, registry: &TransformRegistry) -> Result<Self, ConfigError> {
        let Value::Object(entries) = value else {
            return Err(ConfigError::NotAMapping {
                found: value.clone(),
            });
        };

        let mut mapping = FieldMapping::new();
        for (field, spec) in entries {
            mapping.insert(field.clone(), FieldSpec::from_json(field, spec, registry)?);
        }
        Ok(mapping)
    }
}

impl FromIterator<(String, FieldSpec)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (String, FieldSpec)>>(iter: I) -> Self {
        FieldMapping {
            fields: iter.into_iter().collect(),
        }
    }
}
