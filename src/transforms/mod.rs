//! Named transformers for config-driven mappings
//!
//! Mapping files refer to transformers by name; a [`TransformRegistry`]
//! resolves those names when the mapping is decoded.

pub mod parsers;

use crate::projection::Transformer;
use serde_json::Value;
use std::collections::HashMap;

/// Name -> transformer lookup table
#[derive(Debug, Clone, Default)]
pub struct TransformRegistry {
    transforms: HashMap<String, Transformer>,
}

impl TransformRegistry {
    /// An empty registry
    pub fn new() -> Self {
        TransformRegistry::default()
    }

    /// A registry preloaded with the built-in parsers and schema processors
    ///
    /// | name       | transformer                              |
    /// |------------|------------------------------------------|
    /// | `identity` | value unchanged                          |
    /// | `year`     | leading year of a date string            |
    /// | `int`      | lenient integer parsing                  |
    /// | `float`    | locale-aware decimal parsing             |
    /// | `prizes`   | prize list projected by the prize schema |
    pub fn with_builtins() -> Self {
        let mut registry = TransformRegistry::new();
        registry.register_fn("identity", parsers::identity);
        registry.register_fn("year", parsers::year_from_date);
        registry.register_fn("int", parsers::parse_int);
        registry.register_fn("float", parsers::parse_locale_float);
        registry.register(crate::schemas::prize::prize_processor().into_transformer("prizes"));
        registry
    }

    /// Register a transformer under its own name, returning any it replaced
    pub fn register(&mut self, transformer: Transformer) -> Option<Transformer> {
        self.transforms
            .insert(transformer.name().to_string(), transformer)
    }

    pub fn register_fn<F>(&mut self, name: &str, func: F) -> Option<Transformer>
    where
        F: Fn(Option<&Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.register(Transformer::new(name, func))
    }

    pub fn get(&self, name: &str) -> Option<&Transformer> {
        self.transforms.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtins_registered() {
        let registry = TransformRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["float", "identity", "int", "prizes", "year"]);

        let year = registry.get("year").unwrap();
        assert_eq!(year.apply(Some(&json!("1879-03-14"))), Some(json!(1879)));
    }

    #[test]
    fn test_prizes_builtin_projects_lists() {
        let registry = TransformRegistry::with_builtins();
        let prizes = registry.get("prizes").unwrap();

        let output = prizes
            .apply(Some(&json!([{"awardYear": "1921", "category": {"en": "Physics"}}])))
            .unwrap();
        let first = &output[0];
        assert_eq!(first["award_year"], json!(1921));
        assert_eq!(first["category_en"], json!("Physics"));
        assert_eq!(first["prize_status"], Value::Null);

        assert_eq!(prizes.apply(None), Some(json!([])));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = TransformRegistry::new();
        assert!(registry.register_fn("up", |v| v.cloned()).is_none());
        let replaced = registry.register_fn("up", |_| None);
        assert_eq!(replaced.unwrap().name(), "up");
        assert!(registry.contains("up"));
        assert_eq!(registry.get("up").unwrap().apply(Some(&json!(1))), None);
    }
}
