//! Mapping files
//!
//! A mapping file is a JSON document describing one field mapping:
//!
//! ```json
//! {
//!   "name": "person",
//!   "records_path": ["laureates"],
//!   "fields": {
//!     "id": ["id"],
//!     "name": ["knownName", "en"],
//!     "birth_year": [["birth", "date"], "year"],
//!     "prizes": {"path": ["nobelPrizes"], "transform": "prizes"}
//!   }
//! }
//! ```
//!
//! Field entries are decoded with [`FieldSpec::from_json`](crate::projection::FieldSpec::from_json);
//! transformer names are looked up in a [`TransformRegistry`].

use crate::error::ConfigError;
use crate::projection::{FieldMapping, Path, Processor, ProcessorMode};
use crate::transforms::TransformRegistry;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_NAME: &str = "records";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingFile {
    /// Name used for output partitions and record tags
    #[serde(default)]
    pub name: Option<String>,

    /// Where the record list lives inside each input document
    #[serde(default)]
    pub records_path: Option<Path>,

    /// Project each document as a list of records rather than one record
    #[serde(default)]
    pub batch: bool,

    /// Output field name -> field spec
    pub fields: Value,
}

impl MappingFile {
    /// Load a mapping file from disk
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
        let file = Self::parse(&contents)
            .with_context(|| format!("Invalid mapping file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), name = file.name(), "loaded mapping file");
        Ok(file)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse mapping JSON")
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn mode(&self) -> ProcessorMode {
        if self.batch {
            ProcessorMode::Batch
        } else {
            ProcessorMode::Record
        }
    }

    /// Decode the field table
    pub fn mapping(&self, registry: &TransformRegistry) -> Result<FieldMapping, ConfigError> {
        FieldMapping::from_json(&self.fields, registry)
    }

    /// Decode the field table and bind it into a processor
    pub fn processor(&self, registry: &TransformRegistry) -> Result<Processor, ConfigError> {
        Ok(Processor::new(self.mapping(registry)?, self.mode()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use crate::projection::Projection;
    use serde_json::json;
    use std::io::Write;

    const PERSON_MAPPING: &str = r#"{
        "name": "person",
        "records_path": ["laureates"],
        "fields": {
            "id": ["id"],
            "name": ["knownName", "en"],
            "birth_year": [["birth", "date"], "year"],
            "prizes": {"path": ["nobelPrizes"], "transform": "prizes"}
        }
    }"#;

    #[test]
    fn test_load_mapping_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PERSON_MAPPING.as_bytes()).unwrap();

        let mapping_file = MappingFile::load(file.path()).unwrap();
        assert_eq!(mapping_file.name(), "person");
        assert_eq!(mapping_file.records_path, Some(path!["laureates"]));
        assert_eq!(mapping_file.mode(), ProcessorMode::Record);

        let processor = mapping_file
            .processor(&TransformRegistry::with_builtins())
            .unwrap();
        let record = json!({
            "id": "1",
            "knownName": {"en": "Wilhelm Conrad Röntgen"},
            "birth": {"date": "1845-03-27"},
            "nobelPrizes": [{"awardYear": "1901"}]
        });
        let Projection::Record(output) = processor.apply(Some(&record)) else {
            panic!("Expected a record projection");
        };
        assert_eq!(output.get("birth_year"), Some(&json!(1845)));
        assert_eq!(output.get("prizes").unwrap()[0]["award_year"], json!(1901));
    }

    #[test]
    fn test_defaults() {
        let mapping_file = MappingFile::parse(r#"{"fields": {"id": ["id"]}}"#).unwrap();
        assert_eq!(mapping_file.name(), "records");
        assert!(mapping_file.records_path.is_none());
        assert_eq!(mapping_file.mode(), ProcessorMode::Record);
    }

    #[test]
    fn test_malformed_field_reported_by_name() {
        let mapping_file = MappingFile::parse(r#"{"fields": {"ok": ["id"], "bad": 42}}"#).unwrap();
        let err = mapping_file
            .mapping(&TransformRegistry::with_builtins())
            .unwrap_err();
        assert_eq!(err.field(), Some("bad"));
    }

    #[test]
    fn test_missing_file() {
        let err = MappingFile::load("/nonexistent/mapping.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read mapping file"));
    }
}
