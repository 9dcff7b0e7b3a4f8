//! # Ladle - JSON Path Projection
//!
//! Reshape nested JSON records into flat rows using a declarative mapping
//! from output field names to key paths, with optional per-field
//! transformers.
//!
//! ## Modules
//!
//! - **projection**: path resolution, record and batch projection, processors, writers
//! - **transforms**: lenient value parsers and a name -> transformer registry
//! - **schemas**: built-in mappings for Nobel laureates and prizes
//! - **config**: JSON mapping files
//!
//! ## Quick Start
//!
//! ```rust
//! use ladle::path;
//! use ladle::projection::{project, FieldMapping, Transformer};
//! use ladle::transforms::parsers::year_from_date;
//! use serde_json::json;
//!
//! let record = json!({"a": {"b": [{"c": 1}], "d": {"e": "2001-05-01"}}});
//!
//! let mapping = FieldMapping::new()
//!     .field("val", path!["a", "b", 0, "c"])
//!     .field("missing", path!["a", "z"])
//!     .transformed("y", path!["a", "d", "e"], Transformer::new("year", year_from_date));
//!
//! let output = project(&record, &mapping);
//! assert_eq!(output.get("val"), Some(&json!(1)));
//! assert_eq!(output.get("y"), Some(&json!(2001)));
//! assert!(output.is_missing("missing"));
//! ```

use anyhow::{Context, Result};
use projection::{select_records, select_target};
use serde_json::Value;
use std::io::{BufRead, Write};

pub mod config;
pub mod error;
pub mod projection;
pub mod schemas;
pub mod transforms;

// Re-export commonly used types for convenience
pub use config::MappingFile;
pub use error::ConfigError;
pub use projection::{
    make_processor, project, project_all, resolve, FieldMapping, FieldSpec, Key, OutputRecord,
    Path, Processor, ProcessorMode, Projection, RecordWriter, Transformer,
};
pub use transforms::TransformRegistry;

/// Project one input document into output records
///
/// With `records_path`, the records are looked up inside the document first;
/// a path that doesn't resolve yields no records. Batch processors project
/// the selected value as a record list. Record processors project each
/// element of a selected array, or the selected value itself otherwise.
pub fn project_document(
    document: &Value,
    processor: &Processor,
    records_path: Option<&Path>,
) -> Vec<OutputRecord> {
    match processor.mode() {
        ProcessorMode::Batch => processor.project_batch(select_target(document, records_path)),
        ProcessorMode::Record => select_records(document, records_path)
            .into_iter()
            .map(|record| processor.project_record(record))
            .collect(),
    }
}

/// Main entry point: project a newline-delimited JSON stream
///
/// Returns the number of records written.
pub fn project_json<R: BufRead, W: Write>(
    reader: R,
    processor: &Processor,
    records_path: Option<&Path>,
    writer: &mut RecordWriter<W>,
    record_type: &str,
) -> Result<usize> {
    let before = writer.written();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("Failed to parse JSON on line {}", line_no + 1))?;

        let records = project_document(&value, processor, records_path);
        writer.write_records(&records, record_type)?;
    }

    writer.flush()?;
    Ok(writer.written() - before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    fn id_processor(batch: bool) -> Processor {
        make_processor(FieldMapping::new().field("id", path!["id"]), batch)
    }

    #[test]
    fn test_project_document_shapes() {
        let record = id_processor(false);

        let single = project_document(&json!({"id": 1}), &record, None);
        assert_eq!(single.len(), 1);

        let list = project_document(&json!([{"id": 1}, {"id": 2}]), &record, None);
        assert_eq!(list.len(), 2);

        let doc = json!({"laureates": [{"id": 1}, {"id": 2}, {"id": 3}]});
        let nested = project_document(&doc, &record, Some(&path!["laureates"]));
        assert_eq!(nested.len(), 3);
        assert_eq!(nested[2].get("id"), Some(&json!(3)));

        assert!(project_document(&doc, &record, Some(&path!["missing"])).is_empty());
    }

    #[test]
    fn test_project_document_batch() {
        let batch = id_processor(true);
        let doc = json!({"items": [{"id": "a"}]});
        assert_eq!(project_document(&doc, &batch, Some(&path!["items"])).len(), 1);
        assert!(project_document(&doc, &batch, Some(&path!["none"])).is_empty());
    }

    #[test]
    fn test_project_json_stream() {
        let input = "{\"id\": 1}\n\n{\"id\": 2, \"x\": true}\n{\"other\": 3}\n";
        let mut writer = RecordWriter::new(Vec::new());

        let written = project_json(input.as_bytes(), &id_processor(false), None, &mut writer, "row")
            .unwrap();
        assert_eq!(written, 3);

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec![r#"{"id":1}"#, r#"{"id":2}"#, r#"{"id":null}"#]);
    }

    #[test]
    fn test_project_json_reports_bad_line() {
        let input = "{\"id\": 1}\nnot json\n";
        let mut writer = RecordWriter::new(Vec::new());
        let err = project_json(input.as_bytes(), &id_processor(false), None, &mut writer, "row")
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
