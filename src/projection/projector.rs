use crate::projection::mapping::{FieldMapping, FieldSpec};
use crate::projection::path::{resolve, resolve_missing, Path};
use crate::projection::record::OutputRecord;
use serde_json::Value;

/// Project a single record through `mapping`
///
/// Each field is resolved independently; unresolved paths become missing
/// fields. Transformers always see the raw resolution result, missing
/// included. Neither input is modified. A transformer that panics is not
/// caught; the panic unwinds out of the projection.
pub fn project(record: &Value, mapping: &FieldMapping) -> OutputRecord {
    project_optional(Some(record), mapping)
}

/// Project a record that may itself be absent
///
/// An absent record resolves every path to missing, so only transformers can
/// produce values.
pub fn project_optional(record: Option<&Value>, mapping: &FieldMapping) -> OutputRecord {
    let mut output = OutputRecord::with_capacity(mapping.len());

    for (name, spec) in mapping.iter() {
        let value = match spec {
            FieldSpec::Direct(path) => resolve_missing(record, path).cloned(),
            FieldSpec::Transformed(path, transformer) => {
                transformer.apply(resolve_missing(record, path))
            }
        };
        output.insert(name, value);
    }

    output
}

/// Project every record of a slice, preserving order
pub fn project_slice(records: &[Value], mapping: &FieldMapping) -> Vec<OutputRecord> {
    records.iter().map(|record| project(record, mapping)).collect()
}

/// Project a collection of records, preserving order
///
/// `records` is typically whatever a path resolved to: an absent value or a
/// JSON `null` is an empty collection. Anything other than an array is also
/// treated as empty.
pub fn project_all(records: Option<&Value>, mapping: &FieldMapping) -> Vec<OutputRecord> {
    project_slice(batch_items(records), mapping)
}

/// The elements of a record list, or nothing if `records` is not an array
pub fn batch_items(records: Option<&Value>) -> &[Value] {
    match records {
        Some(Value::Array(items)) => items,
        None | Some(Value::Null) => &[],
        Some(other) => {
            tracing::debug!(
                kind = value_kind(other),
                "batch input is not an array, projecting no records"
            );
            &[]
        }
    }
}

/// The value records are taken from: `document` itself, or what
/// `records_path` resolves to inside it
pub fn select_target<'a>(document: &'a Value, records_path: Option<&Path>) -> Option<&'a Value> {
    match records_path {
        Some(path) => resolve(document, path),
        None => Some(document),
    }
}

/// Records to project one at a time from a document
///
/// A selected array contributes each element, any other selected value is a
/// single record, and a path that doesn't resolve selects nothing.
pub fn select_records<'a>(document: &'a Value, records_path: Option<&Path>) -> Vec<&'a Value> {
    match select_target(document, records_path) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(record) => vec![record],
        None => Vec::new(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
