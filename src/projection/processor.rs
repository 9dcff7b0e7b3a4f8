//! Reusable processors with a fixed field mapping
//!
//! A [`Processor`] owns a shared mapping and a mode. Record processors project
//! one record per call; batch processors project a list of records. Both are
//! cheap to clone and safe to share across threads.

use crate::projection::mapping::{FieldMapping, Transformer};
use crate::projection::projector::{project, project_all, project_optional};
use crate::projection::record::OutputRecord;
use serde_json::Value;
use std::sync::Arc;

/// Whether a processor handles one record or a list of records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorMode {
    Record,
    Batch,
}

/// Result of invoking a processor
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Record(OutputRecord),
    Batch(Vec<OutputRecord>),
}

impl Projection {
    /// Convert to JSON; missing fields become `null`
    pub fn into_value(self) -> Value {
        match self {
            Projection::Record(record) => record.into_value(),
            Projection::Batch(records) => {
                Value::Array(records.into_iter().map(OutputRecord::into_value).collect())
            }
        }
    }

    pub fn into_records(self) -> Vec<OutputRecord> {
        match self {
            Projection::Record(record) => vec![record],
            Projection::Batch(records) => records,
        }
    }
}

/// A field mapping bound to a projection mode
#[derive(Debug, Clone)]
pub struct Processor {
    mapping: Arc<FieldMapping>,
    mode: ProcessorMode,
}

impl Processor {
    pub fn new(mapping: impl Into<Arc<FieldMapping>>, mode: ProcessorMode) -> Self {
        Processor {
            mapping: mapping.into(),
            mode,
        }
    }

    pub fn record(mapping: impl Into<Arc<FieldMapping>>) -> Self {
        Self::new(mapping, ProcessorMode::Record)
    }

    pub fn batch(mapping: impl Into<Arc<FieldMapping>>) -> Self {
        Self::new(mapping, ProcessorMode::Batch)
    }

    pub fn mode(&self) -> ProcessorMode {
        self.mode
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Run the processor on `input` according to its mode
    ///
    /// A missing input projects to a record of missing fields in record mode
    /// and to an empty list in batch mode.
    pub fn apply(&self, input: Option<&Value>) -> Projection {
        match self.mode {
            ProcessorMode::Record => Projection::Record(project_optional(input, &self.mapping)),
            ProcessorMode::Batch => Projection::Batch(project_all(input, &self.mapping)),
        }
    }

    /// Project a single record, whatever the mode
    pub fn project_record(&self, record: &Value) -> OutputRecord {
        project(record, &self.mapping)
    }

    /// Project a list of records, whatever the mode
    pub fn project_batch(&self, records: Option<&Value>) -> Vec<OutputRecord> {
        project_all(records, &self.mapping)
    }

    /// Wrap this processor as a transformer for use inside another mapping
    pub fn into_transformer(self, name: impl Into<String>) -> Transformer {
        Transformer::new(name, move |input| Some(self.apply(input).into_value()))
    }
}

/// Bind `mapping` into a processor; `batch_mode` selects list projection
pub fn make_processor(mapping: FieldMapping, batch_mode: bool) -> Processor {
    let mode = if batch_mode {
        ProcessorMode::Batch
    } else {
        ProcessorMode::Record
    };
    Processor::new(mapping, mode)
}
