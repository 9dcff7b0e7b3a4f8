//! Path projection - reshape nested JSON into flat records
//!
//! This module holds the projection engine: path resolution through nested
//! objects and arrays, per-field transformers, single-record and batch
//! projection, and processors that bind a mapping for repeated use.
//!
//! Control flow for each field is batch -> record -> path -> transformer.

pub mod path;
pub mod mapping;
pub mod record;
pub mod projector;
pub mod processor;
pub mod writer;

pub use path::{resolve, resolve_missing, Key, Path};
pub use mapping::{FieldMapping, FieldSpec, TransformFn, Transformer};
pub use record::OutputRecord;
pub use projector::{
    batch_items, project, project_all, project_optional, project_slice, select_records,
    select_target,
};
pub use processor::{make_processor, Processor, ProcessorMode, Projection};
pub use writer::{PartitionedWriter, RecordWriter};
