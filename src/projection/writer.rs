use crate::projection::record::OutputRecord;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Field added by [`RecordWriter`] when tagging records with their type
pub const RECORD_TYPE_FIELD: &str = "_record_type";

/// Writes projected records to a single JSON Lines stream
pub struct RecordWriter<W: Write> {
    writer: W,
    tag_records: bool,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        RecordWriter {
            writer,
            tag_records: false,
            written: 0,
        }
    }

    /// Add a `_record_type` field to every written record
    pub fn tagged(mut self) -> Self {
        self.tag_records = true;
        self
    }

    /// Write one record; `record_type` is used only when tagging is enabled
    pub fn write_record(&mut self, record: &OutputRecord, record_type: &str) -> Result<()> {
        let mut data = record.to_value();
        if self.tag_records {
            if let Value::Object(ref mut obj) = data {
                obj.insert(
                    RECORD_TYPE_FIELD.to_string(),
                    Value::String(record_type.to_string()),
                );
            }
        }

        let json = serde_json::to_string(&data).context("Failed to serialize record")?;
        writeln!(self.writer, "{}", json).context("Failed to write record")?;
        self.written += 1;
        Ok(())
    }

    pub fn write_records<'a, I>(&mut self, records: I, record_type: &str) -> Result<()>
    where
        I: IntoIterator<Item = &'a OutputRecord>,
    {
        for record in records {
            self.write_record(record, record_type)?;
        }
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Writes projected records to one `<partition>.jsonl` file per partition
///
/// A partition file is truncated the first time this writer opens it, so
/// rerunning into the same directory replaces earlier output.
pub struct PartitionedWriter {
    output_dir: PathBuf,
    writers: HashMap<String, RecordWriter<BufWriter<File>>>,
}

impl PartitionedWriter {
    /// Create a writer rooted at `output_dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory: {}", output_dir.display())
        })?;

        Ok(PartitionedWriter {
            output_dir,
            writers: HashMap::new(),
        })
    }

    pub fn write_record(&mut self, partition: &str, record: &OutputRecord) -> Result<()> {
        let writer = match self.writers.entry(partition.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                check_partition_name(partition)?;
                let path = self.output_dir.join(format!("{}.jsonl", partition));
                let file = std::fs::OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(&path)
                    .with_context(|| format!("Failed to open file: {}", path.display()))?;
                entry.insert(RecordWriter::new(BufWriter::new(file)))
            }
        };

        writer.write_record(record, partition)
    }

    pub fn write_records<'a, I>(&mut self, partition: &str, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a OutputRecord>,
    {
        for record in records {
            self.write_record(partition, record)?;
        }
        Ok(())
    }

    /// File backing `partition`
    pub fn partition_path(&self, partition: &str) -> PathBuf {
        self.output_dir.join(format!("{}.jsonl", partition))
    }

    /// Records written per partition
    pub fn counts(&self) -> HashMap<&str, usize> {
        self.writers
            .iter()
            .map(|(name, writer)| (name.as_str(), writer.written()))
            .collect()
    }

    pub fn flush(&mut self) -> Result<()> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Partition names become file names directly under the output directory
fn check_partition_name(partition: &str) -> Result<()> {
    if partition.is_empty() || partition == "." || partition == ".." {
        bail!("Invalid partition name: {:?}", partition);
    }
    if partition.contains(['/', '\\']) {
        bail!("Partition name contains a path separator: {:?}", partition);
    }
    Ok(())
}
