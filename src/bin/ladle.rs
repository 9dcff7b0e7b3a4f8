//! ladle: Project nested JSON records into flat JSON Lines rows
//!
//! Usage:
//!   # Built-in laureate schema over a Nobel API dump, to stdout
//!   ladle --schema laureate --records-path laureates laureates.json
//!
//!   # Custom mapping file, NDJSON input, one file per record type
//!   ladle --mapping person.json --ndjson people.jsonl --output-dir ./rows
//!
//!   # Read from stdin
//!   cat prizes.json | ladle --schema prize

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use ladle::projection::{OutputRecord, PartitionedWriter, Path, Processor, RecordWriter};
use ladle::schemas::{laureate, prize, LaureateProcessor, Schema};
use ladle::{project_document, MappingFile, TransformRegistry};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Stdout};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ladle")]
#[command(about = "Project nested JSON records into flat rows", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["schema", "mapping"])))]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one JSON document per line)
    #[arg(long)]
    ndjson: bool,

    /// Built-in schema: person, organization, prize or laureate
    #[arg(long, short = 's')]
    schema: Option<Schema>,

    /// JSON mapping file describing the output fields
    #[arg(long, short = 'm', value_name = "FILE")]
    mapping: Option<String>,

    /// Dotted path to the record list inside each document (e.g. "laureates")
    /// Overrides the mapping file's records_path
    #[arg(long)]
    records_path: Option<String>,

    /// Output directory for separate .jsonl files per record type
    /// If omitted, writes to stdout as a single stream
    #[arg(long, short = 'o')]
    output_dir: Option<String>,

    /// Add a _record_type field to each row written to stdout
    #[arg(long)]
    tag: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// What each input document is projected with
enum Projector {
    Mapped { processor: Processor, name: String },
    Laureates(LaureateProcessor),
}

/// Where projected rows go
enum Sink {
    Stdout(RecordWriter<BufWriter<Stdout>>),
    Files(PartitionedWriter),
}

impl Sink {
    fn write(&mut self, partition: &str, records: &[OutputRecord]) -> Result<()> {
        match self {
            Sink::Stdout(writer) => writer.write_records(records, partition),
            Sink::Files(writer) => writer.write_records(partition, records),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self {
            Sink::Stdout(writer) => writer.flush(),
            Sink::Files(writer) => {
                writer.flush()?;
                for (partition, count) in writer.counts() {
                    tracing::info!(
                        partition,
                        count,
                        path = %writer.partition_path(partition).display(),
                        "wrote partition"
                    );
                }
                Ok(())
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let (projector, file_records_path) = build_projector(&args)?;
    let records_path = args
        .records_path
        .as_deref()
        .map(Path::parse_dotted)
        .or(file_records_path);

    let mut sink = match &args.output_dir {
        Some(dir) => Sink::Files(PartitionedWriter::new(dir)?),
        None => {
            let writer = RecordWriter::new(BufWriter::new(std::io::stdout()));
            Sink::Stdout(if args.tag { writer.tagged() } else { writer })
        }
    };

    let documents = read_documents(args.input.as_deref(), args.ndjson)?;
    tracing::debug!(documents = documents.len(), "parsed input");

    let mut total = 0;
    for document in &documents {
        total += project_into(&projector, document, records_path.as_ref(), &mut sink)?;
    }
    sink.finish()?;

    tracing::info!(records = total, "projection complete");
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the projector from either a built-in schema or a mapping file
fn build_projector(args: &Args) -> Result<(Projector, Option<Path>)> {
    if let Some(mapping_path) = &args.mapping {
        let mapping_file = MappingFile::load(mapping_path)?;
        let processor = mapping_file
            .processor(&TransformRegistry::with_builtins())
            .with_context(|| format!("Invalid field mapping in {}", mapping_path))?;
        let projector = Projector::Mapped {
            processor,
            name: mapping_file.name().to_string(),
        };
        return Ok((projector, mapping_file.records_path));
    }

    let schema = args.schema.context("Either --schema or --mapping is required")?;
    let projector = match schema {
        Schema::Person => Projector::Mapped {
            processor: laureate::person_processor(),
            name: schema.to_string(),
        },
        Schema::Organization => Projector::Mapped {
            processor: laureate::org_processor(),
            name: schema.to_string(),
        },
        Schema::Prize => Projector::Mapped {
            processor: prize::prize_processor(),
            name: schema.to_string(),
        },
        Schema::Laureate => Projector::Laureates(LaureateProcessor::new()),
    };
    Ok((projector, None))
}

/// Project one document and write its rows; returns the row count
fn project_into(
    projector: &Projector,
    document: &Value,
    records_path: Option<&Path>,
    sink: &mut Sink,
) -> Result<usize> {
    match projector {
        Projector::Mapped { processor, name } => {
            let records = project_document(document, processor, records_path);
            sink.write(name, &records)?;
            Ok(records.len())
        }
        Projector::Laureates(laureates) => {
            let projected = laureates.project_document(document, records_path);
            for (kind, record) in &projected {
                sink.write(kind.as_str(), std::slice::from_ref(record))?;
            }
            Ok(projected.len())
        }
    }
}

fn open_input(input: Option<&str>) -> Result<Box<dyn Read>> {
    Ok(match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input: {}", path))?,
        )),
        None => Box::new(std::io::stdin()),
    })
}

/// Read every JSON document from the input
///
/// Single documents go through simd-json first; NDJSON, concatenated
/// documents and anything simd-json rejects fall back to a serde_json stream.
fn read_documents(input: Option<&str>, ndjson: bool) -> Result<Vec<Value>> {
    let mut content = Vec::new();
    open_input(input)?
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if !ndjson {
        // simd-json parses in place, keep the original for the fallback
        let mut scratch = content.clone();
        if let Ok(value) = simd_json::serde::from_slice::<Value>(&mut scratch) {
            return Ok(vec![value]);
        }
        tracing::debug!("simd-json rejected input, falling back to streaming parser");
    }

    serde_json::Deserializer::from_slice(&content)
        .into_iter::<Value>()
        .enumerate()
        .map(|(i, result)| result.with_context(|| format!("Failed to parse JSON document {}", i + 1)))
        .collect()
}
