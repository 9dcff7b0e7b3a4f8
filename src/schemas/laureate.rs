//! Nobel laureate mappings
//!
//! Laureates come in two shapes: people (`knownName`, `birth`) and
//! organizations (`orgName`, `founded`). Both carry a `nobelPrizes` list that
//! is projected with the prize mapping.

use crate::path;
use crate::projection::{
    batch_items, select_records, FieldMapping, OutputRecord, Path, Processor, Transformer,
};
use crate::schemas::prize::prize_processor;
use crate::transforms::parsers::year_from_date;
use serde_json::Value;
use std::fmt;

fn prizes_relevant() -> Transformer {
    prize_processor().into_transformer("prizes")
}

fn year() -> Transformer {
    Transformer::new("year", year_from_date)
}

pub fn person_mapping() -> FieldMapping {
    FieldMapping::new()
        .field("id", path!["id"])
        .field("name", path!["knownName", "en"])
        .field("gender", path!["gender"])
        .transformed("birth_year", path!["birth", "date"], year())
        .field("country_birth", path!["birth", "place", "country", "en"])
        .field("country_now", path!["birth", "place", "countryNow", "en"])
        .transformed("prizes_relevant", path!["nobelPrizes"], prizes_relevant())
}

pub fn org_mapping() -> FieldMapping {
    FieldMapping::new()
        .field("id", path!["id"])
        .field("name", path!["orgName", "en"])
        .transformed("founded_year", path!["founded", "date"], year())
        .field("country_founded", path!["founded", "place", "country", "en"])
        .field("country_now", path!["founded", "place", "countryNow", "en"])
        .transformed("prizes_relevant", path!["nobelPrizes"], prizes_relevant())
}

pub fn person_processor() -> Processor {
    Processor::record(person_mapping())
}

pub fn org_processor() -> Processor {
    Processor::record(org_mapping())
}

/// Which shape a laureate record has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaureateKind {
    Person,
    Organization,
}

impl LaureateKind {
    /// Organizations are recognised by an `orgName` field
    pub fn classify(record: &Value) -> Self {
        if record.get("orgName").is_some() {
            LaureateKind::Organization
        } else {
            LaureateKind::Person
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LaureateKind::Person => "person",
            LaureateKind::Organization => "organization",
        }
    }
}

impl fmt::Display for LaureateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projects mixed laureate records with the mapping matching each one
#[derive(Debug, Clone)]
pub struct LaureateProcessor {
    person: Processor,
    organization: Processor,
}

impl LaureateProcessor {
    pub fn new() -> Self {
        LaureateProcessor {
            person: person_processor(),
            organization: org_processor(),
        }
    }

    pub fn project(&self, record: &Value) -> (LaureateKind, OutputRecord) {
        let kind = LaureateKind::classify(record);
        let processor = match kind {
            LaureateKind::Person => &self.person,
            LaureateKind::Organization => &self.organization,
        };
        (kind, processor.project_record(record))
    }

    /// Project a laureate list; absent or non-array input yields nothing
    pub fn project_all(&self, records: Option<&Value>) -> Vec<(LaureateKind, OutputRecord)> {
        batch_items(records)
            .iter()
            .map(|record| self.project(record))
            .collect()
    }

    /// Project the laureates found in `document`
    ///
    /// Records are selected the same way [`crate::project_document`] selects
    /// them for a record processor: each element of an array, any other value
    /// as one record, nothing when `records_path` doesn't resolve.
    pub fn project_document(
        &self,
        document: &Value,
        records_path: Option<&Path>,
    ) -> Vec<(LaureateKind, OutputRecord)> {
        select_records(document, records_path)
            .into_iter()
            .map(|record| self.project(record))
            .collect()
    }
}

impl Default for LaureateProcessor {
    fn default() -> Self {
        Self::new()
    }
}
