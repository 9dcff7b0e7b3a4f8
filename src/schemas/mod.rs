//! Built-in mappings for the Nobel prize API
//!
//! These are plain field mappings handed to the projection engine; nothing
//! here is special-cased by the engine itself.

pub mod laureate;
pub mod prize;

pub use laureate::{LaureateKind, LaureateProcessor};

use std::fmt;
use std::str::FromStr;

/// A built-in schema selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Person,
    Organization,
    Prize,
    /// Mixed person/organization records, dispatched per record
    Laureate,
}

impl Schema {
    pub const ALL: [Schema; 4] = [
        Schema::Person,
        Schema::Organization,
        Schema::Prize,
        Schema::Laureate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::Person => "person",
            Schema::Organization => "organization",
            Schema::Prize => "prize",
            Schema::Laureate => "laureate",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "person" => Ok(Schema::Person),
            "organization" | "org" => Ok(Schema::Organization),
            "prize" => Ok(Schema::Prize),
            "laureate" => Ok(Schema::Laureate),
            other => Err(format!(
                "unknown schema '{}', expected one of: person, organization, prize, laureate",
                other
            )),
        }
    }
}
