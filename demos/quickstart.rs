/// Quickstart example - project a couple of laureates into flat rows
use ladle::path;
use ladle::projection::{project, FieldMapping, RecordWriter, Transformer};
use ladle::schemas::LaureateProcessor;
use ladle::transforms::parsers::year_from_date;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("=== Ladle Quick Start ===\n");

    // Step 1: Your JSON data
    let document = json!({
        "laureates": [
            {
                "id": "1",
                "knownName": {"en": "Wilhelm Conrad Röntgen"},
                "gender": "male",
                "birth": {"date": "1845-03-27", "place": {"country": {"en": "Prussia"}, "countryNow": {"en": "Germany"}}},
                "nobelPrizes": [{"awardYear": "1901", "category": {"en": "Physics"}, "prizeAmount": 150782}]
            },
            {
                "id": "467",
                "orgName": {"en": "Institut de droit international"},
                "founded": {"date": "1873-00-00"},
                "nobelPrizes": [{"awardYear": "1904", "category": {"en": "Peace"}}]
            }
        ]
    });

    // Step 2: A hand-written mapping
    let mapping = FieldMapping::new()
        .field("id", path!["laureates", 0, "id"])
        .field("name", path!["laureates", 0, "knownName", "en"])
        .transformed(
            "birth_year",
            path!["laureates", 0, "birth", "date"],
            Transformer::new("year", year_from_date),
        )
        .field("missing", path!["laureates", 0, "deathDate"]);

    let row = project(&document, &mapping);
    println!("Hand-written mapping:");
    println!("{}\n", serde_json::to_string_pretty(&row)?);

    // Step 3: The built-in laureate schema, dispatching person/organization
    let laureates = LaureateProcessor::new();
    let mut writer = RecordWriter::new(std::io::stdout()).tagged();
    for (kind, record) in laureates.project_all(document.get("laureates")) {
        writer.write_record(&record, kind.as_str())?;
    }
    writer.flush()?;

    Ok(())
}
