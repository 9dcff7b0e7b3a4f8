use crate::path;
use crate::projection::{FieldMapping, Processor, Transformer};
use crate::transforms::parsers::parse_int;

/// Field mapping for a single Nobel prize entry
pub fn prize_mapping() -> FieldMapping {
    FieldMapping::new()
        .field("prize_amount", path!["prizeAmount"])
        .field("prize_amount_adjusted", path!["prizeAmountAdjusted"])
        .transformed("award_year", path!["awardYear"], Transformer::new("int", parse_int))
        .field("category_en", path!["category", "en"])
        .field("prize_status", path!["prizeStatus"])
}

/// Batch processor over a list of prize entries
pub fn prize_processor() -> Processor {
    Processor::batch(prize_mapping())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prize_list() {
        let prizes = json!([
            {
                "awardYear": "1903",
                "category": {"en": "Physics", "se": "Fysik"},
                "prizeAmount": 141358,
                "prizeAmountAdjusted": 8128617,
                "prizeStatus": "received"
            },
            {"awardYear": "n/a"}
        ]);

        let output = prize_processor().project_batch(Some(&prizes));
        assert_eq!(output.len(), 2);
        assert_eq!(output[0].get("award_year"), Some(&json!(1903)));
        assert_eq!(output[0].get("category_en"), Some(&json!("Physics")));
        assert_eq!(output[0].get("prize_amount"), Some(&json!(141358)));
        assert!(output[1].is_missing("award_year"));
        assert!(output[1].is_missing("category_en"));
    }
}
