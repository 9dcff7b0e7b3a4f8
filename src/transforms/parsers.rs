//! Lenient value parsers used as field transformers
//!
//! Every parser takes the raw resolution result and returns `None` when the
//! value is absent or can't be parsed. None of them fail.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Number, Value};

// Pre-compiled patterns
static LEADING_YEAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})").unwrap()
});

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?[0-9]+(_[0-9]+)*$").unwrap()
});

static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?$").unwrap()
});

/// Pass the value through unchanged
pub fn identity(value: Option<&Value>) -> Option<Value> {
    value.cloned()
}

/// Year of a `YYYY-MM-DD` style date string
///
/// Only strings starting with four digits qualify; partial dates such as
/// `"1913-00-00"` still yield their year.
pub fn year_from_date(value: Option<&Value>) -> Option<Value> {
    let text = value?.as_str()?;
    let captures = LEADING_YEAR_REGEX.captures(text)?;
    captures[1].parse::<i64>().ok().map(Value::from)
}

/// Parse an integer leniently
///
/// Integers pass through, floats are truncated toward zero, booleans become
/// 0 or 1 and strings are trimmed before parsing (`_` digit separators are
/// allowed). Anything else is missing.
pub fn parse_int(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Value::from(u))
            } else {
                let f = n.as_f64()?;
                if f.is_finite() && f.abs() < i64::MAX as f64 {
                    Some(Value::from(f.trunc() as i64))
                } else {
                    None
                }
            }
        }
        Value::Bool(b) => Some(Value::from(i64::from(*b))),
        Value::String(s) => {
            let trimmed = s.trim();
            if !INTEGER_REGEX.is_match(trimmed) {
                return None;
            }
            trimmed.replace('_', "").parse::<i64>().ok().map(Value::from)
        }
        _ => None,
    }
}

/// Parse a decimal number written with locale-specific separators
///
/// Accepts both `1,234.56` and `1.234,56`, space or apostrophe grouping
/// (`1 234,56`, `1'234.56`) and a lone comma as decimal mark (`12,5`). When
/// only one separator kind appears more than once it is a grouping
/// separator. A single comma followed by exactly three digits is read as
/// grouping. Grouping that isn't in threes (`1,2,3`) is missing.
pub fn parse_locale_float(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Number(n) => n.as_f64().and_then(Number::from_f64).map(Value::Number),
        Value::String(s) => {
            let normalized = normalize_decimal(s)?;
            if !DECIMAL_REGEX.is_match(&normalized) {
                return None;
            }
            let f: f64 = normalized.parse().ok()?;
            Number::from_f64(f).map(Value::Number)
        }
        _ => None,
    }
}

/// Rewrite a localized decimal into `[sign]digits[.digits]`
///
/// Grouping separators must split the integer part into a leading group of
/// one to three digits followed by groups of exactly three.
fn normalize_decimal(raw: &str) -> Option<String> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}' | '\''))
        .collect();
    if compact.is_empty() {
        return None;
    }

    let commas = compact.matches(',').count();
    let dots = compact.matches('.').count();

    let decimal_mark = match (commas, dots) {
        (0, 0) => None,
        (_, 0) => {
            let tail = compact.rsplit(',').next().unwrap_or_default();
            if commas == 1 && tail.len() != 3 {
                Some(',')
            } else {
                None
            }
        }
        (0, 1) => Some('.'),
        (0, _) => None,
        _ => {
            let last_comma = compact.rfind(',')?;
            let last_dot = compact.rfind('.')?;
            if last_comma > last_dot {
                Some(',')
            } else {
                Some('.')
            }
        }
    };

    let (integer, fraction, grouping) = match decimal_mark {
        Some(mark) => {
            let (integer, fraction) = compact.rsplit_once(mark)?;
            let grouping = if mark == ',' { '.' } else { ',' };
            if integer.contains(mark) {
                return None;
            }
            (integer, Some(fraction), grouping)
        }
        None => {
            let grouping = if commas > 0 { ',' } else { '.' };
            (compact.as_str(), None, grouping)
        }
    };

    let unsigned = integer.trim_start_matches(['+', '-']);
    let sign = &integer[..integer.len() - unsigned.len()];

    let mut groups = unsigned.split(grouping);
    let first = groups.next().unwrap_or_default();
    let rest: Vec<&str> = groups.collect();
    let well_grouped = rest.is_empty()
        || (matches!(first.len(), 1..=3) && rest.iter().all(|group| group.len() == 3));
    if !well_grouped {
        return None;
    }

    let mut normalized = String::with_capacity(compact.len());
    normalized.push_str(sign);
    normalized.push_str(first);
    rest.iter().for_each(|group| normalized.push_str(group));
    if let Some(fraction) = fraction {
        normalized.push('.');
        normalized.push_str(fraction);
    }
    Some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_year_from_date() {
        assert_eq!(year_from_date(Some(&json!("2001-05-01"))), Some(json!(2001)));
        assert_eq!(year_from_date(Some(&json!("1913-00-00"))), Some(json!(1913)));
        assert_eq!(year_from_date(Some(&json!("1913"))), Some(json!(1913)));
        assert_eq!(year_from_date(Some(&json!("191"))), None);
        assert_eq!(year_from_date(Some(&json!("c. 1900"))), None);
        assert_eq!(year_from_date(Some(&json!(2001))), None);
        assert_eq!(year_from_date(Some(&Value::Null)), None);
        assert_eq!(year_from_date(None), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(Some(&json!("1901"))), Some(json!(1901)));
        assert_eq!(parse_int(Some(&json!(" -42 "))), Some(json!(-42)));
        assert_eq!(parse_int(Some(&json!("1_000"))), Some(json!(1000)));
        assert_eq!(parse_int(Some(&json!(7))), Some(json!(7)));
        assert_eq!(parse_int(Some(&json!(3.9))), Some(json!(3)));
        assert_eq!(parse_int(Some(&json!(-3.9))), Some(json!(-3)));
        assert_eq!(parse_int(Some(&json!(true))), Some(json!(1)));
        assert_eq!(parse_int(Some(&json!("3.5"))), None);
        assert_eq!(parse_int(Some(&json!("abc"))), None);
        assert_eq!(parse_int(Some(&json!(""))), None);
        assert_eq!(parse_int(Some(&json!([1]))), None);
        assert_eq!(parse_int(None), None);
    }

    #[test]
    fn test_parse_locale_float() {
        let parse = |s: &str| parse_locale_float(Some(&json!(s)));

        assert_eq!(parse("1,234.56"), Some(json!(1234.56)));
        assert_eq!(parse("1.234,56"), Some(json!(1234.56)));
        assert_eq!(parse("1 234,56"), Some(json!(1234.56)));
        assert_eq!(parse("1'234.5"), Some(json!(1234.5)));
        assert_eq!(parse("12,5"), Some(json!(12.5)));
        assert_eq!(parse("1,234"), Some(json!(1234.0)));
        assert_eq!(parse("1.234.567"), Some(json!(1234567.0)));
        assert_eq!(parse("-0.5"), Some(json!(-0.5)));
        assert_eq!(parse("abc"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("1,2,3.4,5"), None);

        // grouping must come in threes after the leading group
        assert_eq!(parse("1,2,3"), None);
        assert_eq!(parse("1.2.3"), None);
        assert_eq!(parse("1,234,5"), None);
        assert_eq!(parse("12,34,5"), None);
        assert_eq!(parse("1234,567,890"), None);
        assert_eq!(parse("1,5.25"), None);
        assert_eq!(parse("-1,234,567"), Some(json!(-1234567.0)));
        assert_eq!(parse("1.234.567,8"), Some(json!(1234567.8)));

        assert_eq!(parse_locale_float(Some(&json!(8))), Some(json!(8.0)));
        assert_eq!(parse_locale_float(None), None);
    }

    #[test]
    fn test_identity() {
        assert_eq!(identity(Some(&Value::Null)), Some(Value::Null));
        assert_eq!(identity(None), None);
    }
}
