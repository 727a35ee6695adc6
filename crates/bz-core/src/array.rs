//! Array helpers for JSON records

use regex::RegexBuilder;
use serde_json::Value;
use std::cmp::Ordering;

/// Options for [`sort_by_key`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    /// Reverse the order after sorting
    pub descending: bool,
}

/// Sort records in place on the field `key`.
///
/// Numbers compare numerically, strings lexically and booleans `false`
/// first. Values of different types order as numbers, strings, booleans,
/// then everything else (including a missing field); records in that last
/// group keep their relative order.
pub fn sort_by_key<'a>(records: &'a mut [Value], key: &str, options: SortOptions) -> &'a mut [Value] {
    records.sort_by(|a, b| compare_fields(a.get(key), b.get(key)));
    if options.descending {
        records.reverse();
    }
    records
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Number(_)) => 0,
        Some(Value::String(_)) => 1,
        Some(Value::Bool(_)) => 2,
        _ => 3,
    }
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.total_cmp(&b)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Whether `haystack` holds a value equal to `needle`.
pub fn contains_value<T: PartialEq + ?Sized, U: AsRef<T>>(haystack: &[U], needle: &T) -> bool {
    haystack.iter().any(|item| item.as_ref() == needle)
}

/// Whether any entry of `haystack` contains `needle`, ignoring case.
///
/// The needle is matched as an escaped pattern, so this is a
/// case-insensitive substring test rather than an equality test.
pub fn contains_value_ignore_case<S: AsRef<str>>(haystack: &[S], needle: &str) -> bool {
    let pattern = match RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(error) => {
            tracing::debug!(needle, %error, "could not compile membership pattern");
            return false;
        }
    };
    haystack.iter().any(|item| pattern.is_match(item.as_ref()))
}
