//! Date normalization for raw calendar date text
//!
//! The source page writes dates loosely: "Mon. Jan. 5", "Wed Jan 7 - Jan 9",
//! "January 12". This module turns that text into a `NaiveDateTime` at
//! midnight of the given reference year, or `None` when the text is not a
//! supported date.

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Candidate formats, tried in order. The reference year is appended to the
/// cleaned text before parsing.
const DATE_FORMATS: &[&str] = &["%b %d %Y", "%B %d %Y"];

// A leading 3-4 letter token (optionally dotted) that is followed by another
// word. Only that case is a weekday prefix; "Jan. 5" keeps its month.
static WEEKDAY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^[A-Za-z]{3,4}\.?\s+([A-Za-z].*)$").unwrap());

/// Resolve a raw date string against `reference_year`.
///
/// Anything after the first `-` is treated as an end date and ignored.
/// Returns `None` for empty, unsupported or out-of-range dates.
pub fn normalize(raw: &str, reference_year: i32) -> Option<NaiveDateTime> {
    let cleaned = clean_date_text(raw);
    if cleaned.is_empty() {
        debug!("Empty date text after cleaning: {:?}", raw);
        return None;
    }

    let candidate = format!("{} {}", cleaned, reference_year);
    let resolved = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&candidate, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0));

    if resolved.is_none() {
        debug!("Unsupported date text: {:?} (cleaned: {:?})", raw, cleaned);
    }
    resolved
}

/// Strip the end-date segment, weekday prefix and abbreviation dots.
fn clean_date_text(raw: &str) -> String {
    let start = raw.split('-').next().unwrap_or_default().trim();

    let without_weekday = match WEEKDAY_PREFIX.captures(start) {
        Some(caps) => caps.get(1).map_or(start, |m| m.as_str()),
        None => start,
    };

    without_weekday.replace('.', "").split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn test_clean_date_text() {
        assert_eq!(clean_date_text("Mon. Jan. 5 - Jan. 6"), "Jan 5");
        assert_eq!(clean_date_text("  Wed Feb 12  "), "Feb 12");
        assert_eq!(clean_date_text("Jan. 5"), "Jan 5");
        assert_eq!(clean_date_text("Sept. 5"), "Sept 5");
        assert_eq!(clean_date_text("June  7"), "June 7");
        assert_eq!(clean_date_text(" - Jan 6"), "");
        assert_eq!(clean_date_text("Mon.\nJan.\n5"), "Jan 5");
        assert_eq!(clean_date_text("Mon. Jan.\n5 - Jan. 6"), "Jan 5");
    }

    #[test]
    fn test_normalize_abbreviated_month() {
        assert_eq!(normalize("Jan 5", 2025), Some(ymd(2025, 1, 5)));
        assert_eq!(normalize("Jan. 5 - Jan. 6", 2025), Some(ymd(2025, 1, 5)));
        assert_eq!(normalize("Thu. Mar. 20", 2025), Some(ymd(2025, 3, 20)));
    }

    #[test]
    fn test_normalize_full_month() {
        let dt = normalize("Tues. September 30", 2024).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 9, 30));
        assert_eq!(dt.hour(), 0);
    }

    #[test]
    fn test_normalize_unresolved() {
        assert_eq!(normalize("", 2025), None);
        assert_eq!(normalize("TBD", 2025), None);
        assert_eq!(normalize("Foo 99", 2025), None);
        assert_eq!(normalize("Feb 30", 2025), None);
    }

    #[test]
    fn test_normalize_leap_day_depends_on_year() {
        assert_eq!(normalize("Feb 29", 2024), Some(ymd(2024, 2, 29)));
        assert_eq!(normalize("Feb 29", 2025), None);
    }
}
