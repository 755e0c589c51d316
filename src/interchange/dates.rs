use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

fn parse_single_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
}

/// Inclusive range `start..=end`; `None` when `end` precedes `start`.
fn expand_range(start: NaiveDate, end: NaiveDate) -> Option<Vec<NaiveDate>> {
    if end < start {
        return None;
    }
    let mut days = Vec::new();
    let mut current = Some(start);
    while let Some(day) = current {
        if day > end {
            break;
        }
        days.push(day);
        current = day.checked_add_days(Days::new(1));
    }
    Some(days)
}

/// One comma-separated entry: a single date or `start-end`.
///
/// ISO dates contain dashes themselves, so every dash is tried as the range
/// separator until both halves parse.
fn parse_entry(entry: &str) -> Option<Vec<NaiveDate>> {
    if let Some(date) = parse_single_date(entry) {
        return Some(vec![date]);
    }
    entry
        .match_indices('-')
        .find_map(|(idx, _)| {
            let start = parse_single_date(&entry[..idx])?;
            let end = parse_single_date(&entry[idx + 1..])?;
            Some((start, end))
        })
        .and_then(|(start, end)| expand_range(start, end))
}

fn is_blank(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.eq_ignore_ascii_case("none")
}

/// Parse holiday text such as `25/12/2024, 30/12/2024-01/01/2025`.
///
/// Dates may be written `DD/MM/YYYY` or `YYYY-MM-DD`; ranges are inclusive.
/// Entries that do not parse are skipped. The result is sorted and free of
/// duplicates.
pub fn parse_date_ranges(text: &str) -> Vec<NaiveDate> {
    if is_blank(text) {
        return Vec::new();
    }
    let mut dates = BTreeSet::new();
    for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if let Some(days) = parse_entry(entry) {
            dates.extend(days);
        }
    }
    dates.into_iter().collect()
}

/// Like [`parse_date_ranges`] but reports the first entry that does not parse.
pub fn try_parse_date_ranges(text: &str) -> Result<Vec<NaiveDate>, String> {
    if is_blank(text) {
        return Ok(Vec::new());
    }
    let mut dates = BTreeSet::new();
    for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let days = parse_entry(entry).ok_or_else(|| entry.to_string())?;
        dates.extend(days);
    }
    Ok(dates.into_iter().collect())
}
