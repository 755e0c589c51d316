use crate::employee::Employee;
use crate::project::ProjectError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a date.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, ProjectError> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT)
        .map_err(|_| ProjectError::InvalidDate(input.to_string()))
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Weekdays on which an employee normally works.
///
/// Indices at the serde boundary follow `0 = Monday .. 6 = Sunday`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct WorkPattern {
    working_days: HashSet<Weekday>,
}

impl Default for WorkPattern {
    fn default() -> Self {
        Self {
            working_days: HashSet::from([
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]),
        }
    }
}

impl WorkPattern {
    pub const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn new<I>(days: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        Self {
            working_days: days.into_iter().collect(),
        }
    }

    /// Build a pattern from weekday indices, rejecting anything outside `0..=6`.
    pub fn from_indices(indices: &[u8]) -> Result<Self, ProjectError> {
        let mut working_days = HashSet::with_capacity(indices.len());
        for &idx in indices {
            working_days.insert(Self::weekday_from_index(idx)?);
        }
        Ok(Self { working_days })
    }

    pub fn weekday_from_index(idx: u8) -> Result<Weekday, ProjectError> {
        Self::ALL_WEEKDAYS
            .get(usize::from(idx))
            .copied()
            .ok_or(ProjectError::InvalidWeekday(idx))
    }

    /// Sorted weekday indices (Monday first).
    pub fn indices(&self) -> Vec<u8> {
        let mut indices: Vec<u8> = self
            .working_days
            .iter()
            .map(|wd| wd.num_days_from_monday() as u8)
            .collect();
        indices.sort_unstable();
        indices
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.working_days.contains(&weekday)
    }

    pub fn is_empty(&self) -> bool {
        self.working_days.is_empty()
    }
}

impl From<WorkPattern> for Vec<u8> {
    fn from(pattern: WorkPattern) -> Self {
        pattern.indices()
    }
}

impl TryFrom<Vec<u8>> for WorkPattern {
    type Error = ProjectError;

    fn try_from(indices: Vec<u8>) -> Result<Self, Self::Error> {
        WorkPattern::from_indices(&indices)
    }
}

/// A set of calendar dates on which nobody (global) or one employee is off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<NaiveDate>", from = "Vec<NaiveDate>")]
pub struct HolidaySet {
    dates: HashSet<NaiveDate>,
}

impl HolidaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn insert_iso(&mut self, input: &str) -> Result<NaiveDate, ProjectError> {
        let date = parse_iso_date(input)?;
        self.dates.insert(date);
        Ok(date)
    }

    pub fn extend<I>(&mut self, dates: I)
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.dates.extend(dates);
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn sorted(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.dates.iter().copied().collect();
        dates.sort();
        dates
    }
}

impl From<HolidaySet> for Vec<NaiveDate> {
    fn from(set: HolidaySet) -> Self {
        set.sorted()
    }
}

impl From<Vec<NaiveDate>> for HolidaySet {
    fn from(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self {
            dates: iter.into_iter().collect(),
        }
    }
}

/// Check if the employee works on `date`.
///
/// Global and personal holidays win over the weekly pattern.
pub fn is_working_day(employee: &Employee, date: NaiveDate, global_holidays: &HolidaySet) -> bool {
    if global_holidays.contains(date) || employee.holidays().contains(date) {
        return false;
    }
    employee.work_pattern().contains(date.weekday())
}

/// First working day on or after `from`.
///
/// Returns `None` when the employee has no working weekday at all.
pub fn next_working_day(
    employee: &Employee,
    from: NaiveDate,
    global_holidays: &HolidaySet,
) -> Option<NaiveDate> {
    if employee.work_pattern().is_empty() {
        return None;
    }
    let mut current = from;
    while !is_working_day(employee, current, global_holidays) {
        current = current + Duration::days(1);
    }
    Some(current)
}

/// Get all working days in an inclusive date range
pub fn working_days_in_range(
    employee: &Employee,
    start: NaiveDate,
    end: NaiveDate,
    global_holidays: &HolidaySet,
) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;

    while current <= end {
        if is_working_day(employee, current, global_holidays) {
            days.push(current);
        }
        current = current + Duration::days(1);
    }
    days
}

pub fn count_working_days(
    employee: &Employee,
    start: NaiveDate,
    end: NaiveDate,
    global_holidays: &HolidaySet,
) -> usize {
    working_days_in_range(employee, start, end, global_holidays).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_pattern_is_monday_to_friday() {
        assert_eq!(WorkPattern::default().indices(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn pattern_rejects_out_of_range_index() {
        let err = WorkPattern::from_indices(&[0, 7]).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidWeekday(7)));
    }

    #[test]
    fn pattern_serializes_as_sorted_indices() {
        let pattern = WorkPattern::from_indices(&[5, 0, 2, 2]).unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        assert_eq!(json, "[0,2,5]");
        let back: WorkPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);
        assert!(serde_json::from_str::<WorkPattern>("[9]").is_err());
    }

    #[test]
    fn holiday_set_serializes_sorted_iso_dates() {
        let mut set = HolidaySet::new();
        set.insert(d(2024, 12, 26));
        set.insert(d(2024, 12, 25));
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["2024-12-25","2024-12-26"]"#);
    }

    #[test]
    fn insert_iso_rejects_malformed_date() {
        let mut set = HolidaySet::new();
        assert!(set.insert_iso("2024-02-30").is_err());
        assert!(set.insert_iso("25/12/2024").is_err());
        assert_eq!(set.insert_iso(" 2024-02-29 ").unwrap(), d(2024, 2, 29));
    }

    #[test]
    fn global_holiday_blocks_any_weekday() {
        let mut employee = Employee::new("Alice");
        employee.set_work_pattern(&[0, 1, 2, 3, 4, 5, 6]).unwrap();
        let mut globals = HolidaySet::new();
        // Wednesday and Saturday
        globals.insert(d(2024, 1, 10));
        globals.insert(d(2024, 1, 13));

        assert!(!is_working_day(&employee, d(2024, 1, 10), &globals));
        assert!(!is_working_day(&employee, d(2024, 1, 13), &globals));
        assert!(is_working_day(&employee, d(2024, 1, 11), &globals));
    }

    #[test]
    fn personal_holiday_and_pattern_are_respected() {
        let mut employee = Employee::new("Bob");
        employee.add_holiday("2024-01-09").unwrap();
        let globals = HolidaySet::new();

        assert!(is_working_day(&employee, d(2024, 1, 8), &globals));
        assert!(!is_working_day(&employee, d(2024, 1, 9), &globals));
        // Saturday outside the default pattern
        assert!(!is_working_day(&employee, d(2024, 1, 6), &globals));
    }

    #[test]
    fn next_working_day_is_inclusive_and_skips_weekend() {
        let employee = Employee::new("Carol");
        let globals = HolidaySet::new();
        let monday = d(2024, 1, 8);
        assert_eq!(next_working_day(&employee, monday, &globals), Some(monday));
        assert_eq!(
            next_working_day(&employee, d(2024, 1, 6), &globals),
            Some(monday)
        );
    }

    #[test]
    fn next_working_day_is_none_for_empty_pattern() {
        let mut employee = Employee::new("Dave");
        employee.set_work_pattern(&[]).unwrap();
        assert_eq!(
            next_working_day(&employee, d(2024, 1, 8), &HolidaySet::new()),
            None
        );
    }

    #[test]
    fn working_days_in_range_and_count_match() {
        let mut employee = Employee::new("Erin");
        employee.add_holiday("2024-01-10").unwrap();
        let globals = HolidaySet::new();
        let days = working_days_in_range(&employee, d(2024, 1, 8), d(2024, 1, 14), &globals);
        assert_eq!(
            days,
            vec![d(2024, 1, 8), d(2024, 1, 9), d(2024, 1, 11), d(2024, 1, 12)]
        );
        assert_eq!(
            count_working_days(&employee, d(2024, 1, 8), d(2024, 1, 14), &globals),
            4
        );
    }
}
