use crate::calendar::{HolidaySet, WorkPattern};
use crate::project::ProjectError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A person tasks are assigned to, with their weekly pattern and days off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    work_pattern: WorkPattern,
    #[serde(default)]
    holidays: HolidaySet,
}

impl Employee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            work_pattern: WorkPattern::default(),
            holidays: HolidaySet::new(),
        }
    }

    /// Replace the weekly pattern with weekday indices (0 = Monday, 6 = Sunday).
    pub fn set_work_pattern(&mut self, work_days: &[u8]) -> Result<(), ProjectError> {
        self.work_pattern = WorkPattern::from_indices(work_days)?;
        Ok(())
    }

    pub fn with_work_pattern(mut self, pattern: WorkPattern) -> Self {
        self.work_pattern = pattern;
        self
    }

    /// Add a personal holiday given as `YYYY-MM-DD`.
    pub fn add_holiday(&mut self, date: &str) -> Result<NaiveDate, ProjectError> {
        self.holidays.insert_iso(date)
    }

    pub fn add_holiday_date(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn work_pattern(&self) -> &WorkPattern {
        &self.work_pattern
    }

    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let employee: Employee = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(employee.work_pattern().indices(), vec![0, 1, 2, 3, 4]);
        assert!(employee.holidays().is_empty());
    }

    #[test]
    fn failed_pattern_update_keeps_previous_pattern() {
        let mut employee = Employee::new("Bob");
        assert!(employee.set_work_pattern(&[1, 8]).is_err());
        assert_eq!(employee.work_pattern().indices(), vec![0, 1, 2, 3, 4]);
    }
}
