use crate::employee::Employee;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_AVAILABILITY: i32 = 100;

fn default_availability() -> i32 {
    DEFAULT_AVAILABILITY
}

/// Dates a task was placed on by the scheduler.
///
/// `working_dates` is strictly increasing and never empty, so the start and
/// end dates are always its first and last element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSchedule {
    working_dates: Vec<NaiveDate>,
}

impl TaskSchedule {
    pub(crate) fn new(working_dates: Vec<NaiveDate>) -> Self {
        debug_assert!(!working_dates.is_empty());
        debug_assert!(working_dates.windows(2).all(|w| w[0] < w[1]));
        Self { working_dates }
    }

    pub fn actual_duration(&self) -> u32 {
        self.working_dates.len() as u32
    }

    pub fn start_date(&self) -> NaiveDate {
        self.working_dates[0]
    }

    pub fn end_date(&self) -> NaiveDate {
        self.working_dates[self.working_dates.len() - 1]
    }

    pub fn working_dates(&self) -> &[NaiveDate] {
        &self.working_dates
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    /// Ideal working days at full availability.
    pub estimated_duration: u32,
    pub assigned_to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    /// Percent of a working day spent on this task (1-100).
    #[serde(default = "default_availability")]
    pub availability: i32,
    #[serde(default)]
    pub contingency_margin: i32,
    /// Carried through import/export only; the scheduler does not read it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schedule: Option<TaskSchedule>,
}

impl Task {
    pub fn new(name: impl Into<String>, estimated_duration: u32, assigned_to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            estimated_duration,
            assigned_to: assigned_to.into(),
            dependency: None,
            availability: DEFAULT_AVAILABILITY,
            contingency_margin: 0,
            custom_start_date: None,
            schedule: None,
        }
    }

    pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    pub fn with_availability(mut self, availability: i32) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_contingency(mut self, contingency_margin: i32) -> Self {
        self.contingency_margin = contingency_margin;
        self
    }

    pub fn with_custom_start_date(mut self, date: NaiveDate) -> Self {
        self.custom_start_date = Some(date);
        self
    }

    pub fn schedule(&self) -> Option<&TaskSchedule> {
        self.schedule.as_ref()
    }

    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }

    pub(crate) fn set_schedule(&mut self, schedule: TaskSchedule) {
        self.schedule = Some(schedule);
    }

    pub(crate) fn clear_schedule(&mut self) {
        self.schedule = None;
    }

    /// Zero until the task has been scheduled.
    pub fn actual_duration(&self) -> u32 {
        self.schedule
            .as_ref()
            .map(TaskSchedule::actual_duration)
            .unwrap_or(0)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.schedule.as_ref().map(TaskSchedule::start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.schedule.as_ref().map(TaskSchedule::end_date)
    }

    pub fn working_dates(&self) -> &[NaiveDate] {
        self.schedule
            .as_ref()
            .map(TaskSchedule::working_dates)
            .unwrap_or(&[])
    }

    /// Days inside the task's span the assignee would normally work but was off.
    ///
    /// Days outside the work pattern (weekends for a Mon-Fri employee) are
    /// not reported.
    pub fn holiday_dates(&self, employee: &Employee) -> Vec<NaiveDate> {
        let Some(schedule) = self.schedule.as_ref() else {
            return Vec::new();
        };
        let working = schedule.working_dates();
        let mut holidays = Vec::new();
        let mut current = schedule.start_date();
        while current <= schedule.end_date() {
            if employee.work_pattern().contains(current.weekday())
                && working.binary_search(&current).is_err()
            {
                holidays.push(current);
            }
            current = current + Duration::days(1);
        }
        holidays
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unscheduled_task_reports_empty_outputs() {
        let task = Task::new("Design", 5, "Alice");
        assert_eq!(task.actual_duration(), 0);
        assert_eq!(task.start_date(), None);
        assert_eq!(task.end_date(), None);
        assert!(task.working_dates().is_empty());
        assert!(task.holiday_dates(&Employee::new("Alice")).is_empty());
    }

    #[test]
    fn deserializes_optional_fields_with_defaults() {
        let task: Task = serde_json::from_str(
            r#"{"name":"Build","estimated_duration":4,"assigned_to":"Bob"}"#,
        )
        .unwrap();
        assert_eq!(task.availability, 100);
        assert_eq!(task.contingency_margin, 0);
        assert_eq!(task.dependency, None);
        assert_eq!(task.custom_start_date, None);
        assert!(!task.is_scheduled());
    }

    #[test]
    fn holiday_dates_exclude_weekends_and_working_dates() {
        let mut employee = Employee::new("Alice");
        employee.add_holiday("2024-01-10").unwrap();
        let mut task = Task::new("Req", 4, "Alice");
        // Thu 11th, Fri 12th, weekend, Mon 15th
        task.set_schedule(TaskSchedule::new(vec![
            d(2024, 1, 9),
            d(2024, 1, 11),
            d(2024, 1, 12),
            d(2024, 1, 15),
        ]));
        assert_eq!(task.start_date(), Some(d(2024, 1, 9)));
        assert_eq!(task.end_date(), Some(d(2024, 1, 15)));
        assert_eq!(task.holiday_dates(&employee), vec![d(2024, 1, 10)]);
    }
}
