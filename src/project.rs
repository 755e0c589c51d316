use crate::calendar::{HolidaySet, format_iso_date, parse_iso_date};
use crate::employee::Employee;
use crate::scheduler::{ScheduleError, Scheduler};
use crate::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid weekday index {0}, expected 0 (Monday) to 6 (Sunday)")]
    InvalidWeekday(u8),
    #[error("task '{0}' already exists")]
    DuplicateTask(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub task_count: usize,
    pub passes: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let span_days = (self.end_date - self.start_date).num_days() + 1;
        format!(
            "tasks={}, passes={}, start={}, finish={}, span_days={}",
            self.task_count, self.passes, self.start_date, self.end_date, span_days
        )
    }
}

/// Aggregate root: employees, ordered tasks and project-wide holidays.
///
/// Task insertion order is the scheduler's iteration order.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    start_date: NaiveDate,
    employees: BTreeMap<String, Employee>,
    tasks: Vec<Task>,
    global_holidays: HolidaySet,
}

impl Project {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            employees: BTreeMap::new(),
            tasks: Vec::new(),
            global_holidays: HolidaySet::new(),
        }
    }

    /// Create a project from a `YYYY-MM-DD` start date.
    pub fn with_iso_start(name: impl Into<String>, start_date: &str) -> Result<Self, ProjectError> {
        Ok(Self::new(name, parse_iso_date(start_date)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Register an employee; an existing employee with the same name is
    /// replaced and returned.
    pub fn add_employee(&mut self, employee: Employee) -> Option<Employee> {
        self.employees.insert(employee.name.clone(), employee)
    }

    pub fn employee(&self, name: &str) -> Option<&Employee> {
        self.employees.get(name)
    }

    pub fn employee_mut(&mut self, name: &str) -> Option<&mut Employee> {
        self.employees.get_mut(name)
    }

    /// Employees sorted by name.
    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    pub fn add_task(&mut self, task: Task) -> Result<(), ProjectError> {
        if self.task(&task.name).is_some() {
            return Err(ProjectError::DuplicateTask(task.name));
        }
        self.tasks.push(task);
        Ok(())
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn add_global_holiday(&mut self, date: &str) -> Result<NaiveDate, ProjectError> {
        self.global_holidays.insert_iso(date)
    }

    pub fn add_global_holiday_date(&mut self, date: NaiveDate) {
        self.global_holidays.insert(date);
    }

    pub fn global_holidays(&self) -> &HolidaySet {
        &self.global_holidays
    }

    /// Schedule every task, committing dates only when the whole run succeeds.
    ///
    /// On error no task is touched, so results from an earlier successful run
    /// stay as they were.
    pub fn calculate_schedule(&mut self) -> Result<ScheduleSummary, ScheduleError> {
        let outcome = Scheduler::new(self).execute()?;
        let passes = outcome.passes();

        let mut assignments: BTreeMap<String, _> = outcome.into_assignments().into_iter().collect();
        for task in &mut self.tasks {
            match assignments.remove(&task.name) {
                Some(schedule) => task.set_schedule(schedule),
                None => task.clear_schedule(),
            }
        }

        let (start_date, end_date) = self.date_range();
        info!(
            project = %self.name,
            tasks = self.tasks.len(),
            passes,
            start = %format_iso_date(start_date),
            end = %format_iso_date(end_date),
            "schedule calculated"
        );

        Ok(ScheduleSummary {
            task_count: self.tasks.len(),
            passes,
            start_date,
            end_date,
        })
    }

    /// Drop every computed schedule, keeping the task definitions.
    pub fn clear_schedule(&mut self) {
        for task in &mut self.tasks {
            task.clear_schedule();
        }
    }

    /// Latest end date over scheduled tasks.
    pub fn project_end_date(&self) -> Option<NaiveDate> {
        self.tasks.iter().filter_map(Task::end_date).max()
    }

    /// `(project start, latest task end)`; the end falls back to the start
    /// when nothing is scheduled.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let end = self.project_end_date().unwrap_or(self.start_date);
        (self.start_date, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_project_range_is_start_to_start() {
        let project = Project::new("Empty", d(2024, 1, 8));
        assert_eq!(project.date_range(), (d(2024, 1, 8), d(2024, 1, 8)));
        assert_eq!(project.project_end_date(), None);
    }

    #[test]
    fn duplicate_task_names_are_rejected() {
        let mut project = Project::new("Dup", d(2024, 1, 8));
        project.add_task(Task::new("A", 1, "Alice")).unwrap();
        let err = project.add_task(Task::new("A", 2, "Bob")).unwrap_err();
        assert_eq!(err, ProjectError::DuplicateTask("A".into()));
        assert_eq!(project.tasks().len(), 1);
    }

    #[test]
    fn adding_employee_twice_replaces_it() {
        let mut project = Project::new("Team", d(2024, 1, 8));
        assert!(project.add_employee(Employee::new("Alice")).is_none());
        let mut weekend = Employee::new("Alice");
        weekend.set_work_pattern(&[5, 6]).unwrap();
        let previous = project.add_employee(weekend).unwrap();
        assert_eq!(previous.work_pattern().indices(), vec![0, 1, 2, 3, 4]);
        assert_eq!(
            project.employee("Alice").unwrap().work_pattern().indices(),
            vec![5, 6]
        );
    }

    #[test]
    fn with_iso_start_rejects_malformed_date() {
        assert!(Project::with_iso_start("P", "08/01/2024").is_err());
        let project = Project::with_iso_start("P", "2024-01-08").unwrap();
        assert_eq!(project.start_date(), d(2024, 1, 8));
    }

    #[test]
    fn summary_reports_span() {
        let summary = ScheduleSummary {
            task_count: 2,
            passes: 1,
            start_date: d(2024, 1, 8),
            end_date: d(2024, 1, 12),
        };
        assert_eq!(
            summary.to_cli_summary(),
            "tasks=2, passes=1, start=2024-01-08, finish=2024-01-12, span_days=5"
        );
    }
}
