//! Read-side views of a scheduled project for exporters.
//!
//! [`GanttView`] is the JSON payload served over HTTP; [`gantt_dataframe`]
//! lays the same data out as a chart grid (one boolean column per calendar
//! day) for tabular output.

use crate::employee::Employee;
use crate::project::Project;
use crate::task::Task;
use chrono::{Datelike, Days, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FIXED_COLUMNS: [&str; 6] = [
    "task_name",
    "assigned_to",
    "estimated_duration",
    "actual_duration",
    "start_date",
    "end_date",
];

/// Per-task read surface consumed by exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub name: String,
    pub assigned_to: String,
    pub estimated_duration: u32,
    pub actual_duration: u32,
    pub availability: i32,
    pub contingency_margin: i32,
    pub dependency: Option<String>,
    pub custom_start_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub working_dates: Vec<NaiveDate>,
    pub holiday_dates: Vec<NaiveDate>,
}

impl TaskView {
    pub fn from_task(task: &Task, employee: Option<&Employee>) -> Self {
        Self {
            name: task.name.clone(),
            assigned_to: task.assigned_to.clone(),
            estimated_duration: task.estimated_duration,
            actual_duration: task.actual_duration(),
            availability: task.availability,
            contingency_margin: task.contingency_margin,
            dependency: task.dependency.clone(),
            custom_start_date: task.custom_start_date,
            start_date: task.start_date(),
            end_date: task.end_date(),
            working_dates: task.working_dates().to_vec(),
            holiday_dates: employee
                .map(|employee| task.holiday_dates(employee))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanttView {
    pub project_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub tasks: Vec<TaskView>,
}

pub fn task_views(project: &Project) -> Vec<TaskView> {
    project
        .tasks()
        .iter()
        .map(|task| TaskView::from_task(task, project.employee(&task.assigned_to)))
        .collect()
}

pub fn gantt_view(project: &Project) -> GanttView {
    let (start_date, end_date) = project.date_range();
    GanttView {
        project_name: project.name().to_string(),
        start_date,
        end_date,
        tasks: task_views(project),
    }
}

/// Every calendar day of the project's date range, inclusive.
pub fn calendar_days(project: &Project) -> Vec<NaiveDate> {
    let (start, end) = project.date_range();
    let mut days = Vec::new();
    let mut current = Some(start);
    while let Some(day) = current {
        if day > end {
            break;
        }
        days.push(day);
        current = day.checked_add_days(Days::new(1));
    }
    days
}

/// One row per task with the fixed Gantt columns.
pub fn summary_dataframe(project: &Project) -> PolarsResult<DataFrame> {
    DataFrame::new(fixed_columns(project.tasks())?)
}

/// Fixed columns followed by one boolean column per calendar day, true on
/// the task's working dates.
pub fn gantt_dataframe(project: &Project) -> PolarsResult<DataFrame> {
    let tasks = project.tasks();
    let mut columns = fixed_columns(tasks)?;

    let working_sets: Vec<HashSet<NaiveDate>> = tasks
        .iter()
        .map(|task| task.working_dates().iter().copied().collect())
        .collect();
    for day in calendar_days(project) {
        let flags: Vec<bool> = working_sets.iter().map(|set| set.contains(&day)).collect();
        let name = day.format("%Y-%m-%d").to_string();
        columns.push(Series::new(name.as_str().into(), flags).into_column());
    }

    DataFrame::new(columns)
}

fn fixed_columns(tasks: &[Task]) -> PolarsResult<Vec<Column>> {
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    let assignees: Vec<&str> = tasks.iter().map(|t| t.assigned_to.as_str()).collect();
    let estimated: Vec<i64> = tasks.iter().map(|t| i64::from(t.estimated_duration)).collect();
    let actual: Vec<i64> = tasks.iter().map(|t| i64::from(t.actual_duration())).collect();
    let starts: Vec<Option<NaiveDate>> = tasks.iter().map(Task::start_date).collect();
    let ends: Vec<Option<NaiveDate>> = tasks.iter().map(Task::end_date).collect();

    Ok(vec![
        Series::new(PlSmallStr::from_static("task_name"), names).into_column(),
        Series::new(PlSmallStr::from_static("assigned_to"), assignees).into_column(),
        Series::new(PlSmallStr::from_static("estimated_duration"), estimated).into_column(),
        Series::new(PlSmallStr::from_static("actual_duration"), actual).into_column(),
        series_from_dates("start_date", &starts)?.into_column(),
        series_from_dates("end_date", &ends)?.into_column(),
    ])
}

fn series_from_dates(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Series> {
    let data: Vec<Option<i32>> = dates.iter().map(|d| d.map(date_to_i32)).collect();
    Series::new(name.into(), data).cast(&DataType::Date)
}

// 1970-01-01 counted from 0001-01-01
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_to_i32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}
