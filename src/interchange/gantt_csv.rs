use super::definition::TaskDefinition;
use super::{InterchangeError, InterchangeResult};
use crate::calendar::format_iso_date;
use crate::project::Project;
use crate::report::{TaskView, task_views};
use crate::task::Task;
use crate::validation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One Gantt row. Input columns first, then the computed ones which import
/// ignores.
#[derive(Debug, Default, Serialize, Deserialize)]
struct GanttCsvRecord {
    name: String,
    #[serde(default)]
    dependency: String,
    #[serde(default)]
    assigned_to: String,
    #[serde(default)]
    estimated_duration: String,
    #[serde(default)]
    availability: String,
    #[serde(default)]
    contingency_margin: String,
    #[serde(default)]
    actual_duration: String,
    #[serde(default)]
    custom_start_date: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    working_dates: String,
    #[serde(default)]
    holiday_dates: String,
}

impl From<&TaskView> for GanttCsvRecord {
    fn from(view: &TaskView) -> Self {
        Self {
            name: view.name.clone(),
            dependency: view.dependency.clone().unwrap_or_default(),
            assigned_to: view.assigned_to.clone(),
            estimated_duration: view.estimated_duration.to_string(),
            availability: view.availability.to_string(),
            contingency_margin: view.contingency_margin.to_string(),
            actual_duration: view.actual_duration.to_string(),
            custom_start_date: format_date(view.custom_start_date),
            start_date: format_date(view.start_date),
            end_date: format_date(view.end_date),
            working_dates: join_dates(&view.working_dates),
            holiday_dates: join_dates(&view.holiday_dates),
        }
    }
}

impl GanttCsvRecord {
    fn into_task(self) -> InterchangeResult<Task> {
        let name = self.name.trim().to_string();
        if self.assigned_to.trim().is_empty() {
            return Err(InterchangeError::InvalidData(format!(
                "Task '{name}' has no assigned employee"
            )));
        }
        let estimated_raw = self.estimated_duration.trim();
        if estimated_raw.is_empty() {
            return Err(InterchangeError::InvalidData(format!(
                "Task '{name}' has no estimated duration"
            )));
        }
        let estimated_duration = estimated_raw.parse::<u32>().map_err(|_| {
            InterchangeError::InvalidData(format!(
                "Task '{name}' has invalid estimated duration: {estimated_raw}"
            ))
        })?;
        let availability = parse_percent(&self.availability, 100).ok_or_else(|| {
            InterchangeError::InvalidData(format!(
                "Task '{name}' has invalid availability: {}",
                self.availability.trim()
            ))
        })?;
        let contingency_margin = parse_percent(&self.contingency_margin, 0).ok_or_else(|| {
            InterchangeError::InvalidData(format!(
                "Task '{name}' has invalid contingency margin: {}",
                self.contingency_margin.trim()
            ))
        })?;

        TaskDefinition {
            name,
            dependency: Some(self.dependency),
            assigned_to: self.assigned_to,
            estimated_duration,
            availability,
            contingency_margin,
            custom_start_date: Some(self.custom_start_date),
        }
        .into_task()
    }
}

/// Blank means `default`; anything else must be an integer.
fn parse_percent(input: &str, default: i32) -> Option<i32> {
    let input = input.trim();
    if input.is_empty() {
        return Some(default);
    }
    input.parse::<i32>().ok()
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(format_iso_date).unwrap_or_default()
}

fn join_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|date| format_iso_date(*date))
        .collect::<Vec<_>>()
        .join(";")
}

/// Write one Gantt row per task, in task order.
pub fn write_gantt_csv<W: Write>(project: &Project, writer: W) -> InterchangeResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for view in task_views(project) {
        writer.serialize(GanttCsvRecord::from(&view))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_gantt_to_csv<P: AsRef<Path>>(project: &Project, path: P) -> InterchangeResult<()> {
    let file = File::create(path)?;
    write_gantt_csv(project, file)
}

/// Read task definitions from a Gantt CSV.
///
/// Reading stops at the first row without a task name. Computed columns are
/// ignored, so a file written by [`export_gantt_to_csv`] imports cleanly.
pub fn import_tasks_from_csv<P: AsRef<Path>>(path: P) -> InterchangeResult<Vec<Task>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut tasks = Vec::new();
    for record in reader.deserialize::<GanttCsvRecord>() {
        let record = record?;
        if record.name.trim().is_empty() {
            break;
        }
        tasks.push(record.into_task()?);
    }

    if tasks.is_empty() {
        return Err(InterchangeError::InvalidData("No tasks found".into()));
    }
    validation::validate_task_collection(&tasks)?;
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_percentages_take_defaults() {
        assert_eq!(parse_percent("", 100), Some(100));
        assert_eq!(parse_percent(" 40 ", 100), Some(40));
        assert_eq!(parse_percent("half", 100), None);
    }

    #[test]
    fn record_conversion_reports_bad_duration() {
        let record = GanttCsvRecord {
            name: "Build".into(),
            assigned_to: "Alice".into(),
            estimated_duration: "three".into(),
            ..Default::default()
        };
        assert_eq!(
            record.into_task().unwrap_err().to_string(),
            "Task 'Build' has invalid estimated duration: three"
        );
    }

    #[test]
    fn record_conversion_drops_blank_dependency_and_bad_custom_date() {
        let record = GanttCsvRecord {
            name: "Build".into(),
            assigned_to: "Alice".into(),
            estimated_duration: "2".into(),
            dependency: "  ".into(),
            custom_start_date: "31/01/2024".into(),
            ..Default::default()
        };
        let task = record.into_task().unwrap();
        assert_eq!(task.dependency, None);
        assert_eq!(task.custom_start_date, None);
        assert_eq!(task.availability, 100);
        assert_eq!(task.contingency_margin, 0);
    }
}
