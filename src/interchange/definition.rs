use super::dates::parse_date_ranges;
use super::{InterchangeError, InterchangeResult};
use crate::calendar::{format_iso_date, parse_iso_date};
use crate::employee::Employee;
use crate::project::Project;
use crate::task::{DEFAULT_AVAILABILITY, Task};
use crate::validation;
use serde::{Deserialize, Serialize};

fn default_availability() -> i32 {
    DEFAULT_AVAILABILITY
}

fn default_work_pattern() -> Vec<u8> {
    vec![0, 1, 2, 3, 4]
}

fn default_project_name() -> String {
    "Unnamed Project".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default = "default_project_name")]
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    /// Date or range expressions, see [`parse_date_ranges`].
    #[serde(default)]
    pub global_holidays: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDefinition {
    pub name: String,
    #[serde(default = "default_work_pattern")]
    pub work_pattern: Vec<u8>,
    #[serde(default)]
    pub holidays: Vec<String>,
}

impl EmployeeDefinition {
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            work_pattern: employee.work_pattern().indices(),
            holidays: employee
                .holidays()
                .sorted()
                .into_iter()
                .map(format_iso_date)
                .collect(),
        }
    }

    /// Build the employee; holiday entries that do not parse are skipped.
    pub fn into_employee(self) -> InterchangeResult<Employee> {
        let mut employee = Employee::new(self.name.trim());
        employee.set_work_pattern(&self.work_pattern)?;
        for entry in &self.holidays {
            for date in parse_date_ranges(entry) {
                employee.add_holiday_date(date);
            }
        }
        Ok(employee)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub estimated_duration: u32,
    #[serde(default = "default_availability")]
    pub availability: i32,
    #[serde(default)]
    pub contingency_margin: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_start_date: Option<String>,
}

impl TaskDefinition {
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            dependency: task.dependency.clone(),
            assigned_to: task.assigned_to.clone(),
            estimated_duration: task.estimated_duration,
            availability: task.availability,
            contingency_margin: task.contingency_margin,
            custom_start_date: task.custom_start_date.map(format_iso_date),
        }
    }

    /// Build the task. A blank dependency means none and an unparsable
    /// custom start date is dropped.
    pub fn into_task(self) -> InterchangeResult<Task> {
        let name = self.name.trim().to_string();
        let assigned_to = self.assigned_to.trim();
        if assigned_to.is_empty() {
            return Err(InterchangeError::InvalidData(format!(
                "Task '{name}' has no assigned employee"
            )));
        }
        if self.estimated_duration == 0 {
            return Err(InterchangeError::InvalidData(format!(
                "Task '{name}' has no estimated duration"
            )));
        }

        let mut task = Task::new(name, self.estimated_duration, assigned_to)
            .with_availability(self.availability)
            .with_contingency(self.contingency_margin);
        if let Some(dependency) = self.dependency.as_deref().map(str::trim) {
            if !dependency.is_empty() {
                task = task.with_dependency(dependency);
            }
        }
        if let Some(date) = self
            .custom_start_date
            .as_deref()
            .and_then(|raw| parse_iso_date(raw).ok())
        {
            task = task.with_custom_start_date(date);
        }
        Ok(task)
    }
}

/// Everything needed to rebuild a project, without computed dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDefinition {
    pub project_info: ProjectInfo,
    #[serde(default)]
    pub employees: Vec<EmployeeDefinition>,
    #[serde(default)]
    pub tasks: Vec<TaskDefinition>,
}

impl ProjectDefinition {
    pub fn from_project(project: &Project) -> Self {
        Self {
            project_info: ProjectInfo {
                name: project.name().to_string(),
                start_date: format_iso_date(project.start_date()),
                global_holidays: project
                    .global_holidays()
                    .sorted()
                    .into_iter()
                    .map(format_iso_date)
                    .collect(),
            },
            employees: project
                .employees()
                .map(EmployeeDefinition::from_employee)
                .collect(),
            tasks: project.tasks().iter().map(TaskDefinition::from_task).collect(),
        }
    }

    /// Rebuild and validate the project. The schedule is not computed.
    pub fn into_project(self) -> InterchangeResult<Project> {
        let ProjectDefinition {
            project_info,
            employees,
            tasks,
        } = self;

        let name = project_info.name.trim();
        let start_raw = project_info.start_date.trim();
        if name.is_empty() || start_raw.is_empty() {
            return Err(InterchangeError::InvalidData(
                "Project info must contain a project name and a start date".into(),
            ));
        }
        let start_date = parse_iso_date(start_raw).map_err(|_| {
            InterchangeError::InvalidData(format!(
                "Invalid start date format: {start_raw}. Expected YYYY-MM-DD"
            ))
        })?;
        let mut project = Project::new(name, start_date);
        for entry in &project_info.global_holidays {
            for date in parse_date_ranges(entry) {
                project.add_global_holiday_date(date);
            }
        }

        if employees.is_empty() {
            return Err(InterchangeError::InvalidData("No employees found".into()));
        }
        for employee in employees {
            project.add_employee(employee.into_employee()?);
        }

        if tasks.is_empty() {
            return Err(InterchangeError::InvalidData("No tasks found".into()));
        }
        for task in tasks {
            project.add_task(task.into_task()?)?;
        }

        validation::validate_project(&project)?;
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_json() -> &'static str {
        r#"{
            "project_info": {
                "name": "Website",
                "start_date": "2024-01-08",
                "global_holidays": ["2024-01-15", "not a date"]
            },
            "employees": [
                {"name": "Alice", "holidays": ["10/01/2024"]},
                {"name": "Bob", "work_pattern": [0, 2, 4]}
            ],
            "tasks": [
                {"name": "Design", "assigned_to": "Alice", "estimated_duration": 3},
                {"name": "Build", "assigned_to": "Bob", "estimated_duration": 4,
                 "dependency": "Design", "availability": 50,
                 "custom_start_date": "soon"}
            ]
        }"#
    }

    #[test]
    fn into_project_applies_defaults_and_lenient_holidays() {
        let definition: ProjectDefinition = serde_json::from_str(sample_json()).unwrap();
        let project = definition.into_project().unwrap();

        assert_eq!(project.name(), "Website");
        assert_eq!(project.global_holidays().sorted(), vec![d(2024, 1, 15)]);
        let alice = project.employee("Alice").unwrap();
        assert_eq!(alice.work_pattern().indices(), vec![0, 1, 2, 3, 4]);
        assert!(alice.holidays().contains(d(2024, 1, 10)));

        let build = project.task("Build").unwrap();
        assert_eq!(build.dependency.as_deref(), Some("Design"));
        assert_eq!(build.availability, 50);
        assert_eq!(build.contingency_margin, 0);
        assert_eq!(build.custom_start_date, None);
        assert!(!build.is_scheduled());
    }

    #[test]
    fn from_project_round_trips_definitions() {
        let definition: ProjectDefinition = serde_json::from_str(sample_json()).unwrap();
        let project = definition.into_project().unwrap();
        let exported = ProjectDefinition::from_project(&project);
        assert_eq!(exported.project_info.global_holidays, vec!["2024-01-15"]);
        assert_eq!(exported.employees[1].work_pattern, vec![0, 2, 4]);
        let rebuilt = exported.clone().into_project().unwrap();
        assert_eq!(ProjectDefinition::from_project(&rebuilt), exported);
    }

    #[test]
    fn rejects_missing_pieces() {
        let mut definition: ProjectDefinition = serde_json::from_str(sample_json()).unwrap();
        definition.project_info.start_date = "08/01/2024".into();
        let err = definition.into_project().unwrap_err();
        assert!(err.to_string().contains("Invalid start date format: 08/01/2024"));

        let mut definition: ProjectDefinition = serde_json::from_str(sample_json()).unwrap();
        definition.employees.clear();
        assert_eq!(definition.into_project().unwrap_err().to_string(), "No employees found");

        let mut definition: ProjectDefinition = serde_json::from_str(sample_json()).unwrap();
        definition.tasks.clear();
        assert_eq!(definition.into_project().unwrap_err().to_string(), "No tasks found");

        let mut definition: ProjectDefinition = serde_json::from_str(sample_json()).unwrap();
        definition.tasks[0].assigned_to = "  ".into();
        assert_eq!(
            definition.into_project().unwrap_err().to_string(),
            "Task 'Design' has no assigned employee"
        );

        let mut definition: ProjectDefinition = serde_json::from_str(sample_json()).unwrap();
        definition.tasks[1].assigned_to = "Carol".into();
        assert!(
            definition
                .into_project()
                .unwrap_err()
                .to_string()
                .contains("unknown employee 'Carol'")
        );
    }
}
