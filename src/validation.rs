use crate::project::Project;
use crate::task::Task;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskValidationError {
    message: String,
}

impl TaskValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TaskValidationError {}

/// Field-level checks that need no other task or employee.
pub fn validate_task(task: &Task) -> Result<(), TaskValidationError> {
    if task.name.trim().is_empty() {
        return Err(TaskValidationError::new("task name must not be empty"));
    }
    if task.assigned_to.trim().is_empty() {
        return Err(TaskValidationError::new(format!(
            "Task '{}' has no assigned employee",
            task.name
        )));
    }
    if task.estimated_duration == 0 {
        return Err(TaskValidationError::new(format!(
            "Task '{}' has no estimated duration",
            task.name
        )));
    }
    if !(1..=100).contains(&task.availability) {
        return Err(TaskValidationError::new(format!(
            "Task '{}' has invalid availability: {} (must be between 1 and 100)",
            task.name, task.availability
        )));
    }
    if task.contingency_margin < 0 {
        return Err(TaskValidationError::new(format!(
            "Task '{}' has invalid contingency margin: {} (must not be negative)",
            task.name, task.contingency_margin
        )));
    }
    if task.dependency.as_deref() == Some(task.name.as_str()) {
        return Err(TaskValidationError::new(format!(
            "Task '{}' depends on itself",
            task.name
        )));
    }
    Ok(())
}

pub fn validate_task_collection(tasks: &[Task]) -> Result<(), TaskValidationError> {
    let mut seen_names = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen_names.insert(task.name.as_str()) {
            return Err(TaskValidationError::new(format!(
                "duplicate task name '{}'",
                task.name
            )));
        }
        validate_task(task)?;
    }
    Ok(())
}

/// Reference checks across the aggregate: every assignee and dependency must
/// resolve. Cycles are left to the scheduler.
pub fn validate_project(project: &Project) -> Result<(), TaskValidationError> {
    validate_task_collection(project.tasks())?;
    for task in project.tasks() {
        if project.employee(&task.assigned_to).is_none() {
            return Err(TaskValidationError::new(format!(
                "Task '{}' is assigned to unknown employee '{}'",
                task.name, task.assigned_to
            )));
        }
        if let Some(dependency) = task.dependency.as_deref() {
            if project.task(dependency).is_none() {
                return Err(TaskValidationError::new(format!(
                    "Dependency '{}' not found for task '{}'",
                    dependency, task.name
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Employee;
    use chrono::NaiveDate;

    #[test]
    fn rejects_out_of_range_fields() {
        let err = validate_task(&Task::new("A", 1, "Alice").with_availability(0)).unwrap_err();
        assert!(err.to_string().contains("invalid availability: 0"));
        let err = validate_task(&Task::new("A", 1, "Alice").with_contingency(-5)).unwrap_err();
        assert!(err.to_string().contains("invalid contingency margin: -5"));
        let err = validate_task(&Task::new("A", 0, "Alice")).unwrap_err();
        assert!(err.to_string().contains("no estimated duration"));
        let err = validate_task(&Task::new("A", 1, " ")).unwrap_err();
        assert!(err.to_string().contains("no assigned employee"));
        let err = validate_task(&Task::new("A", 1, "Alice").with_dependency("A")).unwrap_err();
        assert!(err.to_string().contains("depends on itself"));
    }

    #[test]
    fn collection_rejects_duplicate_names() {
        let tasks = vec![Task::new("A", 1, "Alice"), Task::new("A", 2, "Bob")];
        let err = validate_task_collection(&tasks).unwrap_err();
        assert!(err.to_string().contains("duplicate task name 'A'"));
    }

    #[test]
    fn project_references_must_resolve() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let mut project = Project::new("Refs", start);
        project.add_employee(Employee::new("Alice"));
        project.add_task(Task::new("A", 1, "Alice")).unwrap();
        assert!(validate_project(&project).is_ok());

        project
            .add_task(Task::new("B", 1, "Alice").with_dependency("Ghost"))
            .unwrap();
        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("Dependency 'Ghost' not found"));

        let mut other = Project::new("Refs", start);
        other.add_task(Task::new("A", 1, "Nobody")).unwrap();
        let err = validate_project(&other).unwrap_err();
        assert!(err.to_string().contains("unknown employee 'Nobody'"));
    }
}
