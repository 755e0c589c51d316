use crate::calendar::is_working_day;
use crate::duration::{self, DurationError};
use crate::graph::DependencyGraph;
use crate::project::Project;
use crate::task::{Task, TaskSchedule};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("task '{task}' has invalid availability {availability} (must be 1-100 percent)")]
    InvalidAvailability { task: String, availability: i32 },
    #[error("task '{task}' has negative contingency margin {contingency_margin}")]
    InvalidContingency {
        task: String,
        contingency_margin: i32,
    },
    #[error("task '{task}' must have an estimated duration of at least one day")]
    InvalidEstimate { task: String },
    #[error("Employee '{employee}' not found (assigned to task '{task}')")]
    UnknownEmployee { task: String, employee: String },
    #[error("Dependency '{dependency}' not found for task '{task}'")]
    UnknownDependency { task: String, dependency: String },
    #[error("Employee '{employee}' has no working weekdays (assigned to task '{task}')")]
    NoWorkingDays { task: String, employee: String },
    #[error("task '{task}' runs past the last representable calendar date")]
    DateOverflow { task: String },
    #[error("task '{task}' has an actual duration too large to count in days")]
    DurationOverflow { task: String },
    #[error(
        "Circular dependency detected or invalid dependency chain (unscheduled: {})",
        .unscheduled.join(", ")
    )]
    CircularDependency {
        unscheduled: Vec<String>,
        cycles: Vec<Vec<String>>,
    },
}

impl ScheduleError {
    fn from_duration(task: &Task, err: DurationError) -> Self {
        let task_name = task.name.clone();
        match err {
            DurationError::InvalidAvailability(availability) => ScheduleError::InvalidAvailability {
                task: task_name,
                availability,
            },
            DurationError::InvalidContingency(contingency_margin) => {
                ScheduleError::InvalidContingency {
                    task: task_name,
                    contingency_margin,
                }
            }
            DurationError::InvalidEstimate => ScheduleError::InvalidEstimate { task: task_name },
            DurationError::Overflow => ScheduleError::DurationOverflow { task: task_name },
        }
    }
}

/// Complete date assignment for every task of a project.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome {
    assignments: Vec<(String, TaskSchedule)>,
    index: HashMap<String, usize>,
    passes: usize,
}

impl ScheduleOutcome {
    fn push(&mut self, name: String, schedule: TaskSchedule) {
        self.index.insert(name.clone(), self.assignments.len());
        self.assignments.push((name, schedule));
    }

    pub fn get(&self, task_name: &str) -> Option<&TaskSchedule> {
        self.index
            .get(task_name)
            .map(|&idx| &self.assignments[idx].1)
    }

    /// Assignments in the order the tasks were scheduled.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskSchedule)> {
        self.assignments
            .iter()
            .map(|(name, schedule)| (name.as_str(), schedule))
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of passes over the task list the fixed-point loop needed.
    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn latest_end(&self) -> Option<NaiveDate> {
        self.assignments
            .iter()
            .map(|(_, schedule)| schedule.end_date())
            .max()
    }

    pub(crate) fn into_assignments(self) -> Vec<(String, TaskSchedule)> {
        self.assignments
    }
}

/// Dependency-ordered date assignment over a borrowed project.
///
/// Tasks are visited in insertion order, pass after pass, until every task is
/// placed. A pass that places nothing means the remaining tasks can never
/// become eligible.
pub struct Scheduler<'a> {
    project: &'a Project,
}

impl<'a> Scheduler<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self { project }
    }

    pub fn execute(&self) -> Result<ScheduleOutcome, ScheduleError> {
        let tasks = self.project.tasks();
        let mut outcome = ScheduleOutcome::default();

        let mut position_by_name: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
        for (position, task) in tasks.iter().enumerate() {
            position_by_name.entry(task.name.as_str()).or_insert(position);
        }

        // End date per task position once scheduled
        let mut end_dates: Vec<Option<NaiveDate>> = vec![None; tasks.len()];
        let mut remaining = tasks.len();

        while remaining > 0 {
            outcome.passes += 1;
            let mut made_progress = false;

            for (position, task) in tasks.iter().enumerate() {
                if end_dates[position].is_some() {
                    continue;
                }

                let earliest_start = match task.dependency.as_deref() {
                    None => self.project.start_date(),
                    Some(dependency) => {
                        let dep_position = position_by_name.get(dependency).copied().ok_or_else(
                            || ScheduleError::UnknownDependency {
                                task: task.name.clone(),
                                dependency: dependency.to_string(),
                            },
                        )?;
                        match end_dates[dep_position] {
                            Some(dep_end) => dep_end
                                .checked_add_days(Days::new(1))
                                .ok_or_else(|| ScheduleError::DateOverflow {
                                    task: task.name.clone(),
                                })?,
                            // Wait for dependency
                            None => continue,
                        }
                    }
                };

                let schedule = self.schedule_task(task, earliest_start)?;
                debug!(
                    task = %task.name,
                    pass = outcome.passes,
                    start = %schedule.start_date(),
                    end = %schedule.end_date(),
                    actual_duration = schedule.actual_duration(),
                    "scheduled task"
                );
                end_dates[position] = Some(schedule.end_date());
                outcome.push(task.name.clone(), schedule);
                remaining -= 1;
                made_progress = true;
            }

            if !made_progress {
                let unscheduled: Vec<String> = tasks
                    .iter()
                    .zip(&end_dates)
                    .filter(|(_, end)| end.is_none())
                    .map(|(task, _)| task.name.clone())
                    .collect();
                let cycles = DependencyGraph::build(tasks).cycles();
                warn!(
                    unscheduled = ?unscheduled,
                    cycles = ?cycles,
                    "scheduling stalled on unresolvable dependencies"
                );
                return Err(ScheduleError::CircularDependency {
                    unscheduled,
                    cycles,
                });
            }
        }

        Ok(outcome)
    }

    /// Walk forward from `earliest_start` (inclusive) collecting the
    /// assignee's working days until the actual duration is covered.
    fn schedule_task(
        &self,
        task: &Task,
        earliest_start: NaiveDate,
    ) -> Result<TaskSchedule, ScheduleError> {
        let employee = self.project.employee(&task.assigned_to).ok_or_else(|| {
            ScheduleError::UnknownEmployee {
                task: task.name.clone(),
                employee: task.assigned_to.clone(),
            }
        })?;
        if employee.work_pattern().is_empty() {
            return Err(ScheduleError::NoWorkingDays {
                task: task.name.clone(),
                employee: employee.name.clone(),
            });
        }

        let actual = duration::actual_duration(
            task.estimated_duration,
            task.availability,
            task.contingency_margin,
        )
        .map_err(|err| ScheduleError::from_duration(task, err))?;

        // Every working day uses up at least one calendar day
        let days_left = (NaiveDate::MAX - earliest_start).num_days() + 1;
        if i64::from(actual) > days_left {
            return Err(ScheduleError::DateOverflow {
                task: task.name.clone(),
            });
        }

        let global_holidays = self.project.global_holidays();
        let mut working_dates = Vec::new();
        let mut cursor = earliest_start;
        loop {
            if is_working_day(employee, cursor, global_holidays) {
                working_dates.push(cursor);
                if working_dates.len() == actual as usize {
                    break;
                }
            }
            cursor = cursor
                .checked_add_days(Days::new(1))
                .ok_or_else(|| ScheduleError::DateOverflow {
                    task: task.name.clone(),
                })?;
        }

        Ok(TaskSchedule::new(working_dates))
    }
}
