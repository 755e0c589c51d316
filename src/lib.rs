pub mod calendar;
pub mod config;
pub mod duration;
pub mod employee;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod interchange;
pub mod project;
pub mod report;
pub mod scheduler;
pub mod task;
pub mod validation;

pub use calendar::{
    HolidaySet, WorkPattern, count_working_days, is_working_day, next_working_day,
    working_days_in_range,
};
pub use duration::{DurationError, actual_duration};
pub use employee::Employee;
pub use interchange::{
    InterchangeError, ProjectDefinition, export_gantt_to_csv, import_tasks_from_csv,
    load_definition_from_json, parse_date_ranges, save_definition_to_json,
};
pub use project::{Project, ProjectError, ScheduleSummary};
pub use report::{GanttView, TaskView, gantt_dataframe, gantt_view, summary_dataframe};
pub use scheduler::{ScheduleError, ScheduleOutcome, Scheduler};
pub use task::{Task, TaskSchedule};
