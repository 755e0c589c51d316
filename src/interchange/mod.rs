//! Moving projects in and out of the tool: a JSON project definition, a
//! per-task Gantt CSV and holiday text parsing.

use crate::project::ProjectError;
use crate::validation::TaskValidationError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    InvalidData(String),
}

impl From<ProjectError> for InterchangeError {
    fn from(value: ProjectError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

impl From<TaskValidationError> for InterchangeError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

pub type InterchangeResult<T> = Result<T, InterchangeError>;

pub mod gantt_csv;
pub mod dates;
pub mod definition;
pub mod json;

pub use gantt_csv::{export_gantt_to_csv, import_tasks_from_csv, write_gantt_csv};
pub use dates::{parse_date_ranges, try_parse_date_ranges};
pub use definition::{EmployeeDefinition, ProjectDefinition, ProjectInfo, TaskDefinition};
pub use json::{load_definition_from_json, save_definition_to_json};
