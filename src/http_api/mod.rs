use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::interchange::{
    self, EmployeeDefinition, InterchangeError, ProjectDefinition, ProjectInfo, TaskDefinition,
};
use crate::{GanttView, Project, ScheduleSummary, calendar::parse_iso_date, gantt_view};

const NOT_INITIALIZED: &str = "Project not initialized";

/// One editing session: at most one project, shared by every handler.
#[derive(Clone, Default)]
pub struct AppState {
    project: Arc<RwLock<Option<Project>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(project: Project) -> Self {
        Self {
            project: Arc::new(RwLock::new(Some(project))),
        }
    }

    pub fn with_shared(project: Arc<RwLock<Option<Project>>>) -> Self {
        Self { project }
    }

    fn project(&self) -> Arc<RwLock<Option<Project>>> {
        self.project.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotInitialized,
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<InterchangeError> for ApiError {
    fn from(value: InterchangeError) -> Self {
        match value {
            InterchangeError::InvalidData(message) => ApiError::Invalid(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotInitialized => (
                StatusCode::BAD_REQUEST,
                "not_initialized",
                NOT_INITIALIZED.to_string(),
            ),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct EmployeesPayload {
    #[serde(default)]
    employees: Vec<EmployeeDefinition>,
}

#[derive(Debug, Deserialize)]
struct TasksPayload {
    #[serde(default)]
    tasks: Vec<TaskDefinition>,
}

#[derive(Debug, Default, Deserialize)]
struct ExportPayload {
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Debug, Serialize)]
struct CalculateResponse {
    message: &'static str,
    summary: ScheduleSummary,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/project", post(create_project))
        .route("/api/employees", post(add_employees))
        .route("/api/tasks", post(add_tasks))
        .route("/api/calculate", post(calculate_schedule))
        .route("/api/gantt", get(get_gantt))
        .route("/api/export", post(export_csv))
        .route("/api/import", post(import_definition))
        .route("/api/reset", post(reset_project))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gantt-tool HTTP API listening");
    axum::serve(listener, app).await
}

/// Download name for a Gantt export.
///
/// A blank request falls back to `<project name>_gantt.csv` with spaces
/// turned into underscores. Path separators never survive.
pub fn export_filename(requested: Option<&str>, project_name: &str) -> String {
    let requested = requested.map(str::trim).unwrap_or_default();
    let filename = if requested.is_empty() {
        format!("{}_gantt.csv", project_name.replace(' ', "_"))
    } else if requested.ends_with(".csv") {
        requested.to_string()
    } else {
        format!("{requested}.csv")
    };
    filename.replace(['/', '\\'], "_")
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn create_project(
    State(state): State<AppState>,
    Json(info): Json<ProjectInfo>,
) -> Result<impl IntoResponse, ApiError> {
    let start_date = parse_iso_date(&info.start_date)
        .map_err(|_| ApiError::invalid("Invalid start date format. Use YYYY-MM-DD"))?;
    let mut project = Project::new(info.name.clone(), start_date);
    for entry in &info.global_holidays {
        let dates = interchange::try_parse_date_ranges(entry)
            .map_err(|bad| ApiError::invalid(format!("Invalid holiday date: {bad}")))?;
        for date in dates {
            project.add_global_holiday_date(date);
        }
    }

    let session = state.project();
    *session.write() = Some(project);
    info!(project = %info.name, %start_date, "project created");
    Ok(Json(json!({
        "message": "Project created successfully",
        "name": info.name,
    })))
}

async fn add_employees(
    State(state): State<AppState>,
    Json(payload): Json<EmployeesPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.project();
    let mut guard = session.write();
    let project = guard.as_mut().ok_or(ApiError::NotInitialized)?;

    let employees = payload
        .employees
        .into_iter()
        .map(EmployeeDefinition::into_employee)
        .collect::<Result<Vec<_>, _>>()?;
    let count = employees.len();
    for employee in employees {
        project.add_employee(employee);
    }
    Ok(Json(json!({
        "message": format!("{count} employee(s) added successfully"),
    })))
}

async fn add_tasks(
    State(state): State<AppState>,
    Json(payload): Json<TasksPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.project();
    let mut guard = session.write();
    let project = guard.as_mut().ok_or(ApiError::NotInitialized)?;

    // Apply to a copy so a rejected batch leaves the session untouched
    let mut updated = project.clone();
    let count = payload.tasks.len();
    for definition in payload.tasks {
        let task = definition.into_task()?;
        updated
            .add_task(task)
            .map_err(|err| ApiError::invalid(err.to_string()))?;
    }
    *project = updated;
    Ok(Json(json!({
        "message": format!("{count} task(s) added successfully"),
    })))
}

async fn calculate_schedule(
    State(state): State<AppState>,
) -> Result<Json<CalculateResponse>, ApiError> {
    let session = state.project();
    let mut guard = session.write();
    let project = guard.as_mut().ok_or(ApiError::NotInitialized)?;
    if project.tasks().is_empty() {
        return Err(ApiError::invalid("No tasks defined"));
    }
    let summary = project.calculate_schedule().map_err(|err| {
        warn!(error = %err, "schedule calculation failed");
        ApiError::invalid(err.to_string())
    })?;
    Ok(Json(CalculateResponse {
        message: "Schedule calculated successfully",
        summary,
    }))
}

async fn get_gantt(State(state): State<AppState>) -> Result<Json<GanttView>, ApiError> {
    let session = state.project();
    let guard = session.read();
    let project = guard.as_ref().ok_or(ApiError::NotInitialized)?;
    Ok(Json(gantt_view(project)))
}

async fn export_csv(
    State(state): State<AppState>,
    payload: Option<Json<ExportPayload>>,
) -> Result<Response, ApiError> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let (filename, body) = {
        let session = state.project();
        let guard = session.read();
        let project = guard.as_ref().ok_or(ApiError::NotInitialized)?;
        let filename = export_filename(payload.filename.as_deref(), project.name());
        let mut body = Vec::new();
        interchange::write_gantt_csv(project, &mut body)?;
        (filename, body)
    };

    let disposition = format!("attachment; filename=\"{filename}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

async fn import_definition(
    State(state): State<AppState>,
    Json(definition): Json<ProjectDefinition>,
) -> Result<impl IntoResponse, ApiError> {
    let project = definition.into_project()?;
    let name = project.name().to_string();
    let task_count = project.tasks().len();

    let session = state.project();
    *session.write() = Some(project);
    info!(project = %name, tasks = task_count, "project imported");
    Ok(Json(json!({
        "message": "Project imported successfully",
        "name": name,
    })))
}

async fn reset_project(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.project();
    *session.write() = None;
    info!("project reset");
    Json(json!({ "message": "Project reset successfully" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_filename_defaults_and_sanitizes() {
        assert_eq!(export_filename(None, "My Project"), "My_Project_gantt.csv");
        assert_eq!(export_filename(Some("  "), "Plan"), "Plan_gantt.csv");
        assert_eq!(export_filename(Some("report"), "Plan"), "report.csv");
        assert_eq!(export_filename(Some("report.csv"), "Plan"), "report.csv");
        assert_eq!(export_filename(Some("../a\\b"), "Plan"), ".._a_b.csv");
    }
}
