use super::InterchangeResult;
use super::definition::ProjectDefinition;
use crate::project::Project;
use std::fs::File;
use std::path::Path;

pub fn save_definition_to_json<P: AsRef<Path>>(project: &Project, path: P) -> InterchangeResult<()> {
    let definition = ProjectDefinition::from_project(project);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &definition)?;
    Ok(())
}

/// Load and validate a project definition. Call
/// [`Project::calculate_schedule`] to get dates.
pub fn load_definition_from_json<P: AsRef<Path>>(path: P) -> InterchangeResult<Project> {
    let file = File::open(path)?;
    let definition: ProjectDefinition = serde_json::from_reader(file)?;
    definition.into_project()
}
