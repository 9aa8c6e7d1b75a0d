//! Project discovery and structure

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::catalog::Catalog;
use crate::core::loader::LoadError;
use crate::core::preferences::UnitPreferences;

/// Name of the directory that marks a project root
pub const PROJECT_DIR: &str = ".partcost";

/// Represents a partcost project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .partcost/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current = std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project with seeded reference data
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        if root.join(PROJECT_DIR).exists() {
            return Err(ProjectError::AlreadyExists(root));
        }
        Self::write_project(root)
    }

    /// Initialize even if .partcost/ exists, overwriting its files
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_project(root)
    }

    fn write_project(root: PathBuf) -> Result<Self, ProjectError> {
        let project = Self { root };
        std::fs::create_dir_all(project.project_dir())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::write(project.config_path(), Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;
        UnitPreferences::default().save(&project.units_path())?;
        Catalog::seed().save(&project.materials_path(), &project.classifications_path())?;

        tracing::debug!(root = %project.root.display(), "initialized project");
        Ok(project)
    }

    fn default_config() -> &'static str {
        r#"# partcost project configuration

# Cutting parameters for machining time (inch-based)
# cutting:
#   feed_rate: 10        # in/min
#   spindle_speed: 5000  # rpm
#   tool_diameter: 10    # in
#   depth_of_cut: 2      # in

# Stock margin added to each axis, in the default length unit
# stock_margin: 10

# Log level when PARTCOST_LOG is unset (error, warn, info, debug, trace)
# log_level: warn
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .partcost directory path
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.project_dir().join("config.yaml")
    }

    /// Unit preference store
    pub fn units_path(&self) -> PathBuf {
        self.project_dir().join("units.yaml")
    }

    pub fn materials_path(&self) -> PathBuf {
        self.project_dir().join("materials.yaml")
    }

    pub fn classifications_path(&self) -> PathBuf {
        self.project_dir().join("classifications.yaml")
    }

    /// Load the project's unit preferences
    ///
    /// A project without `units.yaml` uses the built-in defaults.
    pub fn unit_preferences(&self) -> Result<UnitPreferences, ProjectError> {
        let path = self.units_path();
        if !path.exists() {
            return Ok(UnitPreferences::default());
        }
        Ok(UnitPreferences::load(&path)?)
    }

    /// Load the project's materials and classifications
    pub fn catalog(&self) -> Result<Catalog, ProjectError> {
        Ok(Catalog::load(self)?)
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error, Diagnostic)]
pub enum ProjectError {
    #[error("not a partcost project (searched from {searched_from:?})")]
    #[diagnostic(
        code(partcost::project::not_found),
        help("run 'partcost init' to create one")
    )]
    NotFound { searched_from: PathBuf },

    #[error("partcost project already exists at {0:?}")]
    #[diagnostic(
        code(partcost::project::exists),
        help("use 'partcost init --force' to overwrite")
    )]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    #[diagnostic(code(partcost::project::io))]
    IoError(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::ReferenceData;
    use crate::core::units::{Dimension, Unit};
    use tempfile::tempdir;

    #[test]
    fn test_project_init_creates_structure() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        assert!(project.project_dir().is_dir());
        assert!(project.config_path().exists());
        assert!(project.units_path().exists());
        assert!(project.materials_path().exists());
        assert!(project.classifications_path().exists());
    }

    #[test]
    fn test_project_init_fails_if_exists() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let err = Project::init(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::AlreadyExists(_)));
        assert!(Project::init_force(tmp.path()).is_ok());
    }

    #[test]
    fn test_missing_units_file_uses_defaults() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();
        std::fs::remove_file(project.units_path()).unwrap();

        assert_eq!(project.unit_preferences().unwrap(), UnitPreferences::default());
    }

    #[test]
    fn test_seeded_files_load() {
        let tmp = tempdir().unwrap();
        let project = Project::init(tmp.path()).unwrap();

        let units = project.unit_preferences().unwrap();
        assert_eq!(units.resolve_default(Dimension::Length).unwrap(), Unit::MILLIMETER);

        let catalog = project.catalog().unwrap();
        assert!(catalog.material("Aluminum 6061").is_some());
        assert!(catalog.classification("machined-block").is_some());
    }

    #[test]
    fn test_project_discover_finds_project_dir() {
        let tmp = tempdir().unwrap();
        Project::init(tmp.path()).unwrap();

        let subdir = tmp.path().join("some/nested/dir");
        std::fs::create_dir_all(&subdir).unwrap();

        let project = Project::discover_from(&subdir).unwrap();
        assert_eq!(
            project.root().canonicalize().unwrap(),
            tmp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_project_discover_fails_without_project_dir() {
        let tmp = tempdir().unwrap();
        let err = Project::discover_from(tmp.path()).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));
    }
}
