//! Shared utilities for CLI commands

use miette::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::cli::GlobalOpts;
use crate::core::cancel::cancel_after;
use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::preferences::{UnitPreferences, UnitRegistry};
use crate::core::project::Project;
use crate::core::units::{LengthUnit, Unit};
use crate::costing::Pipeline;

/// Find the project named by `--project`, or discover one from the
/// current directory
pub fn find_project(global: &GlobalOpts) -> Result<Project> {
    let found = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    Ok(found?)
}

/// Everything a command needs to run an estimate
pub struct Context {
    pub project: Option<Project>,
    pub config: Config,
    pub registry: Arc<UnitRegistry>,
    pub catalog: Catalog,
}

impl Context {
    /// Load project data, falling back to built-in units and reference
    /// data outside a project
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let project = match find_project(global) {
            Ok(project) => Some(project),
            Err(_) if global.project.is_none() => {
                tracing::debug!("no project found, using built-in reference data");
                None
            }
            Err(e) => return Err(e),
        };

        let config = Config::load_for(project.as_ref());
        let (preferences, catalog) = match &project {
            Some(project) => (project.unit_preferences()?, project.catalog()?),
            None => (UnitPreferences::default(), Catalog::seed()),
        };

        Ok(Self {
            project,
            config,
            registry: Arc::new(UnitRegistry::new(preferences)),
            catalog,
        })
    }

    pub fn pipeline(&self) -> Pipeline<&Catalog> {
        let pipeline = Pipeline::new(Arc::clone(&self.registry), &self.catalog)
            .with_parameters(self.config.cutting_parameters());
        match self.config.stock_margin {
            Some(margin) => pipeline.with_margin(margin),
            None => pipeline,
        }
    }
}

/// Cancellation token for one command, armed with `--timeout` if given
pub fn cancel_token(timeout_secs: Option<u64>) -> CancellationToken {
    let token = CancellationToken::new();
    if let Some(secs) = timeout_secs {
        cancel_after(&token, Duration::from_secs(secs));
    }
    token
}

/// clap value parser for a length unit symbol
pub fn parse_length_unit(s: &str) -> std::result::Result<LengthUnit, String> {
    match s.parse::<Unit>() {
        Ok(Unit::Length(unit)) => Ok(unit),
        Ok(other) => Err(format!("'{}' is a {} unit, not a length unit", s, other.dimension())),
        Err(e) => Err(e.to_string()),
    }
}
