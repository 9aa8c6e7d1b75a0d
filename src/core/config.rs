//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;
use crate::costing::CuttingParameters;

/// Per-field overrides of the cutting parameters
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CuttingOverrides {
    pub feed_rate: Option<f64>,
    pub spindle_speed: Option<f64>,
    pub tool_diameter: Option<f64>,
    pub depth_of_cut: Option<f64>,
}

/// partcost configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cutting parameters for machining time
    pub cutting: CuttingOverrides,

    /// Stock margin, in the default length unit
    pub stock_margin: Option<f64>,

    /// Log filter used when PARTCOST_LOG is unset
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load_for(project: Option<&Project>) -> Self {
        // 1. Built-in defaults (already in Default impl)
        let mut config = Config::default();

        // 2. Global user config (~/.config/partcost/config.yaml)
        if let Some(global) = Self::global_config_path().and_then(|p| Self::read(&p)) {
            config.merge(global);
        }

        // 3. Project config (.partcost/config.yaml)
        if let Some(local) = project.and_then(|p| Self::read(&p.config_path())) {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    fn read(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Build an override layer from PARTCOST_* variables
    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        let number = |key: &str| {
            let raw = var(key)?;
            match raw.trim().parse::<f64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring non-numeric environment value");
                    None
                }
            }
        };
        Config {
            cutting: CuttingOverrides {
                feed_rate: number("PARTCOST_FEED_RATE"),
                spindle_speed: number("PARTCOST_SPINDLE_SPEED"),
                tool_diameter: number("PARTCOST_TOOL_DIAMETER"),
                depth_of_cut: number("PARTCOST_DEPTH_OF_CUT"),
            },
            stock_margin: number("PARTCOST_STOCK_MARGIN"),
            log_level: None,
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "partcost")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        let cutting = other.cutting;
        if cutting.feed_rate.is_some() {
            self.cutting.feed_rate = cutting.feed_rate;
        }
        if cutting.spindle_speed.is_some() {
            self.cutting.spindle_speed = cutting.spindle_speed;
        }
        if cutting.tool_diameter.is_some() {
            self.cutting.tool_diameter = cutting.tool_diameter;
        }
        if cutting.depth_of_cut.is_some() {
            self.cutting.depth_of_cut = cutting.depth_of_cut;
        }
        if other.stock_margin.is_some() {
            self.stock_margin = other.stock_margin;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    /// Cutting parameters with overrides applied over the defaults
    pub fn cutting_parameters(&self) -> CuttingParameters {
        let defaults = CuttingParameters::default();
        CuttingParameters {
            feed_rate: self.cutting.feed_rate.unwrap_or(defaults.feed_rate),
            spindle_speed: self.cutting.spindle_speed.unwrap_or(defaults.spindle_speed),
            tool_diameter: self.cutting.tool_diameter.unwrap_or(defaults.tool_diameter),
            depth_of_cut: self.cutting.depth_of_cut.unwrap_or(defaults.depth_of_cut),
        }
    }
}
