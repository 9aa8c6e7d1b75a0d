//! Reading and writing YAML/JSON documents
//!
//! Reference data, unit preferences, and kernel-reported model properties
//! all live in small YAML (or JSON) files. Parse failures are reported with
//! source locations via [`YamlSyntaxError`].

use miette::Diagnostic;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::yaml::YamlSyntaxError;

/// Load a YAML document
pub fn load_yaml<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, LoadError> {
    let content = read(path)?;
    serde_yml::from_str(&content).map_err(|e| {
        let filename = path.display().to_string();
        LoadError::Yaml(YamlSyntaxError::from_serde_error(&e, &content, &filename))
    })
}

/// Load a JSON document
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|e| LoadError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load a document, choosing the format from the file extension
pub fn load_document<T: DeserializeOwned + 'static>(path: &Path) -> Result<T, LoadError> {
    match extension(path).as_deref() {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(LoadError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Serialize a value to a YAML file, creating parent directories
pub fn save_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), LoadError> {
    let content =
        serde_yml::to_string(value).map_err(|e| LoadError::Serialize(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LoadError::Io {
            path: parent.to_path_buf(),
            message: e.to_string(),
        })?;
    }
    fs::write(path, content).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Lowercased file extension
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Errors raised while loading or saving documents
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("cannot access {path:?}: {message}")]
    #[diagnostic(code(partcost::load::io))]
    Io { path: PathBuf, message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),

    #[error("invalid JSON in {path:?}: {message}")]
    #[diagnostic(code(partcost::load::json))]
    Json { path: PathBuf, message: String },

    #[error("unsupported file format: {0:?}")]
    #[diagnostic(
        code(partcost::load::format),
        help("use a .yaml, .yml, or .json file")
    )]
    UnsupportedFormat(PathBuf),

    #[error("failed to serialize document: {0}")]
    #[diagnostic(code(partcost::load::serialize))]
    Serialize(String),
}
