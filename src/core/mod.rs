//! Core module - units, preferences, reference data, and project plumbing

pub mod cancel;
pub mod catalog;
pub mod config;
pub mod loader;
pub mod preferences;
pub mod project;
pub mod quantity;
pub mod units;

pub use cancel::cancel_after;
pub use catalog::{Catalog, ReferenceData};
pub use config::Config;
pub use loader::LoadError;
pub use preferences::{PreferenceError, UnitPreference, UnitPreferences, UnitRegistry};
pub use project::{Project, ProjectError};
pub use quantity::Quantity;
pub use units::{convert, Dimension, LengthUnit, MassUnit, TimeUnit, Unit, UnitError};
