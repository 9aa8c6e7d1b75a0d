//! Unit preferences: which display unit each measurement category uses
//!
//! [`UnitPreferences`] is an immutable snapshot. Updates never mutate a
//! snapshot in place; they build a new one. [`UnitRegistry`] is the shared
//! holder that hands out snapshots and swaps in updated ones atomically, so
//! a calculation holding a snapshot never observes a later update.

use miette::Diagnostic;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::core::loader::{self, LoadError};
use crate::core::quantity::Quantity;
use crate::core::units::{Dimension, LengthUnit, MassUnit, TimeUnit, Unit, UnitError};

/// Default unit and ordered allowed options for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawUnitPreference")]
pub struct UnitPreference {
    default: Unit,
    options: Vec<Unit>,
}

#[derive(Deserialize)]
struct RawUnitPreference {
    default: Unit,
    options: Vec<Unit>,
}

impl TryFrom<RawUnitPreference> for UnitPreference {
    type Error = PreferenceError;

    fn try_from(raw: RawUnitPreference) -> Result<Self, Self::Error> {
        UnitPreference::new(raw.default.dimension(), raw.default, raw.options)
    }
}

impl UnitPreference {
    /// Create a preference for `category`, checking that every option
    /// measures that category and that the default is one of the options
    pub fn new(
        category: Dimension,
        default: Unit,
        options: Vec<Unit>,
    ) -> Result<Self, PreferenceError> {
        if options.is_empty() {
            return Err(PreferenceError::EmptyOptions(category));
        }
        if let Some(unit) = options
            .iter()
            .chain(std::iter::once(&default))
            .find(|u| u.dimension() != category)
        {
            return Err(PreferenceError::WrongDimension {
                category,
                unit: *unit,
            });
        }

        let mut deduped: Vec<Unit> = Vec::with_capacity(options.len());
        for unit in options {
            if !deduped.contains(&unit) {
                deduped.push(unit);
            }
        }

        if !deduped.contains(&default) {
            return Err(PreferenceError::InvalidOption {
                category,
                unit: default,
                options: deduped,
            });
        }

        Ok(Self {
            default,
            options: deduped,
        })
    }

    pub fn default_unit(&self) -> Unit {
        self.default
    }

    pub fn options(&self) -> &[Unit] {
        &self.options
    }

    pub fn dimension(&self) -> Dimension {
        self.default.dimension()
    }
}

/// Immutable snapshot of all category preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Dimension, UnitPreference>")]
pub struct UnitPreferences {
    #[serde(flatten)]
    categories: BTreeMap<Dimension, UnitPreference>,
}

impl TryFrom<BTreeMap<Dimension, UnitPreference>> for UnitPreferences {
    type Error = PreferenceError;

    fn try_from(categories: BTreeMap<Dimension, UnitPreference>) -> Result<Self, Self::Error> {
        for (category, preference) in &categories {
            if preference.dimension() != *category {
                return Err(PreferenceError::WrongDimension {
                    category: *category,
                    unit: preference.default,
                });
            }
        }
        Ok(Self { categories })
    }
}

impl Default for UnitPreferences {
    fn default() -> Self {
        use LengthUnit::*;

        let lengths = [Millimeter, Centimeter, Meter, Inch, Foot, Yard];
        let surfaces = [Millimeter, Centimeter, Meter, Inch, Foot];

        let mut categories = BTreeMap::new();
        categories.insert(
            Dimension::Length,
            UnitPreference {
                default: Unit::Length(Millimeter),
                options: lengths.iter().map(|l| Unit::Length(*l)).collect(),
            },
        );
        categories.insert(
            Dimension::Area,
            UnitPreference {
                default: Unit::Area(Millimeter),
                options: surfaces.iter().map(|l| Unit::Area(*l)).collect(),
            },
        );
        categories.insert(
            Dimension::Volume,
            UnitPreference {
                default: Unit::Volume(Millimeter),
                options: surfaces.iter().map(|l| Unit::Volume(*l)).collect(),
            },
        );
        categories.insert(
            Dimension::Mass,
            UnitPreference {
                default: Unit::GRAM,
                options: MassUnit::ALL.iter().map(|m| Unit::Mass(*m)).collect(),
            },
        );
        categories.insert(
            Dimension::Density,
            UnitPreference {
                default: Unit::GRAM_PER_CUBIC_CENTIMETER,
                options: vec![
                    Unit::GRAM_PER_CUBIC_CENTIMETER,
                    Unit::Density(MassUnit::Kilogram, Meter),
                    Unit::Density(MassUnit::Gram, Millimeter),
                    Unit::Density(MassUnit::Pound, Inch),
                ],
            },
        );
        categories.insert(
            Dimension::Time,
            UnitPreference {
                default: Unit::SECOND,
                options: TimeUnit::ALL.iter().map(|t| Unit::Time(*t)).collect(),
            },
        );

        Self { categories }
    }
}

impl UnitPreferences {
    /// Load a snapshot from a YAML store
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        loader::load_yaml(path)
    }

    /// Write this snapshot to a YAML store
    pub fn save(&self, path: &Path) -> Result<(), LoadError> {
        loader::save_yaml(path, self)
    }

    pub fn get(&self, category: Dimension) -> Result<&UnitPreference, PreferenceError> {
        self.categories
            .get(&category)
            .ok_or(PreferenceError::MissingCategory(category))
    }

    /// Display unit for a category
    pub fn resolve_default(&self, category: Dimension) -> Result<Unit, PreferenceError> {
        Ok(self.get(category)?.default)
    }

    /// Allowed units for a category, in configured order
    pub fn list_options(&self, category: Dimension) -> Result<&[Unit], PreferenceError> {
        Ok(self.get(category)?.options())
    }

    pub fn categories(&self) -> impl Iterator<Item = (Dimension, &UnitPreference)> {
        self.categories.iter().map(|(d, p)| (*d, p))
    }

    /// Convert a quantity into the display unit of its dimension
    pub fn display(&self, quantity: Quantity) -> Result<Quantity, PreferenceError> {
        let unit = self.resolve_default(quantity.dimension())?;
        Ok(quantity.to(unit)?)
    }

    /// New snapshot with `unit` as the default for `category`
    pub fn with_default(&self, category: Dimension, unit: Unit) -> Result<Self, PreferenceError> {
        self.with_defaults([(category, unit)])
    }

    /// New snapshot with several defaults changed; fails without applying
    /// any change if one of them is not an allowed option
    pub fn with_defaults(
        &self,
        updates: impl IntoIterator<Item = (Dimension, Unit)>,
    ) -> Result<Self, PreferenceError> {
        let mut next = self.clone();
        for (category, unit) in updates {
            let preference = next
                .categories
                .get_mut(&category)
                .ok_or(PreferenceError::MissingCategory(category))?;
            if !preference.options.contains(&unit) {
                return Err(PreferenceError::InvalidOption {
                    category,
                    unit,
                    options: preference.options.clone(),
                });
            }
            preference.default = unit;
        }
        Ok(next)
    }

    /// New snapshot with the option list of `category` replaced
    pub fn with_options(
        &self,
        category: Dimension,
        options: Vec<Unit>,
        default: Unit,
    ) -> Result<Self, PreferenceError> {
        let preference = UnitPreference::new(category, default, options)?;
        let mut next = self.clone();
        next.categories.insert(category, preference);
        Ok(next)
    }
}

/// Shared, concurrently readable holder of the current unit preferences
#[derive(Debug, Default)]
pub struct UnitRegistry {
    current: RwLock<Arc<UnitPreferences>>,
}

impl UnitRegistry {
    pub fn new(preferences: UnitPreferences) -> Self {
        Self {
            current: RwLock::new(Arc::new(preferences)),
        }
    }

    /// Consistent view of the preferences at this instant
    pub fn snapshot(&self) -> Arc<UnitPreferences> {
        Arc::clone(&self.current.read())
    }

    pub fn resolve_default(&self, category: Dimension) -> Result<Unit, PreferenceError> {
        self.snapshot().resolve_default(category)
    }

    pub fn list_options(&self, category: Dimension) -> Result<Vec<Unit>, PreferenceError> {
        Ok(self.snapshot().list_options(category)?.to_vec())
    }

    pub fn set_default(&self, category: Dimension, unit: Unit) -> Result<(), PreferenceError> {
        self.update(|current| current.with_default(category, unit))
    }

    pub fn set_defaults(
        &self,
        updates: impl IntoIterator<Item = (Dimension, Unit)>,
    ) -> Result<(), PreferenceError> {
        self.update(|current| current.with_defaults(updates))
    }

    pub fn set_options(
        &self,
        category: Dimension,
        options: Vec<Unit>,
        default: Unit,
    ) -> Result<(), PreferenceError> {
        self.update(|current| current.with_options(category, options, default))
    }

    // Writers hold the lock across build-and-swap so concurrent updates
    // are applied one after another.
    fn update<F>(&self, build: F) -> Result<(), PreferenceError>
    where
        F: FnOnce(&UnitPreferences) -> Result<UnitPreferences, PreferenceError>,
    {
        let mut current = self.current.write();
        let next = build(&current)?;
        tracing::debug!("unit preferences updated");
        *current = Arc::new(next);
        Ok(())
    }
}

fn join_units(units: &[Unit]) -> String {
    units
        .iter()
        .map(|u| u.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised when reading or updating unit preferences
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum PreferenceError {
    #[error("no unit preference configured for '{0}'")]
    #[diagnostic(
        code(partcost::units::missing_category),
        help("add the category to units.yaml or run 'partcost init --force'")
    )]
    MissingCategory(Dimension),

    #[error("'{unit}' is not an allowed {category} unit (allowed: {})", join_units(.options))]
    #[diagnostic(code(partcost::units::invalid_option))]
    InvalidOption {
        category: Dimension,
        unit: Unit,
        options: Vec<Unit>,
    },

    #[error("'{unit}' does not measure {category}")]
    #[diagnostic(code(partcost::units::wrong_dimension))]
    WrongDimension { category: Dimension, unit: Unit },

    #[error("{0} must allow at least one unit")]
    #[diagnostic(code(partcost::units::empty_options))]
    EmptyOptions(Dimension),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unit(#[from] UnitError),
}
