//! Unit-tagged numeric values

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::units::{Dimension, Unit, UnitError};

/// A numeric value paired with the unit it is expressed in
///
/// The dimension is derived from the unit, so converting a quantity can
/// change its unit and value together but never what it measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Length in millimeters
    pub fn mm(value: f64) -> Self {
        Self::new(value, Unit::MILLIMETER)
    }

    /// Area in square millimeters
    pub fn mm2(value: f64) -> Self {
        Self::new(value, Unit::SQUARE_MILLIMETER)
    }

    /// Volume in cubic millimeters
    pub fn mm3(value: f64) -> Self {
        Self::new(value, Unit::CUBIC_MILLIMETER)
    }

    pub fn grams(value: f64) -> Self {
        Self::new(value, Unit::GRAM)
    }

    pub fn seconds(value: f64) -> Self {
        Self::new(value, Unit::SECOND)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// Express this quantity in another unit of the same dimension
    pub fn to(&self, unit: Unit) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(self.unit.convert(self.value, &unit)?, unit))
    }

    /// Numeric value of this quantity in `unit`
    pub fn value_in(&self, unit: Unit) -> Result<f64, UnitError> {
        self.unit.convert(self.value, &unit)
    }

    /// Express this quantity in its dimension's canonical unit
    pub fn to_base(&self) -> Quantity {
        Quantity::new(self.value * self.unit.base_factor(), Unit::base(self.dimension()))
    }

    /// Fail unless this quantity measures `expected`
    pub fn expect(self, expected: Dimension) -> Result<Self, UnitError> {
        self.unit.expect(expected)?;
        Ok(self)
    }

    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} {}", p, self.value, self.unit),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}
