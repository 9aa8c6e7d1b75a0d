//! Material pricing profile - density and per-volume stock prices

use serde::{Deserialize, Serialize};

use crate::core::quantity::Quantity;
use crate::core::units::{Dimension, Unit, UnitError};
use crate::entities::classification::PricingType;

/// A price quoted per unit volume of stock
///
/// `unit` is the volume unit the price is quoted per, so a value of 0.01
/// with unit `cm³` means 0.01 currency units per cubic centimeter. The
/// currency itself is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPrice")]
pub struct Price {
    value: f64,
    unit: Unit,
}

#[derive(Deserialize)]
struct RawPrice {
    value: f64,
    unit: Unit,
}

impl TryFrom<RawPrice> for Price {
    type Error = UnitError;

    fn try_from(raw: RawPrice) -> Result<Self, Self::Error> {
        Price::new(raw.value, raw.unit)
    }
}

impl Price {
    pub fn new(value: f64, unit: Unit) -> Result<Self, UnitError> {
        Ok(Self {
            value,
            unit: unit.expect(Dimension::Volume)?,
        })
    }

    /// Price per cubic centimeter
    pub fn per_cubic_centimeter(value: f64) -> Self {
        Self {
            value,
            unit: Unit::CUBIC_CENTIMETER,
        }
    }

    /// No price, still tagged with the volume unit it would be quoted per
    pub fn zero(unit: Unit) -> Result<Self, UnitError> {
        Self::new(0.0, unit)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Price of a volume of stock
    pub fn cost_of(&self, volume: Quantity) -> Result<f64, UnitError> {
        Ok(volume.value_in(self.unit)? * self.value)
    }
}

/// Density and stock prices for one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMaterial")]
pub struct MaterialPricingProfile {
    name: String,
    density: Quantity,
    block_price: Price,
    sheet_price: Price,
}

#[derive(Deserialize)]
struct RawMaterial {
    name: String,
    density: Quantity,
    block_price: Price,
    sheet_price: Price,
}

impl TryFrom<RawMaterial> for MaterialPricingProfile {
    type Error = UnitError;

    fn try_from(raw: RawMaterial) -> Result<Self, Self::Error> {
        MaterialPricingProfile::new(raw.name, raw.density, raw.block_price, raw.sheet_price)
    }
}

impl MaterialPricingProfile {
    pub fn new(
        name: impl Into<String>,
        density: Quantity,
        block_price: Price,
        sheet_price: Price,
    ) -> Result<Self, UnitError> {
        Ok(Self {
            name: name.into(),
            density: density.expect(Dimension::Density)?,
            block_price,
            sheet_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn density(&self) -> Quantity {
        self.density
    }

    pub fn block_price(&self) -> Price {
        self.block_price
    }

    pub fn sheet_price(&self) -> Price {
        self.sheet_price
    }

    pub fn price_for(&self, pricing_type: PricingType) -> Price {
        match pricing_type {
            PricingType::Block => self.block_price,
            PricingType::Sheet => self.sheet_price,
        }
    }

    /// Mass of a volume of this material, in the density's mass unit
    pub fn mass_of(&self, volume: Quantity) -> Result<Quantity, UnitError> {
        let (mass_unit, volume_unit) = self
            .density
            .unit()
            .density_parts()
            .ok_or(UnitError::UnexpectedDimension {
                unit: self.density.unit(),
                expected: Dimension::Density,
            })?;
        let volume = volume.value_in(volume_unit)?;
        Ok(Quantity::new(volume * self.density.value(), mass_unit))
    }
}
