//! Raw material weight and cost

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::catalog::ReferenceData;
use crate::core::preferences::{PreferenceError, UnitPreferences};
use crate::core::quantity::Quantity;
use crate::core::units::{Unit, UnitError};
use crate::costing::stock::{size_raw_stock, RawStock, StockMargins};
use crate::entities::PricingType;
use crate::geometry::extract::GeometricDescriptor;

/// Cost of the raw stock a part is machined from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub raw_stock: RawStock,
    pub raw_volume: Quantity,
    pub raw_weight: Quantity,
    /// In the currency of the material's price list
    pub total_cost: f64,
    pub pricing_type: PricingType,
    pub material: String,
}

impl CostEstimate {
    /// Copy of this estimate in the display units of `preferences`
    pub fn in_units(&self, preferences: &UnitPreferences) -> Result<Self, PreferenceError> {
        Ok(Self {
            raw_stock: RawStock {
                x: preferences.display(self.raw_stock.x)?,
                y: preferences.display(self.raw_stock.y)?,
                z: preferences.display(self.raw_stock.z)?,
            },
            raw_volume: preferences.display(self.raw_volume)?,
            raw_weight: preferences.display(self.raw_weight)?,
            total_cost: self.total_cost,
            pricing_type: self.pricing_type,
            material: self.material.clone(),
        })
    }
}

/// Price the raw stock for a part
///
/// The classification is resolved before the material, so an unknown
/// classification fails without a material lookup.
pub fn calculate_cost<R>(
    descriptor: &GeometricDescriptor,
    material: &str,
    classification: &str,
    margins: &StockMargins,
    reference: &R,
) -> Result<CostEstimate, CostError>
where
    R: ReferenceData + ?Sized,
{
    let raw_stock = size_raw_stock(descriptor.bounding_box(), margins)?;
    let raw_volume = raw_stock.volume()?;

    let pricing_type = reference
        .classification(classification)
        .ok_or_else(|| CostError::ClassificationNotFound(classification.to_string()))?
        .pricing_type;
    let profile = reference
        .material(material)
        .ok_or_else(|| CostError::MaterialNotFound(material.to_string()))?;

    let raw_weight = profile.mass_of(raw_volume)?.to(Unit::GRAM)?;
    let total_cost = profile.price_for(pricing_type).cost_of(raw_volume)?;

    tracing::debug!(
        material,
        %pricing_type,
        raw_volume = raw_volume.value(),
        raw_weight = raw_weight.value(),
        total_cost,
        "calculated cost"
    );

    Ok(CostEstimate {
        raw_stock,
        raw_volume,
        raw_weight,
        total_cost,
        pricing_type,
        material: profile.name().to_string(),
    })
}

/// Errors raised by the cost calculator
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum CostError {
    #[error("material not found: '{0}'")]
    #[diagnostic(
        code(partcost::cost::material),
        help("run 'partcost material list' to see available materials")
    )]
    MaterialNotFound(String),

    #[error("classification not found: '{0}'")]
    #[diagnostic(
        code(partcost::cost::classification),
        help("run 'partcost class list' to see available classifications")
    )]
    ClassificationNotFound(String),

    #[error("stock margin must be a non-negative finite length, got {0}")]
    #[diagnostic(code(partcost::cost::margin))]
    InvalidMargin(Quantity),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unit(#[from] UnitError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::units::Dimension;
    use crate::entities::{MaterialPricingProfile, PartClassification};
    use crate::geometry::extract::extract_geometry;
    use crate::geometry::model::ModelProperties;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn block_descriptor() -> GeometricDescriptor {
        extract_geometry(&ModelProperties::block(10.0, 20.0, 30.0)).unwrap()
    }

    #[test]
    fn test_aluminum_block() {
        let estimate = calculate_cost(
            &block_descriptor(),
            "Aluminum 6061",
            "machined-block",
            &StockMargins::default(),
            &Catalog::seed(),
        )
        .unwrap();

        assert_eq!(estimate.raw_stock.x, Quantity::mm(20.0));
        assert_eq!(estimate.raw_stock.y, Quantity::mm(30.0));
        assert_eq!(estimate.raw_stock.z, Quantity::mm(40.0));
        assert_eq!(estimate.raw_volume, Quantity::mm3(24_000.0));
        assert_eq!(estimate.raw_weight.unit(), Unit::GRAM);
        assert_relative_eq!(estimate.raw_weight.value(), 64.8, max_relative = 1e-12);
        assert_relative_eq!(estimate.total_cost, 0.24, max_relative = 1e-12);
        assert_eq!(estimate.pricing_type, PricingType::Block);
    }

    #[test]
    fn test_sheet_pricing() {
        let estimate = calculate_cost(
            &block_descriptor(),
            "Aluminum 6061",
            "sheet-metal",
            &StockMargins::default(),
            &Catalog::seed(),
        )
        .unwrap();
        assert_eq!(estimate.pricing_type, PricingType::Sheet);
        assert_relative_eq!(estimate.total_cost, 24.0 * 0.008, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_material() {
        let result = calculate_cost(
            &block_descriptor(),
            "Unobtainium",
            "machined-block",
            &StockMargins::default(),
            &Catalog::seed(),
        );
        assert_eq!(
            result,
            Err(CostError::MaterialNotFound("Unobtainium".to_string()))
        );
    }

    struct CountingReference {
        inner: Catalog,
        material_lookups: Cell<usize>,
    }

    impl ReferenceData for CountingReference {
        fn material(&self, name: &str) -> Option<&MaterialPricingProfile> {
            self.material_lookups.set(self.material_lookups.get() + 1);
            self.inner.material(name)
        }

        fn classification(&self, id: &str) -> Option<&PartClassification> {
            self.inner.classification(id)
        }
    }

    #[test]
    fn test_unknown_classification_skips_material_lookup() {
        let reference = CountingReference {
            inner: Catalog::seed(),
            material_lookups: Cell::new(0),
        };
        let result = calculate_cost(
            &block_descriptor(),
            "Aluminum 6061",
            "casting",
            &StockMargins::default(),
            &reference,
        );
        assert_eq!(
            result,
            Err(CostError::ClassificationNotFound("casting".to_string()))
        );
        assert_eq!(reference.material_lookups.get(), 0);
    }

    #[test]
    fn test_in_units() {
        let estimate = calculate_cost(
            &block_descriptor(),
            "Aluminum 6061",
            "machined-block",
            &StockMargins::default(),
            &Catalog::seed(),
        )
        .unwrap();
        let prefs = UnitPreferences::default()
            .with_defaults([
                (Dimension::Length, Unit::INCH),
                (Dimension::Volume, Unit::CUBIC_CENTIMETER),
                (Dimension::Mass, "kg".parse().unwrap()),
            ])
            .unwrap();
        let shown = estimate.in_units(&prefs).unwrap();

        assert_eq!(shown.raw_stock.x.unit(), Unit::INCH);
        assert_relative_eq!(shown.raw_volume.value(), 24.0, max_relative = 1e-12);
        assert_relative_eq!(shown.raw_weight.value(), 0.0648, max_relative = 1e-12);
        assert_eq!(shown.total_cost, estimate.total_cost);
    }
}
