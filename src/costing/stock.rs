//! Raw stock sizing

use serde::{Deserialize, Serialize};

use crate::core::quantity::Quantity;
use crate::core::units::{Dimension, Unit, UnitError};
use crate::costing::cost::CostError;
use crate::geometry::extract::BoundingDimensions;

/// Material added to each axis of the part envelope
///
/// The margin is added once per axis, so a 10 mm margin grows a 10 mm
/// wide part to 20 mm of stock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMargins")]
pub struct StockMargins {
    x: Quantity,
    y: Quantity,
    z: Quantity,
}

#[derive(Deserialize)]
struct RawMargins {
    x: Quantity,
    y: Quantity,
    z: Quantity,
}

impl TryFrom<RawMargins> for StockMargins {
    type Error = CostError;

    fn try_from(raw: RawMargins) -> Result<Self, Self::Error> {
        StockMargins::new(raw.x, raw.y, raw.z)
    }
}

impl StockMargins {
    pub fn new(x: Quantity, y: Quantity, z: Quantity) -> Result<Self, CostError> {
        for margin in [x, y, z] {
            margin.expect(Dimension::Length)?;
            if !margin.is_finite() || margin.value() < 0.0 {
                return Err(CostError::InvalidMargin(margin));
            }
        }
        Ok(Self { x, y, z })
    }

    /// Same margin on every axis
    pub fn uniform(margin: Quantity) -> Result<Self, CostError> {
        Self::new(margin, margin, margin)
    }

    pub fn x(&self) -> Quantity {
        self.x
    }

    pub fn y(&self) -> Quantity {
        self.y
    }

    pub fn z(&self) -> Quantity {
        self.z
    }
}

impl Default for StockMargins {
    fn default() -> Self {
        let ten = Quantity::mm(10.0);
        Self {
            x: ten,
            y: ten,
            z: ten,
        }
    }
}

/// Raw stock envelope
///
/// Sized in millimeters; `CostEstimate::in_units` re-expresses the axes in
/// display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawStock {
    pub x: Quantity,
    pub y: Quantity,
    pub z: Quantity,
}

impl RawStock {
    /// Envelope volume in mm³, whatever length unit the axes are held in
    pub fn volume(&self) -> Result<Quantity, UnitError> {
        let x = self.x.value_in(Unit::MILLIMETER)?;
        let y = self.y.value_in(Unit::MILLIMETER)?;
        let z = self.z.value_in(Unit::MILLIMETER)?;
        Ok(Quantity::mm3(x * y * z))
    }
}

/// Grow a bounding box by the stock margins
pub fn size_raw_stock(
    bbox: &BoundingDimensions,
    margins: &StockMargins,
) -> Result<RawStock, CostError> {
    let axis = |extent: Quantity, margin: Quantity| -> Result<Quantity, CostError> {
        let mm = extent.value_in(Unit::MILLIMETER)? + margin.value_in(Unit::MILLIMETER)?;
        Ok(Quantity::mm(mm))
    };
    Ok(RawStock {
        x: axis(bbox.width, margins.x)?,
        y: axis(bbox.depth, margins.y)?,
        z: axis(bbox.height, margins.z)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn bbox(w: f64, d: f64, h: f64) -> BoundingDimensions {
        BoundingDimensions {
            width: Quantity::mm(w),
            depth: Quantity::mm(d),
            height: Quantity::mm(h),
        }
    }

    #[test]
    fn test_single_margin_per_axis() {
        let stock = size_raw_stock(&bbox(10.0, 20.0, 30.0), &StockMargins::default()).unwrap();
        assert_eq!(stock.x, Quantity::mm(20.0));
        assert_eq!(stock.y, Quantity::mm(30.0));
        assert_eq!(stock.z, Quantity::mm(40.0));
        assert_eq!(stock.volume().unwrap(), Quantity::mm3(24_000.0));
    }

    #[test]
    fn test_margin_in_other_units() {
        let margins = StockMargins::uniform(Quantity::new(1.0, Unit::INCH)).unwrap();
        let stock = size_raw_stock(&bbox(10.0, 20.0, 30.0), &margins).unwrap();
        assert_eq!(stock.x, Quantity::mm(35.4));
    }

    #[test]
    fn test_volume_of_inch_stock() {
        let inch = Quantity::new(1.0, Unit::INCH);
        let stock = RawStock {
            x: inch,
            y: inch,
            z: Quantity::new(2.0, Unit::INCH),
        };
        let volume = stock.volume().unwrap();
        assert_eq!(volume.unit(), Unit::CUBIC_MILLIMETER);
        assert_relative_eq!(volume.value(), 2.0 * 16_387.064, max_relative = 1e-9);

        let mixed = RawStock {
            x: Quantity::grams(1.0),
            ..stock
        };
        assert!(mixed.volume().is_err());
    }

    #[test]
    fn test_per_axis_margins() {
        let margins = StockMargins::new(Quantity::mm(1.0), Quantity::mm(2.0), Quantity::mm(0.0)).unwrap();
        let stock = size_raw_stock(&bbox(10.0, 20.0, 30.0), &margins).unwrap();
        assert_eq!(stock.x, Quantity::mm(11.0));
        assert_eq!(stock.y, Quantity::mm(22.0));
        assert_eq!(stock.z, Quantity::mm(30.0));
    }

    #[test]
    fn test_deserialize_validates_margins() {
        let yaml = "x: {value: 5, unit: mm}\ny: {value: 0.25, unit: in}\nz: {value: 0, unit: mm}\n";
        let margins: StockMargins = serde_yml::from_str(yaml).unwrap();
        assert_eq!(margins.y(), Quantity::new(0.25, Unit::INCH));

        let negative = "x: {value: -5, unit: mm}\ny: {value: 1, unit: mm}\nz: {value: 1, unit: mm}\n";
        assert!(serde_yml::from_str::<StockMargins>(negative).is_err());

        let mass = "x: {value: 5, unit: g}\ny: {value: 1, unit: mm}\nz: {value: 1, unit: mm}\n";
        assert!(serde_yml::from_str::<StockMargins>(mass).is_err());
    }

    #[test]
    fn test_invalid_margins() {
        assert!(matches!(
            StockMargins::uniform(Quantity::mm(-1.0)),
            Err(CostError::InvalidMargin(_))
        ));
        assert!(matches!(
            StockMargins::uniform(Quantity::mm(f64::NAN)),
            Err(CostError::InvalidMargin(_))
        ));
        assert!(matches!(
            StockMargins::uniform(Quantity::grams(1.0)),
            Err(CostError::Unit(_))
        ));
    }
}
