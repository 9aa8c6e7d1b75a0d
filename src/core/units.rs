//! Physical units and dimensionally-checked conversion
//!
//! Every unit belongs to exactly one [`Dimension`]. Conversions are only
//! defined between units of the same dimension and are computed from a
//! base factor per unit (millimeter, gram, second). Area and volume units
//! are derived from a length unit, so their factors are the square and
//! cube of the length factor; density units pair a mass unit with a
//! volume unit.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Physical quantity class that constrains which conversions are valid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Length,
    Area,
    Volume,
    /// Accepts the legacy category name `weight`
    #[serde(alias = "weight")]
    Mass,
    Density,
    Time,
}

impl Dimension {
    /// All dimensions in display order
    pub fn all() -> &'static [Dimension] {
        &[
            Dimension::Length,
            Dimension::Area,
            Dimension::Volume,
            Dimension::Mass,
            Dimension::Density,
            Dimension::Time,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Length => "length",
            Dimension::Area => "area",
            Dimension::Volume => "volume",
            Dimension::Mass => "mass",
            Dimension::Density => "density",
            Dimension::Time => "time",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "length" => Ok(Dimension::Length),
            "area" => Ok(Dimension::Area),
            "volume" => Ok(Dimension::Volume),
            "mass" | "weight" => Ok(Dimension::Mass),
            "density" => Ok(Dimension::Density),
            "time" => Ok(Dimension::Time),
            _ => Err(UnitError::UnknownDimension(s.to_string())),
        }
    }
}

/// Linear length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
    Yard,
}

impl LengthUnit {
    pub const ALL: &'static [LengthUnit] = &[
        LengthUnit::Millimeter,
        LengthUnit::Centimeter,
        LengthUnit::Meter,
        LengthUnit::Inch,
        LengthUnit::Foot,
        LengthUnit::Yard,
    ];

    /// Length of one unit in millimeters
    pub fn millimeters(&self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1.0,
            LengthUnit::Centimeter => 10.0,
            LengthUnit::Meter => 1000.0,
            LengthUnit::Inch => 25.4,
            LengthUnit::Foot => 304.8,
            LengthUnit::Yard => 914.4,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
            LengthUnit::Yard => "yd",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => {
                Some(LengthUnit::Millimeter)
            }
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Some(LengthUnit::Centimeter)
            }
            "m" | "meter" | "meters" | "metre" | "metres" => Some(LengthUnit::Meter),
            "in" | "inch" | "inches" => Some(LengthUnit::Inch),
            "ft" | "foot" | "feet" => Some(LengthUnit::Foot),
            "yd" | "yard" | "yards" => Some(LengthUnit::Yard),
            _ => None,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Mass units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MassUnit {
    Gram,
    Kilogram,
    Pound,
    Ounce,
}

impl MassUnit {
    pub const ALL: &'static [MassUnit] = &[
        MassUnit::Gram,
        MassUnit::Kilogram,
        MassUnit::Pound,
        MassUnit::Ounce,
    ];

    /// Mass of one unit in grams
    pub fn grams(&self) -> f64 {
        match self {
            MassUnit::Gram => 1.0,
            MassUnit::Kilogram => 1000.0,
            MassUnit::Pound => 453.592_37,
            MassUnit::Ounce => 28.349_523_125,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
            MassUnit::Pound => "lb",
            MassUnit::Ounce => "oz",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "g" | "gram" | "grams" => Some(MassUnit::Gram),
            "kg" | "kilogram" | "kilograms" => Some(MassUnit::Kilogram),
            "lb" | "lbs" | "pound" | "pounds" => Some(MassUnit::Pound),
            "oz" | "ounce" | "ounces" => Some(MassUnit::Ounce),
            _ => None,
        }
    }
}

/// Time units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    pub const ALL: &'static [TimeUnit] = &[TimeUnit::Second, TimeUnit::Minute, TimeUnit::Hour];

    /// Duration of one unit in seconds
    pub fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => 60.0,
            TimeUnit::Hour => 3600.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Minute => "min",
            TimeUnit::Hour => "hr",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnit::Second),
            "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minute),
            "hr" | "hrs" | "h" | "hour" | "hours" => Some(TimeUnit::Hour),
            _ => None,
        }
    }
}

/// A measurement unit tagged with the dimension it measures
///
/// Serialized as its canonical symbol (`mm`, `cm³`, `g/cm³`, `min`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Unit {
    Length(LengthUnit),
    /// Square of a length unit
    Area(LengthUnit),
    /// Cube of a length unit
    Volume(LengthUnit),
    Mass(MassUnit),
    /// Mass per cube of a length unit
    Density(MassUnit, LengthUnit),
    Time(TimeUnit),
}

impl Unit {
    pub const MILLIMETER: Unit = Unit::Length(LengthUnit::Millimeter);
    pub const INCH: Unit = Unit::Length(LengthUnit::Inch);
    pub const SQUARE_MILLIMETER: Unit = Unit::Area(LengthUnit::Millimeter);
    pub const CUBIC_MILLIMETER: Unit = Unit::Volume(LengthUnit::Millimeter);
    pub const CUBIC_CENTIMETER: Unit = Unit::Volume(LengthUnit::Centimeter);
    pub const CUBIC_INCH: Unit = Unit::Volume(LengthUnit::Inch);
    pub const GRAM: Unit = Unit::Mass(MassUnit::Gram);
    pub const GRAM_PER_CUBIC_CENTIMETER: Unit =
        Unit::Density(MassUnit::Gram, LengthUnit::Centimeter);
    pub const SECOND: Unit = Unit::Time(TimeUnit::Second);
    pub const MINUTE: Unit = Unit::Time(TimeUnit::Minute);

    /// Canonical unit for a dimension (mm, mm², mm³, g, g/mm³, s)
    pub fn base(dimension: Dimension) -> Unit {
        match dimension {
            Dimension::Length => Unit::MILLIMETER,
            Dimension::Area => Unit::SQUARE_MILLIMETER,
            Dimension::Volume => Unit::CUBIC_MILLIMETER,
            Dimension::Mass => Unit::GRAM,
            Dimension::Density => Unit::Density(MassUnit::Gram, LengthUnit::Millimeter),
            Dimension::Time => Unit::SECOND,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Length(_) => Dimension::Length,
            Unit::Area(_) => Dimension::Area,
            Unit::Volume(_) => Dimension::Volume,
            Unit::Mass(_) => Dimension::Mass,
            Unit::Density(_, _) => Dimension::Density,
            Unit::Time(_) => Dimension::Time,
        }
    }

    /// Value of one of this unit expressed in the dimension's base unit
    pub fn base_factor(&self) -> f64 {
        match self {
            Unit::Length(l) => l.millimeters(),
            Unit::Area(l) => l.millimeters().powi(2),
            Unit::Volume(l) => l.millimeters().powi(3),
            Unit::Mass(m) => m.grams(),
            Unit::Density(m, l) => m.grams() / l.millimeters().powi(3),
            Unit::Time(t) => t.seconds(),
        }
    }

    /// Multiplier that takes a value in `self` to a value in `to`
    pub fn factor_to(&self, to: &Unit) -> Result<f64, UnitError> {
        if self.dimension() != to.dimension() {
            return Err(UnitError::Incompatible {
                from: *self,
                to: *to,
            });
        }
        if self == to {
            return Ok(1.0);
        }
        Ok(self.base_factor() / to.base_factor())
    }

    /// Convert a value expressed in `self` into `to`
    pub fn convert(&self, value: f64, to: &Unit) -> Result<f64, UnitError> {
        Ok(value * self.factor_to(to)?)
    }

    /// Mass and volume units of a density unit
    pub fn density_parts(&self) -> Option<(Unit, Unit)> {
        match self {
            Unit::Density(m, l) => Some((Unit::Mass(*m), Unit::Volume(*l))),
            _ => None,
        }
    }

    /// Fail unless this unit measures `expected`
    pub fn expect(self, expected: Dimension) -> Result<Self, UnitError> {
        if self.dimension() == expected {
            Ok(self)
        } else {
            Err(UnitError::UnexpectedDimension {
                unit: self,
                expected,
            })
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Length(l) => write!(f, "{}", l.symbol()),
            Unit::Area(l) => write!(f, "{}²", l.symbol()),
            Unit::Volume(l) => write!(f, "{}³", l.symbol()),
            Unit::Mass(m) => write!(f, "{}", m.symbol()),
            Unit::Density(m, l) => write!(f, "{}/{}³", m.symbol(), l.symbol()),
            Unit::Time(t) => write!(f, "{}", t.symbol()),
        }
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let unknown = || UnitError::Unknown(s.trim().to_string());

        if let Some((mass, volume)) = normalized.split_once('/') {
            let mass = MassUnit::parse(mass.trim()).ok_or_else(unknown)?;
            return match parse_powered(volume.trim()) {
                Some((length, 3)) => Ok(Unit::Density(mass, length)),
                _ => Err(unknown()),
            };
        }

        if let Some((length, power)) = parse_powered(&normalized) {
            return match power {
                1 => Ok(Unit::Length(length)),
                2 => Ok(Unit::Area(length)),
                _ => Ok(Unit::Volume(length)),
            };
        }
        if let Some(mass) = MassUnit::parse(&normalized) {
            return Ok(Unit::Mass(mass));
        }
        if let Some(time) = TimeUnit::parse(&normalized) {
            return Ok(Unit::Time(time));
        }

        Err(unknown())
    }
}

impl TryFrom<String> for Unit {
    type Error = UnitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.to_string()
    }
}

/// Split a length symbol with an optional exponent (`mm`, `mm²`, `mm2`, `mm^3`)
fn parse_powered(s: &str) -> Option<(LengthUnit, u8)> {
    let (base, power) = if let Some(base) = s.strip_suffix('²') {
        (base, 2)
    } else if let Some(base) = s.strip_suffix('³') {
        (base, 3)
    } else if let Some(base) = s.strip_suffix("^2").or_else(|| s.strip_suffix('2')) {
        (base, 2)
    } else if let Some(base) = s.strip_suffix("^3").or_else(|| s.strip_suffix('3')) {
        (base, 3)
    } else {
        (s, 1)
    };

    LengthUnit::parse(base).map(|length| (length, power))
}

/// Convert `value` from one unit symbol to another
///
/// ```
/// let inches = partcost::core::units::convert(25.4, "mm", "in").unwrap();
/// assert!((inches - 1.0).abs() < 1e-12);
/// ```
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let from: Unit = from.parse()?;
    let to: Unit = to.parse()?;
    from.convert(value, &to)
}

/// Errors raised by unit parsing and conversion
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum UnitError {
    #[error("unknown unit '{0}'")]
    #[diagnostic(
        code(partcost::units::unknown),
        help("known symbols: mm, cm, m, in, ft, yd (with ² or ³), g, kg, lb, oz, s, min, hr, and <mass>/<volume> densities")
    )]
    Unknown(String),

    #[error("unknown measurement category '{0}'")]
    #[diagnostic(
        code(partcost::units::unknown_category),
        help("categories: length, area, volume, mass, density, time")
    )]
    UnknownDimension(String),

    #[error("cannot convert {from} ({}) to {to} ({})", .from.dimension(), .to.dimension())]
    #[diagnostic(code(partcost::units::incompatible))]
    Incompatible { from: Unit, to: Unit },

    #[error("expected a {expected} unit, found {unit} ({})", .unit.dimension())]
    #[diagnostic(code(partcost::units::dimension))]
    UnexpectedDimension { unit: Unit, expected: Dimension },
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn all_units() -> Vec<Unit> {
        let mut units = Vec::new();
        for l in LengthUnit::ALL {
            units.push(Unit::Length(*l));
            units.push(Unit::Area(*l));
            units.push(Unit::Volume(*l));
        }
        for m in MassUnit::ALL {
            units.push(Unit::Mass(*m));
            for l in LengthUnit::ALL {
                units.push(Unit::Density(*m, *l));
            }
        }
        for t in TimeUnit::ALL {
            units.push(Unit::Time(*t));
        }
        units
    }

    #[test]
    fn test_length_conversion() {
        assert_relative_eq!(convert(25.4, "mm", "in").unwrap(), 1.0, max_relative = 1e-12);
        assert_relative_eq!(convert(1.0, "ft", "in").unwrap(), 12.0, max_relative = 1e-12);
        assert_relative_eq!(convert(3.0, "m", "cm").unwrap(), 300.0, max_relative = 1e-12);
    }

    #[test]
    fn test_area_is_square_of_length() {
        for from in LengthUnit::ALL {
            for to in LengthUnit::ALL {
                let linear = Unit::Length(*from).factor_to(&Unit::Length(*to)).unwrap();
                let area = Unit::Area(*from).factor_to(&Unit::Area(*to)).unwrap();
                let volume = Unit::Volume(*from).factor_to(&Unit::Volume(*to)).unwrap();
                assert_relative_eq!(area, linear.powi(2), max_relative = 1e-12);
                assert_relative_eq!(volume, linear.powi(3), max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_volume_conversion() {
        assert_relative_eq!(convert(24000.0, "mm³", "cm³").unwrap(), 24.0, max_relative = 1e-12);
        assert_relative_eq!(
            convert(1.0, "in3", "mm3").unwrap(),
            16387.064,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_density_conversion() {
        // 2.7 g/cm³ is 2700 kg/m³
        assert_relative_eq!(
            convert(2.7, "g/cm³", "kg/m³").unwrap(),
            2700.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            convert(1.0, "g/cm³", "g/mm³").unwrap(),
            0.001,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_time_conversion() {
        assert_relative_eq!(convert(2.0, "min", "s").unwrap(), 120.0);
        assert_relative_eq!(convert(1.5, "hr", "min").unwrap(), 90.0);
    }

    #[test]
    fn test_length_to_mass_is_incompatible() {
        let err = convert(1.0, "mm", "kg").unwrap_err();
        assert!(matches!(err, UnitError::Incompatible { .. }));
        assert!(err.to_string().contains("length"));
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn test_unknown_unit_is_rejected() {
        let err = convert(1.0, "furlong", "mm").unwrap_err();
        assert_eq!(err, UnitError::Unknown("furlong".to_string()));
        assert!(matches!(
            "g/cm²".parse::<Unit>(),
            Err(UnitError::Unknown(_))
        ));
    }

    #[test]
    fn test_symbol_aliases() {
        assert_eq!("mm2".parse::<Unit>().unwrap(), Unit::SQUARE_MILLIMETER);
        assert_eq!("mm^3".parse::<Unit>().unwrap(), Unit::CUBIC_MILLIMETER);
        assert_eq!("Inches".parse::<Unit>().unwrap(), Unit::INCH);
        assert_eq!("h".parse::<Unit>().unwrap(), Unit::Time(TimeUnit::Hour));
        assert_eq!(
            " kg / m3 ".parse::<Unit>().unwrap(),
            Unit::Density(MassUnit::Kilogram, LengthUnit::Meter)
        );
        // "min" is a time unit, "m" is a length unit
        assert_eq!("min".parse::<Unit>().unwrap(), Unit::MINUTE);
        assert_eq!("m".parse::<Unit>().unwrap(), Unit::Length(LengthUnit::Meter));
    }

    #[test]
    fn test_display_parses_back() {
        for unit in all_units() {
            let symbol = unit.to_string();
            assert_eq!(symbol.parse::<Unit>().unwrap(), unit, "symbol {}", symbol);
        }
    }

    #[test]
    fn test_unit_serde() {
        let json = serde_json::to_string(&Unit::GRAM_PER_CUBIC_CENTIMETER).unwrap();
        assert_eq!(json, "\"g/cm³\"");
        let parsed: Unit = serde_json::from_str("\"in³\"").unwrap();
        assert_eq!(parsed, Unit::CUBIC_INCH);
        assert!(serde_json::from_str::<Unit>("\"parsec\"").is_err());
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!("weight".parse::<Dimension>().unwrap(), Dimension::Mass);
        assert_eq!("Length".parse::<Dimension>().unwrap(), Dimension::Length);
        assert!("colour".parse::<Dimension>().is_err());
    }

    #[test]
    fn test_expect_dimension() {
        assert!(Unit::CUBIC_INCH.expect(Dimension::Volume).is_ok());
        assert!(matches!(
            Unit::GRAM.expect(Dimension::Volume),
            Err(UnitError::UnexpectedDimension { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            value in -1.0e9f64..1.0e9,
            a in 0usize..200,
            b in 0usize..200,
        ) {
            let units = all_units();
            let from = units[a % units.len()];
            let to = units[b % units.len()];
            match from.convert(value, &to) {
                Ok(there) => {
                    let back = to.convert(there, &from).unwrap();
                    let tolerance = 1e-9 * value.abs().max(f64::MIN_POSITIVE);
                    prop_assert!((back - value).abs() <= tolerance, "{} {} -> {} -> {}", value, from, to, back);
                }
                Err(UnitError::Incompatible { .. }) => {
                    prop_assert_ne!(from.dimension(), to.dimension());
                }
                Err(e) => prop_assert!(false, "unexpected error {}", e),
            }
        }
    }
}
