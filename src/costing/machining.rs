//! Machining time from material removal rate
//!
//! Parameters are inch-based: feed in in/min, tool diameter and depth of
//! cut in inches, spindle speed in rpm. The removed volume is converted to
//! in³, giving a time in minutes, which is reported in seconds.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

use crate::core::quantity::Quantity;
use crate::core::units::{Dimension, Unit, UnitError};

/// Cutting parameters used for every estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingParameters {
    /// Feed rate, in/min
    pub feed_rate: f64,
    /// Spindle speed, rpm
    pub spindle_speed: f64,
    /// Tool diameter, in
    pub tool_diameter: f64,
    /// Depth of cut, in
    pub depth_of_cut: f64,
}

impl Default for CuttingParameters {
    fn default() -> Self {
        Self {
            feed_rate: 10.0,
            spindle_speed: 5000.0,
            tool_diameter: 10.0,
            depth_of_cut: 2.0,
        }
    }
}

impl CuttingParameters {
    /// Surface cutting speed, ft/min
    pub fn cutting_speed(&self) -> f64 {
        PI * self.tool_diameter * self.spindle_speed / 12.0
    }

    /// Material removal rate, in³/min
    pub fn removal_rate(&self) -> f64 {
        self.cutting_speed() * self.feed_rate * self.depth_of_cut
    }
}

/// Estimate the time needed to remove `volume` of material
pub fn estimate_machining_time(
    volume: Quantity,
    params: &CuttingParameters,
) -> Result<Quantity, EstimationError> {
    let volume = volume.expect(Dimension::Volume)?;
    let cubic_inches = volume.value_in(Unit::CUBIC_INCH)?;
    if !cubic_inches.is_finite() || cubic_inches < 0.0 {
        return Err(EstimationError::InvalidVolume(volume));
    }

    let mrr = params.removal_rate();
    if mrr == 0.0 {
        return Err(EstimationError::ZeroRemovalRate);
    }
    if !mrr.is_finite() || mrr < 0.0 {
        return Err(EstimationError::InvalidRemovalRate(mrr));
    }

    let minutes = cubic_inches / mrr;
    if !minutes.is_finite() {
        return Err(EstimationError::NonFinite);
    }
    let time = Quantity::new(minutes, Unit::MINUTE).to(Unit::SECOND)?;
    tracing::debug!(mrr, seconds = time.value(), "estimated machining time");
    Ok(time)
}

/// Errors raised by the machining time estimator
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum EstimationError {
    #[error("material removal rate is zero")]
    #[diagnostic(
        code(partcost::machining::zero_mrr),
        help("feed rate, spindle speed, tool diameter, and depth of cut must all be non-zero")
    )]
    ZeroRemovalRate,

    #[error("material removal rate {0} is not a positive finite number")]
    #[diagnostic(code(partcost::machining::invalid_mrr))]
    InvalidRemovalRate(f64),

    #[error("cannot estimate machining time for volume {0}")]
    #[diagnostic(code(partcost::machining::invalid_volume))]
    InvalidVolume(Quantity),

    #[error("machining time is not finite")]
    #[diagnostic(code(partcost::machining::non_finite))]
    NonFinite,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unit(#[from] UnitError),
}
