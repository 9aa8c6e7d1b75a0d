//! End-to-end estimate: geometry, machining time, and material cost

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::catalog::ReferenceData;
use crate::core::preferences::{PreferenceError, UnitPreferences, UnitRegistry};
use crate::core::quantity::Quantity;
use crate::core::units::{Dimension, UnitError};
use crate::costing::cost::{calculate_cost, CostError, CostEstimate};
use crate::costing::machining::{CuttingParameters, EstimationError};
use crate::costing::stock::StockMargins;
use crate::geometry::extract::{GeometricDescriptor, GeometryError, GeometryExtractor};
use crate::geometry::model::SolidModel;

/// Stock margin, in the default length unit, when none is configured
pub const DEFAULT_MARGIN: f64 = 10.0;

/// Result of a full estimate, in the display units of `units`
#[derive(Debug, Clone, Serialize)]
pub struct PartEstimate {
    pub geometry: GeometricDescriptor,
    pub cost: CostEstimate,
    pub units: Arc<UnitPreferences>,
    pub computed_at: DateTime<Utc>,
}

/// Runs estimates against shared unit preferences and reference data
pub struct Pipeline<R> {
    registry: Arc<UnitRegistry>,
    reference: R,
    parameters: CuttingParameters,
    margins: Margins,
}

#[derive(Debug, Clone, Copy)]
enum Margins {
    /// Per-axis values in whatever length unit the snapshot defaults to
    DefaultUnit([f64; 3]),
    Fixed(StockMargins),
}

impl<R: ReferenceData> Pipeline<R> {
    pub fn new(registry: Arc<UnitRegistry>, reference: R) -> Self {
        Self {
            registry,
            reference,
            parameters: CuttingParameters::default(),
            margins: Margins::DefaultUnit([DEFAULT_MARGIN; 3]),
        }
    }

    pub fn with_parameters(mut self, parameters: CuttingParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Same margin on every axis, in the default length unit
    pub fn with_margin(self, margin: f64) -> Self {
        self.with_axis_margins([margin; 3])
    }

    /// X, Y and Z margins in the default length unit
    pub fn with_axis_margins(mut self, margins: [f64; 3]) -> Self {
        self.margins = Margins::DefaultUnit(margins);
        self
    }

    /// Margins with explicit units, independent of the length preference
    pub fn with_margins(mut self, margins: StockMargins) -> Self {
        self.margins = Margins::Fixed(margins);
        self
    }

    /// Geometry only, in the current display units
    pub fn analyze(
        &self,
        model: &dyn SolidModel,
        cancel: &CancellationToken,
    ) -> Result<GeometricDescriptor, PipelineError> {
        let snapshot = self.registry.snapshot();
        let descriptor = self.extractor().extract(model, cancel)?;
        check(cancel)?;
        Ok(descriptor.in_units(&snapshot)?)
    }

    /// Full estimate using the unit preferences current at the start of
    /// the call
    pub fn estimate(
        &self,
        model: &dyn SolidModel,
        material: &str,
        classification: &str,
        cancel: &CancellationToken,
    ) -> Result<PartEstimate, PipelineError> {
        let snapshot = self.registry.snapshot();
        self.estimate_with_snapshot(snapshot, model, material, classification, cancel)
    }

    /// Full estimate against an explicit preferences snapshot
    pub fn estimate_with_snapshot(
        &self,
        snapshot: Arc<UnitPreferences>,
        model: &dyn SolidModel,
        material: &str,
        classification: &str,
        cancel: &CancellationToken,
    ) -> Result<PartEstimate, PipelineError> {
        check(cancel)?;
        let descriptor = self.extractor().extract(model, cancel)?;
        check(cancel)?;

        let margins = self.margins(&snapshot)?;
        let cost = calculate_cost(&descriptor, material, classification, &margins, &self.reference)?;
        check(cancel)?;

        let estimate = PartEstimate {
            geometry: descriptor.in_units(&snapshot)?,
            cost: cost.in_units(&snapshot)?,
            units: snapshot,
            computed_at: Utc::now(),
        };
        tracing::info!(
            material,
            classification,
            total_cost = estimate.cost.total_cost,
            "estimate complete"
        );
        Ok(estimate)
    }

    fn extractor(&self) -> GeometryExtractor {
        GeometryExtractor::new(self.parameters)
    }

    fn margins(&self, snapshot: &UnitPreferences) -> Result<StockMargins, PipelineError> {
        match self.margins {
            Margins::Fixed(margins) => Ok(margins),
            Margins::DefaultUnit([x, y, z]) => {
                let unit = snapshot.resolve_default(Dimension::Length)?;
                Ok(StockMargins::new(
                    Quantity::new(x, unit),
                    Quantity::new(y, unit),
                    Quantity::new(z, unit),
                )?)
            }
        }
    }
}

fn check(cancel: &CancellationToken) -> Result<(), PipelineError> {
    if cancel.is_cancelled() {
        tracing::warn!("estimate cancelled");
        return Err(PipelineError::Cancelled);
    }
    Ok(())
}

/// Errors raised by any pipeline stage
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(GeometryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Estimation(#[from] EstimationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Cost(#[from] CostError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Preference(#[from] PreferenceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unit(#[from] UnitError),

    #[error("estimate was cancelled")]
    #[diagnostic(code(partcost::pipeline::cancelled))]
    Cancelled,
}

impl From<GeometryError> for PipelineError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::Estimation(e) => PipelineError::Estimation(e),
            GeometryError::Cancelled => {
                tracing::warn!("estimate cancelled during extraction");
                PipelineError::Cancelled
            }
            other => PipelineError::Geometry(other),
        }
    }
}
