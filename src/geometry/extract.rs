//! Geometric descriptor extraction
//!
//! Turns a [`SolidModel`] into a [`GeometricDescriptor`] of unit-tagged
//! quantities in mm, mm², mm³ and seconds. A model that cannot produce a
//! valid bounding volume fails as a whole; there are no partial results.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::core::loader::LoadError;
use crate::core::preferences::{PreferenceError, UnitPreferences};
use crate::core::quantity::Quantity;
use crate::costing::machining::{estimate_machining_time, CuttingParameters, EstimationError};
use crate::geometry::model::SolidModel;

/// Bounding-box side lengths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingDimensions {
    /// Extent along x
    pub width: Quantity,
    /// Extent along y
    pub depth: Quantity,
    /// Extent along z
    pub height: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CenterOfMass {
    pub x: Quantity,
    pub y: Quantity,
    pub z: Quantity,
}

/// Geometric properties of a part plus its estimated machining time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometricDescriptor {
    bounding_box: BoundingDimensions,
    volume: Quantity,
    surface_area: Quantity,
    center_of_mass: CenterOfMass,
    face_count: usize,
    edge_count: usize,
    component_count: usize,
    machining_time: Quantity,
}

impl GeometricDescriptor {
    pub fn bounding_box(&self) -> &BoundingDimensions {
        &self.bounding_box
    }

    pub fn volume(&self) -> Quantity {
        self.volume
    }

    pub fn surface_area(&self) -> Quantity {
        self.surface_area
    }

    pub fn center_of_mass(&self) -> &CenterOfMass {
        &self.center_of_mass
    }

    pub fn face_count(&self) -> usize {
        self.face_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn component_count(&self) -> usize {
        self.component_count
    }

    pub fn machining_time(&self) -> Quantity {
        self.machining_time
    }

    /// Copy of this descriptor in the display units of `preferences`
    pub fn in_units(&self, preferences: &UnitPreferences) -> Result<Self, PreferenceError> {
        let show = |q: Quantity| preferences.display(q);
        Ok(Self {
            bounding_box: BoundingDimensions {
                width: show(self.bounding_box.width)?,
                depth: show(self.bounding_box.depth)?,
                height: show(self.bounding_box.height)?,
            },
            volume: show(self.volume)?,
            surface_area: show(self.surface_area)?,
            center_of_mass: CenterOfMass {
                x: show(self.center_of_mass.x)?,
                y: show(self.center_of_mass.y)?,
                z: show(self.center_of_mass.z)?,
            },
            face_count: self.face_count,
            edge_count: self.edge_count,
            component_count: self.component_count,
            machining_time: show(self.machining_time)?,
        })
    }
}

/// Extracts descriptors using a fixed set of cutting parameters
#[derive(Debug, Clone, Default)]
pub struct GeometryExtractor {
    parameters: CuttingParameters,
}

impl GeometryExtractor {
    pub fn new(parameters: CuttingParameters) -> Self {
        Self { parameters }
    }

    pub fn extract(
        &self,
        model: &dyn SolidModel,
        cancel: &CancellationToken,
    ) -> Result<GeometricDescriptor, GeometryError> {
        if cancel.is_cancelled() {
            return Err(GeometryError::Cancelled);
        }

        let bbox = model.bounding_box().ok_or(GeometryError::MissingBoundingBox)?;
        if !bbox.is_finite() {
            return Err(GeometryError::NonFinite("bounding box"));
        }
        let [width, depth, height] = bbox.extents();
        // Inverted or flat boxes cannot bound a solid
        if width <= 0.0 || depth <= 0.0 || height <= 0.0 {
            return Err(GeometryError::DegenerateBoundingBox);
        }

        let volume = model.volume();
        if !volume.is_finite() {
            return Err(GeometryError::NonFinite("volume"));
        }
        if volume <= 0.0 {
            return Err(GeometryError::NonPositiveVolume(volume));
        }
        let area = model.surface_area();
        if !area.is_finite() {
            return Err(GeometryError::NonFinite("surface area"));
        }
        let centroid = model.centroid();
        if centroid.iter().any(|c| !c.is_finite()) {
            return Err(GeometryError::NonFinite("center of mass"));
        }

        let volume = Quantity::mm3(volume);
        let machining_time = estimate_machining_time(volume, &self.parameters)?;

        if cancel.is_cancelled() {
            return Err(GeometryError::Cancelled);
        }

        let descriptor = GeometricDescriptor {
            bounding_box: BoundingDimensions {
                width: Quantity::mm(width),
                depth: Quantity::mm(depth),
                height: Quantity::mm(height),
            },
            volume,
            surface_area: Quantity::mm2(area),
            center_of_mass: CenterOfMass {
                x: Quantity::mm(centroid[0]),
                y: Quantity::mm(centroid[1]),
                z: Quantity::mm(centroid[2]),
            },
            face_count: model.face_count(),
            edge_count: model.edge_count(),
            component_count: model.component_count(),
            machining_time,
        };
        tracing::debug!(
            width,
            depth,
            height,
            volume = volume.value(),
            "extracted geometry"
        );
        Ok(descriptor)
    }
}

/// Extract a descriptor with default cutting parameters
pub fn extract_geometry(model: &dyn SolidModel) -> Result<GeometricDescriptor, GeometryError> {
    GeometryExtractor::default().extract(model, &CancellationToken::new())
}

/// Errors raised while reading or measuring a solid model
#[derive(Debug, Error, Diagnostic)]
pub enum GeometryError {
    #[error("geometry extraction was cancelled")]
    #[diagnostic(code(partcost::geometry::cancelled))]
    Cancelled,

    #[error("model has no bounding box")]
    #[diagnostic(
        code(partcost::geometry::no_bbox),
        help("the model may be empty or failed to load in the geometry kernel")
    )]
    MissingBoundingBox,

    #[error("model {0} is not finite")]
    #[diagnostic(code(partcost::geometry::non_finite))]
    NonFinite(&'static str),

    #[error("model bounding box must have a positive extent on every axis")]
    #[diagnostic(
        code(partcost::geometry::degenerate),
        help("check that the bounding box min corner lies below its max corner")
    )]
    DegenerateBoundingBox,

    #[error("model volume must be positive, got {0}")]
    #[diagnostic(
        code(partcost::geometry::volume),
        help("open or zero-thickness models have no enclosed volume")
    )]
    NonPositiveVolume(f64),

    #[error("failed to parse model: {0}")]
    #[diagnostic(code(partcost::geometry::parse))]
    Parse(String),

    #[error("cannot read model {path:?}: {message}")]
    #[diagnostic(code(partcost::geometry::io))]
    Io { path: PathBuf, message: String },

    #[error("mesh has no triangles")]
    #[diagnostic(code(partcost::geometry::empty_mesh))]
    EmptyMesh,

    #[error("triangle references vertex {index} but the mesh has {vertices} vertices")]
    #[diagnostic(code(partcost::geometry::index))]
    InvalidIndex { index: usize, vertices: usize },

    #[error("unsupported model format: {0:?}")]
    #[diagnostic(
        code(partcost::geometry::format),
        help("use an .stl mesh or a .yaml/.yml/.json properties file")
    )]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Estimation(#[from] EstimationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::{Dimension, Unit};
    use crate::geometry::model::{BoundingBox, ModelProperties};
    use approx::assert_relative_eq;

    #[test]
    fn test_extract_block() {
        let descriptor = extract_geometry(&ModelProperties::block(10.0, 20.0, 30.0)).unwrap();

        assert_eq!(descriptor.bounding_box().width, Quantity::mm(10.0));
        assert_eq!(descriptor.bounding_box().depth, Quantity::mm(20.0));
        assert_eq!(descriptor.bounding_box().height, Quantity::mm(30.0));
        assert_eq!(descriptor.volume(), Quantity::mm3(6000.0));
        assert_eq!(descriptor.surface_area().unit(), Unit::SQUARE_MILLIMETER);
        assert_eq!(descriptor.center_of_mass().z, Quantity::mm(15.0));
        assert_eq!(descriptor.face_count(), 6);
        assert_eq!(descriptor.edge_count(), 12);
        assert_eq!(descriptor.machining_time().dimension(), Dimension::Time);
        assert!(descriptor.machining_time().value() > 0.0);
    }

    #[test]
    fn test_missing_bounding_box() {
        let mut model = ModelProperties::block(1.0, 1.0, 1.0);
        model.bounding_box = None;
        assert!(matches!(
            extract_geometry(&model),
            Err(GeometryError::MissingBoundingBox)
        ));
    }

    #[test]
    fn test_degenerate_bounding_box() {
        let mut model = ModelProperties::block(1.0, 1.0, 1.0);
        model.bounding_box = Some(BoundingBox::new([3.0; 3], [3.0; 3]));
        assert!(matches!(
            extract_geometry(&model),
            Err(GeometryError::DegenerateBoundingBox)
        ));
    }

    #[test]
    fn test_inverted_bounding_box() {
        let mut model = ModelProperties::block(20.0, 30.0, 40.0);
        model.bounding_box = Some(BoundingBox::new([0.0; 3], [-20.0, -30.0, -40.0]));
        assert!(matches!(
            extract_geometry(&model),
            Err(GeometryError::DegenerateBoundingBox)
        ));
    }

    #[test]
    fn test_flat_bounding_box() {
        // Positive volume cannot rescue a box with no height
        let mut model = ModelProperties::block(20.0, 30.0, 40.0);
        model.bounding_box = Some(BoundingBox::new([0.0; 3], [20.0, 30.0, 0.0]));
        assert!(matches!(
            extract_geometry(&model),
            Err(GeometryError::DegenerateBoundingBox)
        ));
    }

    #[test]
    fn test_non_finite_and_non_positive() {
        let mut model = ModelProperties::block(1.0, 1.0, 1.0);
        model.volume = f64::NAN;
        assert!(matches!(
            extract_geometry(&model),
            Err(GeometryError::NonFinite("volume"))
        ));

        model.volume = 0.0;
        assert!(matches!(
            extract_geometry(&model),
            Err(GeometryError::NonPositiveVolume(_))
        ));

        let mut model = ModelProperties::block(1.0, 1.0, 1.0);
        model.bounding_box = Some(BoundingBox::new([0.0; 3], [f64::INFINITY, 1.0, 1.0]));
        assert!(matches!(
            extract_geometry(&model),
            Err(GeometryError::NonFinite("bounding box"))
        ));
    }

    #[test]
    fn test_zero_removal_rate_fails_extraction() {
        let extractor = GeometryExtractor::new(CuttingParameters {
            spindle_speed: 0.0,
            ..Default::default()
        });
        let result = extractor.extract(&ModelProperties::block(1.0, 1.0, 1.0), &CancellationToken::new());
        assert!(matches!(
            result,
            Err(GeometryError::Estimation(EstimationError::ZeroRemovalRate))
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = GeometryExtractor::default().extract(&ModelProperties::block(1.0, 1.0, 1.0), &cancel);
        assert!(matches!(result, Err(GeometryError::Cancelled)));
    }

    #[test]
    fn test_in_units() {
        let descriptor = extract_geometry(&ModelProperties::block(25.4, 50.8, 10.0)).unwrap();
        let prefs = UnitPreferences::default()
            .with_default(Dimension::Length, Unit::INCH)
            .unwrap()
            .with_default(Dimension::Time, Unit::MINUTE)
            .unwrap();
        let shown = descriptor.in_units(&prefs).unwrap();

        assert_eq!(shown.bounding_box().width.unit(), Unit::INCH);
        assert_relative_eq!(shown.bounding_box().depth.value(), 2.0, max_relative = 1e-12);
        assert_eq!(shown.volume().unit(), Unit::CUBIC_MILLIMETER);
        assert_eq!(shown.machining_time().unit(), Unit::MINUTE);
        assert_relative_eq!(
            shown.machining_time().value() * 60.0,
            descriptor.machining_time().value(),
            max_relative = 1e-12
        );
        assert_eq!(shown.face_count(), descriptor.face_count());
    }
}
