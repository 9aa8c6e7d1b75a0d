//! Solid models and geometric feature extraction

pub mod extract;
pub mod mesh;
pub mod model;

pub use extract::{
    extract_geometry, BoundingDimensions, CenterOfMass, GeometricDescriptor, GeometryError,
    GeometryExtractor,
};
pub use mesh::MeshModel;
pub use model::{BoundingBox, ModelProperties, SolidModel};

use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::core::loader;
use crate::core::units::LengthUnit;

/// Open a model file: `.stl` meshes (coordinates in `stl_unit`) or
/// `.yaml`/`.yml`/`.json` kernel property files (always mm)
pub fn load_model(
    path: &Path,
    stl_unit: LengthUnit,
    cancel: &CancellationToken,
) -> Result<Box<dyn SolidModel>, GeometryError> {
    match loader::extension(path).as_deref() {
        Some("stl") => Ok(Box::new(MeshModel::load_stl(path, stl_unit, cancel)?)),
        Some("yaml") | Some("yml") | Some("json") => Ok(Box::new(ModelProperties::load(path)?)),
        _ => Err(GeometryError::UnsupportedFormat(path.to_path_buf())),
    }
}
