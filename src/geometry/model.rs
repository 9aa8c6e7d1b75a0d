//! The solid-model contract and a plain record implementing it

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::loader::{self, LoadError};

/// Axis-aligned bounding box in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Box spanning `[0, 0, 0]` to `extents`
    pub fn from_extents(extents: [f64; 3]) -> Self {
        Self::new([0.0; 3], extents)
    }

    /// Side lengths along x, y, z
    pub fn extents(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
    }
}

/// A parsed solid model, as reported by a geometry kernel
///
/// All lengths are millimeters, areas mm², volumes mm³.
pub trait SolidModel: Send + Sync {
    /// `None` when the kernel could not compute a bounding volume
    fn bounding_box(&self) -> Option<BoundingBox>;

    fn volume(&self) -> f64;

    fn surface_area(&self) -> f64;

    fn centroid(&self) -> [f64; 3];

    fn face_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Number of disjoint solids
    fn component_count(&self) -> usize;
}

/// Kernel-reported properties of a model, stored as YAML or JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelProperties {
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
    pub volume: f64,
    pub surface_area: f64,
    #[serde(default)]
    pub centroid: [f64; 3],
    #[serde(default)]
    pub faces: usize,
    #[serde(default)]
    pub edges: usize,
    #[serde(default = "default_components")]
    pub components: usize,
}

fn default_components() -> usize {
    1
}

impl ModelProperties {
    /// Properties of a solid rectangular block with one corner at the origin
    pub fn block(width: f64, depth: f64, height: f64) -> Self {
        Self {
            bounding_box: Some(BoundingBox::from_extents([width, depth, height])),
            volume: width * depth * height,
            surface_area: 2.0 * (width * depth + depth * height + width * height),
            centroid: [width / 2.0, depth / 2.0, height / 2.0],
            faces: 6,
            edges: 12,
            components: 1,
        }
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        loader::load_document(path)
    }
}

impl SolidModel for ModelProperties {
    fn bounding_box(&self) -> Option<BoundingBox> {
        self.bounding_box
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn surface_area(&self) -> f64 {
        self.surface_area
    }

    fn centroid(&self) -> [f64; 3] {
        self.centroid
    }

    fn face_count(&self) -> usize {
        self.faces
    }

    fn edge_count(&self) -> usize {
        self.edges
    }

    fn component_count(&self) -> usize {
        self.components
    }
}
