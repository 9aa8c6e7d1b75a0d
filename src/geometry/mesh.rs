//! Triangle-mesh solid model loaded from STL

use glam::DVec3;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tokio_util::sync::CancellationToken;

use crate::core::units::LengthUnit;
use crate::geometry::extract::GeometryError;
use crate::geometry::model::{BoundingBox, SolidModel};

/// Triangles processed between cancellation checks
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Vertices closer than 1/PRECISION mm are merged when indexing
const PRECISION: f64 = 10_000.0;

/// Indexed triangle mesh with its mass properties precomputed
///
/// Vertices are in millimeters. Volume and centroid come from signed
/// tetrahedra against the origin, so the mesh should be closed.
#[derive(Debug, Clone)]
pub struct MeshModel {
    vertices: Vec<DVec3>,
    triangles: Vec<[usize; 3]>,
    bounds: BoundingBox,
    volume: f64,
    area: f64,
    centroid: [f64; 3],
    edges: usize,
    components: usize,
}

impl MeshModel {
    pub fn new(vertices: Vec<[f64; 3]>, triangles: Vec<[usize; 3]>) -> Result<Self, GeometryError> {
        Self::build(vertices, triangles, &CancellationToken::new())
    }

    /// Build a mesh, checking `cancel` while computing properties
    pub fn build(
        vertices: Vec<[f64; 3]>,
        triangles: Vec<[usize; 3]>,
        cancel: &CancellationToken,
    ) -> Result<Self, GeometryError> {
        if vertices.is_empty() || triangles.is_empty() {
            return Err(GeometryError::EmptyMesh);
        }
        let vertices: Vec<DVec3> = vertices.into_iter().map(DVec3::from_array).collect();
        if let Some(index) = triangles.iter().flatten().find(|&&i| i >= vertices.len()) {
            return Err(GeometryError::InvalidIndex {
                index: *index,
                vertices: vertices.len(),
            });
        }

        let mut min = DVec3::splat(f64::INFINITY);
        let mut max = DVec3::splat(f64::NEG_INFINITY);
        for v in &vertices {
            min = min.min(*v);
            max = max.max(*v);
        }

        let mut signed_volume = 0.0;
        let mut moment = DVec3::ZERO;
        let mut area = 0.0;
        let mut edges = HashSet::new();
        let mut components = DisjointSet::new(vertices.len());

        for (n, tri) in triangles.iter().enumerate() {
            if n % CANCEL_CHECK_INTERVAL == 0 && cancel.is_cancelled() {
                return Err(GeometryError::Cancelled);
            }
            let [a, b, c] = [vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]];

            let tetra = a.dot(b.cross(c)) / 6.0;
            signed_volume += tetra;
            moment += tetra * (a + b + c) / 4.0;
            area += (b - a).cross(c - a).length() / 2.0;

            for (i, j) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                edges.insert((i.min(j), i.max(j)));
                components.union(i, j);
            }
        }

        // Inward-facing winding gives a negative signed volume; the
        // centroid is unaffected since the sign cancels.
        let centroid = if signed_volume != 0.0 {
            moment / signed_volume
        } else {
            (min + max) / 2.0
        };

        let used: HashSet<usize> = triangles.iter().flatten().copied().collect();
        let component_roots: HashSet<usize> = used.iter().map(|&v| components.find(v)).collect();

        Ok(Self {
            bounds: BoundingBox::new(min.to_array(), max.to_array()),
            volume: signed_volume.abs(),
            area,
            centroid: centroid.to_array(),
            edges: edges.len(),
            components: component_roots.len(),
            vertices,
            triangles,
        })
    }

    /// Read an ASCII or binary STL, scaling coordinates from `unit` to mm
    pub fn from_stl<R: Read + Seek>(
        reader: &mut R,
        unit: LengthUnit,
        cancel: &CancellationToken,
    ) -> Result<Self, GeometryError> {
        let mesh = stl_io::read_stl(reader).map_err(|e| GeometryError::Parse(e.to_string()))?;
        if cancel.is_cancelled() {
            return Err(GeometryError::Cancelled);
        }

        let scale = unit.millimeters();
        let mut unique: Vec<[f64; 3]> = Vec::new();
        let mut index_of: HashMap<[i64; 3], usize> = HashMap::new();
        let mut triangles = Vec::with_capacity(mesh.faces.len());

        for face in &mesh.faces {
            let mut tri = [0usize; 3];
            for (slot, &vertex_idx) in face.vertices.iter().enumerate() {
                let vertex = mesh.vertices[vertex_idx];
                let v = [
                    vertex[0] as f64 * scale,
                    vertex[1] as f64 * scale,
                    vertex[2] as f64 * scale,
                ];
                let key = [
                    (v[0] * PRECISION).round() as i64,
                    (v[1] * PRECISION).round() as i64,
                    (v[2] * PRECISION).round() as i64,
                ];
                tri[slot] = *index_of.entry(key).or_insert_with(|| {
                    unique.push(v);
                    unique.len() - 1
                });
            }
            triangles.push(tri);
        }

        tracing::debug!(
            faces = triangles.len(),
            vertices = unique.len(),
            "indexed STL mesh"
        );
        Self::build(unique, triangles, cancel)
    }

    /// Load an STL file
    pub fn load_stl(
        path: &Path,
        unit: LengthUnit,
        cancel: &CancellationToken,
    ) -> Result<Self, GeometryError> {
        let file = File::open(path).map_err(|e| GeometryError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);
        Self::from_stl(&mut reader, unit, cancel)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

}

impl SolidModel for MeshModel {
    fn bounding_box(&self) -> Option<BoundingBox> {
        Some(self.bounds)
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn surface_area(&self) -> f64 {
        self.area
    }

    fn centroid(&self) -> [f64; 3] {
        self.centroid
    }

    fn face_count(&self) -> usize {
        self.triangles.len()
    }

    fn edge_count(&self) -> usize {
        self.edges
    }

    fn component_count(&self) -> usize {
        self.components
    }
}

/// Union-find over vertex indices
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    /// Outward-wound triangles of an axis-aligned box
    pub(crate) fn box_mesh(origin: [f64; 3], size: [f64; 3]) -> (Vec<[f64; 3]>, Vec<[usize; 3]>) {
        let [x0, y0, z0] = origin;
        let [x1, y1, z1] = [x0 + size[0], y0 + size[1], z0 + size[2]];
        let vertices = vec![
            [x0, y0, z0],
            [x1, y0, z0],
            [x1, y1, z0],
            [x0, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x1, y1, z1],
            [x0, y1, z1],
        ];
        let triangles = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        (vertices, triangles)
    }

    pub(crate) fn box_stl(size: [f32; 3]) -> Vec<u8> {
        let (vertices, triangles) = box_mesh([0.0; 3], [size[0] as f64, size[1] as f64, size[2] as f64]);
        let faces: Vec<stl_io::Triangle> = triangles
            .iter()
            .map(|tri| {
                let v = |i: usize| {
                    let p = vertices[tri[i]];
                    stl_io::Vertex::new([p[0] as f32, p[1] as f32, p[2] as f32])
                };
                stl_io::Triangle {
                    normal: stl_io::Normal::new([0.0, 0.0, 0.0]),
                    vertices: [v(0), v(1), v(2)],
                }
            })
            .collect();
        let mut bytes = Vec::new();
        stl_io::write_stl(&mut bytes, faces.iter()).unwrap();
        bytes
    }

    #[test]
    fn test_box_mass_properties() {
        let (v, t) = box_mesh([0.0; 3], [10.0, 20.0, 30.0]);
        let mesh = MeshModel::new(v, t).unwrap();

        assert_relative_eq!(mesh.volume(), 6000.0, max_relative = 1e-12);
        assert_relative_eq!(mesh.surface_area(), 2200.0, max_relative = 1e-12);
        let c = mesh.centroid();
        assert_relative_eq!(c[0], 5.0, max_relative = 1e-12);
        assert_relative_eq!(c[1], 10.0, max_relative = 1e-12);
        assert_relative_eq!(c[2], 15.0, max_relative = 1e-12);
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.edge_count(), 18);
        assert_eq!(mesh.component_count(), 1);
        assert_eq!(mesh.bounding_box().unwrap().extents(), [10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_inverted_winding_still_positive() {
        let (v, t) = box_mesh([5.0, 5.0, 5.0], [2.0, 2.0, 2.0]);
        let flipped = t.into_iter().map(|[a, b, c]| [a, c, b]).collect();
        let mesh = MeshModel::new(v, flipped).unwrap();
        assert_relative_eq!(mesh.volume(), 8.0, max_relative = 1e-12);
        assert_relative_eq!(mesh.centroid()[0], 6.0, max_relative = 1e-12);
    }

    #[test]
    fn test_two_components() {
        let (mut v, mut t) = box_mesh([0.0; 3], [1.0, 1.0, 1.0]);
        let (v2, t2) = box_mesh([10.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let offset = v.len();
        v.extend(v2);
        t.extend(t2.into_iter().map(|[a, b, c]| [a + offset, b + offset, c + offset]));

        let mesh = MeshModel::new(v, t).unwrap();
        assert_eq!(mesh.component_count(), 2);
        assert_relative_eq!(mesh.volume(), 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_empty_and_bad_index() {
        assert!(matches!(
            MeshModel::new(vec![], vec![]),
            Err(GeometryError::EmptyMesh)
        ));
        assert!(matches!(
            MeshModel::new(vec![[0.0; 3]], vec![[0, 0, 3]]),
            Err(GeometryError::InvalidIndex { index: 3, .. })
        ));
    }

    #[test]
    fn test_stl_with_inch_scale() {
        let bytes = box_stl([1.0, 2.0, 3.0]);
        let mesh =
            MeshModel::from_stl(&mut Cursor::new(bytes), LengthUnit::Inch, &CancellationToken::new())
                .unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        let extents = mesh.bounding_box().unwrap().extents();
        assert_relative_eq!(extents[0], 25.4, max_relative = 1e-9);
        assert_relative_eq!(extents[2], 76.2, max_relative = 1e-9);
        assert_relative_eq!(mesh.volume(), 6.0 * 25.4f64.powi(3), max_relative = 1e-9);
    }

    #[test]
    fn test_garbage_stl_is_parse_error() {
        let result = MeshModel::from_stl(
            &mut Cursor::new(b"not an stl at all".to_vec()),
            LengthUnit::Millimeter,
            &CancellationToken::new(),
        );
        assert!(matches!(result, Err(GeometryError::Parse(_))));
    }

    #[test]
    fn test_cancelled_build() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (v, t) = box_mesh([0.0; 3], [1.0, 1.0, 1.0]);
        assert!(matches!(
            MeshModel::build(v, t, &cancel),
            Err(GeometryError::Cancelled)
        ));
    }
}
