//! Host-independent mesh derivation from a [`TerrainRecord`].
//!
//! The 256×256 cell grid becomes a 257×257 vertex grid whose last row and
//! column reuse the first row and column's heights, so adjacent tiles meet
//! without a seam. Coordinates are Z-up: `x` and `y` span the ground plane,
//! `z` is elevation.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::settings::{DEFAULT_UV_SCALE, TerrainImportSettings};
use crate::ter::{GRID_CELLS, GRID_SIZE, TerrainRecord};

/// Vertices along each edge of the vertex grid.
pub const VERTEX_GRID: usize = GRID_SIZE + 1;
pub const VERTEX_COUNT: usize = VERTEX_GRID * VERTEX_GRID;
pub const TRIANGLE_COUNT: usize = GRID_CELLS * 2;

/// World units between neighbouring vertices.
pub const CELL_WORLD_SIZE: f32 = 8.0;
/// Shift applied to `x` and `y` so the terrain is centred on the origin.
pub const WORLD_ORIGIN_OFFSET: f32 = 1024.0;
/// Divisor turning raw `u16` height samples into world units.
pub const HEIGHT_DIVISOR: f32 = 32.0;

/// Index of vertex `(x, y)` in the 257-wide vertex grid.
pub const fn vertex_index(x: usize, y: usize) -> usize {
    y * VERTEX_GRID + x
}

/// Index of cell `(x, y)` in the row-major 256-wide cell grid.
pub const fn cell_index(x: usize, y: usize) -> usize {
    y * GRID_SIZE + x
}

/// Geometry and blend weights derived from one terrain record.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedMesh {
    vertices: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
    uvs: Vec<[f32; 2]>,
    layer_weights: BTreeMap<usize, Vec<f32>>,
    face_cells: Vec<[u16; 2]>,
}

impl DerivedMesh {
    /// Vertex positions, row-major over the 257×257 grid.
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    /// Triangles as vertex index triples. Triangles `2c` and `2c + 1` cover
    /// cell `face_cells()[c]`.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// One UV per vertex.
    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    /// Per-vertex blend weights of a material slot, `None` for unused slots.
    pub fn layer_weights(&self, slot: usize) -> Option<&[f32]> {
        self.layer_weights.get(&slot).map(Vec::as_slice)
    }

    /// All weight layers in slot order.
    pub fn weight_layers(&self) -> impl Iterator<Item = (usize, &[f32])> {
        self.layer_weights
            .iter()
            .map(|(slot, weights)| (*slot, weights.as_slice()))
    }

    /// Grid cell `[x, y]` of each triangle pair, in triangle order.
    pub fn face_cells(&self) -> &[[u16; 2]] {
        &self.face_cells
    }

    /// Grid cell `[x, y]` that triangle `triangle` belongs to.
    pub fn cell_of_triangle(&self, triangle: usize) -> [u16; 2] {
        self.face_cells[triangle / 2]
    }
}

/// Derives a [`DerivedMesh`] from a [`TerrainRecord`].
///
/// # Example
///
/// ```
/// use bevy_ter_terrain::{TerrainMeshBuilder, TerrainRecord};
///
/// let record = TerrainRecord::flat();
/// let mesh = TerrainMeshBuilder::new().with_uv_scale(16.0).build(&record);
/// assert_eq!(mesh.vertices().len(), 257 * 257);
/// ```
#[derive(Clone, Debug)]
pub struct TerrainMeshBuilder {
    uv_scale: f32,
}

impl Default for TerrainMeshBuilder {
    fn default() -> Self {
        Self {
            uv_scale: DEFAULT_UV_SCALE,
        }
    }
}

impl TerrainMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the mesh-related fields of the import settings.
    pub fn from_settings(settings: &TerrainImportSettings) -> Self {
        Self::new().with_uv_scale(settings.uv_scale)
    }

    /// Sets the UV divisor: `uv = position.xy / uv_scale`.
    /// Clamped to a positive minimum to avoid division by zero.
    pub fn with_uv_scale(mut self, scale: f32) -> Self {
        self.uv_scale = scale.max(f32::EPSILON);
        self
    }

    /// Builds vertices, triangles, UVs and one weight layer per present slot.
    ///
    /// # Panics
    ///
    /// Panics if the record's grids are not 256×256. Records produced by
    /// [`decode_terrain`](crate::decode_terrain) always are.
    pub fn build(&self, record: &TerrainRecord) -> DerivedMesh {
        assert_eq!(record.heights().len(), GRID_CELLS, "height grid must be 256×256");

        let vertices = build_vertices(record);
        let (triangles, face_cells) = triangulate();

        let uv_scale = self.uv_scale.max(f32::EPSILON);
        let uvs = vertices
            .iter()
            .map(|p| [p[0] / uv_scale, p[1] / uv_scale])
            .collect();

        let present: Vec<(usize, &[u8])> = record
            .present_slots()
            .filter_map(|(slot, material)| material.alpha().map(|alpha| (slot, alpha)))
            .collect();
        let layer_weights = present
            .par_iter()
            .map(|&(slot, alpha)| (slot, vertex_weights(alpha, &triangles, &face_cells)))
            .collect();

        DerivedMesh {
            vertices,
            triangles,
            uvs,
            layer_weights,
            face_cells,
        }
    }
}

/// Builds a mesh with default settings.
pub fn build_mesh(record: &TerrainRecord) -> DerivedMesh {
    TerrainMeshBuilder::new().build(record)
}

fn build_vertices(record: &TerrainRecord) -> Vec<[f32; 3]> {
    (0..VERTEX_COUNT)
        .into_par_iter()
        .map(|i| {
            let x = i % VERTEX_GRID;
            let y = i / VERTEX_GRID;
            [
                x as f32 * CELL_WORLD_SIZE - WORLD_ORIGIN_OFFSET,
                y as f32 * CELL_WORLD_SIZE - WORLD_ORIGIN_OFFSET,
                f32::from(record.height_at(x, y)) / HEIGHT_DIVISOR,
            ]
        })
        .collect()
}

// Cells alternate their diagonal in a checkerboard so shading has no
// preferred direction:
//
//   v2──v3      v2──v3
//   │  ╱ │      │ ╲  │
//   │ ╱  │      │  ╲ │
//   v0──v1      v0──v1
//   x%2 == y%2  otherwise
fn triangulate() -> (Vec<[u32; 3]>, Vec<[u16; 2]>) {
    let mut triangles = Vec::with_capacity(TRIANGLE_COUNT);
    let mut face_cells = Vec::with_capacity(GRID_CELLS);

    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            let v0 = vertex_index(x, y) as u32;
            let v1 = v0 + 1;
            let v2 = v0 + VERTEX_GRID as u32;
            let v3 = v2 + 1;

            if x % 2 == y % 2 {
                triangles.push([v0, v2, v3]);
                triangles.push([v3, v1, v0]);
            } else {
                triangles.push([v0, v2, v1]);
                triangles.push([v3, v1, v2]);
            }
            face_cells.push([x as u16, y as u16]);
        }
    }

    (triangles, face_cells)
}

/// Averages one layer's per-cell alpha onto vertices.
///
/// Every vertex touched by a cell's triangle pair receives the cell's
/// normalized alpha once; its weight is the mean over those cells. Border
/// vertices have fewer cells and are averaged over fewer samples.
fn vertex_weights(alpha: &[u8], triangles: &[[u32; 3]], face_cells: &[[u16; 2]]) -> Vec<f32> {
    let mut sums = vec![0.0f64; VERTEX_COUNT];
    let mut counts = vec![0u32; VERTEX_COUNT];

    for (pair, &[x, y]) in triangles.chunks_exact(2).zip(face_cells) {
        let value = f64::from(alpha[cell_index(x as usize, y as usize)]) / 255.0;

        // Both triangles share their diagonal; count each vertex once per cell.
        let mut touched = [0u32; 6];
        for (dst, &v) in touched.iter_mut().zip(pair.iter().flatten()) {
            *dst = v;
        }
        touched.sort_unstable();
        for (i, &v) in touched.iter().enumerate() {
            if i > 0 && touched[i - 1] == v {
                continue;
            }
            sums[v as usize] += value;
            counts[v as usize] += 1;
        }
    }

    sums.iter()
        .zip(&counts)
        .map(|(&sum, &count)| {
            debug_assert!(count > 0, "every vertex belongs to at least one cell");
            (sum / f64::from(count)) as f32
        })
        .collect()
}

