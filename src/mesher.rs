//! Bevy side of the terrain mesh.
//!
//! The core mesh is Z-up and carries no normals. [`TerrainMeshConverter`]
//! rotates it into Bevy's Y-up frame, flips the winding so the ground faces the
//! sky, and derives smooth normals from the rotated triangles. Layer weights
//! travel as custom vertex attributes, one `Float32` stream per material slot,
//! under the ids returned by [`layer_weight_attribute`].

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, MeshVertexAttribute, PrimitiveTopology};
use bevy::prelude::*;
use bevy::render::render_resource::VertexFormat;

use crate::ter::MATERIAL_SLOTS;
use crate::terrain::DerivedMesh;

/// First attribute id used for layer weights; slot `n` uses `BASE + n`.
pub const LAYER_WEIGHT_ATTRIBUTE_BASE_ID: u64 = 0x7E5_0000;

const fn layer_attribute(name: &'static str, slot: u64) -> MeshVertexAttribute {
    MeshVertexAttribute::new(name, LAYER_WEIGHT_ATTRIBUTE_BASE_ID + slot, VertexFormat::Float32)
}

/// Per-vertex blend weight attributes, indexed by material slot.
pub const LAYER_WEIGHT_ATTRIBUTES: [MeshVertexAttribute; MATERIAL_SLOTS] = [
    layer_attribute("tex0_vertexalphas", 0),
    layer_attribute("tex1_vertexalphas", 1),
    layer_attribute("tex2_vertexalphas", 2),
    layer_attribute("tex3_vertexalphas", 3),
    layer_attribute("tex4_vertexalphas", 4),
    layer_attribute("tex5_vertexalphas", 5),
    layer_attribute("tex6_vertexalphas", 6),
    layer_attribute("tex7_vertexalphas", 7),
    layer_attribute("tex8_vertexalphas", 8),
    layer_attribute("tex9_vertexalphas", 9),
    layer_attribute("tex10_vertexalphas", 10),
    layer_attribute("tex11_vertexalphas", 11),
    layer_attribute("tex12_vertexalphas", 12),
];

/// Blend weight attribute of a material slot.
///
/// # Panics
///
/// Panics if `slot >= 13`.
pub fn layer_weight_attribute(slot: usize) -> MeshVertexAttribute {
    LAYER_WEIGHT_ATTRIBUTES[slot]
}

/// Converts a [`DerivedMesh`] into a Bevy [`Mesh`].
///
/// The core mesh is Z-up; Bevy is Y-up, so positions map
/// `(x, y, z) → (x, z, -y)`. The core triangles wind clockwise seen from
/// above, so each triangle's last two indices are swapped to make the top
/// surface the front face.
///
/// # Example
///
/// ```ignore
/// use bevy_ter_terrain::{TerrainMeshConverter, TerrainRecord, build_mesh};
///
/// let derived = build_mesh(&TerrainRecord::flat());
/// let mesh = TerrainMeshConverter::new().build(&derived);
/// ```
pub struct TerrainMeshConverter {
    include_weights: bool,
}

impl Default for TerrainMeshConverter {
    fn default() -> Self {
        Self {
            include_weights: true,
        }
    }
}

impl TerrainMeshConverter {
    /// Creates a converter that includes layer weight attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether to emit the per-layer weight attributes.
    pub fn with_weights(mut self, include: bool) -> Self {
        self.include_weights = include;
        self
    }

    /// Builds the Bevy mesh.
    pub fn build(&self, derived: &DerivedMesh) -> Mesh {
        let positions: Vec<[f32; 3]> = derived
            .vertices()
            .iter()
            .map(|&[x, y, z]| [x, z, -y])
            .collect();

        let indices: Vec<u32> = derived
            .triangles()
            .iter()
            .flat_map(|&[a, b, c]| [a, c, b])
            .collect();

        // Unnormalized face normals are proportional to triangle area.
        let mut normals: Vec<Vec3> = vec![Vec3::ZERO; positions.len()];

        for tri in indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = Vec3::from(positions[i0]);
            let p1 = Vec3::from(positions[i1]);
            let p2 = Vec3::from(positions[i2]);
            let face_normal = (p1 - p0).cross(p2 - p0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        let normals: Vec<[f32; 3]> = normals
            .iter()
            .map(|n| {
                let len = n.length();
                // Only reachable for collapsed triangles; point straight up.
                if len > f32::EPSILON { (*n / len).into() } else { [0.0, 1.0, 0.0] }
            })
            .collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, derived.uvs().to_vec());

        if self.include_weights {
            for (slot, weights) in derived.weight_layers() {
                mesh.insert_attribute(layer_weight_attribute(slot), weights.to_vec());
            }
        }

        mesh.insert_indices(Indices::U32(indices));
        mesh
    }
}
