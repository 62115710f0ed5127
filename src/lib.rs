//! Legacy TER terrain import for Bevy.
//!
//! Decodes TER terrain files and derives a renderable triangle mesh,
//! per-vertex blend weights and texture bindings from them.
//!
//! # Layout
//!
//! - **Decoding**: [`decode_terrain`] parses a TER byte stream into a
//!   [`TerrainRecord`] (heights, material flags, up to 13 material layers with
//!   per-cell alpha masks, two script blobs).
//! - **Mesh derivation**: [`TerrainMeshBuilder`] turns a record into a
//!   host-independent [`DerivedMesh`] (257×257 vertices, checkerboard
//!   triangulation, planar UVs, averaged per-vertex layer weights).
//! - **Texture lookup**: [`resolve_texture`] searches upward from a directory
//!   for `name.png` / `name.jpg`.
//! - **Import**: [`import_terrain`] runs all of the above for one file.
//! - **Bevy**: [`TerrainMeshConverter`] builds a Bevy [`Mesh`](bevy::prelude::Mesh),
//!   [`splat`] packs alpha masks into textures and [`spawn_terrain`] spawns the
//!   result.
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_ter_terrain::{TerrainImportSettings, import_terrain, spawn_terrain};
//!
//! fn setup(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut materials: ResMut<Assets<StandardMaterial>>,
//!     mut images: ResMut<Assets<Image>>,
//! ) {
//!     let settings = TerrainImportSettings::default();
//!     match import_terrain("assets/terrain/island.ter", &settings) {
//!         Ok(terrain) => {
//!             spawn_terrain(&mut commands, &mut meshes, &mut materials, &mut images, &terrain);
//!         }
//!         Err(err) => error!("terrain import failed: {err}"),
//!     }
//! }
//! ```

pub mod error;
pub mod import;
pub mod layers;
pub mod mesher;
pub mod reader;
pub mod settings;
pub mod splat;
pub mod ter;
pub mod terrain;
pub mod texture;

pub use error::{TerError, TerResult};
pub use import::{LayerBinding, TerrainImport, bind_layers, import_terrain, weight_attribute_name};
pub use layers::{
    LayerTexture, SplatTexture, TerrainLayerTextures, TextureLoadError, load_layer_image,
    load_layer_textures, spawn_terrain,
};
pub use mesher::{TerrainMeshConverter, layer_weight_attribute};
pub use settings::TerrainImportSettings;
pub use splat::{SplatImage, splat_images, splat_to_image};
pub use ter::{MaterialSlot, TerrainRecord, decode_terrain, read_terrain_file};
pub use terrain::{DerivedMesh, TerrainMeshBuilder, build_mesh};
pub use texture::{material_base_name, resolve_texture, resolve_texture_with};
