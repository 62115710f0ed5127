//! Layer textures and terrain entity spawning.
//!
//! Turns a [`TerrainImport`] into Bevy assets and one entity. Blending the
//! layers is left to the host's terrain material: the entity carries a
//! [`TerrainLayerTextures`] component that pairs each loaded texture with the
//! mesh attribute holding its blend weights.

use std::path::{Path, PathBuf};

use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::mesh::MeshVertexAttribute;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use thiserror::Error;
use tracing::{debug, warn};

use crate::import::{LayerBinding, TerrainImport};
use crate::mesher::{TerrainMeshConverter, layer_weight_attribute};
use crate::splat::{LAYERS_PER_SPLAT, splat_images};

/// A resolved layer texture that could not be turned into an [`Image`].
#[derive(Debug, Error)]
pub enum TextureLoadError {
    #[error("cannot open texture {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode texture {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Reads and decodes an image file into a tiling sRGB [`Image`].
pub fn load_layer_image(path: &Path) -> Result<Image, TextureLoadError> {
    let bytes = std::fs::read(path).map_err(|source| TextureLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|source| TextureLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = decoded.dimensions();

    let mut image = Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        decoded.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    Ok(image)
}

/// A loaded layer texture and the mesh attribute carrying its weights.
#[derive(Clone, Debug)]
pub struct LayerTexture {
    pub slot: usize,
    pub weight_attribute: MeshVertexAttribute,
    pub image: Handle<Image>,
}

/// A splat texture handle with the slot stored in each channel.
#[derive(Clone, Debug)]
pub struct SplatTexture {
    pub channels: [Option<usize>; LAYERS_PER_SPLAT],
    pub image: Handle<Image>,
}

/// Texture inputs for a terrain material, attached to the spawned entity.
#[derive(Component, Clone, Debug, Default)]
pub struct TerrainLayerTextures {
    /// Layers whose texture loaded, in slot order.
    pub layers: Vec<LayerTexture>,
    /// Per-cell alpha masks packed four to an image.
    pub splats: Vec<SplatTexture>,
}

/// Loads the texture of every bound layer into `images`.
///
/// Layers without a resolved texture are skipped. Layers whose texture fails
/// to load are logged and skipped; the rest still load.
pub fn load_layer_textures(
    layers: &[LayerBinding],
    images: &mut Assets<Image>,
) -> Vec<LayerTexture> {
    layers
        .iter()
        .filter_map(|layer| {
            let path = layer.texture.as_deref()?;
            match load_layer_image(path) {
                Ok(image) => {
                    debug!(slot = layer.slot, path = %path.display(), "loaded layer texture");
                    Some(LayerTexture {
                        slot: layer.slot,
                        weight_attribute: layer_weight_attribute(layer.slot),
                        image: images.add(image),
                    })
                }
                Err(err) => {
                    warn!(slot = layer.slot, "skipping layer: {err}");
                    None
                }
            }
        })
        .collect()
}

/// Spawns an imported terrain as a single entity.
///
/// The entity gets the converted mesh, a [`StandardMaterial`] showing the
/// first loaded layer, a [`Name`] and a [`TerrainLayerTextures`] component.
pub fn spawn_terrain(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    images: &mut Assets<Image>,
    terrain: &TerrainImport,
) -> Entity {
    let mesh = meshes.add(TerrainMeshConverter::new().build(&terrain.mesh));

    let layers = load_layer_textures(&terrain.layers, images);
    let splats = splat_images(&terrain.record)
        .into_iter()
        .map(|splat| SplatTexture {
            channels: splat.channels,
            image: images.add(splat.image),
        })
        .collect();

    let material = materials.add(StandardMaterial {
        base_color_texture: layers.first().map(|layer| layer.image.clone()),
        perceptual_roughness: 1.0,
        ..default()
    });

    commands
        .spawn((
            Name::new(terrain.name.clone()),
            Mesh3d(mesh),
            MeshMaterial3d(material),
            TerrainLayerTextures { layers, splats },
        ))
        .id()
}
