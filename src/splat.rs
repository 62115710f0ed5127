//! Material alpha masks to GPU splat textures.
//!
//! Packs the per-cell alpha masks of a [`TerrainRecord`] into RGBA8 Bevy
//! [`Image`]s, four layers per image, for shaders that blend by cell instead
//! of by vertex.

use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::ter::{GRID_CELLS, GRID_SIZE, TerrainRecord};

/// Layers packed into one splat image (R, G, B, A).
pub const LAYERS_PER_SPLAT: usize = 4;

/// One splat texture and the material slot stored in each channel.
pub struct SplatImage {
    /// Slot held by R, G, B and A; `None` channels are zero.
    pub channels: [Option<usize>; LAYERS_PER_SPLAT],
    pub image: Image,
}

/// Packs up to four alpha masks into a tiling 256×256 [`Image`] (RGBA8Unorm).
///
/// Pixel `(x, y)` holds cell `(x, y)` of each mask. Missing masks leave their
/// channel at zero.
///
/// # Panics
///
/// Panics if a mask does not hold exactly 65,536 values.
pub fn splat_to_image(masks: [Option<&[u8]>; LAYERS_PER_SPLAT]) -> Image {
    for mask in masks.iter().flatten() {
        assert_eq!(mask.len(), GRID_CELLS, "alpha mask must be 256×256");
    }

    let raw: Vec<u8> = (0..GRID_CELLS)
        .flat_map(|cell| masks.map(|mask| mask.map_or(0, |alpha| alpha[cell])))
        .collect();

    let mut image = Image::new(
        Extent3d {
            width: GRID_SIZE as u32,
            height: GRID_SIZE as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        raw,
        TextureFormat::Rgba8Unorm,
        default(),
    );

    // The terrain wraps at its edges, so the masks do too.
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });

    image
}

/// Packs every present layer of `record` into splat images, in slot order.
///
/// Returns no images when the record has no material layers.
pub fn splat_images(record: &TerrainRecord) -> Vec<SplatImage> {
    let present: Vec<(usize, &[u8])> = record
        .present_slots()
        .filter_map(|(slot, material)| material.alpha().map(|alpha| (slot, alpha)))
        .collect();

    present
        .chunks(LAYERS_PER_SPLAT)
        .map(|group| {
            let mut channels = [None; LAYERS_PER_SPLAT];
            let mut masks = [None; LAYERS_PER_SPLAT];
            for (i, &(slot, alpha)) in group.iter().enumerate() {
                channels[i] = Some(slot);
                masks[i] = Some(alpha);
            }
            SplatImage {
                channels,
                image: splat_to_image(masks),
            }
        })
        .collect()
}
