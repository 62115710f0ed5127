//! One-call import: decode a TER file, derive its mesh and find its textures.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::TerResult;
use crate::settings::TerrainImportSettings;
use crate::ter::{TerrainRecord, read_terrain_file};
use crate::terrain::{DerivedMesh, TerrainMeshBuilder};
use crate::texture::{material_base_name, resolve_texture_with};

/// Name of the per-vertex weight attribute for a material slot.
pub fn weight_attribute_name(slot: usize) -> String {
    format!("tex{slot}_vertexalphas")
}

/// A present material slot and the texture found for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerBinding {
    pub slot: usize,
    /// Material name as stored in the file.
    pub material_name: String,
    /// Name the texture search used.
    pub base_name: String,
    pub weight_attribute: String,
    /// `None` when no matching image exists; the layer is then skipped.
    pub texture: Option<PathBuf>,
}

/// Everything a presentation layer needs to build a terrain object.
#[derive(Clone, Debug)]
pub struct TerrainImport {
    /// Terrain file name without its extension.
    pub name: String,
    pub record: TerrainRecord,
    pub mesh: DerivedMesh,
    /// Present slots in slot order.
    pub layers: Vec<LayerBinding>,
}

/// Resolves textures for every present slot of `record`, searching from
/// `search_dir` upwards.
pub fn bind_layers(
    record: &TerrainRecord,
    search_dir: &Path,
    settings: &TerrainImportSettings,
) -> Vec<LayerBinding> {
    record
        .present_slots()
        .filter_map(|(slot, material)| {
            let material_name = material.name()?;
            let base_name = material_base_name(material_name);
            let texture = resolve_texture_with(
                search_dir,
                base_name,
                settings.texture_extensions.as_slice(),
            );
            match &texture {
                Some(path) => debug!(slot, path = %path.display(), "resolved layer texture"),
                None => warn!(
                    slot,
                    material = base_name,
                    dir = %search_dir.display(),
                    "no texture found for layer, skipping it"
                ),
            }
            Some(LayerBinding {
                slot,
                material_name: material_name.to_string(),
                base_name: base_name.to_string(),
                weight_attribute: weight_attribute_name(slot),
                texture,
            })
        })
        .collect()
}

/// Decodes the TER file at `path`, builds its mesh and binds layer textures.
///
/// Textures are searched from `settings.texture_root` if set, otherwise from
/// the terrain file's directory.
///
/// # Errors
///
/// Fails if the file cannot be read or decoded. Missing textures are not
/// errors.
pub fn import_terrain(
    path: impl AsRef<Path>,
    settings: &TerrainImportSettings,
) -> TerResult<TerrainImport> {
    let path = path.as_ref();
    let record = read_terrain_file(path)?;
    let mesh = TerrainMeshBuilder::from_settings(settings).build(&record);

    let search_dir = settings
        .texture_root
        .clone()
        .unwrap_or_else(|| path.parent().map(Path::to_path_buf).unwrap_or_default());
    let layers = bind_layers(&record, &search_dir, settings);

    let name = path
        .file_name()
        .map(|file| material_base_name(&file.to_string_lossy()).to_string())
        .unwrap_or_default();

    info!(
        terrain = %name,
        layers = layers.len(),
        textured = layers.iter().filter(|layer| layer.texture.is_some()).count(),
        "imported TER terrain"
    );

    Ok(TerrainImport {
        name,
        record,
        mesh,
        layers,
    })
}
