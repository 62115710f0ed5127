//! Import configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Divisor mapping world units to texture repeats.
///
/// Picked by eye for the legacy engine's textures; treat it as tunable.
pub const DEFAULT_UV_SCALE: f32 = 32.0;

/// Texture extensions probed by default, in priority order.
pub const DEFAULT_TEXTURE_EXTENSIONS: [&str; 2] = ["png", "jpg"];

/// Settings for [`import_terrain`](crate::import_terrain).
///
/// Every field has a default, so partial JSON/RON documents deserialize.
///
/// # Example
///
/// ```
/// use bevy_ter_terrain::TerrainImportSettings;
///
/// let settings = TerrainImportSettings::new()
///     .with_texture_root("assets/textures")
///     .with_texture_extensions(["png", "jpg", "bmp"]);
/// assert_eq!(settings.uv_scale, 32.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainImportSettings {
    /// World units per texture repeat.
    pub uv_scale: f32,
    /// Texture file extensions, highest priority first, without the dot.
    pub texture_extensions: Vec<String>,
    /// Directory to start the texture search from instead of the terrain
    /// file's own directory.
    pub texture_root: Option<PathBuf>,
}

impl Default for TerrainImportSettings {
    fn default() -> Self {
        Self {
            uv_scale: DEFAULT_UV_SCALE,
            texture_extensions: DEFAULT_TEXTURE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            texture_root: None,
        }
    }
}

impl TerrainImportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the UV divisor. Clamped to a positive minimum to avoid division by
    /// zero.
    pub fn with_uv_scale(mut self, scale: f32) -> Self {
        self.uv_scale = scale.max(f32::EPSILON);
        self
    }

    pub fn with_texture_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texture_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_texture_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.texture_root = Some(root.into());
        self
    }
}
