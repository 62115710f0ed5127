//! TER terrain file decoding.
//!
//! A TER file holds one 256×256 terrain block:
//!
//! | Field | Type |
//! |---|---|
//! | version | `u8` |
//! | height samples | `u16[65536]` |
//! | material flags | `u8[65536]` |
//! | material names ×13 | text, `u8` length |
//! | alpha masks ×13 | `u8[65536]`, only for slots with a non-empty name |
//! | texture script | text, `u32` length |
//! | heightfield script | text, `u32` length |

use std::path::Path;

use tracing::{debug, warn};

use crate::error::TerResult;
use crate::reader::TerReader;

/// The only TER version this decoder was written against.
pub const TER_FILE_VERSION: u8 = 3;
/// Cells along each edge of the terrain grid.
pub const GRID_SIZE: usize = 256;
/// Cells in the terrain grid.
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;
/// Fixed number of material layer slots.
pub const MATERIAL_SLOTS: usize = 13;

/// One material layer binding.
///
/// An alpha mask exists exactly when the slot has a name, so the two are
/// stored together.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum MaterialSlot {
    #[default]
    Unused,
    Present {
        /// Material base name as stored in the file.
        name: String,
        /// Per-cell alpha weight (0–255), row-major, [`GRID_CELLS`] entries.
        alpha: Vec<u8>,
    },
}

impl MaterialSlot {
    pub fn name(&self) -> Option<&str> {
        match self {
            MaterialSlot::Unused => None,
            MaterialSlot::Present { name, .. } => Some(name),
        }
    }

    pub fn alpha(&self) -> Option<&[u8]> {
        match self {
            MaterialSlot::Unused => None,
            MaterialSlot::Present { alpha, .. } => Some(alpha),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, MaterialSlot::Present { .. })
    }
}

/// Decoded contents of a TER file.
///
/// Grid-sized fields always hold exactly [`GRID_CELLS`] entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainRecord {
    version: u8,
    heights: Vec<u16>,
    material_flags: Vec<u8>,
    slots: [MaterialSlot; MATERIAL_SLOTS],
    texture_script: String,
    heightfield_script: String,
}

impl TerrainRecord {
    /// Assembles a record from already-decoded parts.
    ///
    /// # Panics
    ///
    /// Panics if `heights`, `material_flags` or any present alpha mask does not
    /// hold exactly [`GRID_CELLS`] entries, or if a present slot has an empty
    /// name.
    pub fn from_parts(
        version: u8,
        heights: Vec<u16>,
        material_flags: Vec<u8>,
        slots: [MaterialSlot; MATERIAL_SLOTS],
        texture_script: String,
        heightfield_script: String,
    ) -> Self {
        assert_eq!(heights.len(), GRID_CELLS, "height grid must be 256×256");
        assert_eq!(
            material_flags.len(),
            GRID_CELLS,
            "material flag grid must be 256×256"
        );
        for (index, slot) in slots.iter().enumerate() {
            if let MaterialSlot::Present { name, alpha } = slot {
                assert!(!name.is_empty(), "present slot {index} has an empty name");
                assert_eq!(alpha.len(), GRID_CELLS, "alpha mask {index} must be 256×256");
            }
        }

        Self {
            version,
            heights,
            material_flags,
            slots,
            texture_script,
            heightfield_script,
        }
    }

    /// A record with zero heights, zero flags and no material layers.
    pub fn flat() -> Self {
        Self::from_parts(
            TER_FILE_VERSION,
            vec![0; GRID_CELLS],
            vec![0; GRID_CELLS],
            Default::default(),
            String::new(),
            String::new(),
        )
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Row-major height samples, index `y * 256 + x`.
    pub fn heights(&self) -> &[u16] {
        &self.heights
    }

    /// Height sample of cell `(x, y)`. Coordinates wrap at the grid edge.
    pub fn height_at(&self, x: usize, y: usize) -> u16 {
        self.heights[(y % GRID_SIZE) * GRID_SIZE + (x % GRID_SIZE)]
    }

    /// Row-major per-cell material bitflags, passed through untouched.
    pub fn material_flags(&self) -> &[u8] {
        &self.material_flags
    }

    pub fn slots(&self) -> &[MaterialSlot; MATERIAL_SLOTS] {
        &self.slots
    }

    /// Slots that carry a material, with their slot index.
    pub fn present_slots(&self) -> impl Iterator<Item = (usize, &MaterialSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_present())
    }

    pub fn texture_script(&self) -> &str {
        &self.texture_script
    }

    pub fn heightfield_script(&self) -> &str {
        &self.heightfield_script
    }
}

/// Decodes a complete TER file from memory.
///
/// Fields are read in file order. Alpha masks are only read for slots whose
/// name is non-empty, so a wrong slot index would misalign every later read.
/// An unexpected version is logged and otherwise ignored.
///
/// # Errors
///
/// [`TerError::TruncatedInput`](crate::TerError::TruncatedInput) if the buffer
/// ends early, [`TerError::TextDecode`](crate::TerError::TextDecode) if a name
/// or script is not valid Windows-1252.
pub fn decode_terrain(bytes: &[u8]) -> TerResult<TerrainRecord> {
    let mut reader = TerReader::new(bytes);

    let version = reader.read_u8()?;
    if version != TER_FILE_VERSION {
        warn!(version, expected = TER_FILE_VERSION, "unexpected TER version, decoding anyway");
    }

    let heights = reader.read_u16s(GRID_CELLS)?;
    let material_flags = reader.read_u8s(GRID_CELLS)?;

    let mut names: [String; MATERIAL_SLOTS] = Default::default();
    for name in names.iter_mut() {
        *name = reader.read_text8()?;
    }

    let mut slots: [MaterialSlot; MATERIAL_SLOTS] = Default::default();
    for (slot, name) in slots.iter_mut().zip(names) {
        if !name.is_empty() {
            let alpha = reader.read_u8s(GRID_CELLS)?;
            *slot = MaterialSlot::Present { name, alpha };
        }
    }

    let texture_script = reader.read_text32()?;
    let heightfield_script = reader.read_text32()?;

    if reader.remaining() > 0 {
        debug!(trailing = reader.remaining(), "ignoring trailing bytes after TER record");
    }

    let record = TerrainRecord {
        version,
        heights,
        material_flags,
        slots,
        texture_script,
        heightfield_script,
    };
    debug!(
        version,
        layers = record.present_slots().count(),
        texture_script_len = record.texture_script.len(),
        heightfield_script_len = record.heightfield_script.len(),
        "decoded TER record"
    );
    Ok(record)
}

/// Reads and decodes a TER file from disk.
pub fn read_terrain_file(path: impl AsRef<Path>) -> TerResult<TerrainRecord> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_terrain(&bytes)
}
