#![allow(dead_code)]

use bevy_ter_terrain::ter::{GRID_CELLS, MATERIAL_SLOTS};

/// Builds TER byte streams for tests.
pub struct TerFixture {
    pub version: u8,
    pub heights: Vec<u16>,
    pub flags: Vec<u8>,
    pub names: Vec<Vec<u8>>,
    pub masks: Vec<Option<Vec<u8>>>,
    pub texture_script: Vec<u8>,
    pub heightfield_script: Vec<u8>,
}

impl TerFixture {
    pub fn new() -> Self {
        Self {
            version: 3,
            heights: vec![0; GRID_CELLS],
            flags: vec![0; GRID_CELLS],
            names: vec![Vec::new(); MATERIAL_SLOTS],
            masks: vec![None; MATERIAL_SLOTS],
            texture_script: Vec::new(),
            heightfield_script: Vec::new(),
        }
    }

    /// Sets a material name and a uniform alpha mask for `slot`.
    pub fn with_layer(self, slot: usize, name: &str, alpha: u8) -> Self {
        self.with_layer_mask(slot, name, vec![alpha; GRID_CELLS])
    }

    pub fn with_layer_mask(mut self, slot: usize, name: &str, mask: Vec<u8>) -> Self {
        self.names[slot] = name.as_bytes().to_vec();
        self.masks[slot] = Some(mask);
        self
    }

    pub fn with_scripts(mut self, texture: &str, heightfield: &str) -> Self {
        self.texture_script = texture.as_bytes().to_vec();
        self.heightfield_script = heightfield.as_bytes().to_vec();
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.version];
        for h in &self.heights {
            out.extend_from_slice(&h.to_le_bytes());
        }
        out.extend_from_slice(&self.flags);
        for name in &self.names {
            out.push(name.len() as u8);
            out.extend_from_slice(name);
        }
        for (name, mask) in self.names.iter().zip(&self.masks) {
            if !name.is_empty() {
                out.extend_from_slice(mask.as_ref().expect("named slot needs a mask"));
            }
        }
        out.extend_from_slice(&(self.texture_script.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.texture_script);
        out.extend_from_slice(&(self.heightfield_script.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.heightfield_script);
        out
    }
}
