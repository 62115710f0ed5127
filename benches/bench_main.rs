use std::hint::black_box;

use bevy_ter_terrain::ter::{GRID_CELLS, MATERIAL_SLOTS};
use bevy_ter_terrain::{
    MaterialSlot, TerrainMeshBuilder, TerrainMeshConverter, TerrainRecord, decode_terrain,
};
use criterion::{Criterion, criterion_group, criterion_main};

fn layered_record() -> TerrainRecord {
    let heights = (0..GRID_CELLS)
        .map(|i| (((i % 256) as f32 * 0.1).sin() * 2000.0 + 4000.0) as u16)
        .collect();
    let mut slots: [MaterialSlot; MATERIAL_SLOTS] = Default::default();
    for (slot, material) in slots.iter_mut().enumerate().take(4) {
        *material = MaterialSlot::Present {
            name: format!("layer{slot}"),
            alpha: (0..GRID_CELLS).map(|i| ((i + slot * 64) % 256) as u8).collect(),
        };
    }
    TerrainRecord::from_parts(3, heights, vec![0; GRID_CELLS], slots, String::new(), String::new())
}

fn encode(record: &TerrainRecord) -> Vec<u8> {
    let mut out = vec![record.version()];
    for h in record.heights() {
        out.extend_from_slice(&h.to_le_bytes());
    }
    out.extend_from_slice(record.material_flags());
    for slot in record.slots() {
        let name = slot.name().unwrap_or("");
        out.push(name.len() as u8);
        out.extend_from_slice(name.as_bytes());
    }
    for slot in record.slots() {
        if let Some(alpha) = slot.alpha() {
            out.extend_from_slice(alpha);
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode(&layered_record());
    c.bench_function("decode_terrain 4 layers", |b| {
        b.iter(|| decode_terrain(black_box(&bytes)))
    });
}

fn bench_mesh_generation(c: &mut Criterion) {
    let record = layered_record();

    c.bench_function("TerrainMeshBuilder 4 layers", |b| {
        b.iter(|| TerrainMeshBuilder::new().build(black_box(&record)))
    });

    let derived = TerrainMeshBuilder::new().build(&record);
    c.bench_function("TerrainMeshConverter 4 layers", |b| {
        b.iter(|| TerrainMeshConverter::new().build(black_box(&derived)))
    });
}

criterion_group!(benches, bench_decode, bench_mesh_generation);
criterion_main!(benches);
