mod common;

use std::fs;

use bevy::prelude::*;
use bevy_ter_terrain::{
    LayerBinding, TerrainImportSettings, TerrainLayerTextures, TextureLoadError, import_terrain,
    layer_weight_attribute, load_layer_image, load_layer_textures, spawn_terrain,
    weight_attribute_name,
};
use common::TerFixture;

fn binding(slot: usize, texture: Option<std::path::PathBuf>) -> LayerBinding {
    LayerBinding {
        slot,
        material_name: format!("layer{slot}"),
        base_name: format!("layer{slot}"),
        weight_attribute: weight_attribute_name(slot),
        texture,
    }
}

#[test]
fn loads_png_into_srgb_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grass.png");
    image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 200, 30, 255]))
        .save(&path)
        .unwrap();

    let image = load_layer_image(&path).unwrap();
    assert_eq!(image.texture_descriptor.size.width, 4);
    assert_eq!(image.texture_descriptor.size.height, 2);
    assert_eq!(
        image.texture_descriptor.format,
        bevy::render::render_resource::TextureFormat::Rgba8UnormSrgb
    );
    let data = image.data.as_ref().unwrap();
    assert_eq!(&data[0..4], &[10, 200, 30, 255]);
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_layer_image(&dir.path().join("gone.png"));
    assert!(matches!(result, Err(TextureLoadError::Open { .. })));
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    fs::write(&path, b"definitely not an image").unwrap();
    assert!(matches!(
        load_layer_image(&path),
        Err(TextureLoadError::Decode { .. })
    ));
}

#[test]
fn failed_layers_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.png");
    image::RgbaImage::new(2, 2).save(&good).unwrap();
    let bad = dir.path().join("bad.jpg");
    fs::write(&bad, b"nope").unwrap();

    let layers = vec![
        binding(0, Some(bad)),
        binding(4, None),
        binding(9, Some(good)),
    ];
    let mut images = Assets::<Image>::default();
    let loaded = load_layer_textures(&layers, &mut images);

    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].slot, 9);
    assert_eq!(loaded[0].weight_attribute.name, "tex9_vertexalphas");
    assert!(images.get(&loaded[0].image).is_some());
}

#[test]
fn spawns_terrain_entity() {
    let dir = tempfile::tempdir().unwrap();
    let fixture = TerFixture::new()
        .with_layer(1, "grass", 255)
        .with_layer(5, "ter_layers_missing_71d0", 0);
    let path = dir.path().join("hills.ter");
    fs::write(&path, fixture.to_bytes()).unwrap();
    image::RgbaImage::new(8, 8)
        .save(dir.path().join("grass.png"))
        .unwrap();

    let terrain = import_terrain(&path, &TerrainImportSettings::default()).unwrap();

    let mut world = World::new();
    let mut meshes = Assets::<Mesh>::default();
    let mut materials = Assets::<StandardMaterial>::default();
    let mut images = Assets::<Image>::default();
    let entity = {
        let mut commands = world.commands();
        spawn_terrain(&mut commands, &mut meshes, &mut materials, &mut images, &terrain)
    };
    world.flush();

    let entity = world.entity(entity);
    assert_eq!(entity.get::<Name>().map(|name| name.as_str()), Some("hills"));

    let textures = entity
        .get::<TerrainLayerTextures>()
        .expect("terrain entity carries its layer textures");
    assert_eq!(textures.layers.len(), 1);
    assert_eq!(textures.layers[0].slot, 1);
    assert_eq!(textures.layers[0].weight_attribute.name, layer_weight_attribute(1).name);
    assert_eq!(textures.splats.len(), 1);
    assert_eq!(textures.splats[0].channels, [Some(1), Some(5), None, None]);

    let mesh_handle = &entity.get::<Mesh3d>().expect("mesh component").0;
    let mesh = meshes.get(mesh_handle).expect("mesh asset was added");
    assert!(mesh.attribute(layer_weight_attribute(1)).is_some());
    assert!(mesh.attribute(layer_weight_attribute(5)).is_some());
}
