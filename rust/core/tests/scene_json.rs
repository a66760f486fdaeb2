// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! File-level behaviour of object scenes: JSON layout, reload and disk output.

use objscene_core::{
    Geometry, Metadata, MeshPhongMaterial, Object3D, ObjectScene, ELEMENT_TYPE, GENERATOR,
    MESH_TYPE,
};

fn sample_scene() -> ObjectScene {
    let mut scene = ObjectScene::new(Metadata::default(), "view-1");
    scene.object.name = "Revit Project1".into();

    scene.add_material(MeshPhongMaterial::from_surface("mat-a", 0x808080, 0.0).with_name("Concrete"));

    let mut geometry = Geometry::new("elem-1-mat-a");
    geometry.add_point([-305.0, 914.0, 610.0]);
    geometry.add_point([0.0, 0.0, 0.0]);
    geometry.add_point([100.0, 0.0, 0.0]);
    geometry.add_face([0, 1, 2]);
    scene.add_geometry(geometry);

    let mut mesh = Object3D::new(MESH_TYPE, "elem-1-mat-a").with_name("Basic Wall");
    mesh.geometry = Some("elem-1-mat-a".into());
    mesh.material = Some("mat-a".into());

    let mut element = Object3D::new(ELEMENT_TYPE, "elem-1").with_name("Basic Wall <1 Wall>");
    element.merge_user_data([("Model", "W-1")]);
    element.add_child(mesh);
    scene.object.add_child(element);
    scene
}

#[test]
fn header_carries_generator() {
    let json: serde_json::Value =
        serde_json::from_str(&sample_scene().to_json().unwrap()).unwrap();
    assert_eq!(json["metadata"]["version"], "4.3");
    assert_eq!(json["metadata"]["type"], "Object");
    assert_eq!(json["metadata"]["generator"], GENERATOR);
    assert!(GENERATOR.starts_with("objscene v"));
}

#[test]
fn face_records_are_written_flat() {
    let json: serde_json::Value =
        serde_json::from_str(&sample_scene().to_json().unwrap()).unwrap();
    let data = &json["geometries"][0]["data"];
    assert_eq!(data["faces"], serde_json::json!([0, 0, 1, 2]));
    assert_eq!(data["vertices"].as_array().unwrap().len(), 9);
    assert_eq!(json["geometries"][0]["type"], "Geometry");
}

#[test]
fn reload_preserves_order_and_content() {
    let scene = sample_scene();
    let reloaded = ObjectScene::from_json(&scene.to_json_pretty().unwrap()).unwrap();
    assert_eq!(reloaded, scene);
    reloaded.validate().unwrap();

    let element = reloaded.object.child("elem-1").unwrap();
    assert_eq!(element.user_data["Model"], "W-1");
    assert_eq!(element.child_count(), 1);
}

#[test]
fn reload_drops_duplicate_registry_entries() {
    let json = r#"{
        "metadata": {"version": "4.3", "type": "Object", "generator": "x"},
        "geometries": [],
        "materials": [
            {"type": "MeshPhongMaterial", "uuid": "m", "name": "first", "color": 1, "ambient": 1,
             "emissive": 0, "specular": 1, "shininess": 1, "opacity": 1.0,
             "transparent": false, "wireframe": false},
            {"type": "MeshPhongMaterial", "uuid": "m", "name": "second", "color": 2, "ambient": 2,
             "emissive": 0, "specular": 2, "shininess": 1, "opacity": 1.0,
             "transparent": false, "wireframe": false}
        ],
        "object": {"uuid": "root", "type": "Scene", "visible": true,
                   "castShadow": true, "receiveShadow": false}
    }"#;

    let scene = ObjectScene::from_json(json).unwrap();
    assert_eq!(scene.material_count(), 1);
    assert_eq!(scene.material("m").unwrap().name(), "first");
    assert_eq!(scene.object.child_count(), 0);
}

#[test]
fn writes_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let scene = sample_scene();
    scene.write_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(ObjectScene::from_json(&text).unwrap(), scene);
    assert!(scene.write_to_file(dir.path()).is_err());
}

#[test]
fn display_is_pretty_json() {
    let text = sample_scene().to_string();
    assert!(text.contains('\n'));
    assert!(text.contains("\"RevitElement\""));
}
