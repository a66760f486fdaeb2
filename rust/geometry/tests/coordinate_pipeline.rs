// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host points through nested placements, unit conversion and welding.

use nalgebra::{Matrix4, Point3, Vector3};
use objscene_core::Geometry;
use objscene_geometry::{
    matrix_from_basis, Point3D, TransformStack, VertexIndexCache, MILLIMETERS_PER_FOOT,
};

fn quarter_turn_z() -> Matrix4<f64> {
    matrix_from_basis(
        &Point3::origin(),
        &Vector3::new(0.0, 1.0, 0.0),
        &Vector3::new(-1.0, 0.0, 0.0),
        &Vector3::z(),
    )
}

#[test]
fn nested_placements_stay_within_a_millimeter() {
    let mut stack = TransformStack::new();
    // link offset 10 ft along X, then an instance rotated a quarter turn
    stack.push(&Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0)));
    stack.push(&quarter_turn_z());
    stack.push(&Matrix4::new_translation(&Vector3::new(0.0, 0.0, 1.5)));

    let p = stack.to_millimeters(&Point3::new(2.0, 0.0, 0.0));
    // host result is (10, 2, 1.5) ft
    let expected = [
        -10.0 * MILLIMETERS_PER_FOOT,
        1.5 * MILLIMETERS_PER_FOOT,
        2.0 * MILLIMETERS_PER_FOOT,
    ];
    let actual = p.to_array();
    for axis in 0..3 {
        assert!((actual[axis] - expected[axis]).abs() <= 1.0, "axis {axis}: {actual:?}");
    }

    assert_eq!(stack.depth(), 4);
    for _ in 0..3 {
        stack.pop().unwrap();
    }
    assert!(stack.pop().is_err());
    assert_eq!(
        stack.to_millimeters(&Point3::new(1.0, 2.0, 3.0)),
        Point3D::new(-305, 914, 610)
    );
}

#[test]
fn shared_corner_welds_across_facets() {
    let stack = TransformStack::new();
    let square = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    let facets = [[0usize, 1, 2], [0, 2, 3]];

    let mut cache = VertexIndexCache::new();
    let mut geometry = Geometry::new("e-m");
    for facet in facets {
        let [a, b, c] = facet.map(|i| cache.add_vertex(stack.to_millimeters(&square[i])));
        geometry.add_face([a, b, c]);
    }
    cache.write_into(&mut geometry);

    assert_eq!(geometry.data.faces, vec![0, 0, 1, 2, 0, 0, 2, 3]);
    assert_eq!(geometry.vertex_count(), 4);
    geometry.validate().unwrap();
}
