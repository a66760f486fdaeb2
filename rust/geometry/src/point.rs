// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integer millimeter points used as welding keys.

use std::fmt;

/// A point in scene space, in whole millimeters.
///
/// Ordering is lexicographic over `(x, y, z)`; hashing is structural so equal
/// points always weld to the same vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point3D {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Point3D {
    #[inline]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Coordinates as floats for the vertex buffer.
    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }
}

impl From<Point3D> for [f64; 3] {
    #[inline]
    fn from(point: Point3D) -> Self {
        point.to_array()
    }
}

impl fmt::Display for Point3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_lexicographically() {
        let mut points = vec![
            Point3D::new(1, 0, 0),
            Point3D::new(0, 5, 0),
            Point3D::new(0, 0, 9),
            Point3D::new(0, 5, -1),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![
                Point3D::new(0, 0, 9),
                Point3D::new(0, 5, -1),
                Point3D::new(0, 5, 0),
                Point3D::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn displays_compactly() {
        assert_eq!(Point3D::new(-305, 914, 610).to_string(), "(-305,914,610)");
    }
}
