// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length conversion from host units (decimal feet) to scene millimeters.

use nalgebra::Point3;

use crate::point::Point3D;

/// Millimeters in one international foot.
pub const MILLIMETERS_PER_FOOT: f64 = 304.8;

/// Lengths below this magnitude (in feet) collapse to zero.
pub const LENGTH_EPSILON: f64 = 1.0e-9;

/// Convert a length in feet to whole millimeters, rounding half away from zero.
///
/// Out-of-range lengths saturate at the `i64` bounds and NaN maps to zero, so
/// callers should reject non-finite input first.
///
/// ```
/// use objscene_geometry::feet_to_millimeters;
///
/// assert_eq!(feet_to_millimeters(1.0), 305);
/// assert_eq!(feet_to_millimeters(-1.0), -305);
/// assert_eq!(feet_to_millimeters(1.0e-12), 0);
/// ```
#[inline]
pub fn feet_to_millimeters(length: f64) -> i64 {
    if length.abs() < LENGTH_EPSILON {
        return 0;
    }
    (MILLIMETERS_PER_FOOT * length + 0.5 * length.signum()).trunc() as i64
}

/// Convert a host point (feet, Z up) into scene axes (millimeters, Y up).
///
/// Scene X is the negated host X, scene Y is host Z and scene Z is host Y.
#[inline]
pub fn to_scene_point(point: &Point3<f64>) -> Point3D {
    Point3D::new(
        feet_to_millimeters(point.x).saturating_neg(),
        feet_to_millimeters(point.z),
        feet_to_millimeters(point.y),
    )
}
