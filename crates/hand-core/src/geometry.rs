//! Small planar helpers over landmarks.

use crate::landmarks::Landmark;

/// Euclidean distance in the xy plane.
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Angle at `b` formed by `a-b-c`, in degrees within `[0, 180]`.
pub fn angle_deg(a: Landmark, b: Landmark, c: Landmark) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}
