use glam::Vec2;

use crate::NAUTICALMILES_PER_DEGREE;

// Positions are planar: `x` is longitude and `y` is latitude, both in degrees.

pub fn normalize_angle(angle: f32) -> f32 {
  angle.rem_euclid(360.0)
}

/// Straight-line distance between two points, in degrees.
pub fn distance(a: Vec2, b: Vec2) -> f32 {
  a.distance(b)
}

/// Heading from `a` to `b`, where 0 is north and 90 is east.
pub fn bearing(a: Vec2, b: Vec2) -> f32 {
  let dx = b.x - a.x;
  let dy = b.y - a.y;
  let angle = dx.atan2(dy).to_degrees();
  if angle < 0.0 { angle + 360.0 } else { angle }
}

/// Moves `from` a `fraction` of the way to `to`.
pub fn approach(from: Vec2, to: Vec2, fraction: f32) -> Vec2 {
  from + (to - from) * fraction
}

pub fn degrees_to_nautical_miles(degrees: f32) -> f32 {
  degrees * NAUTICALMILES_PER_DEGREE
}
