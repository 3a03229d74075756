use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub mod allocator;
pub mod dispatch;
pub mod engine;
pub mod entities;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod scheduler;
pub mod search;

pub use error::EngineError;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

pub const NAUTICALMILES_PER_DEGREE: f32 = 60.0;

pub const TAKEOFF_TIMEOUT: Duration = Duration::from_secs(30);
/// Fraction of the remaining distance to the arrival airport covered per tick.
pub const APPROACH_FRACTION: f32 = 0.01;
/// Distance (in degrees) from the arrival airport at which a flight begins
/// landing.
pub const LANDING_RADIUS: f32 = 0.5;
pub const DESCENT_PER_TICK: f32 = 1000.0;
pub const FUEL_BURN_PER_TICK: f32 = 0.1;
pub const LOW_FUEL_THRESHOLD: f32 = 20.0;

pub const MIN_SPEED: f32 = 300.0;
pub const MAX_SPEED: f32 = 800.0;

pub const MIN_TAKEOFF_ALTITUDE: f32 = 1000.0;
pub const MAX_TAKEOFF_ALTITUDE: f32 = 6000.0;
pub const MIN_CRUISE_ALTITUDE: f32 = 25000.0;
pub const MAX_CRUISE_ALTITUDE: f32 = 40000.0;

pub const TAKEOFF_FUEL: f32 = 95.0;
pub const LANDED_FUEL: f32 = 10.0;
pub const MIN_CRUISE_FUEL: f32 = 60.0;
pub const MAX_CRUISE_FUEL: f32 = 90.0;

pub const BASE_PRIORITY: u32 = 1;
pub const LANDED_PRIORITY: u32 = 0;
pub const EMERGENCY_PRIORITY: u32 = 10;

pub fn duration_now() -> Duration {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
}

/// Linearly maps `t` in `[0, 1)` onto `min..max`.
pub fn lerp_range(min: f32, max: f32, t: f32) -> f32 {
  min + (max - min) * t
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_lerp_range_bounds() {
    assert_eq!(lerp_range(1000.0, 6000.0, 0.0), 1000.0);
    assert_eq!(lerp_range(1000.0, 6000.0, 0.5), 3500.0);
    assert!(lerp_range(25000.0, 40000.0, 0.9999) < 40000.0);
  }
}
