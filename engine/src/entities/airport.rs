use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
  pub code: Intern<String>,
  pub name: String,
  /// Longitude and latitude, in degrees.
  pub pos: Vec2,
  pub total_runways: usize,
  /// Recomputed by the runway allocator every tick.
  pub available_runways: usize,
}

impl Airport {
  pub fn new(
    code: &str,
    name: impl Into<String>,
    latitude: f32,
    longitude: f32,
    runways: usize,
  ) -> Self {
    Self {
      code: Intern::from_ref(code),
      name: name.into(),
      pos: Vec2::new(longitude, latitude),
      total_runways: runways,
      available_runways: runways,
    }
  }

  pub fn latitude(&self) -> f32 {
    self.pos.y
  }

  pub fn longitude(&self) -> f32 {
    self.pos.x
  }
}

pub fn default_airports() -> Vec<Airport> {
  vec![
    Airport::new("LHE", "Allama Iqbal International", 31.5216, 74.4036, 2),
    Airport::new("KHI", "Jinnah International", 24.9065, 67.1608, 2),
    Airport::new("ISB", "Islamabad International", 33.549, 72.8258, 2),
    Airport::new("DXB", "Dubai International", 25.2532, 55.3657, 2),
    Airport::new("DEL", "Indira Gandhi International", 28.5562, 77.1, 3),
    Airport::new("DOH", "Hamad International", 25.2731, 51.6081, 2),
    Airport::new("IST", "Istanbul Airport", 41.2753, 28.7519, 5),
    Airport::new("BKK", "Suvarnabhumi Airport", 13.69, 100.7501, 2),
  ]
}
