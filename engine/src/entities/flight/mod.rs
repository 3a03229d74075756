pub mod actions;
pub mod effects;
pub mod events;

use std::{fmt, time::Duration};

use glam::Vec2;
use internment::Intern;
use serde::{Deserialize, Serialize};

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FlightPhase {
  #[default]
  Takeoff,
  Cruising,
  Landing,
  Emergency,
  Landed,
  /// Only entered when runway capacity is enforced and the arrival airport
  /// has no free runway.
  Holding,
}

impl FlightPhase {
  /// Whether the engine may move a flight from `self` into `next`.
  pub fn can_transition_to(&self, next: FlightPhase) -> bool {
    use FlightPhase::*;

    match self {
      Takeoff => matches!(next, Cruising | Landing | Emergency | Holding),
      Cruising => matches!(next, Landing | Emergency | Holding),
      Holding => matches!(next, Landing | Emergency),
      Landing => matches!(next, Emergency | Landed),
      Emergency | Landed => false,
    }
  }

  /// Flights in these phases count against their arrival airport's runways.
  pub fn claims_runway(&self) -> bool {
    matches!(self, FlightPhase::Landing | FlightPhase::Emergency)
  }

  /// Whether a flight in this phase may begin landing.
  pub fn may_land(&self) -> bool {
    !matches!(self, FlightPhase::Emergency | FlightPhase::Landed)
  }
}

impl fmt::Display for FlightPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Takeoff => write!(f, "takeoff"),
      Self::Cruising => write!(f, "cruising"),
      Self::Landing => write!(f, "landing"),
      Self::Emergency => write!(f, "emergency"),
      Self::Landed => write!(f, "landed"),
      Self::Holding => write!(f, "holding"),
    }
  }
}

/// The phases a flight can be generated in.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InitialPhase {
  Landed,
  #[default]
  Takeoff,
  Cruising,
}

impl From<InitialPhase> for FlightPhase {
  fn from(value: InitialPhase) -> Self {
    match value {
      InitialPhase::Landed => FlightPhase::Landed,
      InitialPhase::Takeoff => FlightPhase::Takeoff,
      InitialPhase::Cruising => FlightPhase::Cruising,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
  pub id: Intern<String>,

  /// Longitude and latitude, in degrees.
  pub pos: Vec2,
  pub altitude: f32,
  pub speed: f32,

  pub phase: FlightPhase,
  pub departure_airport: Intern<String>,
  pub arrival_airport: Intern<String>,

  /// Percent, within `0..=100`.
  pub fuel_level: f32,
  pub priority: u32,

  pub estimated_arrival_time: Duration,
  pub takeoff_timestamp: Option<Duration>,
}

impl Flight {
  pub fn latitude(&self) -> f32 {
    self.pos.y
  }

  pub fn longitude(&self) -> f32 {
    self.pos.x
  }

  pub fn is_landed(&self) -> bool {
    matches!(self.phase, FlightPhase::Landed)
  }

  pub fn is_low_on_fuel(&self, threshold: f32) -> bool {
    self.fuel_level < threshold
  }

  /// Time spent in the air since takeoff, if the flight took off.
  pub fn time_since_takeoff(&self, now: Duration) -> Option<Duration> {
    self.takeoff_timestamp.map(|t| now.saturating_sub(t))
  }
}
