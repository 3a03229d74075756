use std::fmt;

use internment::Intern;
use serde::{Deserialize, Serialize};

use crate::entities::emergency::EmergencyKind;

use super::FlightPhase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[serde(tag = "type", content = "value")]
pub enum EventKind {
  // Lifecycle
  Added { departure: Intern<String>, arrival: Intern<String> },
  TakeoffComplete,

  // Arrival
  BeganLanding { arrival: Intern<String> },
  Holding { arrival: Intern<String> },
  Touchdown { arrival: Intern<String> },

  // Alerts
  LowFuel(f32),
  Emergency(EmergencyKind),
  NoEligibleFlight,

  /// The flight could not be advanced this tick.
  Skipped { reason: String },
}

/// A notification about a single flight, raised by the engine for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  /// The flight the event concerns, or empty for system notices.
  pub id: Intern<String>,
  pub kind: EventKind,
}

impl Event {
  pub fn new(id: Intern<String>, kind: EventKind) -> Self {
    Self { id, kind }
  }

  pub fn is_alert(&self) -> bool {
    matches!(
      self.kind,
      EventKind::LowFuel(..)
        | EventKind::Emergency(..)
        | EventKind::NoEligibleFlight
        | EventKind::Skipped { .. }
    )
  }

  /// The phase the event moved its flight into, if any.
  pub fn phase(&self) -> Option<FlightPhase> {
    match self.kind {
      EventKind::Added { .. } => Some(FlightPhase::Takeoff),
      EventKind::TakeoffComplete => Some(FlightPhase::Cruising),
      EventKind::BeganLanding { .. } => Some(FlightPhase::Landing),
      EventKind::Holding { .. } => Some(FlightPhase::Holding),
      EventKind::Touchdown { .. } => Some(FlightPhase::Landed),
      EventKind::Emergency(..) => Some(FlightPhase::Emergency),
      _ => None,
    }
  }
}

impl fmt::Display for Event {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let id = &self.id;
    match &self.kind {
      EventKind::Added { departure, arrival } => write!(
        f,
        "New flight {id} has been scheduled from {departure} to {arrival}."
      ),
      EventKind::TakeoffComplete => {
        write!(f, "Flight {id} has completed takeoff and is now cruising.")
      }
      EventKind::BeganLanding { arrival } => {
        write!(f, "Flight {id} is beginning its approach into {arrival}.")
      }
      EventKind::Holding { arrival } => {
        write!(f, "Flight {id} is holding: no runway free at {arrival}.")
      }
      EventKind::Touchdown { arrival } => {
        write!(f, "Flight {id} has landed at {arrival}.")
      }
      EventKind::LowFuel(fuel) => {
        write!(f, "Flight {id} is low on fuel ({fuel:.1}%).")
      }
      EventKind::Emergency(kind) => {
        write!(f, "Emergency declared on flight {id}: {kind}.")
      }
      EventKind::NoEligibleFlight => {
        write!(f, "No cruising flight is available for an emergency.")
      }
      EventKind::Skipped { reason } => {
        write!(f, "Flight {id} was not advanced: {reason}.")
      }
    }
  }
}
