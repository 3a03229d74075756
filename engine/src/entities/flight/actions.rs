use std::time::Duration;

use glam::Vec2;
use internment::Intern;

use super::{Flight, FlightPhase};

#[derive(Debug, Clone, PartialEq)]
pub enum ActionKind {
  Pos(Vec2),
  Altitude(f32),
  FuelLevel(f32),
  Priority(u32),
  TakeoffTimestamp(Option<Duration>),

  // Substate
  Phase(FlightPhase),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
  pub id: Intern<String>,
  pub kind: ActionKind,
}

impl Action {
  pub fn new(id: Intern<String>, kind: ActionKind) -> Self {
    Self { id, kind }
  }
}

pub trait FlightActionHandler {
  fn run(flight: &mut Flight, action: &ActionKind);
}

pub struct FlightAllActionHandler;
impl FlightActionHandler for FlightAllActionHandler {
  fn run(flight: &mut Flight, action: &ActionKind) {
    match action {
      ActionKind::Pos(pos) => flight.pos = *pos,
      ActionKind::Altitude(altitude) => flight.altitude = altitude.max(0.0),
      ActionKind::FuelLevel(fuel) => {
        flight.fuel_level = fuel.clamp(0.0, 100.0)
      }
      ActionKind::Priority(priority) => {
        flight.priority = flight.priority.max(*priority)
      }
      ActionKind::TakeoffTimestamp(timestamp) => {
        flight.takeoff_timestamp = *timestamp
      }

      ActionKind::Phase(phase) => {
        if flight.phase.can_transition_to(*phase) {
          flight.phase = *phase;
        } else {
          tracing::warn!(
            "refused transition of {} from {} to {}",
            flight.id,
            flight.phase,
            phase
          );
        }
      }
    }
  }
}
