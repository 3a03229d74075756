use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::{
  airport::Airport,
  emergency::Emergency,
  flight::{Flight, FlightPhase},
};

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Stats {
  pub total: usize,
  pub active: usize,
  pub landed: usize,
  pub takeoff: usize,
  pub cruising: usize,
  pub emergencies: usize,
}

/// The whole simulated world. Flights are kept in dispatch order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Simulation {
  pub flights: Vec<Flight>,
  pub airports: Vec<Airport>,
  pub emergencies: Vec<Emergency>,
}

impl Simulation {
  /// Creates an empty simulation over an airport registry. The registry must
  /// have at least two airports with distinct codes.
  pub fn new(airports: Vec<Airport>) -> Result<Self, EngineError> {
    validate_registry(&airports)?;

    Ok(Self {
      flights: Vec::new(),
      airports,
      emergencies: Vec::new(),
    })
  }

  pub fn airport(&self, code: &str) -> Option<&Airport> {
    self.airports.iter().find(|a| a.code.as_str() == code)
  }

  pub fn flight(&self, id: &str) -> Option<&Flight> {
    self.flights.iter().find(|f| f.id.as_str() == id)
  }

  pub fn stats(&self) -> Stats {
    let mut stats = Stats {
      total: self.flights.len(),
      emergencies: self.emergencies.len(),
      ..Stats::default()
    };

    for flight in self.flights.iter() {
      match flight.phase {
        FlightPhase::Landed => stats.landed += 1,
        FlightPhase::Takeoff => stats.takeoff += 1,
        FlightPhase::Cruising => stats.cruising += 1,
        _ => {}
      }
    }
    stats.active = stats.total - stats.landed;

    stats
  }
}

pub fn validate_registry(airports: &[Airport]) -> Result<(), EngineError> {
  if airports.len() < 2 {
    return Err(EngineError::NotEnoughAirports(airports.len()));
  }

  let mut seen = HashSet::new();
  for airport in airports.iter() {
    if !seen.insert(airport.code) {
      return Err(EngineError::DuplicateAirport(airport.code));
    }
  }

  Ok(())
}
