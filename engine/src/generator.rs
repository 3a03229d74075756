use std::{collections::HashSet, time::Duration};

use internment::Intern;
use turborand::{TurboRand, rng::Rng};

use crate::{
  BASE_PRIORITY, LANDED_FUEL, LANDED_PRIORITY, MAX_CRUISE_ALTITUDE,
  MAX_CRUISE_FUEL, MAX_SPEED, MAX_TAKEOFF_ALTITUDE, MIN_CRUISE_ALTITUDE,
  MIN_CRUISE_FUEL, MIN_SPEED, MIN_TAKEOFF_ALTITUDE, TAKEOFF_FUEL,
  entities::{
    airport::Airport,
    flight::{Flight, FlightPhase, InitialPhase},
  },
  error::EngineError,
  geometry::{degrees_to_nautical_miles, distance},
  lerp_range,
};

/// Number of distinct ids per prefix.
pub const ID_SPACE: u32 = 10_000;
const RANDOM_ID_ATTEMPTS: usize = 32;

pub fn random_id(prefix: &str, rng: &mut Rng) -> String {
  format!("{prefix}{:04}", rng.u32(0..ID_SPACE))
}

/// Picks a `prefix` id outside `taken`. After a run of collisions the lowest
/// free id is used instead, and a full id space is an error.
pub fn unique_id<'a, I>(
  prefix: &str,
  taken: I,
  rng: &mut Rng,
) -> Result<Intern<String>, EngineError>
where
  I: IntoIterator<Item = &'a str>,
{
  let taken: HashSet<&str> = taken.into_iter().collect();

  for _ in 0..RANDOM_ID_ATTEMPTS {
    let id = random_id(prefix, rng);
    if !taken.contains(id.as_str()) {
      return Ok(Intern::from(id));
    }
  }

  (0..ID_SPACE)
    .map(|n| format!("{prefix}{n:04}"))
    .find(|id| !taken.contains(id.as_str()))
    .map(Intern::from)
    .ok_or_else(|| EngineError::IdsExhausted(prefix.to_owned()))
}

/// Picks a flight id not already used by `existing`.
pub fn unique_flight_id(
  existing: &[Flight],
  rng: &mut Rng,
) -> Result<Intern<String>, EngineError> {
  unique_id("FL", existing.iter().map(|f| f.id.as_str()), rng)
}

/// Estimated time of arrival for a straight flight at constant speed.
pub fn estimate_arrival(
  departure: &Airport,
  arrival: &Airport,
  speed: f32,
  now: Duration,
) -> Duration {
  let nautical_miles =
    degrees_to_nautical_miles(distance(departure.pos, arrival.pos));
  let hours = nautical_miles / speed.max(1.0);

  now + Duration::from_secs_f32(hours * 3600.0)
}

/// Generates a new flight in `phase`, placed at a random departure airport
/// and bound for a different random airport.
pub fn generate_flight(
  airports: &[Airport],
  existing: &[Flight],
  phase: InitialPhase,
  rng: &mut Rng,
  now: Duration,
) -> Result<Flight, EngineError> {
  if airports.len() < 2 {
    return Err(EngineError::NotEnoughAirports(airports.len()));
  }

  let departure_index = rng.usize(0..airports.len());
  let arrival_index = loop {
    let index = rng.usize(0..airports.len());
    if index != departure_index {
      break index;
    }
  };

  let departure = &airports[departure_index];
  let arrival = &airports[arrival_index];

  let (altitude, fuel_level, priority) = match phase {
    InitialPhase::Landed => (0.0, LANDED_FUEL, LANDED_PRIORITY),
    InitialPhase::Takeoff => (
      lerp_range(MIN_TAKEOFF_ALTITUDE, MAX_TAKEOFF_ALTITUDE, rng.f32()),
      TAKEOFF_FUEL,
      BASE_PRIORITY,
    ),
    InitialPhase::Cruising => (
      lerp_range(MIN_CRUISE_ALTITUDE, MAX_CRUISE_ALTITUDE, rng.f32()),
      lerp_range(MIN_CRUISE_FUEL, MAX_CRUISE_FUEL, rng.f32()),
      BASE_PRIORITY,
    ),
  };
  let speed = lerp_range(MIN_SPEED, MAX_SPEED, rng.f32());

  Ok(Flight {
    id: unique_flight_id(existing, rng)?,

    pos: departure.pos,
    altitude,
    speed,

    phase: FlightPhase::from(phase),
    departure_airport: departure.code,
    arrival_airport: arrival.code,

    fuel_level,
    priority,

    estimated_arrival_time: estimate_arrival(departure, arrival, speed, now),
    takeoff_timestamp: (phase == InitialPhase::Takeoff).then_some(now),
  })
}

#[cfg(test)]
mod tests {
  use turborand::SeededCore;

  use super::*;
  use crate::entities::airport::default_airports;

  const NOW: Duration = Duration::from_secs(1_700_000_000);

  #[test]
  fn test_airport_pair_differs() {
    let airports = default_airports();
    let mut rng = Rng::with_seed(7);

    for _ in 0..200 {
      let flight =
        generate_flight(&airports, &[], InitialPhase::Takeoff, &mut rng, NOW)
          .unwrap();
      assert_ne!(flight.departure_airport, flight.arrival_airport);

      let departure = airports
        .iter()
        .find(|a| a.code == flight.departure_airport)
        .unwrap();
      assert_eq!(flight.pos, departure.pos);
      assert!(airports.iter().any(|a| a.code == flight.arrival_airport));
    }
  }

  #[test]
  fn test_two_airport_registry_terminates() {
    let airports: Vec<Airport> = default_airports().into_iter().take(2).collect();
    let mut rng = Rng::with_seed(1);

    for _ in 0..50 {
      let flight =
        generate_flight(&airports, &[], InitialPhase::Cruising, &mut rng, NOW)
          .unwrap();
      assert_ne!(flight.departure_airport, flight.arrival_airport);
    }
  }

  #[test]
  fn test_single_airport_is_an_error() {
    let airports: Vec<Airport> = default_airports().into_iter().take(1).collect();
    let mut rng = Rng::with_seed(1);

    assert_eq!(
      generate_flight(&airports, &[], InitialPhase::Takeoff, &mut rng, NOW),
      Err(EngineError::NotEnoughAirports(1))
    );
  }

  #[test]
  fn test_landed_defaults() {
    let mut rng = Rng::with_seed(3);
    let flight = generate_flight(
      &default_airports(),
      &[],
      InitialPhase::Landed,
      &mut rng,
      NOW,
    )
    .unwrap();

    assert_eq!(flight.phase, FlightPhase::Landed);
    assert_eq!(flight.altitude, 0.0);
    assert_eq!(flight.fuel_level, 10.0);
    assert_eq!(flight.priority, 0);
    assert_eq!(flight.takeoff_timestamp, None);
  }

  #[test]
  fn test_takeoff_defaults() {
    let mut rng = Rng::with_seed(4);
    for _ in 0..100 {
      let flight = generate_flight(
        &default_airports(),
        &[],
        InitialPhase::Takeoff,
        &mut rng,
        NOW,
      )
      .unwrap();

      assert_eq!(flight.phase, FlightPhase::Takeoff);
      assert!((1000.0..=6000.0).contains(&flight.altitude));
      assert!((300.0..=800.0).contains(&flight.speed));
      assert_eq!(flight.fuel_level, 95.0);
      assert_eq!(flight.priority, 1);
      assert_eq!(flight.takeoff_timestamp, Some(NOW));
      assert!(flight.estimated_arrival_time > NOW);
    }
  }

  #[test]
  fn test_cruising_defaults() {
    let mut rng = Rng::with_seed(5);
    for _ in 0..100 {
      let flight = generate_flight(
        &default_airports(),
        &[],
        InitialPhase::Cruising,
        &mut rng,
        NOW,
      )
      .unwrap();

      assert_eq!(flight.phase, FlightPhase::Cruising);
      assert!((25000.0..=40000.0).contains(&flight.altitude));
      assert!((60.0..=90.0).contains(&flight.fuel_level));
      assert_eq!(flight.priority, 1);
      assert_eq!(flight.takeoff_timestamp, None);
    }
  }

  #[test]
  fn test_ids_are_unique() {
    let airports = default_airports();
    let mut rng = Rng::with_seed(11);
    let mut flights: Vec<Flight> = Vec::new();

    for _ in 0..300 {
      let flight = generate_flight(
        &airports,
        &flights,
        InitialPhase::Takeoff,
        &mut rng,
        NOW,
      )
      .unwrap();
      assert!(flights.iter().all(|f| f.id != flight.id));
      assert!(flight.id.starts_with("FL"));
      flights.push(flight);
    }
  }

  #[test]
  fn test_last_free_id_is_found() {
    let mut rng = Rng::with_seed(12);
    let flights: Vec<Flight> = (0..ID_SPACE - 1)
      .map(|n| Flight {
        id: Intern::from(format!("FL{n:04}")),
        ..Default::default()
      })
      .collect();

    let id = unique_flight_id(&flights, &mut rng).unwrap();
    assert_eq!(id.as_str(), "FL9999");
  }

  #[test]
  fn test_full_id_space_is_an_error() {
    let mut rng = Rng::with_seed(13);
    let flights: Vec<Flight> = (0..ID_SPACE)
      .map(|n| Flight {
        id: Intern::from(format!("FL{n:04}")),
        ..Default::default()
      })
      .collect();

    assert_eq!(
      generate_flight(
        &default_airports(),
        &flights,
        InitialPhase::Takeoff,
        &mut rng,
        NOW,
      ),
      Err(EngineError::IdsExhausted("FL".to_string()))
    );
  }
}
