use std::time::Duration;

use internment::Intern;
use turborand::{TurboRand, rng::Rng};

use crate::{
  EMERGENCY_PRIORITY,
  entities::{
    emergency::{Emergency, EmergencyKind, Severity},
    flight::{Flight, FlightPhase},
    world::Simulation,
  },
  error::EngineError,
  generator::unique_id,
};

fn unique_emergency_id(
  emergencies: &[Emergency],
  rng: &mut Rng,
) -> Result<Intern<String>, EngineError> {
  unique_id("EM", emergencies.iter().map(|e| e.id.as_str()), rng)
}

/// Declares an emergency on `target`, or on a random cruising flight when no
/// target is given. The flight's priority is set to `EMERGENCY_PRIORITY`.
///
/// An unknown or landed target is ignored and yields `Ok(None)`. Without a
/// target, having no cruising flight is `EngineError::NoEligibleFlight`.
/// Emergencies are never cleared, and declaring one on a flight that already
/// has one adds another record. Nothing changes when no emergency id is
/// left.
pub fn trigger_emergency(
  sim: &mut Simulation,
  target: Option<&str>,
  rng: &mut Rng,
  now: Duration,
) -> Result<Option<Emergency>, EngineError> {
  let flight: &mut Flight = match target {
    Some(id) => {
      match sim.flights.iter_mut().find(|f| f.id.as_str() == id) {
        Some(flight) if flight.is_landed() => {
          tracing::debug!("ignoring emergency for landed flight {id}");
          return Ok(None);
        }
        Some(flight) => flight,
        None => {
          tracing::debug!("ignoring emergency for unknown flight {id}");
          return Ok(None);
        }
      }
    }
    None => rng
      .sample_iter(
        sim
          .flights
          .iter_mut()
          .filter(|f| f.phase == FlightPhase::Cruising),
      )
      .ok_or(EngineError::NoEligibleFlight)?,
  };

  let id = unique_emergency_id(&sim.emergencies, rng)?;
  let kind = rng
    .sample(&EmergencyKind::ALL)
    .copied()
    .unwrap_or(EmergencyKind::Technical);

  flight.phase = FlightPhase::Emergency;
  flight.priority = EMERGENCY_PRIORITY;

  let emergency = Emergency {
    id,
    flight_id: flight.id,
    kind,
    severity: Severity::High,
    timestamp: now,
  };

  tracing::info!(
    "emergency {} ({}) declared on {}",
    emergency.id,
    emergency.kind,
    emergency.flight_id
  );
  sim.emergencies.push(emergency.clone());

  Ok(Some(emergency))
}

#[cfg(test)]
mod tests {
  use itertools::Itertools;
  use turborand::SeededCore;

  use super::*;
  use crate::entities::airport::default_airports;

  const NOW: Duration = Duration::from_secs(1_700_000_000);

  fn sim_with(phases: &[(&str, FlightPhase)]) -> Simulation {
    let mut sim = Simulation::new(default_airports()).unwrap();
    sim.flights = phases
      .iter()
      .map(|(id, phase)| Flight {
        id: Intern::from_ref(*id),
        phase: *phase,
        priority: 1,
        fuel_level: 70.0,
        ..Default::default()
      })
      .collect();

    sim
  }

  #[test]
  fn test_no_cruising_flight() {
    let mut sim = sim_with(&[
      ("FL1", FlightPhase::Takeoff),
      ("FL2", FlightPhase::Landed),
      ("FL3", FlightPhase::Landing),
    ]);
    let mut rng = Rng::with_seed(1);

    assert_eq!(
      trigger_emergency(&mut sim, None, &mut rng, NOW),
      Err(EngineError::NoEligibleFlight)
    );
    assert!(sim.emergencies.is_empty());
    assert!(sim.flights.iter().all(|f| f.phase != FlightPhase::Emergency));
  }

  #[test]
  fn test_random_target_is_cruising() {
    let mut sim = sim_with(&[
      ("FL1", FlightPhase::Takeoff),
      ("FL2", FlightPhase::Cruising),
      ("FL3", FlightPhase::Landed),
    ]);
    let mut rng = Rng::with_seed(9);

    let emergency = trigger_emergency(&mut sim, None, &mut rng, NOW)
      .unwrap()
      .unwrap();

    assert_eq!(emergency.flight_id.as_str(), "FL2");
    assert_eq!(emergency.severity, Severity::High);
    assert_eq!(emergency.timestamp, NOW);
    assert!(emergency.id.starts_with("EM"));

    let flight = sim.flight("FL2").unwrap();
    assert_eq!(flight.phase, FlightPhase::Emergency);
    assert_eq!(flight.priority, 10);
    assert_eq!(sim.emergencies, vec![emergency]);
  }

  #[test]
  fn test_explicit_target() {
    let mut sim = sim_with(&[
      ("FL1", FlightPhase::Takeoff),
      ("FL2", FlightPhase::Cruising),
    ]);
    let mut rng = Rng::with_seed(2);

    let emergency = trigger_emergency(&mut sim, Some("FL1"), &mut rng, NOW)
      .unwrap()
      .unwrap();
    assert_eq!(emergency.flight_id.as_str(), "FL1");
    assert_eq!(sim.flight("FL1").unwrap().phase, FlightPhase::Emergency);
    assert_eq!(sim.flight("FL2").unwrap().phase, FlightPhase::Cruising);
  }

  #[test]
  fn test_unknown_target_is_a_no_op() {
    let mut sim = sim_with(&[("FL1", FlightPhase::Cruising)]);
    let mut rng = Rng::with_seed(2);

    assert_eq!(
      trigger_emergency(&mut sim, Some("FL9"), &mut rng, NOW),
      Ok(None)
    );
    assert!(sim.emergencies.is_empty());
    assert_eq!(sim.flight("FL1").unwrap().phase, FlightPhase::Cruising);
  }

  #[test]
  fn test_landed_target_is_a_no_op() {
    let mut sim = sim_with(&[("FL1", FlightPhase::Landed)]);
    let mut rng = Rng::with_seed(2);

    assert_eq!(
      trigger_emergency(&mut sim, Some("FL1"), &mut rng, NOW),
      Ok(None)
    );
    assert_eq!(sim.flight("FL1").unwrap().phase, FlightPhase::Landed);
  }

  #[test]
  fn test_repeated_triggers_accumulate() {
    let mut sim = sim_with(&[("FL1", FlightPhase::Cruising)]);
    let mut rng = Rng::with_seed(4);

    for _ in 0..3 {
      trigger_emergency(&mut sim, Some("FL1"), &mut rng, NOW)
        .unwrap()
        .unwrap();
    }

    assert_eq!(sim.emergencies.len(), 3);
    assert!(sim.emergencies.iter().all(|e| e.flight_id.as_str() == "FL1"));
    assert_eq!(sim.flight("FL1").unwrap().priority, 10);

    assert_eq!(sim.emergencies.iter().map(|e| e.id).unique().count(), 3);
  }

  #[test]
  fn test_priority_is_set_not_raised() {
    let mut sim = sim_with(&[("FL1", FlightPhase::Cruising)]);
    sim.flights[0].priority = 25;
    let mut rng = Rng::with_seed(5);

    trigger_emergency(&mut sim, Some("FL1"), &mut rng, NOW)
      .unwrap()
      .unwrap();
    assert_eq!(sim.flight("FL1").unwrap().priority, EMERGENCY_PRIORITY);
  }

  #[test]
  fn test_exhausted_ids_leave_flight_untouched() {
    let mut sim = sim_with(&[
      ("FL1", FlightPhase::Cruising),
      ("FL2", FlightPhase::Cruising),
    ]);
    sim.emergencies = (0..crate::generator::ID_SPACE)
      .map(|n| Emergency {
        id: Intern::from(format!("EM{n:04}")),
        flight_id: Intern::from_ref("FL1"),
        kind: EmergencyKind::Medical,
        severity: Severity::High,
        timestamp: NOW,
      })
      .collect();
    let mut rng = Rng::with_seed(6);

    assert_eq!(
      trigger_emergency(&mut sim, Some("FL2"), &mut rng, NOW),
      Err(EngineError::IdsExhausted("EM".to_string()))
    );
    assert_eq!(sim.emergencies.len(), 10_000);
    assert_eq!(sim.flight("FL2").unwrap().phase, FlightPhase::Cruising);
  }
}
