use std::cmp::Ordering;

use crate::entities::flight::{Flight, FlightPhase};

/// Composite urgency: explicit priority plus how much fuel has been used.
pub fn urgency(flight: &Flight) -> f32 {
  flight.priority as f32 + (100.0 - flight.fuel_level)
}

/// Dispatch comparator. Emergencies come first, then flights under
/// `low_fuel`, then everyone else by descending urgency. Each rule breaks
/// ties left by the one before it.
pub fn compare(a: &Flight, b: &Flight, low_fuel: f32) -> Ordering {
  let a_emergency = a.phase == FlightPhase::Emergency;
  let b_emergency = b.phase == FlightPhase::Emergency;

  b_emergency
    .cmp(&a_emergency)
    .then_with(|| b.is_low_on_fuel(low_fuel).cmp(&a.is_low_on_fuel(low_fuel)))
    .then_with(|| urgency(b).total_cmp(&urgency(a)))
}

/// Reorders `flights` into dispatch order. The sort is stable, so flights
/// that compare equal keep their previous order.
pub fn dispatch_order(flights: &mut [Flight], low_fuel: f32) {
  flights.sort_by(|a, b| compare(a, b, low_fuel));
}

#[cfg(test)]
mod tests {
  use internment::Intern;

  use super::*;
  use crate::LOW_FUEL_THRESHOLD;

  fn flight(id: &str, phase: FlightPhase, fuel: f32, priority: u32) -> Flight {
    Flight {
      id: Intern::from_ref(id),
      phase,
      fuel_level: fuel,
      priority,
      ..Default::default()
    }
  }

  fn ids(flights: &[Flight]) -> Vec<&str> {
    flights.iter().map(|f| f.id.as_str()).collect()
  }

  #[test]
  fn test_emergency_then_low_fuel_then_urgency() {
    let a = flight("A", FlightPhase::Emergency, 70.0, 10);
    let b = flight("B", FlightPhase::Cruising, 15.0, 1);
    let c = flight("C", FlightPhase::Cruising, 80.0, 5);

    let orders = [
      [a.clone(), b.clone(), c.clone()],
      [a.clone(), c.clone(), b.clone()],
      [b.clone(), a.clone(), c.clone()],
      [b.clone(), c.clone(), a.clone()],
      [c.clone(), a.clone(), b.clone()],
      [c.clone(), b.clone(), a.clone()],
    ];

    for mut order in orders {
      dispatch_order(&mut order, LOW_FUEL_THRESHOLD);
      assert_eq!(ids(&order), vec!["A", "B", "C"]);
    }
  }

  #[test]
  fn test_low_fuel_beats_higher_urgency() {
    // D has the higher score (85.5 vs 81) but is not under the threshold.
    let low = flight("LOW", FlightPhase::Cruising, 19.0, 0);
    let d = flight("D", FlightPhase::Cruising, 19.5, 5);
    let mut flights = vec![d, low];

    dispatch_order(&mut flights, 19.2);
    assert_eq!(ids(&flights), vec!["LOW", "D"]);
  }

  #[test]
  fn test_emergencies_ordered_by_fuel_then_urgency() {
    let mut flights = vec![
      flight("E1", FlightPhase::Emergency, 80.0, 10),
      flight("E2", FlightPhase::Emergency, 10.0, 10),
      flight("E3", FlightPhase::Emergency, 50.0, 10),
    ];

    dispatch_order(&mut flights, LOW_FUEL_THRESHOLD);
    assert_eq!(ids(&flights), vec!["E2", "E3", "E1"]);
  }

  #[test]
  fn test_equal_flights_keep_their_order() {
    let mut flights = vec![
      flight("X", FlightPhase::Cruising, 50.0, 1),
      flight("Y", FlightPhase::Takeoff, 50.0, 1),
      flight("Z", FlightPhase::Landed, 50.0, 1),
    ];

    dispatch_order(&mut flights, LOW_FUEL_THRESHOLD);
    assert_eq!(ids(&flights), vec!["X", "Y", "Z"]);
  }

  #[test]
  fn test_urgency() {
    assert_eq!(urgency(&flight("U", FlightPhase::Cruising, 80.0, 5)), 25.0);
  }
}
