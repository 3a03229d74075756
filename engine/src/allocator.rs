use std::collections::HashMap;

use internment::Intern;
use itertools::Itertools;

use crate::entities::{airport::Airport, flight::Flight};

/// The number of flights claiming a runway at `airport`.
pub fn landing_demand(airport: Intern<String>, flights: &[Flight]) -> usize {
  flights
    .iter()
    .filter(|f| f.arrival_airport == airport && f.phase.claims_runway())
    .count()
}

/// Recomputes `available_runways` for every airport from the flights
/// currently landing at it.
///
/// The result is advisory: nothing stops a flight from landing at an airport
/// with no runways left, in which case the count bottoms out at zero.
pub fn allocate_runways(airports: &mut [Airport], flights: &[Flight]) {
  let demand: HashMap<Intern<String>, usize> = flights
    .iter()
    .filter(|f| f.phase.claims_runway())
    .counts_by(|f| f.arrival_airport);

  for airport in airports.iter_mut() {
    let claimed = demand.get(&airport.code).copied().unwrap_or_default();
    airport.available_runways = airport.total_runways.saturating_sub(claimed);

    if claimed > airport.total_runways {
      tracing::debug!(
        "{} is oversubscribed: {} landing on {} runways",
        airport.code,
        claimed,
        airport.total_runways
      );
    }
  }
}
