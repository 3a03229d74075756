use serde::{Deserialize, Serialize};

use crate::entities::{emergency::Emergency, flight::Flight};

/// Filters over the active flights. Empty fields, and airport fields set to
/// `"all"`, match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
  pub id: Option<String>,
  pub from: Option<String>,
  pub to: Option<String>,
}

fn airport_filter(code: &Option<String>) -> Option<&str> {
  code
    .as_deref()
    .map(str::trim)
    .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
}

impl FlightQuery {
  pub fn matches(&self, flight: &Flight) -> bool {
    if flight.is_landed() {
      return false;
    }

    if let Some(id) = self.id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    {
      if !flight.id.to_lowercase().contains(&id.to_lowercase()) {
        return false;
      }
    }

    if let Some(from) = airport_filter(&self.from) {
      if flight.departure_airport.as_str() != from {
        return false;
      }
    }

    if let Some(to) = airport_filter(&self.to) {
      if flight.arrival_airport.as_str() != to {
        return false;
      }
    }

    true
  }
}

/// Active flights matching `query`, in dispatch order.
pub fn search<'a>(flights: &'a [Flight], query: &FlightQuery) -> Vec<&'a Flight> {
  flights.iter().filter(|f| query.matches(f)).collect()
}

/// The most recent emergency declared on a flight.
pub fn latest_emergency<'a>(
  emergencies: &'a [Emergency],
  flight_id: &str,
) -> Option<&'a Emergency> {
  emergencies
    .iter()
    .rev()
    .find(|e| e.flight_id.as_str() == flight_id)
}
