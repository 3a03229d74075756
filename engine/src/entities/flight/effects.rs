use glam::Vec2;

use internment::Intern;

use crate::{
  engine::{Bundle, EngineConfig, LandingRequest},
  entities::airport::Airport,
  geometry::{approach, distance},
  lerp_range, MAX_CRUISE_ALTITUDE, MIN_CRUISE_ALTITUDE,
};

use turborand::TurboRand;

use super::{
  actions::{Action, ActionKind},
  events::{Event, EventKind},
  Flight, FlightPhase,
};

pub trait FlightEffect {
  fn run(flight: &Flight, bundle: &mut Bundle);
}

fn next_position(flight: &Flight, arrival: &Airport, bundle: &Bundle) -> Vec2 {
  approach(flight.pos, arrival.pos, bundle.config.approach_fraction)
}

/// Whether the flight starts landing (or asks to) this tick.
fn enters_landing_radius(flight: &Flight, bundle: &Bundle) -> bool {
  let Some(arrival) = bundle.arrival(flight) else {
    return false;
  };

  flight.phase != FlightPhase::Landing
    && flight.phase.may_land()
    && distance(next_position(flight, arrival, bundle), arrival.pos)
      < bundle.config.landing_radius
}

/// Lowers a landing flight by one tick's descent, touching down at the
/// ground when `auto_touchdown` is on.
pub fn descend(
  id: Intern<String>,
  arrival: Intern<String>,
  altitude: f32,
  config: &EngineConfig,
  actions: &mut Vec<Action>,
  events: &mut Vec<Event>,
) {
  let next = (altitude - config.descent_per_tick).max(0.0);
  if next != altitude {
    actions.push(Action::new(id, ActionKind::Altitude(next)));
  }

  if config.auto_touchdown && next == 0.0 {
    actions.push(Action::new(id, ActionKind::Phase(FlightPhase::Landed)));
    events.push(Event::new(id, EventKind::Touchdown { arrival }));
  }
}

pub struct FlightTakeoffEffect;
impl FlightEffect for FlightTakeoffEffect {
  fn run(flight: &Flight, bundle: &mut Bundle) {
    if flight.phase != FlightPhase::Takeoff {
      return;
    }

    let Some(elapsed) = flight.time_since_takeoff(bundle.now) else {
      // Start the clock for flights that never recorded a takeoff.
      bundle.actions.push(Action::new(
        flight.id,
        ActionKind::TakeoffTimestamp(Some(bundle.now)),
      ));
      return;
    };

    if elapsed >= bundle.config.takeoff_timeout() {
      bundle.actions.push(Action::new(
        flight.id,
        ActionKind::Phase(FlightPhase::Cruising),
      ));

      // A flight already at its destination keeps its altitude and descends.
      if !enters_landing_radius(flight, bundle) {
        let altitude = lerp_range(
          MIN_CRUISE_ALTITUDE,
          MAX_CRUISE_ALTITUDE,
          bundle.rng.f32(),
        );
        bundle
          .actions
          .push(Action::new(flight.id, ActionKind::Altitude(altitude)));
      }
      bundle
        .events
        .push(Event::new(flight.id, EventKind::TakeoffComplete));
    }
  }
}

pub struct FlightUpdatePositionEffect;
impl FlightEffect for FlightUpdatePositionEffect {
  fn run(flight: &Flight, bundle: &mut Bundle) {
    let Some(arrival) = bundle.arrival(flight) else {
      return;
    };

    let pos = next_position(flight, arrival, bundle);
    if pos != flight.pos {
      bundle
        .actions
        .push(Action::new(flight.id, ActionKind::Pos(pos)));
    }
  }
}

pub struct FlightUpdateLandingEffect;
impl FlightUpdateLandingEffect {
  fn descend(flight: &Flight, bundle: &mut Bundle) {
    descend(
      flight.id,
      flight.arrival_airport,
      flight.altitude,
      bundle.config,
      &mut bundle.actions,
      &mut bundle.events,
    );
  }
}

impl FlightEffect for FlightUpdateLandingEffect {
  fn run(flight: &Flight, bundle: &mut Bundle) {
    let Some(arrival) = bundle.arrival(flight) else {
      return;
    };

    if flight.phase == FlightPhase::Landing {
      Self::descend(flight, bundle);
      return;
    }

    if !enters_landing_radius(flight, bundle) {
      return;
    }

    if bundle.config.enforce_runway_capacity {
      bundle.requests.push(LandingRequest {
        id: flight.id,
        arrival: arrival.code,
        phase: flight.phase,
        altitude: flight.altitude,
      });
    } else {
      bundle.actions.push(Action::new(
        flight.id,
        ActionKind::Phase(FlightPhase::Landing),
      ));
      bundle.events.push(Event::new(
        flight.id,
        EventKind::BeganLanding {
          arrival: arrival.code,
        },
      ));
      Self::descend(flight, bundle);
    }
  }
}

pub struct FlightBurnFuelEffect;
impl FlightEffect for FlightBurnFuelEffect {
  fn run(flight: &Flight, bundle: &mut Bundle) {
    let fuel = (flight.fuel_level - bundle.config.fuel_burn_per_tick).max(0.0);
    if fuel == flight.fuel_level {
      return;
    }

    bundle
      .actions
      .push(Action::new(flight.id, ActionKind::FuelLevel(fuel)));

    let threshold = bundle.config.low_fuel_threshold;
    if flight.phase.may_land()
      && !flight.is_low_on_fuel(threshold)
      && fuel < threshold
    {
      bundle
        .events
        .push(Event::new(flight.id, EventKind::LowFuel(fuel)));
    }
  }
}
