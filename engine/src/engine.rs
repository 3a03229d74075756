use std::{collections::HashMap, time::Duration};

use internment::Intern;
use serde::{Deserialize, Serialize};
use turborand::rng::Rng;

use crate::{
  allocator::{allocate_runways, landing_demand},
  dispatch,
  entities::{
    airport::Airport,
    emergency::Emergency,
    flight::{
      Flight, FlightPhase, InitialPhase,
      actions::{Action, ActionKind, FlightActionHandler, FlightAllActionHandler},
      effects::{
        FlightBurnFuelEffect, FlightEffect, FlightTakeoffEffect,
        FlightUpdateLandingEffect, FlightUpdatePositionEffect, descend,
      },
      events::{Event, EventKind},
    },
    world::Simulation,
  },
  error::EngineError,
  generator::generate_flight,
  scheduler::dispatch_order,
  APPROACH_FRACTION, DESCENT_PER_TICK, FUEL_BURN_PER_TICK, LANDING_RADIUS,
  LOW_FUEL_THRESHOLD, TAKEOFF_TIMEOUT,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  pub takeoff_timeout_secs: u64,
  pub approach_fraction: f32,
  /// In degrees.
  pub landing_radius: f32,
  /// In feet.
  pub descent_per_tick: f32,
  /// In percent.
  pub fuel_burn_per_tick: f32,
  pub low_fuel_threshold: f32,

  /// Refuse landings at airports with no free runway, holding the flight
  /// instead. Runway counts are advisory when this is off.
  pub enforce_runway_capacity: bool,
  /// Move landing flights to `Landed` once they reach the ground. Landing
  /// flights descend forever when this is off.
  pub auto_touchdown: bool,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      takeoff_timeout_secs: TAKEOFF_TIMEOUT.as_secs(),
      approach_fraction: APPROACH_FRACTION,
      landing_radius: LANDING_RADIUS,
      descent_per_tick: DESCENT_PER_TICK,
      fuel_burn_per_tick: FUEL_BURN_PER_TICK,
      low_fuel_threshold: LOW_FUEL_THRESHOLD,

      enforce_runway_capacity: false,
      auto_touchdown: false,
    }
  }
}

impl EngineConfig {
  pub fn takeoff_timeout(&self) -> Duration {
    Duration::from_secs(self.takeoff_timeout_secs)
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingRequest {
  pub id: Intern<String>,
  pub arrival: Intern<String>,
  pub phase: FlightPhase,
  pub altitude: f32,
}

/// Scratch space shared by the effects of a single tick. Effects only read
/// flights and write here, so no flight observes another's next state.
pub struct Bundle<'a> {
  pub airports: &'a [Airport],
  pub config: &'a EngineConfig,
  pub rng: &'a mut Rng,
  pub now: Duration,

  pub actions: Vec<Action>,
  pub events: Vec<Event>,
  pub requests: Vec<LandingRequest>,
}

impl<'a> Bundle<'a> {
  pub fn new(
    airports: &'a [Airport],
    config: &'a EngineConfig,
    rng: &'a mut Rng,
    now: Duration,
  ) -> Self {
    Self {
      airports,
      config,
      rng,
      now,

      actions: Vec::new(),
      events: Vec::new(),
      requests: Vec::new(),
    }
  }

  pub fn arrival(&self, flight: &Flight) -> Option<&'a Airport> {
    self
      .airports
      .iter()
      .find(|a| a.code == flight.arrival_airport)
  }
}

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct TickReport {
  pub tick: u64,
  pub advanced: usize,
  pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
  pub config: EngineConfig,

  ticks: u64,
  skipped: usize,
  last_report: TickReport,
}

impl Engine {
  pub fn new(config: EngineConfig) -> Self {
    Self {
      config,
      ..Self::default()
    }
  }

  pub fn ticks(&self) -> u64 {
    self.ticks
  }

  /// Flights skipped over every tick so far.
  pub fn skipped(&self) -> usize {
    self.skipped
  }

  pub fn last_report(&self) -> TickReport {
    self.last_report
  }

  /// Advances every flight by one tick, then reorders the flights and
  /// recomputes runway availability.
  pub fn tick(
    &mut self,
    sim: &mut Simulation,
    rng: &mut Rng,
    now: Duration,
  ) -> Vec<Event> {
    let mut report = TickReport {
      tick: self.ticks + 1,
      ..TickReport::default()
    };

    let mut bundle = Bundle::new(&sim.airports, &self.config, rng, now);
    for flight in sim.flights.iter().filter(|f| !f.is_landed()) {
      if bundle.arrival(flight).is_none() {
        tracing::warn!(
          "skipping {}: unknown arrival airport {}",
          flight.id,
          flight.arrival_airport
        );
        bundle.events.push(Event::new(
          flight.id,
          EventKind::Skipped {
            reason: EngineError::UnknownAirport(flight.arrival_airport)
              .to_string(),
          },
        ));
        report.skipped += 1;
        continue;
      }

      FlightTakeoffEffect::run(flight, &mut bundle);
      FlightUpdatePositionEffect::run(flight, &mut bundle);
      FlightUpdateLandingEffect::run(flight, &mut bundle);
      FlightBurnFuelEffect::run(flight, &mut bundle);

      report.advanced += 1;
    }

    let Bundle {
      mut actions,
      mut events,
      requests,
      ..
    } = bundle;

    if !requests.is_empty() {
      self.admit_landings(sim, requests, &mut actions, &mut events);
    }

    let indices: HashMap<Intern<String>, usize> = sim
      .flights
      .iter()
      .enumerate()
      .map(|(i, f)| (f.id, i))
      .collect();
    for action in actions.iter() {
      if let Some(flight) =
        indices.get(&action.id).and_then(|i| sim.flights.get_mut(*i))
      {
        FlightAllActionHandler::run(flight, &action.kind);
      }
    }

    self.rebalance(sim);

    self.ticks = report.tick;
    self.skipped += report.skipped;
    self.last_report = report;

    tracing::trace!(
      "tick {}: advanced {}, skipped {}",
      report.tick,
      report.advanced,
      report.skipped
    );

    events
  }

  /// Grants landing requests in dispatch order while the arrival airport has
  /// runways left; refused flights hold.
  fn admit_landings(
    &self,
    sim: &Simulation,
    requests: Vec<LandingRequest>,
    actions: &mut Vec<Action>,
    events: &mut Vec<Event>,
  ) {
    let mut free: HashMap<Intern<String>, usize> = sim
      .airports
      .iter()
      .map(|a| {
        let demand = landing_demand(a.code, &sim.flights);
        (a.code, a.total_runways.saturating_sub(demand))
      })
      .collect();

    for request in requests {
      let free = free.entry(request.arrival).or_default();
      if *free > 0 {
        *free -= 1;
        actions.push(Action::new(
          request.id,
          ActionKind::Phase(FlightPhase::Landing),
        ));
        events.push(Event::new(
          request.id,
          EventKind::BeganLanding {
            arrival: request.arrival,
          },
        ));
        descend(
          request.id,
          request.arrival,
          request.altitude,
          &self.config,
          actions,
          events,
        );
      } else if request.phase != FlightPhase::Holding {
        actions.push(Action::new(
          request.id,
          ActionKind::Phase(FlightPhase::Holding),
        ));
        events.push(Event::new(
          request.id,
          EventKind::Holding {
            arrival: request.arrival,
          },
        ));
      }
    }
  }

  /// Restores dispatch order and runway availability after the flights
  /// change.
  pub fn rebalance(&self, sim: &mut Simulation) {
    dispatch_order(&mut sim.flights, self.config.low_fuel_threshold);
    allocate_runways(&mut sim.airports, &sim.flights);
  }

  pub fn add_flight(
    &self,
    sim: &mut Simulation,
    phase: InitialPhase,
    rng: &mut Rng,
    now: Duration,
  ) -> Result<Flight, EngineError> {
    let flight = generate_flight(&sim.airports, &sim.flights, phase, rng, now)?;
    sim.flights.push(flight.clone());
    self.rebalance(sim);

    Ok(flight)
  }

  pub fn trigger_emergency(
    &self,
    sim: &mut Simulation,
    target: Option<&str>,
    rng: &mut Rng,
    now: Duration,
  ) -> Result<Option<Emergency>, EngineError> {
    let emergency = dispatch::trigger_emergency(sim, target, rng, now)?;
    if emergency.is_some() {
      self.rebalance(sim);
    }

    Ok(emergency)
  }
}
