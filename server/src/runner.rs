use std::{ops::ControlFlow, time::Duration};

use internment::Intern;
use serde::{Deserialize, Serialize};
use tokio::{sync::mpsc::UnboundedReceiver, time::MissedTickBehavior};
use turborand::rng::Rng;

use engine::{
  DEFAULT_TICK_PERIOD, duration_now,
  engine::Engine,
  entities::{
    airport::Airport,
    emergency::Emergency,
    flight::{
      Flight, InitialPhase,
      events::{Event, EventKind},
    },
    world::{Simulation, Stats},
  },
  error::EngineError,
  search::{FlightQuery, latest_emergency, search},
};

use crate::{
  config::DEFAULT_NOTIFICATION_CAPACITY,
  job::{JobQueue, JobReq},
  ring::RingBuffer,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type", content = "value")]
pub enum OutgoingReply {
  // Partial/Small Updates
  Notification(Notification),

  // Full State Updates
  Flights(Vec<Flight>),
  Airports(Vec<Airport>),
}

/// A user-facing message about something the simulation did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub tick: u64,
  pub timestamp: Duration,
  pub flight: Option<Intern<String>>,
  pub alert: bool,
  pub text: String,
}

impl Notification {
  pub fn from_event(event: &Event, tick: u64, timestamp: Duration) -> Self {
    Self {
      tick,
      timestamp,
      flight: (!event.id.is_empty()).then_some(event.id),
      alert: event.is_alert(),
      text: event.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDetails {
  pub flight: Flight,
  pub emergency: Option<Emergency>,
}

#[derive(Debug, Clone)]
pub enum GetReqKind {
  Ping,

  // Flights
  Flights,
  OneFlight(String),
  Search(FlightQuery),

  // Other State
  Airports,
  Emergencies,
  Stats,
  Notifications,
}

#[derive(Debug, Clone)]
pub enum PostReqKind {
  AddFlight,
  TriggerEmergency(Option<String>),
  Pause,
  Shutdown,
}

#[derive(Debug, Clone, Default)]
pub enum ResKind {
  #[default]
  Any,
  Pong,

  // Flights
  Flights(Vec<Flight>),
  OneFlight(Option<FlightDetails>),
  AddedFlight(Flight),

  // Emergencies
  Emergencies(Vec<Emergency>),
  /// `None` when the requested flight does not exist or has landed.
  Emergency(Option<Emergency>),

  // Other State
  Airports(Vec<Airport>),
  Stats(Stats),
  Notifications(Vec<Notification>),
  Paused(bool),

  /// The request could not be carried out. Holds a user-facing reason.
  Rejected(String),
}

/// Sole owner of the simulation. Ticks run on a fixed period and jobs are
/// served between them, never during one.
pub struct Runner {
  pub sim: Simulation,
  pub engine: Engine,
  pub notifications: RingBuffer<Notification>,

  pub get_queue: JobQueue<GetReqKind, ResKind>,
  pub post_queue: JobQueue<PostReqKind, ResKind>,
  pub updates: async_broadcast::Sender<OutgoingReply>,

  pub rng: Rng,

  paused: bool,
  rate: Duration,
}

impl Runner {
  pub fn new(
    sim: Simulation,
    engine: Engine,
    rng: Rng,
    get_rcv: UnboundedReceiver<JobReq<GetReqKind, ResKind>>,
    post_rcv: UnboundedReceiver<JobReq<PostReqKind, ResKind>>,
    updates: async_broadcast::Sender<OutgoingReply>,
  ) -> Self {
    Self {
      sim,
      engine,
      notifications: RingBuffer::new(DEFAULT_NOTIFICATION_CAPACITY),

      get_queue: JobQueue::new(get_rcv),
      post_queue: JobQueue::new(post_rcv),
      updates,

      rng,

      paused: false,
      rate: DEFAULT_TICK_PERIOD,
    }
  }

  pub fn with_rate(mut self, rate: Duration) -> Self {
    self.rate = rate;
    self
  }

  pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
    self.notifications = RingBuffer::new(capacity);
    self
  }

  pub fn paused(&self) -> bool {
    self.paused
  }

  /// Populates an empty world: one landed flight, the rest alternating
  /// between takeoff and cruise.
  pub fn seed_flights(&mut self, count: usize) -> Result<(), EngineError> {
    let now = duration_now();
    for i in 0..count {
      let phase = match i {
        0 => InitialPhase::Landed,
        i if i % 2 == 1 => InitialPhase::Takeoff,
        _ => InitialPhase::Cruising,
      };

      self
        .engine
        .add_flight(&mut self.sim, phase, &mut self.rng, now)?;
    }

    tracing::info!("Seeded {} flights", self.sim.flights.len());
    Ok(())
  }

  pub async fn run(mut self) {
    let mut interval = tokio::time::interval(self.rate);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!("Runner started, ticking every {:?}", self.rate);

    loop {
      tokio::select! {
        _ = interval.tick() => {
          if !self.paused {
            self.tick(duration_now());
          }
        }
        job = self.get_queue.recv() => match job {
          Some(job) => self.handle_get(job),
          None => break,
        },
        job = self.post_queue.recv() => match job {
          Some(job) => {
            if self.handle_post(job, duration_now()).is_break() {
              break;
            }
          }
          None => break,
        },
      }
    }

    tracing::info!("Runner stopped after {} ticks", self.engine.ticks());
  }

  pub fn tick(&mut self, now: Duration) -> Vec<Event> {
    let events = self.engine.tick(&mut self.sim, &mut self.rng, now);
    for event in events.iter() {
      self.notify(event, now);
    }

    self.broadcast(OutgoingReply::Flights(self.sim.flights.clone()));
    self.broadcast(OutgoingReply::Airports(self.sim.airports.clone()));

    events
  }

  fn notify(&mut self, event: &Event, now: Duration) {
    if event.is_alert() {
      tracing::warn!("{event}");
    } else {
      tracing::info!("{event}");
    }

    let notification =
      Notification::from_event(event, self.engine.ticks(), now);
    self.notifications.push(notification.clone());
    self.broadcast(OutgoingReply::Notification(notification));
  }

  fn broadcast(&self, reply: OutgoingReply) {
    match self.updates.try_broadcast(reply) {
      Ok(_) | Err(async_broadcast::TrySendError::Inactive(_)) => {}
      Err(e) => tracing::warn!("failed to broadcast update: {}", e),
    }
  }

  pub fn handle_get(&mut self, job: JobReq<GetReqKind, ResKind>) {
    let res = match job.req() {
      GetReqKind::Ping => ResKind::Pong,

      // Flights
      GetReqKind::Flights => ResKind::Flights(self.sim.flights.clone()),
      GetReqKind::OneFlight(id) => {
        ResKind::OneFlight(self.sim.flight(id).map(|flight| FlightDetails {
          flight: flight.clone(),
          emergency: latest_emergency(&self.sim.emergencies, id).cloned(),
        }))
      }
      GetReqKind::Search(query) => ResKind::Flights(
        search(&self.sim.flights, query).into_iter().cloned().collect(),
      ),

      // Other State
      GetReqKind::Airports => ResKind::Airports(self.sim.airports.clone()),
      GetReqKind::Emergencies => {
        ResKind::Emergencies(self.sim.emergencies.clone())
      }
      GetReqKind::Stats => ResKind::Stats(self.sim.stats()),
      GetReqKind::Notifications => ResKind::Notifications(
        self.notifications.iter().cloned().collect(),
      ),
    };

    job.reply(res);
  }

  pub fn handle_post(
    &mut self,
    job: JobReq<PostReqKind, ResKind>,
    now: Duration,
  ) -> ControlFlow<()> {
    let (res, flow) = match job.req() {
      PostReqKind::AddFlight => {
        (self.add_flight(now), ControlFlow::Continue(()))
      }
      PostReqKind::TriggerEmergency(target) => {
        let target = target.clone();
        (
          self.trigger_emergency(target.as_deref(), now),
          ControlFlow::Continue(()),
        )
      }
      PostReqKind::Pause => {
        self.paused = !self.paused;
        if self.paused {
          tracing::info!("Simulation paused");
        } else {
          tracing::info!("Simulation resumed");
        }
        (ResKind::Paused(self.paused), ControlFlow::Continue(()))
      }
      PostReqKind::Shutdown => {
        tracing::info!("Shutdown requested");
        (ResKind::Any, ControlFlow::Break(()))
      }
    };

    job.reply(res);
    flow
  }

  fn add_flight(&mut self, now: Duration) -> ResKind {
    match self.engine.add_flight(
      &mut self.sim,
      InitialPhase::Takeoff,
      &mut self.rng,
      now,
    ) {
      Ok(flight) => {
        self.notify(
          &Event::new(
            flight.id,
            EventKind::Added {
              departure: flight.departure_airport,
              arrival: flight.arrival_airport,
            },
          ),
          now,
        );
        ResKind::AddedFlight(flight)
      }
      Err(e) => {
        tracing::error!("Unable to add flight: {e}");
        ResKind::Rejected(e.to_string())
      }
    }
  }

  fn trigger_emergency(
    &mut self,
    target: Option<&str>,
    now: Duration,
  ) -> ResKind {
    match self
      .engine
      .trigger_emergency(&mut self.sim, target, &mut self.rng, now)
    {
      Ok(Some(emergency)) => {
        self.notify(
          &Event::new(
            emergency.flight_id,
            EventKind::Emergency(emergency.kind),
          ),
          now,
        );
        ResKind::Emergency(Some(emergency))
      }
      Ok(None) => ResKind::Emergency(None),
      Err(EngineError::NoEligibleFlight) => {
        let event = Event::new(Intern::from_ref(""), EventKind::NoEligibleFlight);
        self.notify(&event, now);
        ResKind::Rejected(event.to_string())
      }
      Err(e) => {
        tracing::error!("Unable to trigger emergency: {e}");
        ResKind::Rejected(e.to_string())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use engine::entities::{airport::default_airports, flight::FlightPhase};
  use tokio::sync::mpsc;
  use turborand::SeededCore;

  use super::*;

  fn runner() -> (Runner, async_broadcast::Receiver<OutgoingReply>) {
    let (_, get_rx) = mpsc::unbounded_channel();
    let (_, post_rx) = mpsc::unbounded_channel();
    let (mut update_tx, update_rx) = async_broadcast::broadcast(64);
    update_tx.set_overflow(true);

    let runner = Runner::new(
      Simulation::new(default_airports()).unwrap(),
      Engine::default(),
      Rng::with_seed(11),
      get_rx,
      post_rx,
      update_tx,
    );

    (runner, update_rx)
  }

  #[test]
  fn test_seed_flights() {
    let (mut runner, _rx) = runner();
    runner.seed_flights(5).unwrap();

    let stats = runner.sim.stats();
    assert_eq!(stats.total, 5);
    assert_eq!(stats.landed, 1);
    assert_eq!(stats.takeoff, 2);
    assert_eq!(stats.cruising, 2);
  }

  #[test]
  fn test_tick_broadcasts_state() {
    let (mut runner, mut rx) = runner();
    runner.seed_flights(3).unwrap();
    runner.tick(duration_now());

    let mut saw_flights = false;
    while let Ok(reply) = rx.try_recv() {
      if let OutgoingReply::Flights(flights) = reply {
        assert_eq!(flights.len(), 3);
        saw_flights = true;
      }
    }
    assert!(saw_flights);
    assert_eq!(runner.engine.ticks(), 1);
  }

  #[test]
  fn test_takeoff_completion_is_notified() {
    let (mut runner, _rx) = runner();
    runner.seed_flights(2).unwrap();

    let later = duration_now() + Duration::from_secs(31);
    let events = runner.tick(later);

    assert!(events.iter().any(|e| e.kind == EventKind::TakeoffComplete));
    let notification = runner.notifications.iter().last().unwrap();
    assert!(notification.text.contains("completed takeoff"));
    assert!(!notification.alert);
    assert_eq!(notification.tick, 1);
  }

  #[tokio::test]
  async fn test_emergency_job() {
    let (mut runner, _rx) = runner();
    runner.seed_flights(3).unwrap();
    let (post_tx, mut post_rx) = mpsc::unbounded_channel();

    let res = JobReq::send(PostReqKind::TriggerEmergency(None), &post_tx);
    let job = post_rx.recv().await.unwrap();
    assert!(runner.handle_post(job, duration_now()).is_continue());

    let Ok(ResKind::Emergency(Some(emergency))) = res.recv().await else {
      panic!("expected an emergency");
    };
    let flight = runner.sim.flight(&emergency.flight_id).unwrap();
    assert_eq!(flight.phase, FlightPhase::Emergency);
    assert_eq!(runner.sim.flights[0].id, flight.id);

    let alert = runner.notifications.iter().last().unwrap();
    assert!(alert.alert);
    assert_eq!(alert.flight, Some(emergency.flight_id));
  }

  #[tokio::test]
  async fn test_pause_toggles() {
    let (mut runner, _rx) = runner();
    let (post_tx, mut post_rx) = mpsc::unbounded_channel();

    for expected in [true, false] {
      let res = JobReq::send(PostReqKind::Pause, &post_tx);
      let job = post_rx.recv().await.unwrap();
      let _ = runner.handle_post(job, duration_now());

      let res = res.recv().await;
      assert!(matches!(res, Ok(ResKind::Paused(p)) if p == expected));
      assert_eq!(runner.paused(), expected);
    }
  }

  #[tokio::test]
  async fn test_run_serves_jobs_and_ticks() {
    let (get_tx, get_rx) = mpsc::unbounded_channel();
    let (post_tx, post_rx) = mpsc::unbounded_channel();
    let (mut update_tx, update_rx) = async_broadcast::broadcast(64);
    update_tx.set_overflow(true);

    let mut runner = Runner::new(
      Simulation::new(default_airports()).unwrap(),
      Engine::default(),
      Rng::with_seed(3),
      get_rx,
      post_rx,
      update_tx,
    )
    .with_rate(Duration::from_millis(10));
    runner.seed_flights(2).unwrap();
    let handle = tokio::spawn(runner.run());

    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = JobReq::send(GetReqKind::Stats, &get_tx).recv().await;
    let Ok(ResKind::Stats(stats)) = res else {
      panic!("expected stats");
    };
    assert_eq!(stats.total, 2);

    let res = JobReq::send(PostReqKind::Shutdown, &post_tx).recv().await;
    assert!(matches!(res, Ok(ResKind::Any)));
    handle.await.unwrap();
    drop(update_rx);
  }
}
