use clap::Parser;
use tokio::sync::mpsc;
use turborand::{SeededCore, rng::Rng};

use engine::{engine::Engine, entities::world::Simulation};
use server::{
  Cli,
  config::Config,
  http::{self, shared::AppState, stop_runner},
  init_logging,
  runner::Runner,
};

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  let _guard = init_logging(cli.log_dir.as_deref());

  let config = match Config::load(cli.config_path.as_deref()) {
    Ok(config) => config,
    Err(e) => {
      tracing::error!("{e}");
      std::process::exit(1);
    }
  };

  let mut server_config = config.server();
  server_config.address = cli.address.or(server_config.address);
  server_config.tick_ms = cli.tick_ms.or(server_config.tick_ms);

  let world = config.world();
  let rng = match cli.seed.or(world.seed) {
    Some(seed) => {
      tracing::info!("Using seed {seed}");
      Rng::with_seed(seed)
    }
    None => Rng::new(),
  };

  let sim = match Simulation::new(config.airports()) {
    Ok(sim) => sim,
    Err(e) => {
      tracing::error!("Invalid airport registry: {e}");
      std::process::exit(1);
    }
  };

  let (get_tx, get_rx) = mpsc::unbounded_channel();
  let (post_tx, post_rx) = mpsc::unbounded_channel();
  let (mut update_tx, update_rx) =
    async_broadcast::broadcast(server_config.notifications().max(1));
  update_tx.set_overflow(true);

  let mut runner = Runner::new(
    sim,
    Engine::new(config.engine()),
    rng,
    get_rx,
    post_rx,
    update_tx,
  )
  .with_rate(server_config.tick_period())
  .with_notification_capacity(server_config.notifications());

  if let Err(e) =
    runner.seed_flights(cli.flights.unwrap_or(world.initial_flights()))
  {
    tracing::error!("Unable to seed flights: {e}");
    std::process::exit(1);
  }

  let runner_handle = tokio::spawn(runner.run());

  let state = AppState::new(get_tx, post_tx.clone(), update_rx.deactivate());
  let shutdown_tx = post_tx.clone();
  let shutdown = async move {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!("Unable to listen for shutdown signal: {e}");
    }

    // Stopping the runner closes the update streams the server drains.
    stop_runner(&shutdown_tx).await;
  };

  let served = http::run(server_config.address(), state, shutdown).await;
  if served.is_err() {
    stop_runner(&post_tx).await;
  }

  if let Err(e) = runner_handle.await {
    tracing::error!("Runner task failed: {e}");
  }

  if let Err(e) = served {
    tracing::error!("{e}");
    std::process::exit(2);
  }
}
