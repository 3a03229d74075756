pub mod methods;
pub mod shared;

use std::{future::Future, net::SocketAddr};

use axum::{
  Router,
  routing::{get, post},
};
use crate::{job::JobReq, runner::PostReqKind};
use methods::{
  emergencies::{get_emergencies, post_emergency},
  flights::{get_flights, get_one_flight, post_flight, search_flights},
  misc::{get_updates, ping_pong, post_pause},
  state::{get_airports, get_notifications, get_stats},
};
use shared::{AppState, PostSender};
use tower_http::{
  compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer,
};

pub fn router(state: AppState) -> Router {
  let api = Router::new()
    .route("/", get(|| async { "Skyward API is active." }))
    // Misc
    .route("/ping", get(ping_pong))
    .route("/pause", post(post_pause))
    .route("/updates", get(get_updates))
    // Flights
    .route("/flights", get(get_flights).post(post_flight))
    .route("/flights/search", get(search_flights))
    .route("/flights/{id}", get(get_one_flight))
    // Emergencies
    .route("/emergencies", get(get_emergencies).post(post_emergency))
    // State
    .route("/airports", get(get_airports))
    .route("/stats", get(get_stats))
    .route("/notifications", get(get_notifications))
    .with_state(state);

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .layer(CompressionLayer::new())
    .layer(CorsLayer::very_permissive())
}

pub async fn run<F>(
  address: SocketAddr,
  state: AppState,
  shutdown: F,
) -> std::io::Result<()>
where
  F: Future<Output = ()> + Send + 'static,
{
  let listener = tokio::net::TcpListener::bind(address).await?;
  tracing::info!("Listening on {address}");

  serve(listener, state, shutdown).await
}

/// Serves until `shutdown` resolves, then waits for open connections to
/// finish. Update streams only finish once the runner has stopped, so
/// `shutdown` should stop it (see [`stop_runner`]).
pub async fn serve<F>(
  listener: tokio::net::TcpListener,
  state: AppState,
  shutdown: F,
) -> std::io::Result<()>
where
  F: Future<Output = ()> + Send + 'static,
{
  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown)
    .await
}

/// Asks the runner to stop and waits until it has.
pub async fn stop_runner(post_sender: &PostSender) {
  if JobReq::send(PostReqKind::Shutdown, post_sender)
    .recv()
    .await
    .is_err()
  {
    tracing::warn!("Runner had already stopped");
  }
}
