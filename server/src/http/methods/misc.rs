use std::convert::Infallible;

use axum::{
  extract::State,
  http::StatusCode,
  response::sse::{Event, KeepAlive, Sse},
};
use futures_util::{Stream, StreamExt as _};

use crate::{
  http::shared::AppState,
  runner::{GetReqKind, PostReqKind, ResKind},
};

pub async fn ping_pong(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::Ping).await? {
    ResKind::Pong => Ok("pong".to_string()),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

/// Toggles the simulation clock. Responds with whether it is now paused.
pub async fn post_pause(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.post(PostReqKind::Pause).await? {
    ResKind::Paused(paused) => Ok(paused.to_string()),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

pub async fn get_updates(
  State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
  let stream = state.updates.activate_cloned().filter_map(|update| async move {
    match serde_json::to_string(&update) {
      Ok(data) => Some(Ok(Event::default().data(data))),
      Err(e) => {
        tracing::error!("Unable to serialise update: {e}");
        None
      }
    }
  });

  tracing::debug!("Client subscribed to updates");
  Sse::new(stream).keep_alive(KeepAlive::default())
}
