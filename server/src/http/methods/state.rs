use axum::{extract::State, http::StatusCode};

use crate::{
  http::shared::{AppState, to_json},
  runner::{GetReqKind, ResKind},
};

pub async fn get_airports(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::Airports).await? {
    ResKind::Airports(airports) => to_json(&airports),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

pub async fn get_stats(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::Stats).await? {
    ResKind::Stats(stats) => to_json(&stats),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

pub async fn get_notifications(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::Notifications).await? {
    ResKind::Notifications(notifications) => to_json(&notifications),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}
