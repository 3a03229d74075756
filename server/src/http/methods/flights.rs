use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
};

use engine::search::FlightQuery;

use crate::{
  http::shared::{AppState, to_json},
  runner::{GetReqKind, PostReqKind, ResKind},
};

pub async fn get_flights(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::Flights).await? {
    ResKind::Flights(flights) => to_json(&flights),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

pub async fn get_one_flight(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::OneFlight(id)).await? {
    ResKind::OneFlight(Some(details)) => to_json(&details),
    ResKind::OneFlight(None) => Err(StatusCode::NOT_FOUND),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

pub async fn search_flights(
  State(state): State<AppState>,
  Query(query): Query<FlightQuery>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::Search(query)).await? {
    ResKind::Flights(flights) => to_json(&flights),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

pub async fn post_flight(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.post(PostReqKind::AddFlight).await? {
    ResKind::AddedFlight(flight) => to_json(&flight),
    ResKind::Rejected(reason) => {
      tracing::warn!("Flight was not added: {reason}");
      Err(StatusCode::CONFLICT)
    }
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}
