use axum::{
  extract::{Query, State},
  http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::{
  http::shared::{AppState, to_json},
  runner::{GetReqKind, PostReqKind, ResKind},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyParams {
  /// Flight to declare the emergency on. A random cruising flight if unset.
  pub flight: Option<String>,
}

pub async fn get_emergencies(
  State(state): State<AppState>,
) -> Result<String, StatusCode> {
  match state.get(GetReqKind::Emergencies).await? {
    ResKind::Emergencies(emergencies) => to_json(&emergencies),
    _ => Err(StatusCode::INTERNAL_SERVER_ERROR),
  }
}

/// Responds with the declared emergency, or `null` if the named flight does
/// not exist or has already landed.
pub async fn post_emergency(
  State(state): State<AppState>,
  Query(params): Query<EmergencyParams>,
) -> Result<String, (StatusCode, String)> {
  let target = params.flight.filter(|id| !id.trim().is_empty());
  let res = state
    .post(PostReqKind::TriggerEmergency(target))
    .await
    .map_err(|status| (status, String::new()))?;

  match res {
    ResKind::Emergency(emergency) => {
      to_json(&emergency).map_err(|status| (status, String::new()))
    }
    ResKind::Rejected(reason) => Err((StatusCode::CONFLICT, reason)),
    _ => Err((StatusCode::INTERNAL_SERVER_ERROR, String::new())),
  }
}
