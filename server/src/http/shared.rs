use axum::http::StatusCode;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::{
  job::JobReq,
  runner::{GetReqKind, OutgoingReply, PostReqKind, ResKind},
};

pub type GetSender = mpsc::UnboundedSender<JobReq<GetReqKind, ResKind>>;
pub type PostSender = mpsc::UnboundedSender<JobReq<PostReqKind, ResKind>>;

#[derive(Debug, Clone)]
pub struct AppState {
  pub get_sender: GetSender,
  pub post_sender: PostSender,
  pub updates: async_broadcast::InactiveReceiver<OutgoingReply>,
}

impl AppState {
  pub fn new(
    get_sender: GetSender,
    post_sender: PostSender,
    updates: async_broadcast::InactiveReceiver<OutgoingReply>,
  ) -> Self {
    Self {
      get_sender,
      post_sender,
      updates,
    }
  }

  pub async fn get(&self, req: GetReqKind) -> Result<ResKind, StatusCode> {
    JobReq::send(req, &self.get_sender)
      .recv()
      .await
      .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
  }

  pub async fn post(&self, req: PostReqKind) -> Result<ResKind, StatusCode> {
    JobReq::send(req, &self.post_sender)
      .recv()
      .await
      .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
  }
}

pub fn to_json<T>(value: &T) -> Result<String, StatusCode>
where
  T: Serialize,
{
  serde_json::to_string(value).map_err(|e| {
    tracing::error!("Unable to serialise response: {e}");
    StatusCode::INTERNAL_SERVER_ERROR
  })
}
