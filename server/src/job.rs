use tokio::sync::{mpsc, oneshot};

/// The receiving end of a request/reply queue, drained by the runner.
#[derive(Debug)]
pub struct JobQueue<Q, A> {
  job_in: mpsc::UnboundedReceiver<JobReq<Q, A>>,
}

impl<Q, A> JobQueue<Q, A> {
  pub fn new(job_in: mpsc::UnboundedReceiver<JobReq<Q, A>>) -> Self {
    Self { job_in }
  }

  pub fn try_recv(
    &mut self,
  ) -> Result<JobReq<Q, A>, mpsc::error::TryRecvError> {
    self.job_in.try_recv()
  }

  /// Waits for the next job. `None` once every sender is gone.
  pub async fn recv(&mut self) -> Option<JobReq<Q, A>> {
    self.job_in.recv().await
  }
}

#[derive(Debug)]
pub struct JobReq<Q, A> {
  req: Q,
  callback: oneshot::Sender<A>,
}

impl<Q, A> JobReq<Q, A>
where
  A: core::fmt::Debug,
{
  pub fn send(req: Q, sender: &mpsc::UnboundedSender<Self>) -> JobRes<A> {
    let (callback, receiver) = oneshot::channel();

    let job_req = Self { req, callback };
    if sender.send(job_req).is_err() {
      tracing::warn!("job queue is closed");
    }

    JobRes { receiver }
  }

  /// Answers the job. The caller may have stopped waiting, which is fine.
  pub fn reply(self, res: A) {
    if let Err(res) = self.callback.send(res) {
      tracing::debug!("dropped reply nobody was waiting for: {res:?}");
    }
  }

  pub fn req(&self) -> &Q {
    &self.req
  }
}

#[derive(Debug)]
pub struct JobRes<A> {
  receiver: oneshot::Receiver<A>,
}

impl<A> JobRes<A> {
  pub async fn recv(self) -> Result<A, oneshot::error::RecvError> {
    self.receiver.await
  }
}
