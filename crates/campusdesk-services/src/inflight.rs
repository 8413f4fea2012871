//! Single in-flight request per controller.
//!
//! The request runs on its own task, so dropping the caller's future neither
//! aborts it nor frees the slot: the next `start` is refused until `wait`
//! collects the result.

use campusdesk_core::ClientError;
use std::future::Future;
use tokio::task::JoinHandle;

pub(crate) struct InFlight<T> {
    handle: Option<JoinHandle<Result<T, ClientError>>>,
}

impl<T: Send + 'static> InFlight<T> {
    pub(crate) fn new() -> Self {
        Self { handle: None }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn start<F>(&mut self, request: F) -> Result<(), ClientError>
    where
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
    {
        if self.is_pending() {
            return Err(ClientError::SubmissionInFlight);
        }
        self.handle = Some(tokio::spawn(request));
        Ok(())
    }

    /// Await the pending request. Cancel safe: if this future is dropped the
    /// request stays pending and can be waited on again.
    pub(crate) async fn wait(&mut self) -> Option<Result<T, ClientError>> {
        let handle = self.handle.as_mut()?;
        let joined = handle.await;
        self.handle = None;
        Some(joined.unwrap_or_else(|e| {
            Err(ClientError::Transport(format!("Request task failed: {}", e)))
        }))
    }
}
