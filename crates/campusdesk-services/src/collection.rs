//! Student collection
//!
//! Client-side cache of the server-authoritative student list. `refresh` is
//! the only way records change: mutations never patch the cache directly.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use campusdesk_core::models::{StudentId, StudentRecord};
use campusdesk_core::{ClientError, StudentBackend};

use crate::notification::log_client_error;

pub struct StudentCollection {
    backend: Arc<dyn StudentBackend>,
    records: Vec<StudentRecord>,
    loading: bool,
    lifetime: CancellationToken,
}

impl StudentCollection {
    pub fn new(backend: Arc<dyn StudentBackend>, lifetime: CancellationToken) -> Self {
        Self {
            backend,
            records: Vec::new(),
            loading: false,
            lifetime,
        }
    }

    pub fn backend(&self) -> &Arc<dyn StudentBackend> {
        &self.backend
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn get(&self, id: &StudentId) -> Option<&StudentRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Re-fetch the full collection.
    ///
    /// On failure the previous records are kept and the error is returned for
    /// the caller to report. After teardown the response is dropped unseen.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        if self.lifetime.is_cancelled() {
            tracing::debug!("Skipping refresh after teardown");
            return Ok(());
        }

        self.loading = true;
        let fetched = tokio::select! {
            biased;
            _ = self.lifetime.cancelled() => None,
            result = self.backend.list_students() => Some(result),
        };
        self.loading = false;

        match fetched {
            None => {
                tracing::debug!("Discarding student list response after teardown");
                Ok(())
            }
            Some(Ok(records)) => {
                tracing::debug!(count = records.len(), "Student collection refreshed");
                self.records = records;
                Ok(())
            }
            Some(Err(e)) => {
                log_client_error(&e, "refresh");
                Err(e)
            }
        }
    }
}
