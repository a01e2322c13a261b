use std::sync::Arc;

use sunrise_da_interface::{
    types::{to_non_retriable_da_error, to_retriable_da_error},
    Blob, DAError,
};
use tokio::{
    sync::{mpsc, Semaphore},
    task::{JoinError, JoinSet},
};

use super::{
    api::{BlobServiceClient, BlobServiceError, PublishParams},
    metrics::METRICS,
};

#[derive(Debug, thiserror::Error)]
pub(super) enum SubmitError {
    #[error("blob #{index} has {size} bytes, which exceeds the limit of {limit} bytes")]
    BlobTooLarge { index: usize, size: usize, limit: u64 },
    #[error("failed publishing blob #{index} ({failed} of {total} blobs failed)")]
    Publish {
        index: usize,
        failed: usize,
        total: usize,
        #[source]
        source: BlobServiceError,
    },
    #[error("publishing task terminated abnormally")]
    Task(#[from] JoinError),
    #[error("expected {expected} locators, got {actual}")]
    Incomplete { expected: usize, actual: usize },
}

impl From<SubmitError> for DAError {
    fn from(err: SubmitError) -> Self {
        let is_retriable = match &err {
            SubmitError::Publish { source, .. } => source.is_retriable(),
            SubmitError::BlobTooLarge { .. } => false,
            SubmitError::Task(_) | SubmitError::Incomplete { .. } => true,
        };
        if is_retriable {
            to_retriable_da_error(err)
        } else {
            to_non_retriable_da_error(err)
        }
    }
}

/// Fans a batch of blobs out to the blob service, one task per blob.
///
/// A batch either yields one locator per blob, or fails as a whole. Locators of the blobs
/// that were stored before another blob failed are dropped (but logged), since the blob
/// service has no way to delete them.
#[derive(Debug, Clone)]
pub(super) struct SubmissionCoordinator {
    api: Arc<BlobServiceClient>,
    params: Arc<PublishParams>,
    max_in_flight: usize,
    max_blob_size: u64,
}

impl SubmissionCoordinator {
    pub fn new(
        api: Arc<BlobServiceClient>,
        params: PublishParams,
        max_in_flight: usize,
        max_blob_size: u64,
    ) -> Self {
        Self {
            api,
            params: Arc::new(params),
            max_in_flight: max_in_flight.clamp(1, Semaphore::MAX_PERMITS),
            max_blob_size,
        }
    }

    /// Publishes all `blobs`. Locators are returned in completion order, not in the order of `blobs`.
    ///
    /// Dropping the returned future aborts publish requests that are still in flight.
    pub async fn submit(&self, blobs: Vec<Blob>) -> Result<Vec<String>, SubmitError> {
        if let Some((index, blob)) = blobs
            .iter()
            .enumerate()
            .find(|(_, blob)| blob.len() as u64 > self.max_blob_size)
        {
            return Err(SubmitError::BlobTooLarge {
                index,
                size: blob.len(),
                limit: self.max_blob_size,
            });
        }

        let total = blobs.len();
        if total == 0 {
            return Ok(vec![]);
        }

        // Every task sends exactly one message to one of the channels, so sends never wait.
        let (result_sender, mut result_receiver) = mpsc::channel::<String>(total);
        let (error_sender, mut error_receiver) =
            mpsc::channel::<(usize, BlobServiceError)>(total);
        let permits = Arc::new(Semaphore::new(self.max_in_flight));

        let mut tasks = JoinSet::new();
        for (index, blob) in blobs.into_iter().enumerate() {
            let api = self.api.clone();
            let params = self.params.clone();
            let permits = permits.clone();
            let result_sender = result_sender.clone();
            let error_sender = error_sender.clone();

            tasks.spawn(async move {
                // The semaphore is never closed.
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                match api.publish(&blob, &params).await {
                    Ok(locator) => {
                        result_sender.send(locator).await.ok();
                    }
                    Err(err) => {
                        error_sender.send((index, err)).await.ok();
                    }
                }
            });
        }
        // Channels close once the last task finishes and drops its senders.
        drop(result_sender);
        drop(error_sender);

        let mut join_error = None;
        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                tracing::error!("Publishing task failed: {err}");
                join_error.get_or_insert(err);
            }
        }

        let mut locators = Vec::with_capacity(total);
        while let Some(locator) = result_receiver.recv().await {
            locators.push(locator);
        }
        let mut errors = vec![];
        while let Some(error) = error_receiver.recv().await {
            errors.push(error);
        }

        if !errors.is_empty() {
            let failed = errors.len();
            let (index, source) = errors.swap_remove(0);
            METRICS.failed_submissions.inc();
            tracing::warn!(
                "Submission of {total} blobs failed with {failed} publish errors; discarding {} locators of stored blobs: {locators:?}",
                locators.len()
            );
            return Err(SubmitError::Publish {
                index,
                failed,
                total,
                source,
            });
        }
        if let Some(err) = join_error {
            METRICS.failed_submissions.inc();
            return Err(err.into());
        }
        if locators.len() != total {
            METRICS.failed_submissions.inc();
            return Err(SubmitError::Incomplete {
                expected: total,
                actual: locators.len(),
            });
        }

        METRICS.submitted_blobs.inc_by(total as u64);
        tracing::info!("Published {total} blobs");
        Ok(locators)
    }
}
