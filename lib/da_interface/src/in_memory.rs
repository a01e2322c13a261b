use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;

use crate::{
    types::{to_non_retriable_da_error, Blob, Capability, Commitment, DAError, Namespace, Proof},
    DataAvailability, Identifier,
};

/// Process-local implementation of [`DataAvailability`] that keeps blobs in memory.
///
/// Useful for tests and local development; nothing survives a restart.
#[derive(Clone, Debug)]
pub struct InMemoryDA {
    max_blob_size: u64,
    blobs: Arc<Mutex<HashMap<String, Blob>>>,
}

impl Default for InMemoryDA {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_BLOB_SIZE)
    }
}

impl InMemoryDA {
    pub const DEFAULT_MAX_BLOB_SIZE: u64 = 64 * 64 * 500;

    pub fn new(max_blob_size: u64) -> Self {
        Self {
            max_blob_size,
            blobs: Arc::default(),
        }
    }
}

#[async_trait]
impl DataAvailability for InMemoryDA {
    async fn max_blob_size(&self) -> Result<u64, DAError> {
        Ok(self.max_blob_size)
    }

    async fn submit(
        &self,
        blobs: Vec<Blob>,
        _gas_price: f64,
        _namespace: &Namespace,
    ) -> Result<Vec<Identifier>, DAError> {
        if let Some(blob) = blobs
            .iter()
            .find(|blob| blob.len() as u64 > self.max_blob_size)
        {
            return Err(to_non_retriable_da_error(anyhow::anyhow!(
                "blob of {} bytes exceeds the limit of {} bytes",
                blob.len(),
                self.max_blob_size
            )));
        }

        let mut store = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        let ids = blobs
            .into_iter()
            .map(|blob| {
                let locator = format!("mem://{}", store.len());
                store.insert(locator.clone(), blob);
                Identifier::Locator(locator)
            })
            .collect();
        Ok(ids)
    }

    async fn get(&self, ids: &[Identifier], _namespace: &Namespace) -> Result<Vec<Blob>, DAError> {
        let store = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        ids.iter()
            .map(|id| {
                let locator = id.as_locator().ok_or_else(|| {
                    to_non_retriable_da_error(anyhow::anyhow!(
                        "`{id}` does not identify a single blob"
                    ))
                })?;
                store.get(locator).cloned().ok_or_else(|| {
                    to_non_retriable_da_error(anyhow::anyhow!("blob `{locator}` is not found"))
                })
            })
            .collect()
    }

    async fn get_ids(
        &self,
        height: u64,
        _namespace: &Namespace,
    ) -> Result<Vec<Identifier>, DAError> {
        Ok(vec![Identifier::Height(height)])
    }

    async fn get_proofs(
        &self,
        _ids: &[Identifier],
        _namespace: &Namespace,
    ) -> Result<Capability<Vec<Proof>>, DAError> {
        Ok(Capability::Unsupported)
    }

    async fn commit(
        &self,
        _blobs: &[Blob],
        _namespace: &Namespace,
    ) -> Result<Capability<Vec<Commitment>>, DAError> {
        Ok(Capability::Unsupported)
    }

    async fn validate(
        &self,
        _ids: &[Identifier],
        _proofs: &[Proof],
        _namespace: &Namespace,
    ) -> Result<Capability<Vec<bool>>, DAError> {
        Ok(Capability::Unsupported)
    }

    fn clone_boxed(&self) -> Box<dyn DataAvailability> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_blobs_are_returned_in_request_order() {
        let da = InMemoryDA::default();
        let namespace = Namespace::default();
        let ids = da
            .submit(vec![b"A".to_vec(), b"BB".to_vec()], 0.0, &namespace)
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);

        let reversed: Vec<_> = ids.iter().rev().cloned().collect();
        let blobs = da.get(&reversed, &namespace).await.unwrap();
        assert_eq!(blobs, [b"BB".to_vec(), b"A".to_vec()]);
    }

    #[tokio::test]
    async fn height_ids_cannot_be_fetched() {
        let da = InMemoryDA::default();
        let namespace = Namespace::default();
        let ids = da.get_ids(42, &namespace).await.unwrap();
        assert_eq!(ids, [Identifier::Height(42)]);

        let err = da.get(&ids, &namespace).await.unwrap_err();
        assert!(!err.is_retriable());
    }

    #[tokio::test]
    async fn oversized_blob_is_rejected() {
        let da = InMemoryDA::new(1);
        let err = da
            .submit(vec![vec![0; 2]], 0.0, &Namespace::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"));
    }
}
