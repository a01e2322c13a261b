use std::{
    fmt::{Debug, Formatter},
    sync::Arc,
};

use async_trait::async_trait;
use futures::{StreamExt as _, TryStreamExt as _};
use sunrise_config::SunriseConfig;
use sunrise_da_interface::{
    types::to_non_retriable_da_error, Blob, Capability, Commitment, DAError, DataAvailability,
    Identifier, Namespace, Proof,
};

use super::{
    api::{BlobServiceClient, PublishParams},
    coordinator::SubmissionCoordinator,
};

/// An implementation of the `DataAvailability` trait that stores blobs in the Sunrise blob service.
#[derive(Clone)]
pub struct SunriseClient {
    config: SunriseConfig,
    api: Arc<BlobServiceClient>,
    coordinator: SubmissionCoordinator,
}

impl SunriseClient {
    /// Largest blob accepted by `submit`, in bytes.
    pub const MAX_BLOB_SIZE: u64 = 64 * 64 * 500;

    pub fn new(config: SunriseConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let api = Arc::new(BlobServiceClient::new(
            &config.server_url,
            config.request_timeout(),
        )?);
        let coordinator = SubmissionCoordinator::new(
            api.clone(),
            PublishParams::from(&config),
            config.max_concurrent_publishes,
            Self::MAX_BLOB_SIZE,
        );
        Ok(Self {
            config,
            api,
            coordinator,
        })
    }
}

#[async_trait]
impl DataAvailability for SunriseClient {
    async fn max_blob_size(&self) -> Result<u64, DAError> {
        Ok(Self::MAX_BLOB_SIZE)
    }

    async fn submit(
        &self,
        blobs: Vec<Blob>,
        _gas_price: f64,
        _namespace: &Namespace,
    ) -> Result<Vec<Identifier>, DAError> {
        let locators = self.coordinator.submit(blobs).await?;
        Ok(locators.into_iter().map(Identifier::Locator).collect())
    }

    async fn get(&self, ids: &[Identifier], _namespace: &Namespace) -> Result<Vec<Blob>, DAError> {
        let locators = ids
            .iter()
            .map(|id| {
                id.as_locator().map(str::to_owned).ok_or_else(|| {
                    to_non_retriable_da_error(anyhow::anyhow!(
                        "`{id}` is a height identifier and does not point to a blob"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        futures::stream::iter(locators)
            .map(|locator| async move {
                self.api.fetch(&locator).await.map_err(|err| {
                    let is_retriable = err.is_retriable();
                    DAError {
                        error: anyhow::Error::from(err)
                            .context(format!("failed fetching blob `{locator}`")),
                        is_retriable,
                    }
                })
            })
            .buffered(self.config.max_concurrent_publishes)
            .try_collect()
            .await
    }

    async fn get_ids(
        &self,
        height: u64,
        _namespace: &Namespace,
    ) -> Result<Vec<Identifier>, DAError> {
        // The blob service has no index by height.
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

impl Debug for SunriseClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SunriseClient")
            .field("config.server_url", &self.config.server_url.as_str())
            .field("config.protocol", &self.config.protocol)
            .field("config.data_shard_count", &self.config.data_shard_count)
            .field("config.parity_shard_count", &self.config.parity_shard_count)
            .finish()
    }
}
