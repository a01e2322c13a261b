//! Generic data availability capability interface.
//!
//! A rollup node talks to a DA layer exclusively through [`DataAvailability`]. Concrete
//! implementations live in the `sunrise_da_clients` crate.

use std::fmt;

use async_trait::async_trait;

pub use crate::{
    identifier::{decode_height, encode_height, Identifier, IdentifierError},
    types::{Blob, Capability, Commitment, DAError, Namespace, Proof},
};

pub mod identifier;
pub mod in_memory;
pub mod types;

/// Trait that defines the interface for the data availability layer clients.
#[async_trait]
pub trait DataAvailability: Sync + Send + fmt::Debug {
    /// Returns the maximum size of a single blob accepted by [`Self::submit()`], in bytes.
    async fn max_blob_size(&self) -> Result<u64, DAError>;

    /// Publishes a batch of blobs. Returns exactly one identifier per blob, or fails as a whole.
    ///
    /// The order of the returned identifiers is not guaranteed to match the order of `blobs`.
    async fn submit(
        &self,
        blobs: Vec<Blob>,
        gas_price: f64,
        namespace: &Namespace,
    ) -> Result<Vec<Identifier>, DAError>;

    /// Retrieves blobs by their identifiers. The returned blobs are in the order of `ids`.
    async fn get(&self, ids: &[Identifier], namespace: &Namespace) -> Result<Vec<Blob>, DAError>;

    /// Returns identifiers describing the blobs published at the given height.
    async fn get_ids(&self, height: u64, namespace: &Namespace)
        -> Result<Vec<Identifier>, DAError>;

    async fn get_proofs(
        &self,
        ids: &[Identifier],
        namespace: &Namespace,
    ) -> Result<Capability<Vec<Proof>>, DAError>;

    async fn commit(
        &self,
        blobs: &[Blob],
        namespace: &Namespace,
    ) -> Result<Capability<Vec<Commitment>>, DAError>;

    async fn validate(
        &self,
        ids: &[Identifier],
        proofs: &[Proof],
        namespace: &Namespace,
    ) -> Result<Capability<Vec<bool>>, DAError>;

    /// Clones the client and wraps it in a Box.
    fn clone_boxed(&self) -> Box<dyn DataAvailability>;
}

impl Clone for Box<dyn DataAvailability> {
    fn clone(&self) -> Box<dyn DataAvailability> {
        self.clone_boxed()
    }
}
