//! Adapter for the Sunrise blob service.
//!
//! Blobs are published one HTTP request per blob; the service responds with a metadata URI
//! that serves as the blob locator for later retrieval.

pub use self::{
    api::{BlobServiceClient, BlobServiceError, PublishParams},
    client::SunriseClient,
};

mod api;
mod client;
mod coordinator;
mod metrics;
