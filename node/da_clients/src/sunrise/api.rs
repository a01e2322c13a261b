//! HTTP client for the Sunrise blob service.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sunrise_config::SunriseConfig;
use sunrise_da_interface::{
    types::{to_non_retriable_da_error, to_retriable_da_error},
    Blob, DAError,
};
use url::Url;

use super::metrics::METRICS;

const PUBLISH_PATH: &str = "api/publish";
const GET_BLOB_PATH: &str = "api/get-blob";
const LOCATOR_QUERY_PARAM: &str = "metadata_uri";

#[derive(Debug, Serialize)]
struct PublishRequest<'a> {
    blob: String,
    data_shard_count: u32,
    parity_shard_count: u32,
    protocol: &'a str,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    #[serde(default)]
    tx_hash: String,
    metadata_uri: String,
}

#[derive(Debug, Deserialize)]
struct GetBlobResponse {
    blob: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BlobServiceError {
    #[error("request to blob service failed")]
    Transport(#[from] reqwest::Error),
    #[error("blob service responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed blob service response")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("blob is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("blob service returned an empty metadata URI")]
    EmptyLocator,
}

impl BlobServiceError {
    /// Only transport failures (including timeouts) may succeed on a repeated attempt.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<BlobServiceError> for DAError {
    fn from(err: BlobServiceError) -> Self {
        if err.is_retriable() {
            to_retriable_da_error(err)
        } else {
            to_non_retriable_da_error(err)
        }
    }
}

/// Erasure coding parameters and backend tag sent along with every published blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishParams {
    pub data_shard_count: u32,
    pub parity_shard_count: u32,
    pub protocol: String,
}

impl From<&SunriseConfig> for PublishParams {
    fn from(config: &SunriseConfig) -> Self {
        Self {
            data_shard_count: config.data_shard_count,
            parity_shard_count: config.parity_shard_count,
            protocol: config.protocol.clone(),
        }
    }
}

/// Client performing single publish / fetch round trips against the blob service.
#[derive(Debug, Clone)]
pub struct BlobServiceClient {
    client: reqwest::Client,
    publish_url: Url,
    get_blob_url: Url,
}

impl BlobServiceClient {
    pub fn new(server_url: &Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            publish_url: endpoint(server_url, PUBLISH_PATH),
            get_blob_url: endpoint(server_url, GET_BLOB_PATH),
        })
    }

    /// Publishes a single blob and returns its locator.
    pub async fn publish(
        &self,
        blob: &[u8],
        params: &PublishParams,
    ) -> Result<String, BlobServiceError> {
        let request = PublishRequest {
            blob: STANDARD.encode(blob),
            data_shard_count: params.data_shard_count,
            parity_shard_count: params.parity_shard_count,
            protocol: &params.protocol,
        };

        let latency = METRICS.publish_latency.start();
        let response: PublishResponse = self
            .execute(self.client.post(self.publish_url.clone()).json(&request))
            .await?;
        let latency = latency.observe();
        METRICS.blob_size.observe(blob.len());

        if response.metadata_uri.is_empty() {
            return Err(BlobServiceError::EmptyLocator);
        }
        tracing::debug!(
            "Published blob of {} bytes as `{}` (tx: {}) in {latency:?}",
            blob.len(),
            response.metadata_uri,
            response.tx_hash
        );
        Ok(response.metadata_uri)
    }

    /// Fetches a single blob by its locator.
    pub async fn fetch(&self, locator: &str) -> Result<Blob, BlobServiceError> {
        let mut url = self.get_blob_url.clone();
        url.query_pairs_mut()
            .append_pair(LOCATOR_QUERY_PARAM, locator);

        let latency = METRICS.fetch_latency.start();
        let response: GetBlobResponse = self.execute(self.client.get(url)).await?;
        latency.observe();

        Ok(STANDARD.decode(response.blob)?)
    }

    async fn execute<Res: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Res, BlobServiceError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BlobServiceError::Status { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Appends `path` to the base URL path, keeping any prefix the base URL already has.
fn endpoint(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let base_path = base.path().trim_end_matches('/');
    url.set_path(&format!("{base_path}/{path}"));
    url.set_query(None);
    url
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use httpmock::{Method::GET, Method::POST, MockServer};
    use serde_json::json;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn params() -> PublishParams {
        PublishParams {
            data_shard_count: 6,
            parity_shard_count: 4,
            protocol: "ipfs".to_owned(),
        }
    }

    fn client(server: &MockServer) -> BlobServiceClient {
        let url = Url::parse(&server.base_url()).unwrap();
        BlobServiceClient::new(&url, TIMEOUT).unwrap()
    }

    #[test]
    fn endpoints_keep_base_path() {
        let base = Url::parse("http://localhost:8000").unwrap();
        assert_eq!(
            endpoint(&base, PUBLISH_PATH).as_str(),
            "http://localhost:8000/api/publish"
        );

        let base = Url::parse("https://blobs.example.com/sunrise/?debug=1").unwrap();
        assert_eq!(
            endpoint(&base, GET_BLOB_PATH).as_str(),
            "https://blobs.example.com/sunrise/api/get-blob"
        );
    }

    #[tokio::test]
    async fn publish_sends_encoded_blob_and_shard_params() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/publish").json_body(json!({
                "blob": "QkI=",
                "data_shard_count": 6,
                "parity_shard_count": 4,
                "protocol": "ipfs",
            }));
            then.status(200)
                .json_body(json!({ "tx_hash": "0xabc", "metadata_uri": "ipfs://loc2" }));
        });

        let locator = client(&server).publish(b"BB", &params()).await.unwrap();
        assert_eq!(locator, "ipfs://loc2");
        mock.assert();
    }

    #[tokio::test]
    async fn publish_surfaces_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/publish");
            then.status(500).body("shard upload failed");
        });

        let err = client(&server).publish(b"A", &params()).await.unwrap_err();
        assert_matches!(
            &err,
            BlobServiceError::Status { status, body }
                if *status == StatusCode::INTERNAL_SERVER_ERROR && body == "shard upload failed"
        );
        assert!(!err.is_retriable());
    }

    #[tokio::test]
    async fn publish_rejects_malformed_and_empty_responses() {
        let server = MockServer::start();
        let mut mock = server.mock(|when, then| {
            when.method(POST).path("/api/publish");
            then.status(200).body("not json");
        });
        let client = client(&server);
        let err = client.publish(b"A", &params()).await.unwrap_err();
        assert_matches!(err, BlobServiceError::MalformedResponse(_));

        mock.delete();
        server.mock(|when, then| {
            when.method(POST).path("/api/publish");
            then.status(200).json_body(json!({ "tx_hash": "", "metadata_uri": "" }));
        });
        let err = client.publish(b"A", &params()).await.unwrap_err();
        assert_matches!(err, BlobServiceError::EmptyLocator);
    }

    #[tokio::test]
    async fn unreachable_service_is_retriable() {
        // Nothing listens on the discard port.
        let url = Url::parse("http://127.0.0.1:9").unwrap();
        let client = BlobServiceClient::new(&url, TIMEOUT).unwrap();
        let err = client.publish(b"A", &params()).await.unwrap_err();
        assert_matches!(err, BlobServiceError::Transport(_));
        assert!(DAError::from(err).is_retriable());
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/publish");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(json!({ "tx_hash": "0x1", "metadata_uri": "loc" }));
        });

        let url = Url::parse(&server.base_url()).unwrap();
        let client = BlobServiceClient::new(&url, Duration::from_millis(100)).unwrap();
        let err = client.publish(b"A", &params()).await.unwrap_err();
        assert_matches!(&err, BlobServiceError::Transport(err) if err.is_timeout());
    }

    #[tokio::test]
    async fn fetch_encodes_locator_and_decodes_blob() {
        let server = MockServer::start();
        let locator = "ipfs://bafy?shard=1&kind=meta";
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/get-blob")
                .query_param("metadata_uri", locator);
            then.status(200).json_body(json!({ "blob": "QkI=" }));
        });

        let blob = client(&server).fetch(locator).await.unwrap();
        assert_eq!(blob, b"BB");
        mock.assert();
    }

    #[tokio::test]
    async fn fetch_rejects_invalid_base64() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/get-blob");
            then.status(200).json_body(json!({ "blob": "%%%" }));
        });

        let err = client(&server).fetch("loc1").await.unwrap_err();
        assert_matches!(err, BlobServiceError::Base64(_));
        assert!(!DAError::from(err).is_retriable());
    }
}
