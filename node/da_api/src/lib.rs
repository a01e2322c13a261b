//! HTTP front door exposing a [`DataAvailability`] client to rollup nodes.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    middleware::Next,
    routing::{get, post},
    Json, Router,
};
use sunrise_da_interface::DataAvailability;
use tokio::sync::watch;

use crate::{
    error::ApiError,
    metrics::Method,
    middleware::MetricsMiddleware,
    types::{
        Base64Bytes, CommitRequest, CommitResponse, GetIdsRequest, GetProofsResponse, GetResponse,
        IdsRequest, IdsResponse, MaxBlobSizeResponse, SubmitRequest, ValidateRequest,
        ValidateResponse,
    },
};

mod error;
mod metrics;
mod middleware;
pub mod types;

type DaState = Arc<dyn DataAvailability>;
type ApiResult<T> = Result<Json<T>, ApiError>;

/// DA API implementation.
#[derive(Debug)]
pub struct Api {
    router: Router,
    bind_address: SocketAddr,
}

impl Api {
    pub fn new(client: Box<dyn DataAvailability>, bind_address: SocketAddr) -> Self {
        let middleware_factory = |method: Method| {
            axum::middleware::from_fn(move |req: Request, next: Next| async move {
                let middleware = MetricsMiddleware::new(method);
                let response = next.run(req).await;
                middleware.observe(response.status());
                response
            })
        };

        let router = Router::new()
            .route(
                "/max_blob_size",
                get(Api::max_blob_size).layer(middleware_factory(Method::MaxBlobSize)),
            )
            .route(
                "/submit",
                post(Api::submit).layer(middleware_factory(Method::Submit)),
            )
            .route("/get", post(Api::get).layer(middleware_factory(Method::Get)))
            .route(
                "/get_ids",
                post(Api::get_ids).layer(middleware_factory(Method::GetIds)),
            )
            .route(
                "/get_proofs",
                post(Api::get_proofs).layer(middleware_factory(Method::GetProofs)),
            )
            .route(
                "/commit",
                post(Api::commit).layer(middleware_factory(Method::Commit)),
            )
            .route(
                "/validate",
                post(Api::validate).layer(middleware_factory(Method::Validate)),
            )
            .with_state(DaState::from(client));

        Self {
            router,
            bind_address,
        }
    }

    pub async fn run(self, mut stop_receiver: watch::Receiver<bool>) -> anyhow::Result<()> {
        let bind_address = self.bind_address;
        tracing::info!("Starting DA API server on {bind_address}");

        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("Failed binding DA API server to {bind_address}"))?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                if stop_receiver.changed().await.is_err() {
                    tracing::warn!(
                        "Stop request sender for DA API server was dropped without sending a signal"
                    );
                }
                tracing::info!("Stop request received, DA API server is shutting down");
            })
            .await
            .context("DA API server failed")?;
        tracing::info!("DA API server shut down");
        Ok(())
    }

    async fn max_blob_size(State(da): State<DaState>) -> ApiResult<MaxBlobSizeResponse> {
        let max_blob_size = da.max_blob_size().await?;
        Ok(Json(MaxBlobSizeResponse { max_blob_size }))
    }

    async fn submit(
        State(da): State<DaState>,
        request: Result<Json<SubmitRequest>, JsonRejection>,
    ) -> ApiResult<IdsResponse> {
        let (blobs, gas_price, namespace) = request?.0.into_parts();
        let limit = da.max_blob_size().await?;
        if let Some((index, blob)) = blobs
            .iter()
            .enumerate()
            .find(|(_, blob)| blob.len() as u64 > limit)
        {
            return Err(ApiError::BlobTooLarge {
                index,
                size: blob.len(),
                limit,
            });
        }
        let ids = da.submit(blobs, gas_price, &namespace).await?;
        Ok(Json(IdsResponse::new(&ids)))
    }

    async fn get(
        State(da): State<DaState>,
        request: Result<Json<IdsRequest>, JsonRejection>,
    ) -> ApiResult<GetResponse> {
        let (ids, namespace) = request?.0.into_parts()?;
        if let Some(id) = ids.iter().find(|id| id.as_locator().is_none()) {
            return Err(ApiError::NotBlobId(id.clone()));
        }
        let blobs = da.get(&ids, &namespace).await?;
        Ok(Json(GetResponse {
            blobs: blobs.into_iter().map(Base64Bytes).collect(),
        }))
    }

    async fn get_ids(
        State(da): State<DaState>,
        request: Result<Json<GetIdsRequest>, JsonRejection>,
    ) -> ApiResult<IdsResponse> {
        let Json(request) = request?;
        let ids = da.get_ids(request.height, &request.namespace()).await?;
        Ok(Json(IdsResponse::new(&ids)))
    }

    async fn get_proofs(
        State(da): State<DaState>,
        request: Result<Json<IdsRequest>, JsonRejection>,
    ) -> ApiResult<GetProofsResponse> {
        let (ids, namespace) = request?.0.into_parts()?;
        let proofs = da.get_proofs(&ids, &namespace).await?;
        Ok(Json(GetProofsResponse {
            supported: proofs.is_supported(),
            proofs: proofs
                .into_inner_or_default()
                .into_iter()
                .map(Base64Bytes::from)
                .collect(),
        }))
    }

    async fn commit(
        State(da): State<DaState>,
        request: Result<Json<CommitRequest>, JsonRejection>,
    ) -> ApiResult<CommitResponse> {
        let (blobs, namespace) = request?.0.into_parts();
        let commitments = da.commit(&blobs, &namespace).await?;
        Ok(Json(CommitResponse {
            supported: commitments.is_supported(),
            commitments: commitments
                .into_inner_or_default()
                .into_iter()
                .map(Base64Bytes::from)
                .collect(),
        }))
    }

    async fn validate(
        State(da): State<DaState>,
        request: Result<Json<ValidateRequest>, JsonRejection>,
    ) -> ApiResult<ValidateResponse> {
        let (ids, proofs, namespace) = request?.0.into_parts()?;
        let results = da.validate(&ids, &proofs, &namespace).await?;
        Ok(Json(ValidateResponse {
            supported: results.is_supported(),
            results: results.into_inner_or_default(),
        }))
    }
}
