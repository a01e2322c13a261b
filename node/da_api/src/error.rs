use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sunrise_da_interface::{DAError, Identifier, IdentifierError};

#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("malformed identifier: {0}")]
    InvalidId(#[from] IdentifierError),
    #[error("identifier `{0}` does not point to a blob")]
    NotBlobId(Identifier),
    #[error("blob #{index} has {size} bytes, which exceeds the limit of {limit} bytes")]
    BlobTooLarge { index: usize, size: usize, limit: u64 },
    #[error(transparent)]
    DataAvailability(#[from] DAError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) | Self::InvalidId(_) | Self::NotBlobId(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BlobTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DataAvailability(err) if err.is_retriable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::DataAvailability(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::DataAvailability(err) = &self {
            tracing::warn!("DA request failed: {err}");
        }
        (self.status_code(), self.to_string()).into_response()
    }
}
