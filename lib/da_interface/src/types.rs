use std::{error, fmt};

/// Opaque blob payload. The DA layer never interprets its contents.
pub type Blob = Vec<u8>;

/// Logical partition key. Accepted for interface compatibility; implementations may ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Namespace(pub Vec<u8>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commitment(pub Vec<u8>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Proof(pub Vec<u8>);

/// Result of an operation the DA layer may not implement.
///
/// `Unsupported` means the operation is not implemented by the client, which is different
/// from an implemented operation producing an empty result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    Available(T),
    Unsupported,
}

impl<T> Capability<T> {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn available(self) -> Option<T> {
        match self {
            Self::Available(value) => Some(value),
            Self::Unsupported => None,
        }
    }
}

impl<T: Default> Capability<T> {
    /// Collapses `Unsupported` into an empty value, which is what legacy callers expect.
    pub fn into_inner_or_default(self) -> T {
        self.available().unwrap_or_default()
    }
}

/// `DAError` is the error type returned by the DA clients.
#[derive(Debug)]
pub struct DAError {
    pub error: anyhow::Error,
    pub is_retriable: bool,
}

impl DAError {
    pub fn is_retriable(&self) -> bool {
        self.is_retriable
    }
}

impl fmt::Display for DAError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_retriable {
            "retriable"
        } else {
            "fatal"
        };
        write!(f, "{kind} data availability client error: {:#}", self.error)
    }
}

impl error::Error for DAError {}

pub fn to_retriable_da_error(error: impl Into<anyhow::Error>) -> DAError {
    DAError {
        error: error.into(),
        is_retriable: true,
    }
}

pub fn to_non_retriable_da_error(error: impl Into<anyhow::Error>) -> DAError {
    DAError {
        error: error.into(),
        is_retriable: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_collapses_to_empty() {
        let proofs: Capability<Vec<Proof>> = Capability::Unsupported;
        assert!(!proofs.is_supported());
        assert!(proofs.into_inner_or_default().is_empty());

        let valid = Capability::Available(vec![true]);
        assert!(valid.is_supported());
        assert_eq!(valid.into_inner_or_default(), [true]);
    }

    #[test]
    fn error_display_mentions_retriability() {
        let err = to_retriable_da_error(anyhow::anyhow!("connection reset"));
        assert!(err.is_retriable());
        assert_eq!(
            err.to_string(),
            "retriable data availability client error: connection reset"
        );

        let err = to_non_retriable_da_error(anyhow::anyhow!("bad base64"));
        assert!(!err.is_retriable());
        assert!(err.to_string().starts_with("fatal"));
    }
}
