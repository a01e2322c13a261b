//! Request and response bodies. Binary values travel as standard base64 strings.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sunrise_da_interface::{Commitment, Identifier, IdentifierError, Namespace, Proof};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Base64Bytes(pub Vec<u8>);

impl Serialize for Base64Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Base64Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(|err| de::Error::custom(format_args!("invalid base64: {err}")))
    }
}

impl From<Vec<u8>> for Base64Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&Identifier> for Base64Bytes {
    fn from(id: &Identifier) -> Self {
        Self(id.to_bytes())
    }
}

impl From<Commitment> for Base64Bytes {
    fn from(commitment: Commitment) -> Self {
        Self(commitment.0)
    }
}

impl From<Proof> for Base64Bytes {
    fn from(proof: Proof) -> Self {
        Self(proof.0)
    }
}

fn namespace(raw: Option<Base64Bytes>) -> Namespace {
    Namespace(raw.unwrap_or_default().0)
}

fn decode_ids(raw: &[Base64Bytes]) -> Result<Vec<Identifier>, IdentifierError> {
    raw.iter().map(|id| Identifier::from_bytes(&id.0)).collect()
}

fn encode_ids(ids: &[Identifier]) -> Vec<Base64Bytes> {
    ids.iter().map(Base64Bytes::from).collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MaxBlobSizeResponse {
    pub max_blob_size: u64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub blobs: Vec<Base64Bytes>,
    /// Ignored by the Sunrise blob service.
    #[serde(default)]
    pub gas_price: f64,
    #[serde(default)]
    pub namespace: Option<Base64Bytes>,
}

impl SubmitRequest {
    pub fn into_parts(self) -> (Vec<Vec<u8>>, f64, Namespace) {
        let blobs = self.blobs.into_iter().map(|blob| blob.0).collect();
        (blobs, self.gas_price, namespace(self.namespace))
    }
}

/// Identifiers returned by `submit` and `get_ids`.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdsResponse {
    pub ids: Vec<Base64Bytes>,
}

impl IdsResponse {
    pub fn new(ids: &[Identifier]) -> Self {
        Self {
            ids: encode_ids(ids),
        }
    }
}

/// Request of `get` and `get_proofs`.
#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    pub ids: Vec<Base64Bytes>,
    #[serde(default)]
    pub namespace: Option<Base64Bytes>,
}

impl IdsRequest {
    pub fn into_parts(self) -> Result<(Vec<Identifier>, Namespace), IdentifierError> {
        Ok((decode_ids(&self.ids)?, namespace(self.namespace)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetResponse {
    pub blobs: Vec<Base64Bytes>,
}

#[derive(Debug, Deserialize)]
pub struct GetIdsRequest {
    pub height: u64,
    #[serde(default)]
    pub namespace: Option<Base64Bytes>,
}

impl GetIdsRequest {
    pub fn namespace(&self) -> Namespace {
        namespace(self.namespace.clone())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProofsResponse {
    pub proofs: Vec<Base64Bytes>,
    pub supported: bool,
}

#[derive(Debug, Deserialize)]
pub struct CommitRequest {
    pub blobs: Vec<Base64Bytes>,
    #[serde(default)]
    pub namespace: Option<Base64Bytes>,
}

impl CommitRequest {
    pub fn into_parts(self) -> (Vec<Vec<u8>>, Namespace) {
        let blobs = self.blobs.into_iter().map(|blob| blob.0).collect();
        (blobs, namespace(self.namespace))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommitResponse {
    pub commitments: Vec<Base64Bytes>,
    pub supported: bool,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub ids: Vec<Base64Bytes>,
    #[serde(default)]
    pub proofs: Vec<Base64Bytes>,
    #[serde(default)]
    pub namespace: Option<Base64Bytes>,
}

impl ValidateRequest {
    pub fn into_parts(self) -> Result<(Vec<Identifier>, Vec<Proof>, Namespace), IdentifierError> {
        let ids = decode_ids(&self.ids)?;
        let proofs = self.proofs.into_iter().map(|proof| Proof(proof.0)).collect();
        Ok((ids, proofs, namespace(self.namespace)))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub results: Vec<bool>,
    pub supported: bool,
}
