//! The versioned envelope wrapping both snapshot and diff blobs

use serde::{Deserialize, Serialize};

/// `{kind, apiVersion, metadata, data}`, generic over the metadata and data
/// payload shapes so snapshot and diff blobs share one wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<M, D> {
    pub kind: String,
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub metadata: M,
    pub data: D,
}

impl<M, D> Envelope<M, D> {
    pub fn new(kind: impl Into<String>, api_version: impl Into<String>, metadata: M, data: D) -> Self {
        Self {
            kind: kind.into(),
            api_version: api_version.into(),
            metadata,
            data,
        }
    }
}

/// Just enough of the envelope to route a decode: the kind tag and the
/// version string, read before the rest of the payload is trusted.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeHeader {
    pub kind: String,
    #[serde(rename = "apiVersion")]
    pub api_version: String,
}
