//! Data types for records, encoded records and field definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One item to index, as produced by the ingestion source.
///
/// The identifier and payload are typed; every other field (`title`,
/// `plot`, `rating`, `year`, `genres`, ...) lives in `metadata` and is
/// carried through to the platform untouched, including explicit nulls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Unique document URI.
    #[serde(rename = "documentId")]
    pub document_id: String,
    /// Uncompressed textual payload.
    pub data: String,
    /// Provider-specific metadata.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Record {
    pub fn new(document_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self { document_id: document_id.into(), data: data.into(), metadata: Map::new() }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with_metadata("title", title.into())
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The display title, when it is a string.
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(Value::as_str)
    }
}

/// Compression applied to an encoded payload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompressionType {
    Zlib,
}

/// A [`Record`] whose payload has been compressed and made text-safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncodedRecord {
    #[serde(rename = "documentId")]
    pub document_id: String,
    /// Base64 of the compressed payload.
    #[serde(rename = "compressedBinaryData")]
    pub compressed_binary_data: String,
    #[serde(rename = "compressionType")]
    pub compression_type: CompressionType,
    #[serde(rename = "fileExtension")]
    pub file_extension: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// One index field definition, submitted exactly as authored.
///
/// The platform validates definitions; a missing or malformed `name`
/// fails only the batch that carries it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FieldDefinition(pub Map<String, Value>);

impl FieldDefinition {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}
