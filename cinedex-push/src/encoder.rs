//! Payload compression for push submissions.
//!
//! A [`Record`] carries its body as plain text in `data`. Before submission
//! the body is zlib-compressed, base64-encoded into `compressedBinaryData`,
//! and tagged with its compression type and file extension.

use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tracing::warn;

use crate::document::{CompressionType, EncodedRecord, Record};
use crate::error::{PushError, Result};

/// Extension reported for every encoded payload.
pub const FILE_EXTENSION: &str = ".txt";

/// Keys the encoder adds; a record may not already use them.
pub const RESERVED_KEYS: [&str; 3] = ["compressedBinaryData", "compressionType", "fileExtension"];

/// Default zlib level.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Turns [`Record`]s into [`EncodedRecord`]s.
///
/// Encoding is deterministic for a given level.
#[derive(Debug, Clone, Copy)]
pub struct DocumentEncoder {
    level: Compression,
}

impl Default for DocumentEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_LEVEL)
    }
}

impl DocumentEncoder {
    /// Create an encoder with a zlib level between 0 and 9.
    pub fn new(level: u32) -> Self {
        Self { level: Compression::new(level.min(9)) }
    }

    /// Compress the payload and attach compression metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::Encode`] if the record has an empty
    /// `documentId`, or if its metadata already uses a reserved key.
    pub fn encode(&self, record: Record) -> Result<EncodedRecord> {
        if record.document_id.trim().is_empty() {
            return Err(PushError::Encode("documentId must not be empty".to_string()));
        }
        if let Some(key) = RESERVED_KEYS.iter().find(|k| record.metadata.contains_key(**k)) {
            return Err(PushError::Encode(format!(
                "document '{}' already defines reserved field `{key}`",
                record.document_id
            )));
        }

        let compressed = self.compress(record.data.as_bytes())?;

        Ok(EncodedRecord {
            document_id: record.document_id,
            compressed_binary_data: STANDARD.encode(compressed),
            compression_type: CompressionType::Zlib,
            file_extension: FILE_EXTENSION.to_string(),
            metadata: record.metadata,
        })
    }

    /// Encode every record, keeping input order.
    ///
    /// Rejected records are logged and returned separately; they never
    /// reach a batch.
    pub fn encode_all(&self, records: Vec<Record>) -> (Vec<EncodedRecord>, Vec<PushError>) {
        let mut encoded = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        for record in records {
            match self.encode(record) {
                Ok(doc) => encoded.push(doc),
                Err(e) => {
                    warn!(error = %e, "skipping record");
                    rejected.push(e);
                }
            }
        }
        (encoded, rejected)
    }

    fn compress(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), self.level);
        encoder
            .write_all(bytes)
            .map_err(|e| PushError::Encode(format!("zlib compression failed: {e}")))?;
        encoder.finish().map_err(|e| PushError::Encode(format!("zlib compression failed: {e}")))
    }
}

/// Encode a record with the default compression level.
pub fn encode_document(record: Record) -> Result<EncodedRecord> {
    DocumentEncoder::default().encode(record)
}

/// Reverse the payload encoding: base64 decode, then inflate.
pub fn decode_payload(encoded: &str) -> Result<String> {
    let compressed = STANDARD
        .decode(encoded)
        .map_err(|e| PushError::Encode(format!("invalid base64 payload: {e}")))?;
    let mut text = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut text)
        .map_err(|e| PushError::Encode(format!("zlib decompression failed: {e}")))?;
    Ok(text)
}
