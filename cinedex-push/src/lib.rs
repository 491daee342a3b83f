//! Batching, encoding and Push API submission for cinedex.
//!
//! This crate provides:
//! - [`Batcher`] and the [`BatchSink`] seam for order-preserving batch submission
//! - [`DocumentEncoder`] for zlib + base64 payload encoding
//! - [`FieldSubmitter`] and [`DocumentPusher`] platform sinks
//! - [`PushPipeline`] tying them to the on-disk inputs
//! - TOML-backed [`PlatformConfig`]

pub mod batch;
pub mod client;
pub mod config;
pub mod document;
pub mod encoder;
pub mod error;
pub mod fields;
pub mod pipeline;
pub mod pusher;
pub mod query;
pub mod source;

pub use batch::{BatchReport, BatchResult, BatchSink, BatchStatus, Batcher, batch_ranges};
pub use client::{FileContainer, PlatformClient};
pub use config::{
    BatchPolicy, BatchPolicyBuilder, Credentials, DEFAULT_DOCUMENT_BATCH_SIZE,
    DEFAULT_FIELD_BATCH_SIZE, PlatformConfig, Settings,
};
pub use document::{CompressionType, EncodedRecord, FieldDefinition, Record};
pub use encoder::{DocumentEncoder, decode_payload, encode_document};
pub use error::{PushError, Result};
pub use fields::FieldSubmitter;
pub use pipeline::{PushPipeline, PushSummary};
pub use pusher::DocumentPusher;
pub use query::{DEFAULT_TEST_DOCUMENTS, DEFAULT_TEST_QUERY, QueryCheck, count_tsv_rows};
pub use source::{read_field_definitions, read_records};
