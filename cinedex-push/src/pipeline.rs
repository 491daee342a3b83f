//! End-to-end upload workflows.
//!
//! [`PushPipeline`] ties file readers, the encoder, the [`Batcher`] and the
//! platform sinks together for the three platform-facing commands.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinedex_push::{BatchPolicy, PlatformConfig, PushPipeline};
//!
//! let config = PlatformConfig::load("settings.toml", "credentials.toml")?;
//! let pipeline = PushPipeline::new(&config)?;
//! let summary = pipeline.push_documents_from_file("data/docs.jsonl", BatchPolicy::documents()).await?;
//! println!("{}", summary.report);
//! ```

use std::path::Path;

use tracing::info;

use crate::batch::{BatchReport, Batcher};
use crate::client::PlatformClient;
use crate::config::{BatchPolicy, PlatformConfig};
use crate::encoder::DocumentEncoder;
use crate::error::{PushError, Result};
use crate::fields::FieldSubmitter;
use crate::pusher::DocumentPusher;
use crate::query::{QueryCheck, run_test_query};
use crate::source::{read_field_definitions, read_records};

/// Outcome of a document push: encoder rejects plus the batch report.
#[derive(Debug)]
pub struct PushSummary {
    pub rejected: Vec<PushError>,
    pub report: BatchReport,
}

/// Orchestrates reading, encoding and batched submission.
pub struct PushPipeline<'a> {
    config: &'a PlatformConfig,
    client: PlatformClient,
    encoder: DocumentEncoder,
}

impl<'a> PushPipeline<'a> {
    /// Build a pipeline with a fresh authenticated client.
    pub fn new(config: &'a PlatformConfig) -> Result<Self> {
        Ok(Self { config, client: PlatformClient::new(config)?, encoder: DocumentEncoder::default() })
    }

    /// Replace the default encoder.
    pub fn with_encoder(mut self, encoder: DocumentEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn client(&self) -> &PlatformClient {
        &self.client
    }

    /// Read a JSON array of field definitions and create them in batches.
    ///
    /// # Errors
    ///
    /// Only input errors are returned; failed batches are in the report.
    pub async fn add_fields_from_file(
        &self,
        path: impl AsRef<Path>,
        policy: BatchPolicy,
    ) -> Result<BatchReport> {
        let fields = read_field_definitions(path)?;
        info!(count = fields.len(), "loaded field definitions");

        let submitter = FieldSubmitter::new(&self.client, self.config.organization_id());
        Ok(Batcher::new(policy).run(&fields, &submitter).await)
    }

    /// Read JSONL records, encode them, and push them in batches.
    ///
    /// # Errors
    ///
    /// Only input errors are returned; rejected records and failed batches
    /// are in the summary.
    pub async fn push_documents_from_file(
        &self,
        path: impl AsRef<Path>,
        policy: BatchPolicy,
    ) -> Result<PushSummary> {
        let records = read_records(path)?;
        let (documents, rejected) = self.encoder.encode_all(records);
        info!(encoded = documents.len(), rejected = rejected.len(), "encoded documents");

        let pusher = DocumentPusher::new(
            &self.client,
            self.config.organization_id(),
            self.config.source_id(),
        );
        let report = Batcher::new(policy).run(&documents, &pusher).await;
        Ok(PushSummary { rejected, report })
    }

    /// Compare the row count of a TSV file with the indexed match count.
    pub async fn test_query(&self, path: impl AsRef<Path>, query: &str) -> Result<QueryCheck> {
        run_test_query(&self.client, self.config.organization_id(), path, query).await
    }
}
