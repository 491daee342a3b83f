//! Document submission through the Push API file workflow.
//!
//! Each batch goes through three calls:
//!
//! 1. request a staging slot (upload URI, file id, required headers),
//! 2. upload `{"addOrUpdate": [...]}` to the slot,
//! 3. ask the source to ingest the uploaded file.
//!
//! A failure at any step ends that batch; later steps are not attempted.
//! Slots are never shared between batches.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::batch::BatchSink;
use crate::client::PlatformClient;
use crate::document::EncodedRecord;
use crate::error::Result;

/// Upload body for one batch.
#[derive(Debug, Serialize)]
pub struct AddOrUpdate<'a> {
    #[serde(rename = "addOrUpdate")]
    pub add_or_update: &'a [EncodedRecord],
}

/// Pushes batches of [`EncodedRecord`]s into a source.
pub struct DocumentPusher<'a> {
    client: &'a PlatformClient,
    organization_id: String,
    source_id: String,
}

impl<'a> DocumentPusher<'a> {
    pub fn new(
        client: &'a PlatformClient,
        organization_id: impl Into<String>,
        source_id: impl Into<String>,
    ) -> Self {
        Self { client, organization_id: organization_id.into(), source_id: source_id.into() }
    }

    /// Run the staging, upload and ingest steps for one batch.
    ///
    /// Returns the file id the batch was uploaded under.
    pub async fn push(&self, batch: &[EncodedRecord]) -> Result<String> {
        let container = self.client.request_file_container(&self.organization_id).await?;
        debug!(
            upload_uri = %container.upload_uri,
            file_id = %container.file_id,
            headers = ?container.required_headers.keys().collect::<Vec<_>>(),
            "received file container"
        );

        self.client.upload_file(&container, &AddOrUpdate { add_or_update: batch }).await?;
        self.client
            .push_file(&self.organization_id, &self.source_id, &container.file_id)
            .await?;

        Ok(container.file_id)
    }
}

#[async_trait]
impl BatchSink<EncodedRecord> for DocumentPusher<'_> {
    fn name(&self) -> &str {
        "documents"
    }

    async fn submit(&self, batch: &[EncodedRecord]) -> Result<()> {
        let file_id = self.push(batch).await?;
        info!(file_id = %file_id, count = batch.len(), "Pushed {} documents.", batch.len());
        Ok(())
    }
}
