//! Field definition submission.

use async_trait::async_trait;
use tracing::info;

use crate::batch::BatchSink;
use crate::client::PlatformClient;
use crate::document::FieldDefinition;
use crate::error::Result;

/// Sends batches of [`FieldDefinition`]s to the field-creation endpoint.
pub struct FieldSubmitter<'a> {
    client: &'a PlatformClient,
    organization_id: String,
}

impl<'a> FieldSubmitter<'a> {
    pub fn new(client: &'a PlatformClient, organization_id: impl Into<String>) -> Self {
        Self { client, organization_id: organization_id.into() }
    }
}

#[async_trait]
impl BatchSink<FieldDefinition> for FieldSubmitter<'_> {
    fn name(&self) -> &str {
        "fields"
    }

    async fn submit(&self, batch: &[FieldDefinition]) -> Result<()> {
        self.client.create_fields(&self.organization_id, batch).await?;
        info!(count = batch.len(), "Added {}", batch.len());
        Ok(())
    }
}
