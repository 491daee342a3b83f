//! HTTP client for the platform's administration and Push APIs.
//!
//! One authenticated `reqwest::Client` is built per run with the bearer
//! token installed as a default header; it is reused for every platform
//! call. Uploads to a staging location go through a separate client that
//! only sends the headers the staging response asked for.

use std::collections::BTreeMap;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::PlatformConfig;
use crate::document::FieldDefinition;
use crate::error::{PushError, Result};

const FIELDS_ENDPOINT: &str = "fields/batch/create";
const FILES_ENDPOINT: &str = "files";
const UPLOAD_ENDPOINT: &str = "upload";
const DOCUMENTS_ENDPOINT: &str = "documents/batch";
const SEARCH_ENDPOINT: &str = "search/v2";

/// A staging slot issued by the Push API.
///
/// Lives for a single batch submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContainer {
    pub upload_uri: String,
    pub file_id: String,
    pub required_headers: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileContainerResponse {
    upload_uri: Option<String>,
    file_id: Option<String>,
    required_headers: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    total_count: Option<u64>,
}

/// Authenticated access to the platform.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    upload: reqwest::Client,
    platform_url: String,
    push_api_url: String,
}

impl PlatformClient {
    /// Build the client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::InvalidHeader`] if the token cannot be used as a
    /// header value.
    pub fn new(config: &PlatformConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.credentials.token))
            .map_err(|e| PushError::InvalidHeader {
                name: AUTHORIZATION.to_string(),
                message: e.to_string(),
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PushError::request("client", e))?;

        Ok(Self {
            http,
            upload: reqwest::Client::new(),
            platform_url: config.platform_url().to_string(),
            push_api_url: config.push_api_url().to_string(),
        })
    }

    /// Create a batch of index fields.
    pub async fn create_fields(&self, organization_id: &str, fields: &[FieldDefinition]) -> Result<()> {
        let url = format!(
            "{}/rest/organizations/{organization_id}/indexes/fields/batch/create",
            self.platform_url
        );
        debug!(url = %url, count = fields.len(), "creating fields");

        let response = self
            .http
            .post(&url)
            .json(fields)
            .send()
            .await
            .map_err(|e| PushError::request(FIELDS_ENDPOINT, e))?;
        ensure_success(FIELDS_ENDPOINT, response).await?;
        Ok(())
    }

    /// Ask the Push API for a staging slot.
    ///
    /// # Errors
    ///
    /// Returns [`PushError::MissingField`] if the response lacks the upload
    /// URI, file id or required headers.
    pub async fn request_file_container(&self, organization_id: &str) -> Result<FileContainer> {
        let url = format!("{}/push/v1/organizations/{organization_id}/files", self.push_api_url);
        debug!(url = %url, "requesting file container");

        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|e| PushError::request(FILES_ENDPOINT, e))?;
        let response = ensure_success(FILES_ENDPOINT, response).await?;
        let body: FileContainerResponse =
            response.json().await.map_err(|e| PushError::request(FILES_ENDPOINT, e))?;

        let missing = |field| PushError::MissingField { endpoint: FILES_ENDPOINT.to_string(), field };
        Ok(FileContainer {
            upload_uri: body.upload_uri.ok_or_else(|| missing("uploadUri"))?,
            file_id: body.file_id.ok_or_else(|| missing("fileId"))?,
            required_headers: body.required_headers.ok_or_else(|| missing("requiredHeaders"))?,
        })
    }

    /// Upload a JSON body to a staging slot with its required headers.
    pub async fn upload_file<T: Serialize + ?Sized>(
        &self,
        container: &FileContainer,
        body: &T,
    ) -> Result<()> {
        let headers = header_map(&container.required_headers)?;
        debug!(file_id = %container.file_id, "uploading file");

        let response = self
            .upload
            .put(&container.upload_uri)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| PushError::request(UPLOAD_ENDPOINT, e))?;
        ensure_success(UPLOAD_ENDPOINT, response).await?;
        Ok(())
    }

    /// Tell the source to ingest a previously uploaded file.
    pub async fn push_file(&self, organization_id: &str, source_id: &str, file_id: &str) -> Result<()> {
        let url = format!(
            "{}/push/v1/organizations/{organization_id}/sources/{source_id}/documents/batch",
            self.push_api_url
        );
        debug!(url = %url, file_id, "pushing document batch");

        let response = self
            .http
            .put(&url)
            .query(&[("fileId", file_id)])
            .send()
            .await
            .map_err(|e| PushError::request(DOCUMENTS_ENDPOINT, e))?;
        ensure_success(DOCUMENTS_ENDPOINT, response).await?;
        Ok(())
    }

    /// Run a search query and return its `totalCount`.
    pub async fn search_total_count(&self, organization_id: &str, query: &str) -> Result<u64> {
        let url = format!("{}/rest/search/v2", self.platform_url);
        debug!(url = %url, query, "running search");

        let response = self
            .http
            .post(&url)
            .query(&[("organizationId", organization_id)])
            .json(&json!({ "q": query }))
            .send()
            .await
            .map_err(|e| PushError::request(SEARCH_ENDPOINT, e))?;
        let response = ensure_success(SEARCH_ENDPOINT, response).await?;
        let body: SearchResponse =
            response.json().await.map_err(|e| PushError::request(SEARCH_ENDPOINT, e))?;

        body.total_count.ok_or(PushError::MissingField {
            endpoint: SEARCH_ENDPOINT.to_string(),
            field: "totalCount",
        })
    }
}

async fn ensure_success(endpoint: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(PushError::Status { endpoint: endpoint.to_string(), status: status.as_u16(), body })
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let invalid = |message: String| PushError::InvalidHeader { name: name.clone(), message };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
