//! Chart download and JSONL record export.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{error, info};

use crate::chart::{ChartEntry, parse_chart};
use crate::error::{ImdbError, Result};
use crate::provider::MetadataProvider;

/// Default site root.
pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com";

/// Default chart path, appended to the base URL.
pub const DEFAULT_CHART_URL: &str = "/chart/top?ref_=helpms_ih_gi_siteindex";

/// Default output location.
pub const DEFAULT_OUTPUT: &str = "data/docs.jsonl";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) cinedex/0.1";

/// Counts from one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub found: usize,
    pub written: usize,
    pub failed: usize,
}

/// Scrapes a chart and resolves each entry through a [`MetadataProvider`].
pub struct ChartSource<P> {
    client: reqwest::Client,
    base_url: String,
    chart_url: String,
    provider: P,
}

impl<P: MetadataProvider> ChartSource<P> {
    /// Create a source for the default chart.
    pub fn new(provider: P) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        let client = reqwest::Client::builder().default_headers(headers).build().map_err(|e| {
            ImdbError::Request { url: DEFAULT_BASE_URL.to_string(), message: e.to_string() }
        })?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            chart_url: DEFAULT_CHART_URL.to_string(),
            provider,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_chart_url(mut self, chart_url: impl Into<String>) -> Self {
        self.chart_url = chart_url.into();
        self
    }

    /// Download the chart page and list its movies.
    pub async fn fetch_chart(&self) -> Result<Vec<ChartEntry>> {
        let url = format!("{}{}", self.base_url, self.chart_url);
        info!(url = %url, "fetching chart");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ImdbError::Request { url: url.clone(), message: e.to_string() })?;
        if !response.status().is_success() {
            return Err(ImdbError::Status { url, status: response.status().as_u16() });
        }
        let html = response
            .text()
            .await
            .map_err(|e| ImdbError::Request { url: url.clone(), message: e.to_string() })?;

        let entries = parse_chart(&html);
        info!(count = entries.len(), "parsed chart");
        Ok(entries)
    }

    /// Write one record per chart movie to `output`.
    ///
    /// The chart is fetched before the file is created, so a failed chart
    /// request leaves nothing on disk. Movies the provider cannot resolve
    /// are logged and skipped.
    pub async fn export(&self, output: impl AsRef<Path>) -> Result<FetchSummary> {
        let entries = self.fetch_chart().await?;
        let output = output.as_ref();
        let io_err = |source| ImdbError::Io { path: output.to_path_buf(), source };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut writer = BufWriter::new(File::create(output).map_err(io_err)?);

        let mut summary = FetchSummary { found: entries.len(), ..FetchSummary::default() };
        for (i, entry) in entries.iter().enumerate() {
            match self.provider.movie(&entry.title_id).await {
                Ok(movie) => {
                    let record = movie.into_record(format!("{}{}", self.base_url, entry.href));
                    serde_json::to_writer(&mut writer, &record)?;
                    writer.write_all(b"\n").map_err(io_err)?;
                    summary.written += 1;
                }
                Err(e) => {
                    error!(
                        provider = self.provider.name(),
                        title_id = %entry.title_id,
                        error = %e,
                        "lookup failed"
                    );
                    summary.failed += 1;
                }
            }
            info!("Finished {} of {}", i + 1, entries.len());
        }

        writer.flush().map_err(io_err)?;
        Ok(summary)
    }
}
