//! OMDb metadata provider.
//!
//! Looks titles up through `GET {base}/?i={title_id}&plot=full&apikey=…`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::{ImdbError, Result};
use crate::provider::{MetadataProvider, MovieMetadata};

/// The default OMDb API endpoint.
pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com";

const PROVIDER: &str = "OMDb";

/// A [`MetadataProvider`] backed by the OMDb HTTP API.
pub struct OmdbProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbProvider {
    /// Create a provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ImdbError::Provider {
                provider: PROVIDER.into(),
                message: "API key must not be empty".into(),
            });
        }
        Ok(Self { client: reqwest::Client::new(), base_url: DEFAULT_OMDB_URL.into(), api_key })
    }

    /// Point the provider at a different host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn provider_error(message: impl Into<String>) -> ImdbError {
        ImdbError::Provider { provider: PROVIDER.into(), message: message.into() }
    }
}

#[derive(Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Language")]
    language: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
}

/// OMDb writes `N/A` for unknown values.
fn known(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty() && v != "N/A")
}

fn split_list(value: Option<String>) -> Vec<String> {
    known(value)
        .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

impl OmdbResponse {
    fn into_metadata(self) -> MovieMetadata {
        MovieMetadata {
            title: known(self.title).unwrap_or_default(),
            plot: known(self.plot).unwrap_or_default(),
            rating: known(self.imdb_rating).and_then(|r| r.parse().ok()),
            votes: known(self.imdb_votes).and_then(|v| v.replace(',', "").parse().ok()),
            languages: split_list(self.language),
            // Series report ranges such as `2008–2013`.
            year: known(self.year).and_then(|y| y.get(..4).and_then(|y| y.parse().ok())),
            genres: split_list(self.genre),
            poster_url: known(self.poster),
        }
    }
}

#[async_trait]
impl MetadataProvider for OmdbProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn movie(&self, title_id: &str) -> Result<MovieMetadata> {
        let url = format!("{}/", self.base_url);
        debug!(provider = PROVIDER, title_id, "looking up movie");

        let response = self
            .client
            .get(&url)
            .query(&[("i", title_id), ("plot", "full"), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API key.
                let e = e.without_url();
                error!(provider = PROVIDER, title_id, error = %e, "request failed");
                Self::provider_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!(provider = PROVIDER, title_id, %status, "API error");
            return Err(Self::provider_error(format!("API returned {status} for {title_id}")));
        }

        let body: OmdbResponse = response
            .json()
            .await
            .map_err(|e| {
                let e = e.without_url();
                Self::provider_error(format!("failed to parse response: {e}"))
            })?;

        if !body.response.eq_ignore_ascii_case("true") {
            let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(Self::provider_error(format!("{title_id}: {reason}")));
        }

        Ok(body.into_metadata())
    }
}
