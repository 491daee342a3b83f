//! Movie metadata provider trait and the record shape it feeds.

use async_trait::async_trait;
use cinedex_push::Record;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File type reported for scraped movie pages.
pub const MOVIE_FILETYPE: &str = ".html";

/// Descriptive data for one movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    pub title: String,
    pub plot: String,
    pub rating: Option<f64>,
    pub votes: Option<u64>,
    pub languages: Vec<String>,
    pub year: Option<u32>,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
}

impl MovieMetadata {
    /// Build the JSONL record for this movie.
    ///
    /// Multi-valued fields are joined with `;`; the payload is left empty.
    pub fn into_record(self, document_id: impl Into<String>) -> Record {
        let mut record = Record::new(document_id, "")
            .with_title(self.title)
            .with_metadata("plot", self.plot.clone())
            .with_metadata("description", self.plot)
            .with_metadata("languages", self.languages.join(";"))
            .with_metadata("genres", self.genres.join(";"))
            .with_metadata("filetype", MOVIE_FILETYPE);
        if let Some(rating) = self.rating {
            record = record.with_metadata("rating", rating);
        }
        if let Some(votes) = self.votes {
            record = record.with_metadata("votes", votes);
        }
        if let Some(year) = self.year {
            record = record.with_metadata("year", year);
        }
        if let Some(poster_url) = self.poster_url {
            record = record.with_metadata("poster_url", poster_url);
        }
        record
    }
}

/// A source of [`MovieMetadata`] keyed by IMDb title id.
///
/// # Example
///
/// ```rust,ignore
/// use cinedex_imdb::{MetadataProvider, OmdbProvider};
///
/// let provider = OmdbProvider::new("api-key")?;
/// let movie = provider.movie("tt0111161").await?;
/// ```
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Short label used in logs and errors.
    fn name(&self) -> &str;

    /// Look up a movie by its `tt…` id.
    async fn movie(&self, title_id: &str) -> Result<MovieMetadata>;
}
