//! Post-upload verification: compare expected and indexed document counts.

use std::fmt;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::info;

use crate::client::PlatformClient;
use crate::error::{PushError, Result};

/// Query matching the uploaded test documents.
pub const DEFAULT_TEST_QUERY: &str = "@uri=\"*dummyfiles*\"";

/// Default location of the expected-documents file.
pub const DEFAULT_TEST_DOCUMENTS: &str = "data/test_documents.tsv";

/// Expected versus indexed document count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCheck {
    pub expected: u64,
    pub found: u64,
}

impl QueryCheck {
    pub fn matches(&self) -> bool {
        self.expected == self.found
    }
}

impl fmt::Display for QueryCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expected {}, found {} matching documents.", self.expected, self.found)?;
        if !self.matches() {
            let diff = self.expected.abs_diff(self.found);
            let direction = if self.found < self.expected { "missing" } else { "unexpected" };
            write!(f, "\nMismatch: {diff} {direction} document(s).")?;
        }
        Ok(())
    }
}

/// Count data rows (header excluded) in a tab-separated file.
pub fn count_tsv_rows(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PushError::io(path, e))?;
    let mut reader =
        ReaderBuilder::new().delimiter(b'\t').has_headers(true).flexible(true).from_reader(file);

    let mut rows = 0;
    for record in reader.records() {
        record?;
        rows += 1;
    }
    Ok(rows)
}

/// Count the rows of `path`, run `query`, and compare.
pub async fn run_test_query(
    client: &PlatformClient,
    organization_id: &str,
    path: impl AsRef<Path>,
    query: &str,
) -> Result<QueryCheck> {
    let expected = count_tsv_rows(path)?;
    let found = client.search_total_count(organization_id, query).await?;
    let check = QueryCheck { expected, found };
    info!(expected, found, matches = check.matches(), "verification query completed");
    Ok(check)
}
