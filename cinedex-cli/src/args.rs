//! Command line argument parsing for the cinedex CLI using clap.

use std::path::PathBuf;

use cinedex_imdb::{DEFAULT_BASE_URL, DEFAULT_CHART_URL, DEFAULT_OMDB_URL, DEFAULT_OUTPUT};
use cinedex_push::{
    BatchPolicy, DEFAULT_DOCUMENT_BATCH_SIZE, DEFAULT_FIELD_BATCH_SIZE, DEFAULT_TEST_DOCUMENTS,
    DEFAULT_TEST_QUERY,
};
use clap::{Args, Parser, Subcommand};

/// Cinedex - scrape movie metadata and push it to a hosted search index
#[derive(Parser, Debug, Clone)]
#[command(name = "cinedex")]
#[command(about = "Scrape movie metadata and push it to a hosted search index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Cinedex Contributors")]
#[command(long_about = None)]
pub struct CinedexArgs {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (organization, source, hosts)
    #[arg(long, env = "CINEDEX_SETTINGS", default_value = "settings.toml", global = true)]
    pub settings: PathBuf,

    /// Credentials file (API token, SSH key)
    #[arg(long, env = "CINEDEX_CREDENTIALS", default_value = "credentials.toml", global = true)]
    pub credentials: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CinedexArgs {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Scrape the top chart and write one JSON record per movie
    #[command(name = "fetch-documents-from-imdb")]
    FetchDocumentsFromImdb(FetchArgs),

    /// Create index fields from a JSON array of definitions
    #[command(name = "add-fields-from-file")]
    AddFieldsFromFile(AddFieldsArgs),

    /// Encode and push documents from a JSONL file
    #[command(name = "push-documents-from-file")]
    PushDocumentsFromFile(PushDocumentsArgs),

    /// Compare a reference file's row count with the indexed match count
    #[command(name = "test-query")]
    TestQuery(TestQueryArgs),

    /// Print the SSH reverse tunnel command for the remote machine
    #[command(name = "reverse-proxy-command")]
    ReverseProxyCommand,
}

/// Arguments for scraping the chart
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Site root; document ids are built from it
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Chart path appended to the site root
    #[arg(long, default_value = DEFAULT_CHART_URL)]
    pub chart_url: String,

    /// Output JSONL file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// OMDb API endpoint
    #[arg(long, default_value = DEFAULT_OMDB_URL)]
    pub omdb_url: String,
}

/// Arguments for creating fields
#[derive(Args, Debug, Clone)]
pub struct AddFieldsArgs {
    /// JSON file holding an array of field definitions
    #[arg(value_name = "FIELDS_FILE")]
    pub path: PathBuf,

    /// Field definitions per request
    #[arg(short, long, default_value_t = DEFAULT_FIELD_BATCH_SIZE)]
    pub batch_size: usize,

    /// Skip remaining batches after the first failure
    #[arg(long)]
    pub stop_on_first_failure: bool,
}

impl AddFieldsArgs {
    pub fn policy(&self) -> cinedex_push::Result<BatchPolicy> {
        batch_policy(self.batch_size, self.stop_on_first_failure)
    }
}

/// Arguments for pushing documents
#[derive(Args, Debug, Clone)]
pub struct PushDocumentsArgs {
    /// JSONL file with one record per line
    #[arg(value_name = "DOCUMENT_FILE")]
    pub path: PathBuf,

    /// Documents per uploaded file
    #[arg(short, long, default_value_t = DEFAULT_DOCUMENT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Skip remaining batches after the first failure
    #[arg(long)]
    pub stop_on_first_failure: bool,
}

impl PushDocumentsArgs {
    pub fn policy(&self) -> cinedex_push::Result<BatchPolicy> {
        batch_policy(self.batch_size, self.stop_on_first_failure)
    }
}

/// Arguments for the verification query
#[derive(Args, Debug, Clone)]
pub struct TestQueryArgs {
    /// Tab-separated reference file; one row per expected document
    #[arg(short, long, default_value = DEFAULT_TEST_DOCUMENTS)]
    pub path: PathBuf,

    /// Query sent to the search endpoint
    #[arg(long, default_value = DEFAULT_TEST_QUERY)]
    pub query: String,
}

fn batch_policy(batch_size: usize, stop_on_first_failure: bool) -> cinedex_push::Result<BatchPolicy> {
    BatchPolicy::builder()
        .batch_size(batch_size)
        .stop_on_first_failure(stop_on_first_failure)
        .build()
}
