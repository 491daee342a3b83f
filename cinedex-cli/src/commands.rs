//! Command implementations for the cinedex CLI.

use anyhow::{Context, Result, anyhow};
use cinedex_imdb::{ChartSource, OmdbProvider};
use cinedex_push::{PlatformConfig, PushPipeline};
use tracing::warn;

use crate::args::{AddFieldsArgs, CinedexArgs, Command, FetchArgs, PushDocumentsArgs, TestQueryArgs};
use crate::tunnel::reverse_proxy_command;

/// Execute a CLI command against a loaded configuration.
///
/// Failed batches are reported, not returned as errors.
pub async fn execute_command(args: &CinedexArgs, config: &PlatformConfig) -> Result<()> {
    match &args.command {
        Command::FetchDocumentsFromImdb(fetch_args) => fetch_documents(fetch_args, config).await,
        Command::AddFieldsFromFile(field_args) => add_fields(field_args, config).await,
        Command::PushDocumentsFromFile(push_args) => push_documents(push_args, config).await,
        Command::TestQuery(query_args) => test_query(query_args, config).await,
        Command::ReverseProxyCommand => {
            println!("{}", reverse_proxy_command(config, cfg!(windows)));
            Ok(())
        }
    }
}

async fn fetch_documents(args: &FetchArgs, config: &PlatformConfig) -> Result<()> {
    let api_key = config
        .credentials
        .omdb_api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| anyhow!("`omdb_api_key` is required in the credentials file to fetch movies"))?;

    let provider = OmdbProvider::new(api_key)?.with_base_url(&args.omdb_url);
    let source = ChartSource::new(provider)?
        .with_base_url(&args.base_url)
        .with_chart_url(&args.chart_url);

    let summary = source
        .export(&args.output)
        .await
        .with_context(|| format!("failed to export chart to {}", args.output.display()))?;

    println!(
        "Wrote {} of {} movies to {} ({} failed)",
        summary.written,
        summary.found,
        args.output.display(),
        summary.failed
    );
    Ok(())
}

async fn add_fields(args: &AddFieldsArgs, config: &PlatformConfig) -> Result<()> {
    let policy = args.policy()?;
    let pipeline = PushPipeline::new(config)?;

    let report = pipeline
        .add_fields_from_file(&args.path, policy)
        .await
        .with_context(|| format!("failed to read field definitions from {}", args.path.display()))?;

    println!("{report}");
    Ok(())
}

async fn push_documents(args: &PushDocumentsArgs, config: &PlatformConfig) -> Result<()> {
    let policy = args.policy()?;
    let pipeline = PushPipeline::new(config)?;

    let summary = pipeline
        .push_documents_from_file(&args.path, policy)
        .await
        .with_context(|| format!("failed to read documents from {}", args.path.display()))?;

    if !summary.rejected.is_empty() {
        warn!(count = summary.rejected.len(), "records rejected before upload");
        println!("Rejected {} record(s) before upload.", summary.rejected.len());
    }
    println!("{}", summary.report);
    Ok(())
}

async fn test_query(args: &TestQueryArgs, config: &PlatformConfig) -> Result<()> {
    let pipeline = PushPipeline::new(config)?;
    let check = pipeline.test_query(&args.path, &args.query).await?;
    println!("{check}");
    Ok(())
}
