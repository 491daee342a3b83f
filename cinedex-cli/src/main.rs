use anyhow::Context;
use cinedex_cli::{CinedexArgs, execute_command};
use cinedex_push::PlatformConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CinedexArgs::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = PlatformConfig::load(&args.settings, &args.credentials).with_context(|| {
        format!(
            "failed to load configuration from {} and {}",
            args.settings.display(),
            args.credentials.display()
        )
    })?;

    execute_command(&args, &config).await
}
