use clap::Parser;
use maildraft::cli::Cli;
use maildraft::logging::{init_from_env, init_logging, LoggingConfig};

fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (ignore errors if missing)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _guard = if cli.verbose {
        init_logging(LoggingConfig::from_env().with_level(tracing::Level::DEBUG))?
    } else {
        init_from_env()?
    };

    cli.run()
}
