use clap::Parser;
use iban_validator_client::cli::{self, Cli};
use iban_validator_client::config::AppConfig;
use iban_validator_client::infrastructure::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_logging(&config.logging);

    cli::run(cli, &config).await
}
