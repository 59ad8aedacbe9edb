//! CLI for exercising the IBAN Validator API
//!
//! Subcommands map one-to-one onto the repository operations; output is the
//! resolved value as pretty-printed JSON.

pub mod banks;
pub mod validate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::api::HttpApiClient;
use crate::infrastructure::repository::{BankRepository, IbanRepository};

/// Client for the IBAN Validator API
#[derive(Parser)]
#[command(name = "iban-validator-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage bank records
    Banks {
        #[command(subcommand)]
        command: banks::BanksCommand,
    },

    /// Validate an IBAN
    Validate(validate::ValidateArgs),
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let client = Arc::new(HttpApiClient::with_timeout(
        config.api.base_url.as_str(),
        std::time::Duration::from_secs(config.api.timeout_secs),
    )?);

    match cli.command {
        Command::Banks { command } => {
            let repo = BankRepository::new(client);
            banks::run(command, &repo).await
        }
        Command::Validate(args) => {
            let repo = IbanRepository::new(client);
            validate::run(args, &repo).await
        }
    }
}
