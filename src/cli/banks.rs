use clap::Subcommand;

use crate::domain::{BankDraft, BankId};
use crate::infrastructure::repository::BankRepository;

#[derive(Subcommand)]
pub enum BanksCommand {
    /// List all bank records
    List,

    /// Show a single bank
    Get { id: i64 },

    /// Create a bank record
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        bic: String,
        #[arg(long)]
        bank_code: String,
        #[arg(long)]
        country_code: String,
    },

    /// Replace a bank record
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        bic: String,
        #[arg(long)]
        bank_code: String,
        #[arg(long)]
        country_code: String,
    },

    /// Delete a bank record
    Delete { id: i64 },

    /// Search banks by name
    Search { name: String },

    /// List banks for a country code
    Country { code: String },
}

pub async fn run(command: BanksCommand, repo: &BankRepository) -> anyhow::Result<()> {
    match command {
        BanksCommand::List => {
            let banks = repo.list().await?;
            println!("{}", serde_json::to_string_pretty(&banks)?);
        }
        BanksCommand::Get { id } => {
            let bank = repo.get(BankId::new(id)).await?;
            println!("{}", serde_json::to_string_pretty(&bank)?);
        }
        BanksCommand::Create {
            name,
            bic,
            bank_code,
            country_code,
        } => {
            let bank = repo
                .create(BankDraft::new(name, bic, bank_code, country_code))
                .await?;
            println!("{}", serde_json::to_string_pretty(&bank)?);
        }
        BanksCommand::Update {
            id,
            name,
            bic,
            bank_code,
            country_code,
        } => {
            let bank = repo
                .update(
                    BankId::new(id),
                    BankDraft::new(name, bic, bank_code, country_code),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&bank)?);
        }
        BanksCommand::Delete { id } => {
            repo.delete(BankId::new(id)).await?;
            println!("Deleted bank {}", id);
        }
        BanksCommand::Search { name } => {
            let banks = repo.search_by_name(&name).await?;
            println!("{}", serde_json::to_string_pretty(&banks)?);
        }
        BanksCommand::Country { code } => {
            let banks = repo.by_country(&code).await?;
            println!("{}", serde_json::to_string_pretty(&banks)?);
        }
    }

    Ok(())
}
