use clap::Args;

use crate::infrastructure::repository::IbanRepository;

#[derive(Args)]
pub struct ValidateArgs {
    /// The IBAN to validate; spacing and case are ignored
    pub iban: String,
}

pub async fn run(args: ValidateArgs, repo: &IbanRepository) -> anyhow::Result<()> {
    let result = repo.validate(&args.iban).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
