use clap::Parser;
use nazorat_hub_lib::commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    nazorat_hub_lib::run_cli(cli).await
}
