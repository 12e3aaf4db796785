use anyhow::Result;
use clap::Parser;

use coinverse::{commands, logging, Cli};
use coinverse_session::{Services, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)?;
    let log_path = logging::init_logging(&settings.data_dir()?)?;
    tracing::info!(log_path = %log_path.display(), "CoinVerse CLI starting");

    let services = Services::from_settings(settings)?;
    let output = commands::execute(cli.command, &services).await?;
    println!("{output}");

    Ok(())
}
