use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use platformwatch::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    platformwatch::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        Command::Run(args) => {
            platformwatch::track::run(args).await.context("run")?;
        }
        Command::Dedup(args) => {
            platformwatch::dedup::run(args).context("dedup")?;
        }
        Command::Classify(args) => {
            platformwatch::classify::run(args)
                .await
                .context("classify")?;
        }
        Command::Stats(args) => {
            platformwatch::stats::run(args).context("stats")?;
        }
    }

    Ok(())
}
