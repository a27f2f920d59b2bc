use std::process::ExitCode;

use clap::Parser;

mod app;
mod cli;
mod config;
mod db;
mod display;
mod error;
mod homepage;
mod models;
mod workflow;

use app::App;
use cli::Cli;
use config::Config;
use error::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Aborting");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    // No mode selected: nothing to do
    let Some(mode) = args.mode() else {
        return Ok(());
    };

    let mut config = if args.no_config {
        Config::default()
    } else {
        Config::load()?
    };
    if let Some(db) = &args.db {
        config.db_path = Some(db.to_string_lossy().to_string());
    }
    if let Some(url) = &args.url {
        config.homepage_url = url.clone();
    }
    tracing::debug!(db_path = ?config.db_path, homepage = %config.homepage_url, ?mode, "Starting");

    let mut app = App::new(config).await?;
    app.run(mode, args.json).await
}
