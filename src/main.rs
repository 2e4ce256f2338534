use std::fs::OpenOptions;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devdash::app::AppContext;
use devdash::cli::{commands, Cli, Commands, Source};
use devdash::config::Config;
use devdash::dashboard::Dashboard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // The TUI owns the terminal, so its logs go to a file.
    if matches!(command, Commands::Tui) {
        let log_path = AppContext::data_dir()?.join("devdash.log");
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false))
            .with(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }

    let mut config = Config::load()?;
    if let Some(concurrency) = cli.concurrency {
        config.feeds.enrich_concurrency = concurrency;
    }
    let ctx = AppContext::new(config, None)?;

    match command {
        Commands::Tui => {
            devdash::tui::run(Arc::new(ctx)).await?;
        }
        Commands::Repos(args) => {
            let mut dash = Dashboard::from_context(&ctx)?;
            commands::list_repos(&mut dash, &args).await?;
        }
        Commands::Questions(args) => {
            let mut dash = Dashboard::from_context(&ctx)?;
            commands::list_questions(&mut dash, &args).await?;
        }
        Commands::Articles(args) => {
            let mut dash = Dashboard::from_context(&ctx)?;
            commands::list_articles(&mut dash, &args).await?;
        }
        Commands::Saved { source, clear, yes } => {
            let mut dash = Dashboard::from_context(&ctx)?;
            match source {
                Source::Repos => commands::saved(&mut dash.saved_repos, clear, yes)?,
                Source::Questions => commands::saved(&mut dash.saved_questions, clear, yes)?,
                Source::Articles => commands::saved(&mut dash.saved_articles, clear, yes)?,
            }
        }
        Commands::Starred => {
            commands::starred(&ctx).await?;
        }
        Commands::Stats => {
            commands::stats(&ctx).await?;
        }
    }

    Ok(())
}
