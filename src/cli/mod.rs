pub mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "devdash")]
#[command(
    about = "A terminal dashboard for GitHub repositories, Stack Overflow questions and dev.to articles",
    long_about = None
)]
pub struct Cli {
    /// Simultaneous pull-request lookups when listing repositories
    /// (overrides `enrich_concurrency` in the config file)
    #[arg(short, long, global = true)]
    pub concurrency: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default)
    Tui,
    /// Print one page of GitHub repositories
    Repos(FeedArgs),
    /// Print one page of Stack Overflow questions
    Questions(FeedArgs),
    /// Print one page of dev.to articles
    Articles(FeedArgs),
    /// List or clear a saved set
    Saved {
        source: Source,

        /// Remove every saved item
        #[arg(long)]
        clear: bool,

        /// Skip the confirmation prompt when clearing
        #[arg(short, long, requires = "clear")]
        yes: bool,
    },
    /// List repositories starred by the GitHub token owner
    Starred,
    /// Show GitHub statistics for the token owner
    Stats,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FeedArgs {
    /// Topic (repositories) or tag (questions, articles) to search for
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort key, e.g. "stars", "votes", "published_at"
    #[arg(long)]
    pub sort: Option<String>,

    /// Page number (1-50)
    #[arg(short, long)]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Repos,
    Questions,
    Articles,
}
