//! # devdash
//!
//! A terminal dashboard that samples three developer feeds: GitHub
//! repositories, Stack Overflow questions and dev.to articles.
//!
//! ## Architecture
//!
//! ```text
//! Fetcher → Provider → FeedController → Dashboard → TUI / CLI
//!                                          ↓
//!                                   SavedItems → Store
//! ```
//!
//! Each feed is a [`FeedController`](feed::FeedController) driven by a
//! [`Provider`](provider::Provider). Every request the controller makes
//! carries a token; responses to superseded requests are dropped.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! devdash
//!
//! # Print one page of questions tagged rust, by votes
//! devdash questions --search rust --sort votes
//!
//! # List saved articles
//! devdash saved articles
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires the store, the HTTP fetcher and the
/// three providers together.
pub mod app;

/// Command-line interface using clap.
///
/// - `tui` - Launch the TUI (default)
/// - `repos|questions|articles [--search] [--sort] [--page]` - Print one page
/// - `saved <source> [--clear] [--yes]` - List or clear a saved set
/// - `starred` - List starred GitHub repositories
/// - `stats` - Show GitHub statistics
pub mod cli;

/// Configuration loaded from `~/.config/devdash/config.toml`.
pub mod config;

/// The three feeds plus saved sets and GitHub stars.
pub mod dashboard;

/// Repositories, questions, articles and their sort keys.
pub mod domain;

/// Discovery/search state, pagination and stale-response handling.
pub mod feed;

/// HTTP transport.
///
/// - [`Fetcher`](fetcher::Fetcher): one request, one body
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): bounded batch fetching
pub mod fetcher;

/// GitHub, Stack Exchange and dev.to adapters.
pub mod provider;

/// Key-value persistence and saved sets.
pub mod store;

/// Terminal user interface.
///
/// One tab per feed, a list with a details pane, page links in search
/// mode and a status bar.
pub mod tui;
