use std::io::{self, BufRead, Write};

use crate::app::{AppContext, DashError, Result};
use crate::cli::FeedArgs;
use crate::dashboard::Dashboard;
use crate::domain::{FeedItem, Mode, SortKey};
use crate::feed::{FeedController, Outcome, MAX_PAGES};
use crate::provider::Provider;
use crate::store::{Confirmation, SavedItems};

pub async fn list_repos(dash: &mut Dashboard, args: &FeedArgs) -> Result<()> {
    print_page(&mut dash.repos, &dash.saved_repos, args).await
}

pub async fn list_questions(dash: &mut Dashboard, args: &FeedArgs) -> Result<()> {
    print_page(&mut dash.questions, &dash.saved_questions, args).await
}

pub async fn list_articles(dash: &mut Dashboard, args: &FeedArgs) -> Result<()> {
    print_page(&mut dash.articles, &dash.saved_articles, args).await
}

fn parse_sort<S: SortKey>(name: &str) -> Result<S> {
    S::parse(name).ok_or_else(|| {
        let known: Vec<&str> = S::all().iter().map(|s| s.name()).collect();
        DashError::Validation(format!(
            "Unknown sort '{}'. Expected one of: {}",
            name,
            known.join(", ")
        ))
    })
}

async fn print_page<P: Provider>(
    feed: &mut FeedController<P>,
    saved: &SavedItems<P::Item>,
    args: &FeedArgs,
) -> Result<()> {
    if let Some(name) = &args.sort {
        // The ticket is superseded by the load below.
        feed.change_sort(parse_sort(name)?);
    }

    let ticket = match (&args.search, args.page) {
        (Some(term), page) => feed.search_from(term, page.unwrap_or(1))?,
        (None, Some(page)) if (1..=MAX_PAGES).contains(&page) => feed.load_discovery_page(page),
        (None, Some(_)) => {
            return Err(DashError::Validation(format!(
                "Page must be between 1 and {}.",
                MAX_PAGES
            )))
        }
        (None, None) => feed.load_default(),
    };
    let outcome = feed.run(ticket).await;
    if let (Outcome::Failed, Some(message)) = (outcome, feed.error()) {
        return Err(DashError::Other(message.to_string()));
    }

    print_heading(feed);
    if feed.items().is_empty() {
        println!("No {} found", feed.provider().noun());
        return Ok(());
    }
    for item in feed.items() {
        print_item(item, saved.contains(item.item_id()));
    }
    print_pages(feed);
    Ok(())
}

fn print_heading<P: Provider>(feed: &FeedController<P>) {
    let provider = feed.provider();
    match (feed.mode(), feed.term()) {
        (Mode::Search, Some(term)) => println!(
            "{} for {} \"{}\" (sorted by {}, page {})\n",
            capitalize(provider.noun()),
            provider.term_kind(),
            term,
            feed.sort().label(),
            feed.page()
        ),
        _ => println!(
            "Popular {} (sorted by {})\n",
            provider.noun(),
            feed.sort().label()
        ),
    }
}

fn print_pages<P: Provider>(feed: &FeedController<P>) {
    if feed.mode() != Mode::Search {
        return;
    }
    let window = feed.window();
    let pages: Vec<String> = window
        .pages
        .clone()
        .map(|p| {
            if p == window.current {
                format!("[{}]", p)
            } else {
                p.to_string()
            }
        })
        .collect();
    let mut line = pages.join(" ");
    if let Some(prev) = window.prev_chunk {
        line = format!("<{} {}", prev, line);
    }
    if let Some(next) = window.next_chunk {
        line = format!("{} {}>", line, next);
    }
    println!("Pages: {}", line);
}

fn print_item<T: FeedItem>(item: &T, is_saved: bool) {
    let marker = if is_saved { "♥" } else { " " };
    println!("{} {}", marker, item.title());
    println!("    {}  {}", item.byline(), item.stats_line());
    println!("    {}\n", item.link());
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Print a saved set, or clear it after confirmation.
pub fn saved<T: FeedItem>(set: &mut SavedItems<T>, clear: bool, yes: bool) -> Result<()> {
    if clear {
        if set.is_empty() {
            println!("No saved {}", set.noun());
            return Ok(());
        }
        let confirmation = if yes {
            Confirmation::Confirmed
        } else {
            confirm(&format!(
                "Remove all {} saved {}? [y/N] ",
                set.len(),
                set.noun()
            ))?
        };
        if set.clear_all(confirmation)? {
            println!("Cleared saved {}", set.noun());
        } else {
            println!("Nothing removed");
        }
        return Ok(());
    }

    if set.is_empty() {
        println!("No saved {}", set.noun());
        return Ok(());
    }
    match set.capacity() {
        Some(limit) => println!("{} of {} saved {}\n", set.len(), limit, set.noun()),
        None => println!("{} saved {}\n", set.len(), set.noun()),
    }
    for item in set.items() {
        print_item(item, true);
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<Confirmation> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(parse_confirmation(&answer))
}

fn parse_confirmation(answer: &str) -> Confirmation {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Confirmation::Confirmed,
        _ => Confirmation::Declined,
    }
}

pub async fn starred(ctx: &AppContext) -> Result<()> {
    let repos = ctx.github.starred().await?;
    if repos.is_empty() {
        println!("No starred repositories");
        return Ok(());
    }
    for repo in &repos {
        print_item(repo, false);
    }
    println!("{} starred repositories", repos.len());
    Ok(())
}

pub async fn stats(ctx: &AppContext) -> Result<()> {
    let stats = ctx.github.viewer_stats().await?;
    match &stats.name {
        Some(name) => println!("{} (@{})", name, stats.login),
        None => println!("@{}", stats.login),
    }
    println!("  Followers:            {}", stats.followers);
    println!("  Public repositories:  {}", stats.public_repos);
    println!("  Stars received:       {}", stats.total_stars);
    println!("  Merged pull requests: {}", stats.merged_pull_requests);
    println!("  Open pull requests:   {}", stats.open_pull_requests);
    println!("  Closed issues:        {}", stats.closed_issues);
    println!("  Open issues:          {}", stats.open_issues);
    println!("  Contributions:        {}", stats.total_contributions);
    Ok(())
}
