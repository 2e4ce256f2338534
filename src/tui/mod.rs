pub mod app;
pub mod event;
pub mod layout;

use std::future::Future;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::app::{AppContext, DashError, Result};
use crate::dashboard::{Dashboard, FeedCompletion};
use crate::domain::{FeedItem, Repo, SortKey};
use crate::feed::{Completion, FeedController, Outcome, Ticket};
use crate::provider::Provider;
use crate::store::{Confirmation, SavedItems, Toggle};

use self::app::{ActivePane, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Results sent back to the event loop by spawned tasks.
#[derive(Debug)]
enum Message {
    Feed(FeedCompletion),
    Star(StarUpdate),
}

/// Outcome of a GitHub star call made off the event loop.
#[derive(Debug)]
enum StarUpdate {
    Loaded(Result<Vec<Repo>>),
    Starred(Repo, Result<()>),
    Unstarred(Repo, Result<()>),
}

/// A page-level request on the active feed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FeedCommand {
    Refresh,
    SuggestMore,
    CycleSort,
    NextPage,
    PrevPage,
    NextChunk,
    PrevChunk,
    Clear,
    Search(String),
}

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut dash = Dashboard::from_context(&ctx)?;
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &ctx, &mut dash).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: &AppContext, dash: &mut Dashboard) -> Result<()> {
    let config = ctx.config.clone();
    let mut tui_app = TuiApp::new();
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Initial discovery pages
    let ticket = dash.repos.load_default();
    spawn(dash.repos.dispatch(ticket), FeedCompletion::Repos, &tx);
    let ticket = dash.questions.load_default();
    spawn(dash.questions.dispatch(ticket), FeedCompletion::Questions, &tx);
    let ticket = dash.articles.load_default();
    spawn(dash.articles.dispatch(ticket), FeedCompletion::Articles, &tx);

    if dash.github().has_token() {
        let github = Arc::clone(dash.github());
        let tx = tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Message::Star(StarUpdate::Loaded(github.starred().await)));
        });
    }

    loop {
        drain_messages(&mut rx, dash, &mut tui_app, &tx);
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &*dash, &config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                if tui_app.input.is_some() {
                    handle_input_key(key, &mut tui_app, dash, &tx);
                    continue;
                }

                if let Some(pane) = tui_app.pending_clear.take() {
                    let confirmation = match key.code {
                        KeyCode::Char('y') | KeyCode::Char('Y') => Confirmation::Confirmed,
                        _ => Confirmation::Declined,
                    };
                    let message = match pane {
                        ActivePane::Repos => clear_saved(&mut dash.saved_repos, confirmation)?,
                        ActivePane::Questions => {
                            clear_saved(&mut dash.saved_questions, confirmation)?
                        }
                        ActivePane::Articles => {
                            clear_saved(&mut dash.saved_articles, confirmation)?
                        }
                    };
                    tui_app.set_status(message);
                    continue;
                }

                tui_app.clear_status();
                let action = config.keybindings.get_action(&key);
                handle_action(action, &mut tui_app, dash, &tx);
            }
            AppEvent::Tick => {
                if tui_app.should_settle(Instant::now()) {
                    dash.settle_new_items();
                }
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(
    action: Action,
    tui_app: &mut TuiApp,
    dash: &mut Dashboard,
    tx: &UnboundedSender<Message>,
) {
    let pane = tui_app.active_pane;
    let command = match action {
        Action::Quit => {
            tui_app.should_quit = true;
            None
        }
        Action::MoveUp => {
            tui_app.move_up();
            None
        }
        Action::MoveDown => {
            let len = visible_len(tui_app, dash);
            tui_app.move_down(len);
            None
        }
        Action::NextPane => {
            tui_app.next_pane();
            None
        }
        Action::PrevPane => {
            tui_app.prev_pane();
            None
        }
        Action::Search => {
            tui_app.start_search();
            None
        }
        Action::ToggleSavedView => {
            tui_app.toggle_saved_view();
            None
        }
        Action::ClearSaved => {
            if saved_len(pane, dash) > 0 {
                tui_app.pending_clear = Some(pane);
            } else {
                tui_app.set_status("Nothing saved".to_string());
            }
            None
        }
        Action::ToggleSave => {
            toggle_save(tui_app, dash);
            None
        }
        Action::ToggleStar => {
            toggle_star(tui_app, dash, tx);
            None
        }
        Action::OpenInBrowser => {
            if let Some(link) = selected_link(tui_app, dash) {
                open_link(tui_app, &link);
            }
            None
        }
        Action::OpenFork => {
            if pane == ActivePane::Repos && !tui_app.showing_saved {
                let fork = dash.repos.items().get(tui_app.selected()).map(|r| r.fork_url());
                if let Some(url) = fork {
                    open_link(tui_app, &url);
                }
            }
            None
        }
        Action::Refresh => Some(FeedCommand::Refresh),
        Action::SuggestMore => Some(FeedCommand::SuggestMore),
        Action::CycleSort => Some(FeedCommand::CycleSort),
        Action::NextPage => Some(FeedCommand::NextPage),
        Action::PrevPage => Some(FeedCommand::PrevPage),
        Action::NextChunk => Some(FeedCommand::NextChunk),
        Action::PrevChunk => Some(FeedCommand::PrevChunk),
        Action::ClearSearch => Some(FeedCommand::Clear),
        Action::None => None,
    };

    if let Some(command) = command {
        run_command(command, tui_app, dash, tx);
    }
}

fn handle_input_key(
    key: KeyEvent,
    tui_app: &mut TuiApp,
    dash: &mut Dashboard,
    tx: &UnboundedSender<Message>,
) {
    match key.code {
        KeyCode::Esc => tui_app.cancel_input(),
        KeyCode::Backspace => tui_app.pop_char(),
        KeyCode::Tab => {
            let suggestions = match tui_app.active_pane {
                ActivePane::Repos => dash.repos.provider().suggestions(),
                ActivePane::Questions => dash.questions.provider().suggestions(),
                ActivePane::Articles => dash.articles.provider().suggestions(),
            };
            tui_app.cycle_suggestion(suggestions);
        }
        KeyCode::Enter => {
            if let Some(term) = tui_app.take_input() {
                run_command(FeedCommand::Search(term), tui_app, dash, tx);
            }
        }
        KeyCode::Char(c) => tui_app.push_char(c),
        _ => {}
    }
}

/// Issue the command on the active feed and spawn its fetch.
fn run_command(
    command: FeedCommand,
    tui_app: &mut TuiApp,
    dash: &mut Dashboard,
    tx: &UnboundedSender<Message>,
) {
    let pane = tui_app.active_pane;
    let issued = match pane {
        ActivePane::Repos => issue(&mut dash.repos, command, FeedCompletion::Repos, tx),
        ActivePane::Questions => issue(&mut dash.questions, command, FeedCompletion::Questions, tx),
        ActivePane::Articles => issue(&mut dash.articles, command, FeedCompletion::Articles, tx),
    };

    match issued {
        Ok(true) => {
            tui_app.showing_saved = false;
            tui_app.reset_selection(pane);
        }
        Ok(false) => {}
        Err(e) => tui_app.set_status(e.to_string()),
    }
}

fn issue<P: Provider>(
    feed: &mut FeedController<P>,
    command: FeedCommand,
    wrap: fn(Completion<P::Item>) -> FeedCompletion,
    tx: &UnboundedSender<Message>,
) -> Result<bool> {
    match ticket_for(feed, command)? {
        Some(ticket) => {
            spawn(feed.dispatch(ticket), wrap, tx);
            Ok(true)
        }
        None => Ok(false),
    }
}

fn ticket_for<P: Provider>(
    feed: &mut FeedController<P>,
    command: FeedCommand,
) -> Result<Option<Ticket<P::Sort>>> {
    let ticket = match command {
        FeedCommand::Refresh => Some(feed.refresh()),
        FeedCommand::SuggestMore => Some(feed.suggest_more()),
        FeedCommand::CycleSort => Some(feed.change_sort(feed.sort().next())),
        FeedCommand::NextPage => feed.go_to_page(feed.page() + 1),
        FeedCommand::PrevPage => feed.go_to_page(feed.page().saturating_sub(1)),
        FeedCommand::NextChunk => feed.window().next_chunk.and_then(|p| feed.go_to_page(p)),
        FeedCommand::PrevChunk => feed.window().prev_chunk.and_then(|p| feed.go_to_page(p)),
        FeedCommand::Clear => Some(feed.clear()),
        FeedCommand::Search(term) => Some(feed.search(&term)?),
    };
    Ok(ticket)
}

fn spawn<T, F>(
    future: F,
    wrap: fn(Completion<T>) -> FeedCompletion,
    tx: &UnboundedSender<Message>,
) where
    F: Future<Output = Completion<T>> + Send + 'static,
    T: Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        // The receiver is gone once the TUI has exited.
        let _ = tx.send(Message::Feed(wrap(future.await)));
    });
}

fn drain_messages(
    rx: &mut UnboundedReceiver<Message>,
    dash: &mut Dashboard,
    tui_app: &mut TuiApp,
    tx: &UnboundedSender<Message>,
) {
    while let Ok(message) = rx.try_recv() {
        match message {
            Message::Feed(completion) => {
                if let Outcome::Replaced(Some(_)) = dash.apply(completion) {
                    tui_app.mark_new_items(Instant::now());
                }
            }
            Message::Star(update) => apply_star_update(update, tui_app, dash, tx),
        }
    }
}

fn visible_len(tui_app: &TuiApp, dash: &Dashboard) -> usize {
    match (tui_app.active_pane, tui_app.showing_saved) {
        (pane, true) => saved_len(pane, dash),
        (ActivePane::Repos, false) => dash.repos.items().len(),
        (ActivePane::Questions, false) => dash.questions.items().len(),
        (ActivePane::Articles, false) => dash.articles.items().len(),
    }
}

fn saved_len(pane: ActivePane, dash: &Dashboard) -> usize {
    match pane {
        ActivePane::Repos => dash.saved_repos.len(),
        ActivePane::Questions => dash.saved_questions.len(),
        ActivePane::Articles => dash.saved_articles.len(),
    }
}

fn selected_in<'a, T>(tui_app: &TuiApp, live: &'a [T], saved: &'a [T]) -> Option<&'a T> {
    let list = if tui_app.showing_saved { saved } else { live };
    list.get(tui_app.selected())
}

fn selected_link(tui_app: &TuiApp, dash: &Dashboard) -> Option<String> {
    match tui_app.active_pane {
        ActivePane::Repos => selected_in(tui_app, dash.repos.items(), dash.saved_repos.items())
            .map(|i| i.link().to_string()),
        ActivePane::Questions => {
            selected_in(tui_app, dash.questions.items(), dash.saved_questions.items())
                .map(|i| i.link().to_string())
        }
        ActivePane::Articles => {
            selected_in(tui_app, dash.articles.items(), dash.saved_articles.items())
                .map(|i| i.link().to_string())
        }
    }
}

fn open_link(tui_app: &mut TuiApp, link: &str) {
    if let Err(e) = open::that(link) {
        tui_app.set_status(format!("Failed to open browser: {}", e));
    }
}

fn toggle_save(tui_app: &mut TuiApp, dash: &mut Dashboard) {
    let result = match tui_app.active_pane {
        ActivePane::Repos => {
            let item = selected_in(tui_app, dash.repos.items(), dash.saved_repos.items()).cloned();
            toggle_in(&mut dash.saved_repos, item)
        }
        ActivePane::Questions => {
            let item =
                selected_in(tui_app, dash.questions.items(), dash.saved_questions.items()).cloned();
            toggle_in(&mut dash.saved_questions, item)
        }
        ActivePane::Articles => {
            let item =
                selected_in(tui_app, dash.articles.items(), dash.saved_articles.items()).cloned();
            toggle_in(&mut dash.saved_articles, item)
        }
    };

    match result {
        Ok(Some(message)) => tui_app.set_status(message),
        Ok(None) => {}
        Err(e) if e.is_notice() => tui_app.set_status(e.to_string()),
        Err(e) => {
            warn!("Saving failed: {}", e);
            tui_app.set_status(format!("Could not save: {}", e));
        }
    }
}

fn toggle_in<T: FeedItem>(set: &mut SavedItems<T>, item: Option<T>) -> Result<Option<String>> {
    let Some(item) = item else {
        return Ok(None);
    };
    let message = match set.toggle(&item)? {
        Toggle::Added => format!("Saved \"{}\"", item.title()),
        Toggle::Removed => format!("Removed \"{}\" from saved {}", item.title(), set.noun()),
    };
    Ok(Some(message))
}

fn clear_saved<T: FeedItem>(set: &mut SavedItems<T>, confirmation: Confirmation) -> Result<String> {
    if set.clear_all(confirmation)? {
        info!("Cleared saved {}", set.noun());
        Ok(format!("Cleared saved {}", set.noun()))
    } else {
        Ok("Clear cancelled".to_string())
    }
}

/// Star or unstar the selected repository in a spawned task.
fn toggle_star(tui_app: &mut TuiApp, dash: &Dashboard, tx: &UnboundedSender<Message>) {
    if tui_app.active_pane != ActivePane::Repos {
        return;
    }
    let Some(repo) = selected_in(tui_app, dash.repos.items(), dash.saved_repos.items()).cloned()
    else {
        return;
    };

    let starred = dash.is_starred(&repo);
    let github = Arc::clone(dash.github());
    let tx = tx.clone();
    tui_app.set_status(format!("Updating star on {}...", repo.full_name));
    tokio::spawn(async move {
        let update = if starred {
            let result = github.unstar(&repo).await;
            StarUpdate::Unstarred(repo, result)
        } else {
            let result = github.star(&repo).await;
            StarUpdate::Starred(repo, result)
        };
        let _ = tx.send(Message::Star(update));
    });
}

fn apply_star_update(
    update: StarUpdate,
    tui_app: &mut TuiApp,
    dash: &mut Dashboard,
    tx: &UnboundedSender<Message>,
) {
    match update {
        StarUpdate::Loaded(Ok(repos)) => {
            let count = dash.set_starred(repos);
            info!("Loaded {} starred repositories", count);
        }
        StarUpdate::Loaded(Err(e)) => warn!("Could not load starred repositories: {}", e),
        StarUpdate::Starred(repo, Ok(())) => {
            if let Some(ticket) = dash.record_star(&repo) {
                spawn(dash.repos.dispatch(ticket), FeedCompletion::Repos, tx);
            }
            tui_app.set_status(format!("Starred {}", repo.full_name));
        }
        StarUpdate::Unstarred(repo, Ok(())) => {
            dash.record_unstar(&repo);
            tui_app.set_status(format!("Unstarred {}", repo.full_name));
        }
        StarUpdate::Starred(repo, Err(e)) | StarUpdate::Unstarred(repo, Err(e)) => match e {
            DashError::Unauthorized(message) => tui_app.set_status(message),
            e => {
                warn!("Star request failed for {}: {}", repo.full_name, e);
                tui_app.set_status(format!("Could not update star on {}", repo.full_name));
            }
        },
    }
}
