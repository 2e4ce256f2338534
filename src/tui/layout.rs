use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::dashboard::Dashboard;
use crate::domain::{FeedItem, Mode, SortKey};
use crate::feed::FeedController;
use crate::provider::Provider;
use crate::store::SavedItems;
use crate::tui::app::{ActivePane, TuiApp};

/// Borrowed view of one feed and its saved set.
struct PaneView<'a, P: Provider> {
    feed: &'a FeedController<P>,
    saved: &'a SavedItems<P::Item>,
    /// Extra marker for items, e.g. upstream stars.
    flag: &'a dyn Fn(&P::Item) -> bool,
    note: Option<&'static str>,
}

pub fn render(frame: &mut Frame, app: &mut TuiApp, dash: &Dashboard, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(8),    // List + details
            Constraint::Length(1), // Pages / errors
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0], colors);

    let pane = app.active_pane;
    match pane {
        ActivePane::Repos => {
            let is_starred = |repo: &crate::domain::Repo| dash.is_starred(repo);
            let view = PaneView {
                feed: &dash.repos,
                saved: &dash.saved_repos,
                flag: &is_starred,
                note: None,
            };
            render_pane(frame, app, &view, chunks[1], chunks[2], colors);
        }
        ActivePane::Questions => {
            let view = PaneView {
                feed: &dash.questions,
                saved: &dash.saved_questions,
                flag: &|_| false,
                note: None,
            };
            render_pane(frame, app, &view, chunks[1], chunks[2], colors);
        }
        ActivePane::Articles => {
            let view = PaneView {
                feed: &dash.articles,
                saved: &dash.saved_articles,
                flag: &|_| false,
                note: Some("sorted within the current page"),
            };
            render_pane(frame, app, &view, chunks[1], chunks[2], colors);
        }
    }

    render_status_bar(frame, app, dash, chunks[3], colors);
}

fn render_tabs(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let titles: Vec<&str> = ActivePane::ALL.iter().map(|p| p.title()).collect();
    let tabs = Tabs::new(titles)
        .select(app.active_pane.index())
        .style(Style::default().fg(colors.inactive_border))
        .highlight_style(
            Style::default()
                .fg(colors.active_border)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn render_pane<P: Provider>(
    frame: &mut Frame,
    app: &mut TuiApp,
    view: &PaneView<P>,
    body: Rect,
    footer: Rect,
    colors: &ColorConfig,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body);

    let pane = app.active_pane;
    let (items, title) = if app.showing_saved {
        (view.saved.items(), saved_title(view.saved))
    } else {
        (view.feed.items(), feed_title(view))
    };
    app.clamp_selection(pane, items.len());

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| {
            let id = item.item_id();
            let saved = if view.saved.contains(id) { "♥" } else { " " };
            let flag = if (view.flag)(item) { "★" } else { " " };
            let style = if !app.showing_saved && view.feed.is_new(id) {
                Style::default()
                    .fg(colors.new_item)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.item)
            };
            ListItem::new(Line::from(vec![
                Span::styled(saved, Style::default().fg(colors.saved_marker)),
                Span::styled(flag, Style::default().fg(colors.saved_marker)),
                Span::raw(" "),
                Span::styled(item.title().to_string(), style),
            ]))
        })
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.active_border));

    let list = List::new(rows)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, columns[0], app.list_state(pane));

    let selected = items.get(app.selected());
    render_details(frame, selected, columns[1], colors);

    if app.showing_saved {
        frame.render_widget(Paragraph::new(""), footer);
    } else {
        render_footer(frame, view.feed, footer, colors);
    }
}

fn feed_title<P: Provider>(view: &PaneView<P>) -> String {
    let feed = view.feed;
    let provider = feed.provider();
    let heading = match (feed.mode(), feed.term()) {
        (Mode::Search, Some(term)) => format!(
            "{} {} \"{}\"",
            provider.noun(),
            provider.term_kind(),
            term
        ),
        _ => format!("popular {}", provider.noun()),
    };
    let sort = match view.note {
        Some(note) => format!("{}, {}", feed.sort().label(), note),
        None => feed.sort().label().to_string(),
    };
    let loading = if feed.is_loading() { " loading..." } else { "" };
    format!(" {} [{}]{} ", heading, sort, loading)
}

fn saved_title<T: FeedItem>(saved: &SavedItems<T>) -> String {
    match saved.capacity() {
        Some(limit) => format!(" saved {} ({}/{}) ", saved.noun(), saved.len(), limit),
        None => format!(" saved {} ({}) ", saved.noun(), saved.len()),
    }
}

fn render_details<T: FeedItem>(
    frame: &mut Frame,
    item: Option<&T>,
    area: Rect,
    colors: &ColorConfig,
) {
    let content = match item {
        Some(item) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    item.title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    item.byline().to_string(),
                    Style::default().fg(colors.byline),
                )),
                Line::from(Span::styled(
                    item.stats_line(),
                    Style::default().fg(colors.stats),
                )),
                Line::from(""),
            ];
            lines.extend(item.details().into_iter().map(Line::from));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                item.link().to_string(),
                Style::default().fg(colors.link),
            )));
            Text::from(lines)
        }
        None => Text::from("Nothing selected"),
    };

    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.inactive_border));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Page links in search mode, or the feed's error message.
fn render_footer<P: Provider>(
    frame: &mut Frame,
    feed: &FeedController<P>,
    area: Rect,
    colors: &ColorConfig,
) {
    if let Some(error) = feed.error() {
        let line = Paragraph::new(error.to_string()).style(Style::default().fg(colors.error));
        frame.render_widget(line, area);
        return;
    }
    if feed.mode() != Mode::Search {
        frame.render_widget(Paragraph::new(""), area);
        return;
    }

    let window = feed.window();
    let mut spans = Vec::new();
    if let Some(prev) = window.prev_chunk {
        spans.push(Span::raw(format!("[<{}] ", prev)));
    }
    for page in window.pages.clone() {
        let style = if page == window.current {
            Style::default()
                .fg(colors.current_page)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default()
        };
        spans.push(Span::styled(page.to_string(), style));
        spans.push(Span::raw(" "));
    }
    if let Some(next) = window.next_chunk {
        spans.push(Span::raw(format!("[{}>]", next)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(
    frame: &mut Frame,
    app: &TuiApp,
    dash: &Dashboard,
    area: Rect,
    colors: &ColorConfig,
) {
    let status = if let Some(input) = &app.input {
        let kind = match app.active_pane {
            ActivePane::Repos => "topic",
            ActivePane::Questions | ActivePane::Articles => "tag",
        };
        format!("Search {}: {}_  (Tab: suggestions, Enter: search, Esc: cancel)", kind, input)
    } else if let Some(pane) = app.pending_clear {
        let noun = match pane {
            ActivePane::Repos => dash.saved_repos.noun(),
            ActivePane::Questions => dash.saved_questions.noun(),
            ActivePane::Articles => dash.saved_articles.noun(),
        };
        format!("Remove all saved {}? (y/n)", noun)
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "j/k:Nav  Tab:Feed  /:Search  c:Clear  s:Sort  m:More  n/p:Page  [ ]:Chunk  f:Save  S:Star  v:Saved  o:Open  q:Quit"
            .to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));
    frame.render_widget(paragraph, area);
}
