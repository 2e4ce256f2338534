use std::time::{Duration, Instant};

use ratatui::widgets::ListState;

/// How long replacement items stay highlighted.
pub const NEW_ITEM_HIGHLIGHT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Repos,
    Questions,
    Articles,
}

impl ActivePane {
    pub const ALL: [ActivePane; 3] = [
        ActivePane::Repos,
        ActivePane::Questions,
        ActivePane::Articles,
    ];

    pub fn next(self) -> Self {
        match self {
            ActivePane::Repos => ActivePane::Questions,
            ActivePane::Questions => ActivePane::Articles,
            ActivePane::Articles => ActivePane::Repos,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActivePane::Repos => ActivePane::Articles,
            ActivePane::Questions => ActivePane::Repos,
            ActivePane::Articles => ActivePane::Questions,
        }
    }

    pub fn index(self) -> usize {
        match self {
            ActivePane::Repos => 0,
            ActivePane::Questions => 1,
            ActivePane::Articles => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ActivePane::Repos => "GitHub",
            ActivePane::Questions => "Stack Overflow",
            ActivePane::Articles => "dev.to",
        }
    }
}

pub struct TuiApp {
    pub active_pane: ActivePane,
    /// Show the saved set instead of the live feed.
    pub showing_saved: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Search text being typed; `None` outside input mode.
    pub input: Option<String>,
    suggestion_index: usize,
    /// Pane whose saved set is waiting for a y/n answer.
    pub pending_clear: Option<ActivePane>,
    new_items_since: Option<Instant>,
    list_states: [ListState; 3],
    saved_states: [ListState; 3],
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            active_pane: ActivePane::Repos,
            showing_saved: false,
            should_quit: false,
            status_message: None,
            input: None,
            suggestion_index: 0,
            pending_clear: None,
            new_items_since: None,
            list_states: Default::default(),
            saved_states: Default::default(),
        }
    }

    /// List state for the visible list of a pane.
    pub fn list_state(&mut self, pane: ActivePane) -> &mut ListState {
        if self.showing_saved {
            &mut self.saved_states[pane.index()]
        } else {
            &mut self.list_states[pane.index()]
        }
    }

    pub fn selected(&self) -> usize {
        let states = if self.showing_saved {
            &self.saved_states
        } else {
            &self.list_states
        };
        states[self.active_pane.index()].selected().unwrap_or(0)
    }

    pub fn move_up(&mut self) {
        let index = self.selected().saturating_sub(1);
        self.list_state(self.active_pane).select(Some(index));
    }

    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let index = (self.selected() + 1).min(len - 1);
        self.list_state(self.active_pane).select(Some(index));
    }

    /// Keep the selection inside a list that may have shrunk.
    pub fn clamp_selection(&mut self, pane: ActivePane, len: usize) {
        let state = self.list_state(pane);
        match (state.selected(), len) {
            (_, 0) => state.select(None),
            (None, _) => state.select(Some(0)),
            (Some(i), len) if i >= len => state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn reset_selection(&mut self, pane: ActivePane) {
        self.list_states[pane.index()].select(Some(0));
    }

    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.next();
    }

    pub fn prev_pane(&mut self) {
        self.active_pane = self.active_pane.prev();
    }

    pub fn toggle_saved_view(&mut self) {
        self.showing_saved = !self.showing_saved;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn start_search(&mut self) {
        self.input = Some(String::new());
        self.suggestion_index = 0;
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(input) = &mut self.input {
            input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(input) = &mut self.input {
            input.pop();
        }
    }

    /// Replace the input with the next quick-pick term.
    pub fn cycle_suggestion(&mut self, suggestions: &[&str]) {
        if suggestions.is_empty() || self.input.is_none() {
            return;
        }
        let term = suggestions[self.suggestion_index % suggestions.len()];
        self.suggestion_index += 1;
        self.input = Some(term.to_string());
    }

    pub fn cancel_input(&mut self) {
        self.input = None;
    }

    pub fn take_input(&mut self) -> Option<String> {
        self.input.take()
    }

    pub fn mark_new_items(&mut self, now: Instant) {
        self.new_items_since = Some(now);
    }

    /// Whether the highlight on new items has run its course.
    pub fn should_settle(&mut self, now: Instant) -> bool {
        match self.new_items_since {
            Some(since) if now.duration_since(since) >= NEW_ITEM_HIGHLIGHT => {
                self.new_items_since = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_cycle() {
        let mut app = TuiApp::new();
        app.next_pane();
        assert_eq!(app.active_pane, ActivePane::Questions);
        app.prev_pane();
        app.prev_pane();
        assert_eq!(app.active_pane, ActivePane::Articles);
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = TuiApp::new();
        app.move_down(3);
        app.move_down(3);
        app.move_down(3);
        assert_eq!(app.selected(), 2);

        app.clamp_selection(ActivePane::Repos, 1);
        assert_eq!(app.selected(), 0);
        app.move_up();
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_saved_view_has_its_own_selection() {
        let mut app = TuiApp::new();
        app.move_down(5);
        app.toggle_saved_view();
        assert_eq!(app.selected(), 0);
        app.toggle_saved_view();
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn test_search_input() {
        let mut app = TuiApp::new();
        app.push_char('x');
        assert_eq!(app.input, None);

        app.start_search();
        app.push_char('g');
        app.push_char('o');
        app.pop_char();
        app.push_char('o');
        assert_eq!(app.take_input().as_deref(), Some("go"));
        assert_eq!(app.input, None);
    }

    #[test]
    fn test_cycle_suggestion() {
        let mut app = TuiApp::new();
        app.start_search();
        app.cycle_suggestion(&["react", "node"]);
        assert_eq!(app.input.as_deref(), Some("react"));
        app.cycle_suggestion(&["react", "node"]);
        app.cycle_suggestion(&["react", "node"]);
        assert_eq!(app.input.as_deref(), Some("react"));
    }

    #[test]
    fn test_new_items_settle_after_a_second() {
        let mut app = TuiApp::new();
        let start = Instant::now();
        assert!(!app.should_settle(start));

        app.mark_new_items(start);
        assert!(!app.should_settle(start + Duration::from_millis(500)));
        assert!(app.should_settle(start + Duration::from_millis(1000)));
        assert!(!app.should_settle(start + Duration::from_millis(2000)));
    }
}
