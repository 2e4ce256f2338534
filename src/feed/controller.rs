use std::future::Future;
use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use crate::app::{DashError, Result};
use crate::domain::{FeedItem, Mode};
use crate::feed::pagination::{self, PageWindow, MAX_PAGES};
use crate::provider::{Page, PageQuery, Provider};

/// Pages sampled by the discovery view.
pub const DISCOVERY_PAGES: RangeInclusive<u32> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketKind {
    /// Replaces the visible page.
    Page,
    /// Fills one gap in the visible page. Only applies while `basis` is still
    /// the latest page token.
    Replacement { basis: u64, exclude: Vec<i64> },
}

/// A request the controller has decided to make. Running it is up to the
/// caller; the result comes back through [`FeedController::complete`].
#[derive(Debug, Clone)]
pub struct Ticket<S> {
    pub token: u64,
    pub kind: TicketKind,
    pub query: PageQuery<S>,
}

#[derive(Debug)]
pub struct Completion<T> {
    pub token: u64,
    pub kind: TicketKind,
    pub result: Result<Page<T>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The page replaced the visible items.
    Loaded(usize),
    /// The fetch failed; previous items were kept.
    Failed,
    /// A replacement was appended, or nothing new was found.
    Replaced(Option<i64>),
    /// A newer request superseded this one.
    Stale,
}

pub struct FeedController<P: Provider> {
    provider: Arc<P>,
    mode: Mode,
    term: Option<String>,
    sort: P::Sort,
    page: u32,
    items: Vec<P::Item>,
    has_more: bool,
    total: Option<u64>,
    loading: bool,
    error: Option<String>,
    issued: u64,
    latest: u64,
    fresh: Vec<i64>,
}

impl<P: Provider> FeedController<P> {
    pub fn new(provider: Arc<P>) -> Self {
        let sort = provider.default_sort();
        Self {
            provider,
            mode: Mode::Discovery,
            term: None,
            sort,
            page: 1,
            items: Vec::new(),
            has_more: false,
            total: None,
            loading: false,
            error: None,
            issued: 0,
            latest: 0,
            fresh: Vec::new(),
        }
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn sort(&self) -> P::Sort {
        self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn items(&self) -> &[P::Item] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the item was appended as a replacement and not yet settled.
    pub fn is_new(&self, id: i64) -> bool {
        self.fresh.contains(&id)
    }

    pub fn last_page(&self) -> u32 {
        pagination::last_page(self.page, self.has_more, self.total, self.provider.per_page())
    }

    pub fn window(&self) -> PageWindow {
        pagination::window(self.page, self.last_page())
    }

    fn query(&self) -> PageQuery<P::Sort> {
        PageQuery {
            mode: self.mode,
            term: self.term.clone(),
            sort: self.sort,
            page: self.page,
            per_page: self.provider.per_page(),
        }
    }

    fn next_token(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn page_ticket(&mut self) -> Ticket<P::Sort> {
        let token = self.next_token();
        self.latest = token;
        self.loading = true;
        Ticket {
            token,
            kind: TicketKind::Page,
            query: self.query(),
        }
    }

    /// Discovery mode on a random page of the provider's default listing.
    pub fn load_default(&mut self) -> Ticket<P::Sort> {
        let page = rand::thread_rng().gen_range(DISCOVERY_PAGES);
        self.load_discovery_page(page)
    }

    /// Another random discovery page.
    pub fn suggest_more(&mut self) -> Ticket<P::Sort> {
        self.load_default()
    }

    pub fn load_discovery_page(&mut self, page: u32) -> Ticket<P::Sort> {
        self.mode = Mode::Discovery;
        self.term = None;
        self.page = page.clamp(1, MAX_PAGES);
        self.page_ticket()
    }

    /// Search for a term. An empty term is rejected without touching state.
    pub fn search(&mut self, term: &str) -> Result<Ticket<P::Sort>> {
        self.search_from(term, 1)
    }

    /// Search starting at a given page, for direct links into the results.
    pub fn search_from(&mut self, term: &str, page: u32) -> Result<Ticket<P::Sort>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(DashError::Validation(format!(
                "Please enter a {} to search.",
                self.provider.term_kind()
            )));
        }
        if !(1..=MAX_PAGES).contains(&page) {
            return Err(DashError::Validation(format!(
                "Page must be between 1 and {}.",
                MAX_PAGES
            )));
        }
        self.mode = Mode::Search;
        self.term = Some(term);
        self.page = page;
        self.total = None;
        Ok(self.page_ticket())
    }

    /// Change the sort key and reload the current mode from page 1.
    pub fn change_sort(&mut self, sort: P::Sort) -> Ticket<P::Sort> {
        self.sort = sort;
        self.page = 1;
        self.page_ticket()
    }

    /// Jump to a search result page. Returns `None` and leaves state alone
    /// when the page cannot exist.
    pub fn go_to_page(&mut self, page: u32) -> Option<Ticket<P::Sort>> {
        if self.mode != Mode::Search || page < 1 || page > MAX_PAGES {
            return None;
        }
        if page > self.page && !self.has_more {
            return None;
        }
        if page > self.last_page() {
            return None;
        }
        self.page = page;
        Some(self.page_ticket())
    }

    /// Leave search mode and reload discovery.
    pub fn clear(&mut self) -> Ticket<P::Sort> {
        self.total = None;
        self.load_default()
    }

    pub fn refresh(&mut self) -> Ticket<P::Sort> {
        self.page_ticket()
    }

    pub fn remove(&mut self, id: i64) -> Option<P::Item> {
        self.fresh.retain(|f| *f != id);
        let index = self.items.iter().position(|item| item.item_id() == id)?;
        Some(self.items.remove(index))
    }

    /// Refetch the current query to find one item for a gap left by
    /// [`remove`](Self::remove). Does not touch the loading flag.
    pub fn request_replacement(&mut self, exclude: Vec<i64>) -> Ticket<P::Sort> {
        let token = self.next_token();
        Ticket {
            token,
            kind: TicketKind::Replacement {
                basis: self.latest,
                exclude,
            },
            query: self.query(),
        }
    }

    pub fn settle_new_items(&mut self) {
        self.fresh.clear();
    }

    /// Run a ticket against the provider. The future owns everything it
    /// needs, so it can be spawned.
    pub fn dispatch(
        &self,
        ticket: Ticket<P::Sort>,
    ) -> impl Future<Output = Completion<P::Item>> + Send + 'static {
        let provider = Arc::clone(&self.provider);
        async move {
            let result = provider.fetch_page(&ticket.query).await;
            Completion {
                token: ticket.token,
                kind: ticket.kind,
                result,
            }
        }
    }

    /// Dispatch and apply in one step.
    pub async fn run(&mut self, ticket: Ticket<P::Sort>) -> Outcome {
        let completion = self.dispatch(ticket).await;
        self.complete(completion)
    }

    pub fn complete(&mut self, completion: Completion<P::Item>) -> Outcome {
        match completion.kind {
            TicketKind::Page => self.complete_page(completion.token, completion.result),
            TicketKind::Replacement { basis, exclude } => {
                self.complete_replacement(basis, &exclude, completion.result)
            }
        }
    }

    fn complete_page(&mut self, token: u64, result: Result<Page<P::Item>>) -> Outcome {
        if token != self.latest {
            debug!("Dropping stale {} response (token {})", self.provider.noun(), token);
            return Outcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                let mut items = page.items;
                self.provider.sort_page(self.sort, &mut items);
                self.items = items;
                self.has_more = page.has_more;
                self.total = page.total;
                self.error = None;
                self.fresh.clear();
                Outcome::Loaded(self.items.len())
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", self.provider.noun(), e);
                self.error = Some(self.provider.failure_message().to_string());
                Outcome::Failed
            }
        }
    }

    fn complete_replacement(
        &mut self,
        basis: u64,
        exclude: &[i64],
        result: Result<Page<P::Item>>,
    ) -> Outcome {
        if basis != self.latest {
            debug!("Dropping stale {} replacement", self.provider.noun());
            return Outcome::Stale;
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                debug!("Replacement fetch failed: {}", e);
                return Outcome::Replaced(None);
            }
        };

        let candidate = page.items.into_iter().find(|item| {
            let id = item.item_id();
            !exclude.contains(&id) && !self.items.iter().any(|i| i.item_id() == id)
        });

        match candidate {
            Some(item) => {
                let id = item.item_id();
                self.items.push(item);
                self.fresh.push(id);
                Outcome::Replaced(Some(id))
            }
            None => Outcome::Replaced(None),
        }
    }
}
