//! The state machine shared by the three feeds.

pub mod controller;
pub mod pagination;
pub mod sort;

pub use controller::{Completion, FeedController, Outcome, Ticket, TicketKind};
pub use pagination::{PageWindow, MAX_PAGES, PAGES_PER_CHUNK};
